//! Edges cut short by clipping at a tiling or administrative boundary.

use roadcheck_core::graph::{Edge, RoadGraph};
use roadcheck_core::tags::{SyntheticBoundaryNode, Tagged};

pub fn is_edge_with_synthetic_boundary_node(graph: &RoadGraph, edge: &Edge) -> bool {
    graph
        .connected_nodes(edge)
        .into_iter()
        .any(|node| node.has_tag::<SyntheticBoundaryNode>())
}
