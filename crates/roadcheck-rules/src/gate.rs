//! Barrier-adjacent short edges.
//!
//! A barrier node placed on a long way forces a section break at the barrier,
//! which leaves a short edge whose far endpoint is still well connected.

use roadcheck_core::graph::{Edge, RoadGraph};
use roadcheck_core::tags::{Barrier, Tagged};

/// One endpoint carries a barrier tag and the other has more than one main edge.
pub fn is_gate_like(graph: &RoadGraph, edge: &Edge) -> bool {
    let (Some(start), Some(end)) = (graph.start_node(edge), graph.end_node(edge)) else {
        return false;
    };
    (graph.main_edge_count(start.id) > 1 && end.has_tag::<Barrier>())
        || (graph.main_edge_count(end.id) > 1 && start.has_tag::<Barrier>())
}
