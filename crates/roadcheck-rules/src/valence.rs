//! Node valence: how many undirected segments meet at a node.
//!
//! Valence counts only main edges, so the forward and reverse edge of one
//! segment contribute once. A node whose valence is below the threshold is
//! "low valence", except for the closed-way sectioning artifact: a node with
//! exactly two main edges that both belong to the way under test. Splitting a
//! closed loop at an arbitrary point leaves exactly that shape behind.

use roadcheck_core::graph::{Edge, Node, NodeId, RoadGraph, WayId};

/// The edge's own endpoints plus the first endpoint found to be low valence.
#[derive(Debug, Clone, Copy)]
pub struct LowValenceNodes<'a> {
    pub start: &'a Node,
    pub end: &'a Node,
    pub offending: &'a Node,
}

/// Main edges incident to `node`.
pub fn main_edges(graph: &RoadGraph, node: NodeId) -> Vec<&Edge> {
    graph
        .connected_edges(node)
        .into_iter()
        .filter(|e| e.is_main_edge())
        .collect()
}

/// Exactly two main edges, both sectioned from `way`.
fn is_closed_way_section(main_edges: &[&Edge], way: WayId) -> bool {
    main_edges.len() == 2 && main_edges.iter().filter(|e| e.way_id() == way).count() > 1
}

/// Whether `node` has fewer than `threshold` main edges, ignoring closed-way
/// sectioning artifacts of `way`.
pub fn is_low_valence(graph: &RoadGraph, node: NodeId, way: WayId, threshold: usize) -> bool {
    let main = main_edges(graph, node);
    main.len() < threshold && !is_closed_way_section(&main, way)
}

/// Check the start node, then the end node, and report the first one that is
/// low valence. The end node is not inspected once the start node qualifies.
///
/// Returns `None` when neither endpoint qualifies, or when an endpoint is
/// missing from the graph.
pub fn find_low_valence_node<'a>(
    graph: &'a RoadGraph,
    edge: &Edge,
    threshold: usize,
) -> Option<LowValenceNodes<'a>> {
    let start = graph.start_node(edge)?;
    let end = graph.end_node(edge)?;

    [start, end]
        .into_iter()
        .find(|node| is_low_valence(graph, node.id, edge.way_id(), threshold))
        .map(|offending| LowValenceNodes {
            start,
            end,
            offending,
        })
}
