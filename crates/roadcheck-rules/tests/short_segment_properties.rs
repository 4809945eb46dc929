//! Whole-graph properties of the short segment check.

use roadcheck_core::config::ShortSegmentConfig;
use roadcheck_core::graph::*;
use roadcheck_core::highway::HighwayClass;
use roadcheck_rules::check::Check;
use roadcheck_rules::runner::run_check;
use roadcheck_rules::short_segment::{ShortSegmentRule, Verdict};
use roadcheck_rules::valence::main_edges;

fn rule() -> ShortSegmentRule {
    ShortSegmentRule::new(&ShortSegmentConfig::default()).unwrap()
}

/// A `size` x `size` street grid with unit spacing, plus a short spur hanging
/// off every interior node. Spur lengths cycle through 0.2 .. 1.4 m.
fn make_grid(size: i64) -> RoadGraph {
    let mut graph = RoadGraph::new("grid");
    let id = |r: i64, c: i64| r * size + c + 1;
    for r in 0..size {
        for c in 0..size {
            graph
                .insert_node(Node::new(
                    id(r, c),
                    Location::new(r as f64 * 1e-4, c as f64 * 1e-4),
                ))
                .unwrap();
        }
    }

    let mut way = 1;
    for r in 0..size {
        for c in 0..size {
            if c + 1 < size {
                graph
                    .insert_segment(Edge::new(
                        EdgeId::forward(way, 0),
                        id(r, c),
                        id(r, c + 1),
                        11.0,
                        HighwayClass::Residential,
                    ))
                    .unwrap();
                way += 1;
            }
            if r + 1 < size {
                graph
                    .insert_segment(Edge::new(
                        EdgeId::forward(way, 0),
                        id(r, c),
                        id(r + 1, c),
                        11.0,
                        HighwayClass::Residential,
                    ))
                    .unwrap();
                way += 1;
            }
        }
    }

    let mut spur_node = size * size + 1;
    for r in 1..size - 1 {
        for c in 1..size - 1 {
            let length = 0.2 * ((spur_node % 7) + 1) as f64;
            graph
                .insert_node(Node::new(spur_node, Location::new(-1.0, spur_node as f64)))
                .unwrap();
            graph
                .insert_segment(Edge::new(
                    EdgeId::forward(way, 0),
                    spur_node,
                    id(r, c),
                    length,
                    HighwayClass::Service,
                ))
                .unwrap();
            spur_node += 1;
            way += 1;
        }
    }

    graph.refresh_metadata();
    graph
}

#[test]
fn test_long_edges_never_flagged() {
    let graph = make_grid(6);
    let rule = rule();
    for edge in graph.edges() {
        if edge.length_meters >= rule.maximum_length_meters() {
            assert!(rule.evaluate(&graph, edge).is_none(), "{}", edge.id);
        }
    }
}

#[test]
fn test_well_connected_edges_never_flagged() {
    let graph = make_grid(6);
    let rule = rule();
    for edge in graph.edges() {
        let connected = [edge.start, edge.end]
            .iter()
            .all(|&n| main_edges(&graph, n).len() >= rule.minimum_valence());
        if connected {
            assert!(rule.evaluate(&graph, edge).is_none(), "{}", edge.id);
        }
    }
}

#[test]
fn test_flagged_spurs_report_dead_end_start() {
    let graph = make_grid(6);
    let rule = rule();
    let report = run_check(&graph, &rule);

    let short_spurs = graph
        .edges()
        .iter()
        .filter(|e| e.is_main_edge() && e.highway == HighwayClass::Service)
        .filter(|e| e.length_meters < 1.0)
        .count();
    assert!(short_spurs > 0);
    assert_eq!(report.summary.flagged, short_spurs);

    for flag in &report.flags {
        assert_eq!(flag.points.len(), 1);
        assert_eq!(flag.instructions.len(), 1);
        // spurs start at their dead-end node, which is always reported
        assert!(flag.flagged_objects[1].starts_with("node:"));
        let node_id: NodeId = flag.flagged_objects[1]["node:".len()..].parse().unwrap();
        assert!(node_id > 36);
        assert_eq!(flag.points[0], graph.node(node_id).unwrap().location);
    }
}

#[test]
fn test_run_is_deterministic() {
    let graph = make_grid(8);
    let rule = rule();
    let first = run_check(&graph, &rule);
    for _ in 0..3 {
        let again = run_check(&graph, &rule);
        assert_eq!(again.flags, first.flags);
        assert_eq!(again.summary, first.summary);
    }
}

#[test]
fn test_runner_agrees_with_sequential_evaluation() {
    let graph = make_grid(7);
    let rule = rule();
    let sequential: Vec<_> = graph
        .objects()
        .filter_map(|object| rule.check(&graph, object))
        .collect();
    assert_eq!(run_check(&graph, &rule).flags, sequential);
}

#[test]
fn test_both_endpoints_low_reports_start() {
    let mut graph = RoadGraph::new("pair");
    graph.insert_node(Node::new(10, Location::new(0.0, 0.0))).unwrap();
    graph.insert_node(Node::new(20, Location::new(0.0, 1e-6))).unwrap();
    graph
        .insert_segment(Edge::new(
            EdgeId::forward(5, 0),
            10,
            20,
            0.1,
            HighwayClass::Primary,
        ))
        .unwrap();

    let edge = graph.edge(EdgeId::forward(5, 0)).unwrap();
    match rule().decide(&graph, edge) {
        Verdict::Flagged(flag) => {
            assert_eq!(flag.flagged_objects[1], "node:10");
            assert!(flag.instructions[0].contains("node 10 has less than 3"));
        }
        other => panic!("expected a flag, got {other:?}"),
    }
}
