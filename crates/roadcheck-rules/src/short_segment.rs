//! Short segment check: short main edges with a poorly connected endpoint.
//!
//! An edge is flagged when it is eligible (main edge, important enough highway,
//! shorter than the maximum length), one of its endpoints is low valence, and
//! neither the gate-like nor the synthetic boundary exception applies.

use crate::boundary::is_edge_with_synthetic_boundary_node;
use crate::check::Check;
use crate::flag::CheckFlag;
use crate::gate::is_gate_like;
use crate::valence::find_low_valence_node;
use rayon::prelude::*;
use roadcheck_core::config::ShortSegmentConfig;
use roadcheck_core::error::ConfigError;
use roadcheck_core::graph::{Edge, GraphObject, RoadGraph};
use roadcheck_core::highway::HighwayClass;
use serde::Serialize;
use std::collections::BTreeMap;

pub const CHECK_NAME: &str = "ShortSegmentCheck";

const FALLBACK_INSTRUCTIONS: &[&str] = &[
    "This segment from startNode {0} to endNode {1} on way {2} is short (length < {3} m) and node {4} has less than {5} connections.",
];

/// Outcome of evaluating one edge, including why it was not flagged.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Ineligible,
    WellConnected,
    GateLike,
    SyntheticBoundary,
    Flagged(CheckFlag),
}

impl Verdict {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Ineligible => "ineligible",
            Self::WellConnected => "well_connected",
            Self::GateLike => "gate_like",
            Self::SyntheticBoundary => "synthetic_boundary",
            Self::Flagged(_) => "flagged",
        }
    }

    pub fn into_flag(self) -> Option<CheckFlag> {
        match self {
            Self::Flagged(flag) => Some(flag),
            _ => None,
        }
    }
}

/// Per-verdict edge counts for a whole graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VerdictCounts(pub BTreeMap<&'static str, usize>);

impl VerdictCounts {
    pub fn get(&self, label: &str) -> usize {
        self.0.get(label).copied().unwrap_or(0)
    }
}

/// The short segment rule. Holds configuration only.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortSegmentRule {
    maximum_length_meters: f64,
    minimum_valence: usize,
    minimum_highway_priority: HighwayClass,
}

impl ShortSegmentRule {
    /// Build the rule from configuration. An unknown highway priority is an error
    /// and no rule is produced.
    pub fn new(config: &ShortSegmentConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            maximum_length_meters: config.maximum_length_meters,
            minimum_valence: config.minimum_valence,
            minimum_highway_priority: config.highway_priority()?,
        })
    }

    pub fn maximum_length_meters(&self) -> f64 {
        self.maximum_length_meters
    }

    pub fn minimum_valence(&self) -> usize {
        self.minimum_valence
    }

    pub fn minimum_highway_priority(&self) -> HighwayClass {
        self.minimum_highway_priority
    }

    pub fn is_eligible_edge(&self, edge: &Edge) -> bool {
        edge.is_main_edge()
            && edge
                .highway
                .is_more_important_than_or_equal_to(self.minimum_highway_priority)
            && edge.length_meters < self.maximum_length_meters
    }

    /// Evaluate `edge` and say why it was or was not flagged.
    pub fn decide(&self, graph: &RoadGraph, edge: &Edge) -> Verdict {
        let verdict = self.decide_inner(graph, edge);
        tracing::trace!(edge = %edge.id, verdict = verdict.label(), "short segment verdict");
        verdict
    }

    fn decide_inner(&self, graph: &RoadGraph, edge: &Edge) -> Verdict {
        if !self.is_eligible_edge(edge) {
            return Verdict::Ineligible;
        }
        let Some(nodes) = find_low_valence_node(graph, edge, self.minimum_valence) else {
            return Verdict::WellConnected;
        };
        if is_gate_like(graph, edge) {
            return Verdict::GateLike;
        }
        if is_edge_with_synthetic_boundary_node(graph, edge) {
            return Verdict::SyntheticBoundary;
        }

        let instruction = self.instruction(
            0,
            &[
                &nodes.start.id,
                &nodes.end.id,
                &edge.way_id(),
                &self.maximum_length_meters,
                &nodes.offending.id,
                &self.minimum_valence,
            ],
        );
        Verdict::Flagged(
            CheckFlag::new(CHECK_NAME, GraphObject::Edge(edge))
                .with_object(GraphObject::Node(nodes.offending))
                .with_instruction(instruction)
                .with_point(nodes.offending.location),
        )
    }

    /// Flag `edge` if it is a short, poorly connected segment.
    pub fn evaluate(&self, graph: &RoadGraph, edge: &Edge) -> Option<CheckFlag> {
        self.decide(graph, edge).into_flag()
    }

    /// Count verdicts over every edge of `graph`.
    pub fn verdict_counts(&self, graph: &RoadGraph) -> VerdictCounts {
        let counts = graph
            .edges()
            .par_iter()
            .fold(BTreeMap::new, |mut acc: BTreeMap<&'static str, usize>, edge| {
                *acc.entry(self.decide(graph, edge).label()).or_insert(0) += 1;
                acc
            })
            .reduce(BTreeMap::new, |mut a, b| {
                for (label, n) in b {
                    *a.entry(label).or_insert(0) += n;
                }
                a
            });
        VerdictCounts(counts)
    }
}

impl Check for ShortSegmentRule {
    fn name(&self) -> &'static str {
        CHECK_NAME
    }

    fn is_eligible(&self, _graph: &RoadGraph, object: GraphObject<'_>) -> bool {
        match object {
            GraphObject::Edge(edge) => self.is_eligible_edge(edge),
            GraphObject::Node(_) => false,
        }
    }

    fn flag(&self, graph: &RoadGraph, object: GraphObject<'_>) -> Option<CheckFlag> {
        match object {
            GraphObject::Edge(edge) => self.evaluate(graph, edge),
            GraphObject::Node(_) => None,
        }
    }

    fn fallback_instructions(&self) -> &'static [&'static str] {
        FALLBACK_INSTRUCTIONS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{build, edge, node};
    use roadcheck_core::graph::{EdgeId, Location, Node};

    fn rule() -> ShortSegmentRule {
        ShortSegmentRule::new(&ShortSegmentConfig::default()).unwrap()
    }

    /// Subject edge 1 -(w1, 0.5 m)- 2. Node 1 also joins way 2 (2 main edges);
    /// node 2 joins ways 3 and 4 (3 main edges).
    fn scenario_a(start: Node, end: Node) -> RoadGraph {
        build(
            vec![start, end, node(3), node(4), node(5)],
            &[
                (1, 0, 1, 2, 0.5),
                (2, 0, 3, 1, 20.0),
                (3, 0, 2, 4, 20.0),
                (4, 0, 2, 5, 20.0),
            ],
        )
    }

    #[test]
    fn test_scenario_a_flags_start_node() {
        let graph = scenario_a(node(1), node(2));
        let flag = rule().evaluate(&graph, edge(&graph, 1, 0)).unwrap();
        assert_eq!(flag.check, CHECK_NAME);
        assert_eq!(flag.identifier, "edge:1:0+");
        assert_eq!(
            flag.instructions,
            vec![
                "This segment from startNode 1 to endNode 2 on way 1 is short (length < 1 m) and node 1 has less than 3 connections."
                    .to_string()
            ]
        );
        assert_eq!(flag.points, vec![graph.node(1).unwrap().location]);
        assert_eq!(
            flag.flagged_objects,
            vec!["edge:1:0+".to_string(), "node:1".to_string()]
        );
    }

    #[test]
    fn test_scenario_b_gate_like() {
        let graph = scenario_a(node(1), node(2).with_tag("barrier", "gate"));
        assert_eq!(
            rule().decide(&graph, edge(&graph, 1, 0)),
            Verdict::GateLike
        );
    }

    #[test]
    fn test_scenario_c_closed_way() {
        // node 1 joins only sections of way 1
        let graph = build(
            (1..=5).map(node).collect(),
            &[
                (1, 0, 1, 2, 0.5),
                (1, 1, 3, 1, 20.0),
                (3, 0, 2, 4, 20.0),
                (4, 0, 2, 5, 20.0),
            ],
        );
        assert_eq!(
            rule().decide(&graph, edge(&graph, 1, 0)),
            Verdict::WellConnected
        );
    }

    #[test]
    fn test_scenario_d_synthetic_boundary() {
        let graph = scenario_a(node(1), node(2).with_tag("synthetic_boundary_node", "yes"));
        assert_eq!(
            rule().decide(&graph, edge(&graph, 1, 0)),
            Verdict::SyntheticBoundary
        );
    }

    #[test]
    fn test_length_at_maximum_is_ineligible() {
        let graph = build(vec![node(1), node(2)], &[(1, 0, 1, 2, 1.0)]);
        assert_eq!(
            rule().decide(&graph, edge(&graph, 1, 0)),
            Verdict::Ineligible
        );
    }

    #[test]
    fn test_reverse_edge_is_ineligible() {
        let graph = build(vec![node(1), node(2)], &[(1, 0, 1, 2, 0.5)]);
        let reverse = graph
            .edges()
            .iter()
            .find(|e| !e.is_main_edge())
            .unwrap();
        assert!(!rule().is_eligible(&graph, GraphObject::Edge(reverse)));
        assert!(rule().evaluate(&graph, reverse).is_none());
    }

    #[test]
    fn test_minor_highway_is_ineligible() {
        let mut graph = RoadGraph::new("test");
        graph.insert_node(node(1)).unwrap();
        graph.insert_node(node(2)).unwrap();
        graph
            .insert_segment(Edge::new(
                EdgeId::forward(1, 0),
                1,
                2,
                0.5,
                HighwayClass::Footway,
            ))
            .unwrap();
        let footway = edge(&graph, 1, 0);
        assert!(!rule().is_eligible_edge(footway));

        let config = ShortSegmentConfig {
            minimum_highway_priority: "footway".to_string(),
            ..ShortSegmentConfig::default()
        };
        let relaxed = ShortSegmentRule::new(&config).unwrap();
        assert!(relaxed.evaluate(&graph, footway).is_some());
    }

    #[test]
    fn test_nodes_are_never_eligible() {
        let n = Node::new(1, Location::new(0.0, 0.0));
        let graph = build(vec![n.clone()], &[]);
        assert!(!rule().is_eligible(&graph, GraphObject::Node(&n)));
        assert!(rule().check(&graph, GraphObject::Node(&n)).is_none());
    }

    #[test]
    fn test_unknown_priority_fails_construction() {
        let config = ShortSegmentConfig {
            minimum_highway_priority: "autobahn".to_string(),
            ..ShortSegmentConfig::default()
        };
        assert!(matches!(
            ShortSegmentRule::new(&config),
            Err(ConfigError::HighwayPriority(_))
        ));
    }

    #[test]
    fn test_degenerate_thresholds_never_flag() {
        let graph = scenario_a(node(1), node(2));
        let zero_valence = ShortSegmentRule::new(&ShortSegmentConfig {
            minimum_valence: 0,
            ..ShortSegmentConfig::default()
        })
        .unwrap();
        assert_eq!(
            zero_valence.decide(&graph, edge(&graph, 1, 0)),
            Verdict::WellConnected
        );

        let zero_length = ShortSegmentRule::new(&ShortSegmentConfig {
            maximum_length_meters: 0.0,
            ..ShortSegmentConfig::default()
        })
        .unwrap();
        assert_eq!(
            zero_length.decide(&graph, edge(&graph, 1, 0)),
            Verdict::Ineligible
        );
    }

    #[test]
    fn test_repeated_evaluation_is_identical() {
        let graph = scenario_a(node(1), node(2));
        let r = rule();
        let first = r.evaluate(&graph, edge(&graph, 1, 0));
        for _ in 0..5 {
            assert_eq!(r.evaluate(&graph, edge(&graph, 1, 0)), first);
        }
    }

    #[test]
    fn test_verdict_counts() {
        let graph = scenario_a(node(1), node(2));
        let counts = rule().verdict_counts(&graph);
        // four reverse edges and three long main edges
        assert_eq!(counts.get("ineligible"), 7);
        assert_eq!(counts.get("flagged"), 1);
        assert_eq!(counts.get("gate_like"), 0);
    }
}
