//! Road network snapshot: flat node and edge tables with adjacency index lists.

use crate::error::GraphError;
use crate::highway::HighwayClass;
use crate::tags::{Tagged, Tags};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

/// Stable numeric node identifier (the source map node id).
pub type NodeId = i64;
/// Identifier of the source way an edge was sectioned from.
pub type WayId = i64;

/// A WGS84 coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "POINT ({} {})", self.longitude, self.latitude)
    }
}

/// Traversal direction of a directed edge relative to its source way.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Canonical direction; the main edge of an undirected segment.
    #[default]
    Forward,
    Reverse,
}

impl Direction {
    pub fn opposite(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// Edge identifier: source way, section index within the way, and direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId {
    pub way: WayId,
    pub section: u32,
    #[serde(default)]
    pub direction: Direction,
}

impl EdgeId {
    pub fn forward(way: WayId, section: u32) -> Self {
        Self {
            way,
            section,
            direction: Direction::Forward,
        }
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = match self.direction {
            Direction::Forward => '+',
            Direction::Reverse => '-',
        };
        write!(f, "{}:{}{}", self.way, self.section, sign)
    }
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub location: Location,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl Node {
    pub fn new(id: NodeId, location: Location) -> Self {
        Self {
            id,
            location,
            tags: Tags::new(),
        }
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }
}

impl Tagged for Node {
    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// A directed graph edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub start: NodeId,
    pub end: NodeId,
    pub length_meters: f64,
    #[serde(default)]
    pub highway: HighwayClass,
    #[serde(default, skip_serializing_if = "Tags::is_empty")]
    pub tags: Tags,
}

impl Edge {
    pub fn new(
        id: EdgeId,
        start: NodeId,
        end: NodeId,
        length_meters: f64,
        highway: HighwayClass,
    ) -> Self {
        Self {
            id,
            start,
            end,
            length_meters,
            highway,
            tags: Tags::new(),
        }
    }

    /// True for the canonical direction of an undirected segment.
    pub fn is_main_edge(&self) -> bool {
        self.id.direction == Direction::Forward
    }

    pub fn way_id(&self) -> WayId {
        self.id.way
    }

    /// The same segment traversed the other way.
    pub fn reversed(&self) -> Self {
        Self {
            id: EdgeId {
                direction: self.id.direction.opposite(),
                ..self.id
            },
            start: self.end,
            end: self.start,
            length_meters: self.length_meters,
            highway: self.highway,
            tags: self.tags.clone(),
        }
    }
}

impl Tagged for Edge {
    fn tags(&self) -> &Tags {
        &self.tags
    }
}

/// Any item a check can be asked about.
#[derive(Debug, Clone, Copy)]
pub enum GraphObject<'a> {
    Node(&'a Node),
    Edge(&'a Edge),
}

impl GraphObject<'_> {
    /// Stable identifier for logs and flag records.
    pub fn identifier(&self) -> String {
        match self {
            Self::Node(node) => format!("node:{}", node.id),
            Self::Edge(edge) => format!("edge:{}", edge.id),
        }
    }
}

/// Aggregate statistics and provenance for a snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphMetadata {
    /// Free-form label for where the snapshot came from (extract name, shard id).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source: String,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub main_edges: usize,
    pub ways: usize,
}

/// A read-only road network snapshot.
///
/// Nodes and edges live in flat tables. Incidence is stored as slot indices
/// (`incidence[node_slot]` lists edge slots), so the structure has no reference
/// cycles and is `Sync` for concurrent readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoadGraph {
    pub version: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub metadata: GraphMetadata,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    /// Node id → slot in `nodes`. Rebuilt on load via `rebuild_index()`.
    #[serde(skip)]
    node_slots: HashMap<NodeId, usize>,
    /// Edge id → slot in `edges`.
    #[serde(skip)]
    edge_slots: HashMap<EdgeId, usize>,
    /// Node slot → slots of every directed edge touching it.
    #[serde(skip)]
    incidence: Vec<Vec<usize>>,
}

impl RoadGraph {
    /// Create a new empty snapshot.
    pub fn new(source: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: crate::schema::CURRENT_VERSION.to_string(),
            created_at: now,
            updated_at: now,
            metadata: GraphMetadata {
                source: source.into(),
                ..GraphMetadata::default()
            },
            nodes: Vec::new(),
            edges: Vec::new(),
            node_slots: HashMap::new(),
            edge_slots: HashMap::new(),
            incidence: Vec::new(),
        }
    }

    pub fn insert_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.node_slots.contains_key(&node.id) {
            return Err(GraphError::DuplicateNode(node.id));
        }
        self.node_slots.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        self.incidence.push(Vec::new());
        Ok(())
    }

    /// Insert a single directed edge. Both endpoints must already exist.
    pub fn insert_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.edge_slots.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        let start_slot = self.slot_of(edge.id, edge.start)?;
        let end_slot = self.slot_of(edge.id, edge.end)?;

        let slot = self.edges.len();
        self.edge_slots.insert(edge.id, slot);
        self.edges.push(edge);
        self.incidence[start_slot].push(slot);
        if end_slot != start_slot {
            self.incidence[end_slot].push(slot);
        }
        Ok(())
    }

    /// Insert both directions of an undirected segment. `edge` becomes the main
    /// edge regardless of the direction it carries.
    pub fn insert_segment(&mut self, mut edge: Edge) -> Result<EdgeId, GraphError> {
        edge.id.direction = Direction::Forward;
        let id = edge.id;
        let reverse = edge.reversed();
        self.insert_edge(edge)?;
        self.insert_edge(reverse)?;
        Ok(id)
    }

    fn slot_of(&self, edge: EdgeId, node: NodeId) -> Result<usize, GraphError> {
        self.node_slots
            .get(&node)
            .copied()
            .ok_or(GraphError::DanglingEndpoint { edge, node })
    }

    /// Rebuild id lookups and incidence lists from the tables.
    ///
    /// Edges with a missing endpoint are left out of that endpoint's incidence.
    /// When an id repeats, the first occurrence is indexed and later copies are
    /// skipped, so duplicates never inflate a node's valence. Returns the
    /// duplicates that were skipped.
    pub fn rebuild_index(&mut self) -> Vec<GraphError> {
        self.node_slots.clear();
        self.edge_slots.clear();
        self.incidence = vec![Vec::new(); self.nodes.len()];
        let mut duplicates = Vec::new();

        for (slot, node) in self.nodes.iter().enumerate() {
            if self.node_slots.contains_key(&node.id) {
                duplicates.push(GraphError::DuplicateNode(node.id));
                continue;
            }
            self.node_slots.insert(node.id, slot);
        }
        for (slot, edge) in self.edges.iter().enumerate() {
            if self.edge_slots.contains_key(&edge.id) {
                duplicates.push(GraphError::DuplicateEdge(edge.id));
                continue;
            }
            self.edge_slots.insert(edge.id, slot);
            let start = self.node_slots.get(&edge.start).copied();
            let end = self.node_slots.get(&edge.end).copied();
            if let Some(s) = start {
                self.incidence[s].push(slot);
            }
            if let Some(e) = end
                && start != Some(e)
            {
                self.incidence[e].push(slot);
            }
        }
        duplicates
    }

    /// Recompute metadata from current state and rebuild indexes.
    pub fn refresh_metadata(&mut self) {
        self.metadata.total_nodes = self.nodes.len();
        self.metadata.total_edges = self.edges.len();
        self.metadata.main_edges = self.edges.iter().filter(|e| e.is_main_edge()).count();
        self.metadata.ways = self
            .edges
            .iter()
            .map(Edge::way_id)
            .collect::<BTreeSet<_>>()
            .len();
        self.updated_at = Utc::now();
        // insert_* rejects duplicate ids, so there is nothing to report here.
        self.rebuild_index();
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Every node followed by every edge.
    pub fn objects(&self) -> impl Iterator<Item = GraphObject<'_>> {
        self.nodes
            .iter()
            .map(GraphObject::Node)
            .chain(self.edges.iter().map(GraphObject::Edge))
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.node_slots.get(&id).and_then(|&slot| self.nodes.get(slot))
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edge_slots.get(&id).and_then(|&slot| self.edges.get(slot))
    }

    pub fn start_node(&self, edge: &Edge) -> Option<&Node> {
        self.node(edge.start)
    }

    pub fn end_node(&self, edge: &Edge) -> Option<&Node> {
        self.node(edge.end)
    }

    /// Endpoints of `edge` in (start, end) order; missing nodes are skipped.
    pub fn connected_nodes(&self, edge: &Edge) -> Vec<&Node> {
        let mut nodes: Vec<&Node> = self.start_node(edge).into_iter().collect();
        if edge.end != edge.start
            && let Some(end) = self.end_node(edge)
        {
            nodes.push(end);
        }
        nodes
    }

    /// Every directed edge that starts or ends at `node`.
    pub fn connected_edges(&self, node: NodeId) -> Vec<&Edge> {
        match self.node_slots.get(&node) {
            Some(&slot) if slot < self.incidence.len() => self.incidence[slot]
                .iter()
                .filter_map(|&i| self.edges.get(i))
                .collect(),
            // Fallback to linear scan if index not built
            _ => self
                .edges
                .iter()
                .filter(|e| e.start == node || e.end == node)
                .collect(),
        }
    }

    /// Incident main edges of `node`: its valence, counting each undirected segment once.
    pub fn main_edge_count(&self, node: NodeId) -> usize {
        self.connected_edges(node)
            .into_iter()
            .filter(|e| e.is_main_edge())
            .count()
    }

    /// Every repeated node or edge id, in table order after the first occurrence.
    pub fn duplicate_ids(&self) -> Vec<GraphError> {
        let mut seen_nodes = HashSet::new();
        let mut seen_edges = HashSet::new();
        let nodes = self
            .nodes
            .iter()
            .filter(|n| !seen_nodes.insert(n.id))
            .map(|n| GraphError::DuplicateNode(n.id));
        let edges = self
            .edges
            .iter()
            .filter(|e| !seen_edges.insert(e.id))
            .map(|e| GraphError::DuplicateEdge(e.id));
        nodes.chain(edges).collect()
    }

    /// Report duplicate ids and every edge endpoint missing from the node table.
    pub fn check_integrity(&self) -> Vec<GraphError> {
        let mut problems = self.duplicate_ids();
        let exists = |id: NodeId| self.nodes.iter().any(|n| n.id == id);
        for edge in &self.edges {
            for node in [edge.start, edge.end] {
                let known = if self.node_slots.is_empty() {
                    exists(node)
                } else {
                    self.node_slots.contains_key(&node)
                };
                if !known {
                    problems.push(GraphError::DanglingEndpoint {
                        edge: edge.id,
                        node,
                    });
                }
            }
        }
        problems
    }
}
