//! JSON schema validation and version handling for graph snapshots.

use crate::graph::RoadGraph;
use anyhow::{Context, Result};

pub const CURRENT_VERSION: &str = "1.0.0";

/// Validate a snapshot's schema version.
pub fn validate_version(graph: &RoadGraph) -> Result<()> {
    if graph.version != CURRENT_VERSION {
        anyhow::bail!(
            "snapshot version mismatch: expected {}, found {}",
            CURRENT_VERSION,
            graph.version
        );
    }
    Ok(())
}

/// Serialize a snapshot to a pretty-printed JSON string.
pub fn to_json(graph: &RoadGraph) -> Result<String> {
    serde_json::to_string_pretty(graph).context("failed to serialize snapshot to JSON")
}

/// Deserialize a snapshot from a JSON string and rebuild its indexes.
///
/// A snapshot that repeats a node or edge id is rejected: every copy would
/// otherwise count toward valence.
pub fn from_json(json: &str) -> Result<RoadGraph> {
    let mut graph: RoadGraph =
        serde_json::from_str(json).context("failed to deserialize snapshot from JSON")?;
    validate_version(&graph)?;
    let duplicates = graph.rebuild_index();
    if let Some(first) = duplicates.first() {
        anyhow::bail!(
            "snapshot contains {} duplicate id(s), first: {}",
            duplicates.len(),
            first
        );
    }
    Ok(graph)
}
