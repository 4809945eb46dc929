//! Error types for graph construction and configuration loading.

use crate::graph::{EdgeId, NodeId};
use crate::highway::UnknownHighwayClass;
use std::path::PathBuf;

/// Errors raised while building or validating a [`crate::graph::RoadGraph`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphError {
    #[error("duplicate node {0}")]
    DuplicateNode(NodeId),
    #[error("duplicate edge {0}")]
    DuplicateEdge(EdgeId),
    #[error("edge {edge} references missing node {node}")]
    DanglingEndpoint { edge: EdgeId, node: NodeId },
}

/// Errors raised while loading or validating check configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    HighwayPriority(#[from] UnknownHighwayClass),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
