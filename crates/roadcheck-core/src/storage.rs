//! Read/write graph snapshots from disk.

use crate::graph::RoadGraph;
use crate::schema;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const ROADCHECK_DIR: &str = ".roadcheck";
const SNAPSHOT_FILE: &str = "graph.json";

/// Get the path to the roadcheck directory for a given project root.
pub fn roadcheck_dir(project_root: &Path) -> PathBuf {
    project_root.join(ROADCHECK_DIR)
}

/// Default snapshot location for a project root.
pub fn default_snapshot_path(project_root: &Path) -> PathBuf {
    roadcheck_dir(project_root).join(SNAPSHOT_FILE)
}

/// Load a snapshot from disk.
pub fn load(path: &Path) -> Result<RoadGraph> {
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot from {}", path.display()))?;
    schema::from_json(&json).with_context(|| format!("invalid snapshot {}", path.display()))
}

/// Save a snapshot to disk, creating parent directories if needed.
pub fn save(path: &Path, graph: &RoadGraph) -> Result<()> {
    if let Some(dir) = path.parent()
        && !dir.as_os_str().is_empty()
    {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }

    let json = schema::to_json(graph)?;
    fs::write(path, json).with_context(|| format!("failed to write snapshot to {}", path.display()))?;

    Ok(())
}
