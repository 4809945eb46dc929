//! Run checks over every object of a snapshot.

use crate::check::Check;
use crate::flag::CheckFlag;
use crate::short_segment::ShortSegmentRule;
use rayon::prelude::*;
use roadcheck_core::config::RoadcheckConfig;
use roadcheck_core::error::ConfigError;
use roadcheck_core::graph::{GraphObject, RoadGraph};
use serde::Serialize;

/// Counts for one check run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub objects: usize,
    pub eligible: usize,
    pub flagged: usize,
}

/// Flags raised by one check, in graph order.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub check: String,
    pub summary: RunSummary,
    pub flags: Vec<CheckFlag>,
}

/// Evaluate `check` against every node and edge of `graph` in parallel.
///
/// Flags come back in the graph's object order no matter how work was scheduled.
pub fn run_check<C: Check + ?Sized>(graph: &RoadGraph, check: &C) -> RunReport {
    let objects: Vec<GraphObject<'_>> = graph.objects().collect();

    let results: Vec<(bool, Option<CheckFlag>)> = objects
        .par_iter()
        .map(|&object| {
            if check.is_eligible(graph, object) {
                (true, check.flag(graph, object))
            } else {
                (false, None)
            }
        })
        .collect();

    let eligible = results.iter().filter(|(e, _)| *e).count();
    let flags: Vec<CheckFlag> = results.into_iter().filter_map(|(_, f)| f).collect();
    let summary = RunSummary {
        objects: objects.len(),
        eligible,
        flagged: flags.len(),
    };

    tracing::debug!(
        check = check.name(),
        objects = summary.objects,
        eligible = summary.eligible,
        flagged = summary.flagged,
        "check finished"
    );

    RunReport {
        check: check.name().to_string(),
        summary,
        flags,
    }
}

/// Build every enabled check from `config`. Fails before anything runs if any
/// check's configuration is invalid.
pub fn configured_checks(config: &RoadcheckConfig) -> Result<Vec<Box<dyn Check>>, ConfigError> {
    let mut checks: Vec<Box<dyn Check>> = Vec::new();
    if config.short_segment.enabled {
        checks.push(Box::new(ShortSegmentRule::new(&config.short_segment)?));
    } else {
        tracing::info!("short segment check disabled by configuration");
    }
    Ok(checks)
}

/// Run every enabled check from `config` against `graph`.
pub fn run_configured(
    graph: &RoadGraph,
    config: &RoadcheckConfig,
) -> Result<Vec<RunReport>, ConfigError> {
    let checks = configured_checks(config)?;
    Ok(checks
        .iter()
        .map(|check| run_check(graph, check.as_ref()))
        .collect())
}
