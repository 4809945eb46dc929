//! The seam between a check and the harness that runs it.

use crate::flag::{CheckFlag, format_instruction};
use roadcheck_core::graph::{GraphObject, RoadGraph};
use std::fmt;

/// A data-quality check over a read-only [`RoadGraph`].
///
/// Implementations hold only their configuration, so one value can be shared
/// across threads and asked about any object in any order.
pub trait Check: Send + Sync {
    fn name(&self) -> &'static str;

    /// Whether `object` is something this check looks at.
    fn is_eligible(&self, graph: &RoadGraph, object: GraphObject<'_>) -> bool;

    /// Decide whether an eligible object is a defect.
    fn flag(&self, graph: &RoadGraph, object: GraphObject<'_>) -> Option<CheckFlag>;

    /// Instruction templates with positional `{N}` placeholders.
    fn fallback_instructions(&self) -> &'static [&'static str];

    /// Eligibility filter followed by [`Check::flag`].
    fn check(&self, graph: &RoadGraph, object: GraphObject<'_>) -> Option<CheckFlag> {
        if self.is_eligible(graph, object) {
            self.flag(graph, object)
        } else {
            None
        }
    }

    /// Render instruction `index` with `args`. Unknown indexes render empty.
    fn instruction(&self, index: usize, args: &[&dyn fmt::Display]) -> String {
        self.fallback_instructions()
            .get(index)
            .map(|template| format_instruction(template, args))
            .unwrap_or_default()
    }
}
