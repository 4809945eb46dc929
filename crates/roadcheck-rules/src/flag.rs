//! Flag records and instruction formatting.

use roadcheck_core::graph::{GraphObject, Location};
use serde::Serialize;
use std::fmt;

/// A single finding raised by a check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckFlag {
    /// Name of the check that raised the flag.
    pub check: String,
    /// Identifier of the object the flag is about, e.g. `edge:42:0+`.
    pub identifier: String,
    pub instructions: Vec<String>,
    /// Geometric anchors for the flag.
    pub points: Vec<Location>,
    /// Identifiers of every object involved in the finding.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flagged_objects: Vec<String>,
}

impl CheckFlag {
    pub fn new(check: impl Into<String>, object: GraphObject<'_>) -> Self {
        let identifier = object.identifier();
        Self {
            check: check.into(),
            flagged_objects: vec![identifier.clone()],
            identifier,
            instructions: Vec::new(),
            points: Vec::new(),
        }
    }

    pub fn with_instruction(mut self, instruction: impl Into<String>) -> Self {
        self.instructions.push(instruction.into());
        self
    }

    pub fn with_point(mut self, location: Location) -> Self {
        self.points.push(location);
        self
    }

    pub fn with_object(mut self, object: GraphObject<'_>) -> Self {
        let id = object.identifier();
        if !self.flagged_objects.contains(&id) {
            self.flagged_objects.push(id);
        }
        self
    }
}

impl fmt::Display for CheckFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.check, self.identifier)?;
        for instruction in &self.instructions {
            write!(f, ": {instruction}")?;
        }
        for point in &self.points {
            write!(f, " @ {point}")?;
        }
        Ok(())
    }
}

/// Substitute positional `{N}` placeholders in `template` with `args[N]`.
///
/// Placeholders without a matching argument, and anything that is not a
/// `{digits}` pair, are copied through untouched.
pub fn format_instruction(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16 * args.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        let key = &after[..close];
        match key.parse::<usize>().ok().and_then(|i| args.get(i)) {
            Some(arg) => out.push_str(&arg.to_string()),
            None => {
                out.push('{');
                out.push_str(key);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}
