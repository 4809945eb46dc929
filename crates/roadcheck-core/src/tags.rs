//! Typed tag lookups on nodes and edges.

use std::collections::BTreeMap;

/// Key/value attributes carried by a node or edge.
pub type Tags = BTreeMap<String, String>;

/// A tag key with its own notion of which values count as "present".
pub trait TagKey {
    const KEY: &'static str;

    fn accepts(value: &str) -> bool {
        !value.trim().is_empty()
    }
}

/// `barrier=*`: gates, bollards, lift gates and similar physical barriers.
pub struct Barrier;

impl TagKey for Barrier {
    const KEY: &'static str = "barrier";
}

/// Marker placed on nodes inserted where source data was clipped at a tiling boundary.
pub struct SyntheticBoundaryNode;

impl TagKey for SyntheticBoundaryNode {
    const KEY: &'static str = "synthetic_boundary_node";

    fn accepts(value: &str) -> bool {
        value.eq_ignore_ascii_case("yes") || value.eq_ignore_ascii_case("existing")
    }
}

/// Anything that carries [`Tags`].
pub trait Tagged {
    fn tags(&self) -> &Tags;

    fn tag(&self, key: &str) -> Option<&str> {
        self.tags().get(key).map(String::as_str)
    }

    fn has_tag<T: TagKey>(&self) -> bool {
        self.tag(T::KEY).is_some_and(T::accepts)
    }
}
