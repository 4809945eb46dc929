//! Ranked `highway=*` classification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highway classification, declared from most to least important.
///
/// Declaration order is the ranking: [`HighwayClass::rank`] is the variant's
/// position, so `motorway` ranks 0 and `no` ranks last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HighwayClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
    MotorwayLink,
    TrunkLink,
    PrimaryLink,
    SecondaryLink,
    TertiaryLink,
    Unclassified,
    Residential,
    LivingStreet,
    Service,
    Pedestrian,
    Track,
    BusGuideway,
    Road,
    Footway,
    Bridleway,
    Steps,
    Path,
    Cycleway,
    Construction,
    Proposed,
    /// Missing or unrecognised classification in a snapshot.
    #[default]
    #[serde(other)]
    No,
}

impl HighwayClass {
    pub const ALL: [HighwayClass; 26] = [
        Self::Motorway,
        Self::Trunk,
        Self::Primary,
        Self::Secondary,
        Self::Tertiary,
        Self::MotorwayLink,
        Self::TrunkLink,
        Self::PrimaryLink,
        Self::SecondaryLink,
        Self::TertiaryLink,
        Self::Unclassified,
        Self::Residential,
        Self::LivingStreet,
        Self::Service,
        Self::Pedestrian,
        Self::Track,
        Self::BusGuideway,
        Self::Road,
        Self::Footway,
        Self::Bridleway,
        Self::Steps,
        Self::Path,
        Self::Cycleway,
        Self::Construction,
        Self::Proposed,
        Self::No,
    ];

    /// Position in the ranking; lower is more important.
    pub fn rank(self) -> u8 {
        self as u8
    }

    pub fn is_more_important_than_or_equal_to(self, other: HighwayClass) -> bool {
        self.rank() <= other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Motorway => "motorway",
            Self::Trunk => "trunk",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Tertiary => "tertiary",
            Self::MotorwayLink => "motorway_link",
            Self::TrunkLink => "trunk_link",
            Self::PrimaryLink => "primary_link",
            Self::SecondaryLink => "secondary_link",
            Self::TertiaryLink => "tertiary_link",
            Self::Unclassified => "unclassified",
            Self::Residential => "residential",
            Self::LivingStreet => "living_street",
            Self::Service => "service",
            Self::Pedestrian => "pedestrian",
            Self::Track => "track",
            Self::BusGuideway => "bus_guideway",
            Self::Road => "road",
            Self::Footway => "footway",
            Self::Bridleway => "bridleway",
            Self::Steps => "steps",
            Self::Path => "path",
            Self::Cycleway => "cycleway",
            Self::Construction => "construction",
            Self::Proposed => "proposed",
            Self::No => "no",
        }
    }
}

impl fmt::Display for HighwayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A highway classification name that is not part of the ranking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown highway classification {0:?}")]
pub struct UnknownHighwayClass(pub String);

impl FromStr for HighwayClass {
    type Err = UnknownHighwayClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|class| class.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownHighwayClass(s.to_string()))
    }
}
