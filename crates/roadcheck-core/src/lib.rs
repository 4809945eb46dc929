//! Core types and storage for roadcheck.
//!
//! Provides the road network snapshot ([`graph::RoadGraph`]), typed tag lookups,
//! the ranked highway classification, check configuration, and JSON persistence.

pub mod config;
pub mod error;
pub mod graph;
pub mod highway;
pub mod schema;
pub mod storage;
pub mod tags;
