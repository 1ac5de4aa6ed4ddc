//! Data models shared across the crate.
//!
//! - Match records coming out of the fingerprint matcher
//! - Segments and the final analysis result
//! - Enums for analysis mode and fingerprint profile
//! - Timestamp helpers for signed durations

mod enums;
mod matches;
mod results;
mod segments;
pub mod time;

pub use enums::{FingerprintProfile, OffsetMode, TrackRole};
pub use matches::{MatchCandidate, RawMatch};
pub use results::{AnalysisResult, ClusterSummary};
pub use segments::Segment;
