//! Boundary with the external fingerprinting service.
//!
//! Decoding audio, computing sub-fingerprints and matching them are done by
//! an outside implementation. This module defines what that implementation
//! has to provide and runs the two producers (video and reference) side by
//! side into one shared collector.
//!
//! Implementations receive their backend choices through
//! [`FingerprintSettings`](crate::config::FingerprintSettings) when they are
//! constructed; nothing here reads or writes global state.

mod collector;
mod types;

pub use collector::{generate_fingerprints, FingerprintCollector};
pub use types::{
    FingerprintError, FingerprintGenerator, FingerprintResult, MatchFinder, SubFingerprint,
    TrackInput,
};
