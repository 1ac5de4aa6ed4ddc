//! cutsync core - offset clustering and segment planning.
//!
//! Takes match evidence from an external audio-fingerprint matcher, groups it
//! into offset clusters and works out which pieces of a video have to be kept
//! (and where) so the concatenated result lines up with a reference track.
//! Decoding, fingerprinting and the actual cutting stay outside this crate.

pub mod analysis;
pub mod config;
pub mod cut;
pub mod fingerprint;
pub mod logging;
pub mod models;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
