//! Traits and types for the fingerprinting collaborators.

use std::path::{Path, PathBuf};

use crate::config::FingerprintSettings;
use crate::models::{RawMatch, TrackRole};

use super::collector::FingerprintCollector;

/// A track to fingerprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackInput {
    pub role: TrackRole,
    pub path: PathBuf,
}

impl TrackInput {
    pub fn new(role: TrackRole, path: impl Into<PathBuf>) -> Self {
        Self {
            role,
            path: path.into(),
        }
    }

    pub fn video(path: impl Into<PathBuf>) -> Self {
        Self::new(TrackRole::Video, path)
    }

    pub fn reference(path: impl Into<PathBuf>) -> Self {
        Self::new(TrackRole::Reference, path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One sub-fingerprint emitted by a generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubFingerprint {
    /// Track the sub-fingerprint was computed from.
    pub role: TrackRole,
    /// Frame index within the track.
    pub index: u32,
    /// Fingerprint bits.
    pub hash: u32,
}

/// Errors from fingerprint generation or matching.
#[derive(Debug, thiserror::Error)]
pub enum FingerprintError {
    /// The track could not be decoded.
    #[error("Failed to decode {role} track {path}: {message}")]
    Decode {
        role: TrackRole,
        path: String,
        message: String,
    },

    /// The generator failed for another reason.
    #[error("Fingerprint generator failed for {role} track: {message}")]
    Generator { role: TrackRole, message: String },

    /// A producer thread panicked.
    #[error("Fingerprint producer for {0} track panicked")]
    ProducerPanicked(TrackRole),

    /// The matcher failed.
    #[error("Matcher failed: {0}")]
    Matcher(String),
}

impl FingerprintError {
    /// Create a decode error.
    pub fn decode(track: &TrackInput, message: impl Into<String>) -> Self {
        Self::Decode {
            role: track.role,
            path: track.path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create a generator error.
    pub fn generator(role: TrackRole, message: impl Into<String>) -> Self {
        Self::Generator {
            role,
            message: message.into(),
        }
    }

    /// Create a matcher error.
    pub fn matcher(message: impl Into<String>) -> Self {
        Self::Matcher(message.into())
    }
}

/// Result type for fingerprint operations.
pub type FingerprintResult<T> = Result<T, FingerprintError>;

/// Produces sub-fingerprints for one track.
///
/// Called from two threads at once (one per track), so implementations must
/// be `Sync`. Batches should be appended to the collector as they become
/// available.
pub trait FingerprintGenerator: Send + Sync {
    /// Settings the generator was constructed with.
    fn settings(&self) -> &FingerprintSettings;

    /// Fingerprint `track`, appending every batch to `collector`.
    fn generate(
        &self,
        track: &TrackInput,
        collector: &FingerprintCollector,
    ) -> FingerprintResult<()>;
}

/// Finds matches between the video and reference sub-fingerprints.
pub trait MatchFinder: Send + Sync {
    /// Return every match above the matcher's own threshold, in the order
    /// the matcher found them.
    fn find_all_matches(&self, fingerprints: &[SubFingerprint]) -> FingerprintResult<Vec<RawMatch>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_names_track() {
        let track = TrackInput::video("/media/show.mkv");
        let err = FingerprintError::decode(&track, "unsupported codec");
        let msg = err.to_string();
        assert!(msg.contains("video"));
        assert!(msg.contains("/media/show.mkv"));
        assert!(msg.contains("unsupported codec"));
    }
}
