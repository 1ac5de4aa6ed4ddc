//! Core enums used throughout the crate.

use serde::{Deserialize, Serialize};

/// Which side of the comparison a track belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackRole {
    /// Audio embedded in the video being cut.
    Video,
    /// The reference audio the video is aligned to.
    Reference,
}

impl std::fmt::Display for TrackRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackRole::Video => write!(f, "video"),
            TrackRole::Reference => write!(f, "reference"),
        }
    }
}

/// How the analysis result should be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffsetMode {
    /// One segment per retained cluster when more than one survives.
    #[default]
    Segmented,
    /// Only report the lead offset, even if several clusters survive.
    SingleOffset,
}

/// Fingerprint profile handed to the external generator.
///
/// The crate never interprets the profile; it only carries the choice
/// from the settings file to the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintProfile {
    Default,
    Bug,
    Voice,
    Bass,
    /// Tuned for recordings with a lot of human voice.
    #[default]
    Human,
}

impl std::fmt::Display for FingerprintProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FingerprintProfile::Default => write!(f, "default"),
            FingerprintProfile::Bug => write!(f, "bug"),
            FingerprintProfile::Voice => write!(f, "voice"),
            FingerprintProfile::Bass => write!(f, "bass"),
            FingerprintProfile::Human => write!(f, "human"),
        }
    }
}
