//! Error types for offset analysis.

use crate::cut::CutError;
use crate::fingerprint::FingerprintError;
use crate::models::ClusterSummary;

/// Why a computed segment boundary was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryViolation {
    /// The segment would end before it starts.
    NegativeLength,
    /// The segment starts before the previous one ends.
    Overlap,
}

impl std::fmt::Display for BoundaryViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryViolation::NegativeLength => write!(f, "negative segment length"),
            BoundaryViolation::Overlap => write!(f, "segment overlaps the previous one"),
        }
    }
}

/// Error types for analysis operations.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// No usable evidence that the two tracks share any audio.
    #[error("No overlap detected between video and reference")]
    NoOverlapDetected,

    /// A segment boundary could not be placed.
    #[error("Invalid segment boundary ({}): {}", .violation, describe_clusters(.clusters))]
    InvalidSegmentBoundary {
        violation: BoundaryViolation,
        clusters: Vec<ClusterSummary>,
    },

    /// A fingerprint producer failed.
    #[error("Fingerprint generation failed: {0}")]
    Fingerprint(#[from] FingerprintError),

    /// The matcher failed to compare the fingerprints.
    #[error("Fingerprint matching failed: {0}")]
    Matching(#[source] FingerprintError),

    /// The segments could not be turned into a cut plan.
    #[error("Cut plan failed: {0}")]
    Plan(#[from] CutError),
}

impl AnalysisError {
    /// Create an error for a segment that would end before it starts.
    pub fn negative_length(cluster: ClusterSummary) -> Self {
        Self::InvalidSegmentBoundary {
            violation: BoundaryViolation::NegativeLength,
            clusters: vec![cluster],
        }
    }

    /// Create an error for two adjacent segments that overlap.
    pub fn overlap(previous: ClusterSummary, current: ClusterSummary) -> Self {
        Self::InvalidSegmentBoundary {
            violation: BoundaryViolation::Overlap,
            clusters: vec![previous, current],
        }
    }
}

fn describe_clusters(clusters: &[ClusterSummary]) -> String {
    clusters
        .iter()
        .map(|c| format!("[{}]", c))
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Type alias for analysis results.
pub type SyncResult<T> = Result<T, AnalysisError>;
