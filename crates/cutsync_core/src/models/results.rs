//! Analysis results and cluster snapshots.

use chrono::TimeDelta;

use super::segments::Segment;
use super::time::format_timestamp;

/// Read-only snapshot of an offset cluster.
///
/// Used in log output and in error payloads so callers can see which
/// evidence produced a bad boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterSummary {
    /// Earliest video position with evidence for this offset.
    pub first_occurrence: TimeDelta,
    /// Latest video position with evidence for this offset.
    pub last_occurrence: TimeDelta,
    /// Mean offset of all evidence.
    pub mean_offset: TimeDelta,
    /// Mean confidence (0.0 - 1.0).
    pub mean_confidence: f32,
    /// Number of matches in the cluster.
    pub occurrences: usize,
}

impl std::fmt::Display for ClusterSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} -> {} {} {:.1}% {:04}",
            format_timestamp(self.first_occurrence),
            format_timestamp(self.last_occurrence),
            format_timestamp(self.mean_offset),
            self.mean_confidence * 100.0,
            self.occurrences
        )
    }
}

/// Outcome of one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisResult {
    /// Ordered, non-overlapping video segments to keep.
    pub segments: Vec<Segment>,
    /// Mean offset of the first retained cluster, clamped to zero.
    pub lead_offset: TimeDelta,
    /// Whether the video has to be cut (more than one segment).
    pub needs_cut: bool,
    /// Clusters that survived filtering, in video order.
    pub clusters: Vec<ClusterSummary>,
}

impl AnalysisResult {
    /// Build a result from segments; `needs_cut` follows the segment count.
    pub fn new(segments: Vec<Segment>, lead_offset: TimeDelta, clusters: Vec<ClusterSummary>) -> Self {
        let needs_cut = segments.len() > 1;
        Self {
            segments,
            lead_offset: lead_offset.max(TimeDelta::zero()),
            needs_cut,
            clusters,
        }
    }

    /// Number of sections the video splits into.
    pub fn sections(&self) -> usize {
        self.clusters.len()
    }
}
