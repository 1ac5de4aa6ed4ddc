//! Offset clusters.
//!
//! A cluster collects match candidates that agree on one time offset between
//! the video and the reference. Each entry keeps its offset, video position
//! and confidence together, so sorting or filtering can never pull the three
//! apart.

use chrono::TimeDelta;

use crate::models::time::mean;
use crate::models::{ClusterSummary, MatchCandidate};

/// A group of matches that share one offset.
///
/// Always holds at least one match.
#[derive(Debug, Clone)]
pub struct OffsetCluster {
    records: Vec<MatchCandidate>,
}

impl OffsetCluster {
    /// Start a cluster from its first match.
    pub fn new(candidate: MatchCandidate) -> Self {
        Self {
            records: vec![candidate],
        }
    }

    /// Append a match. Returns the new occurrence count.
    pub fn add(&mut self, candidate: MatchCandidate) -> usize {
        self.records.push(candidate);
        self.records.len()
    }

    /// Number of matches in the cluster.
    pub fn occurrences(&self) -> usize {
        self.records.len()
    }

    /// Matches in insertion order.
    pub fn records(&self) -> &[MatchCandidate] {
        &self.records
    }

    /// Arithmetic mean of all offsets.
    pub fn mean_offset(&self) -> TimeDelta {
        mean(self.records.iter().map(|r| r.offset))
    }

    /// Arithmetic mean of all confidences.
    pub fn mean_confidence(&self) -> f32 {
        let sum: f64 = self.records.iter().map(|r| r.confidence as f64).sum();
        (sum / self.records.len() as f64) as f32
    }

    /// Earliest video position with evidence for this offset.
    pub fn first_occurrence(&self) -> TimeDelta {
        self.records
            .iter()
            .map(|r| r.video_time)
            .min()
            .unwrap_or_default()
    }

    /// Latest video position with evidence for this offset.
    pub fn last_occurrence(&self) -> TimeDelta {
        self.records
            .iter()
            .map(|r| r.video_time)
            .max()
            .unwrap_or_default()
    }

    /// Whether `check` falls in `[mean - range, mean + range)`.
    pub fn is_within(&self, check: TimeDelta, range: TimeDelta) -> bool {
        let offset = self.mean_offset();
        offset - range <= check && check < offset + range
    }

    /// Like [`is_within`](Self::is_within), but also requires the cluster to
    /// have seen evidence no more than `window` before `video_time`.
    pub fn is_within_recent(
        &self,
        check: TimeDelta,
        range: TimeDelta,
        video_time: TimeDelta,
        window: TimeDelta,
    ) -> bool {
        self.is_within(check, range) && self.last_occurrence() + window >= video_time
    }

    /// Whether the two clusters cover separate stretches of the video.
    pub fn disjoint_from(&self, other: &OffsetCluster) -> bool {
        self.last_occurrence() < other.first_occurrence()
            || other.last_occurrence() < self.first_occurrence()
    }

    /// Drop matches whose confidence sits more than `margin` below the mean.
    ///
    /// The mean is taken before removal, so a second call can remove more.
    /// A negative or NaN margin counts as zero. If nothing would be left the
    /// cluster is kept as is. Returns the number removed.
    pub fn filter_outliers(&mut self, margin: f32) -> usize {
        let floor = self.mean_confidence() - margin.max(0.0);
        if !self.records.iter().any(|r| r.confidence >= floor) {
            return 0;
        }
        let before = self.records.len();
        self.records.retain(|r| r.confidence >= floor);
        before - self.records.len()
    }

    /// Snapshot for logs and error reports.
    pub fn summary(&self) -> ClusterSummary {
        ClusterSummary {
            first_occurrence: self.first_occurrence(),
            last_occurrence: self.last_occurrence(),
            mean_offset: self.mean_offset(),
            mean_confidence: self.mean_confidence(),
            occurrences: self.occurrences(),
        }
    }
}

impl std::fmt::Display for OffsetCluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.summary().fmt(f)
    }
}
