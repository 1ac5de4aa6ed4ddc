//! Segment boundary computation.
//!
//! Turns the retained clusters (sorted by first occurrence) into the video
//! segments to keep. Between two neighbouring clusters the gap in the video
//! rarely matches the jump in offset; the difference (the slack) is split
//! evenly, half going to the end of the earlier segment and half to the
//! start of the later one.
//!
//! With a single cluster there is nothing to cut: the result is just the
//! offset, optionally with one segment covering the target duration.

use chrono::TimeDelta;

use super::cluster::OffsetCluster;
use super::types::{AnalysisError, SyncResult};
use crate::config::SegmentSettings;
use crate::models::time::format_timestamp;
use crate::models::{AnalysisResult, OffsetMode, Segment};

/// Configuration for segment building.
#[derive(Debug, Clone)]
pub struct SegmentConfig {
    /// Added to the target duration in single-offset results.
    pub duration_padding: TimeDelta,
    /// Added after the last cluster's final evidence.
    pub tail_padding: TimeDelta,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            duration_padding: TimeDelta::seconds(10),
            tail_padding: TimeDelta::seconds(30),
        }
    }
}

impl From<&SegmentSettings> for SegmentConfig {
    fn from(settings: &SegmentSettings) -> Self {
        Self {
            duration_padding: TimeDelta::milliseconds(settings.duration_padding_ms),
            tail_padding: TimeDelta::milliseconds(settings.tail_padding_ms),
        }
    }
}

/// Slack at the boundary between two neighbouring clusters.
///
/// Observed spacing of the evidence minus the spacing implied by the change
/// in offset.
pub fn boundary_slack(current: &OffsetCluster, next: &OffsetCluster) -> TimeDelta {
    let observed = next.first_occurrence() - current.last_occurrence();
    let expected = next.mean_offset() - current.mean_offset();
    observed - expected
}

/// Builds the analysis result from retained clusters.
pub struct SegmentBuilder<'a> {
    clusters: &'a [OffsetCluster],
    config: &'a SegmentConfig,
}

impl<'a> SegmentBuilder<'a> {
    /// Create a builder over clusters sorted by first occurrence.
    pub fn new(clusters: &'a [OffsetCluster], config: &'a SegmentConfig) -> Self {
        Self { clusters, config }
    }

    /// Build the result.
    ///
    /// `target_duration` only matters for single-offset results, where it
    /// produces one segment from the start of the video.
    pub fn build(
        &self,
        target_duration: Option<TimeDelta>,
        mode: OffsetMode,
    ) -> SyncResult<AnalysisResult> {
        let first = self
            .clusters
            .first()
            .ok_or(AnalysisError::NoOverlapDetected)?;

        if self.clusters.len() == 1 || mode == OffsetMode::SingleOffset {
            return Ok(self.single_offset(first, target_duration));
        }

        let segments = self.split_segments()?;
        let summaries = self.clusters.iter().map(|c| c.summary()).collect();
        Ok(AnalysisResult::new(segments, first.mean_offset(), summaries))
    }

    fn single_offset(
        &self,
        cluster: &OffsetCluster,
        target_duration: Option<TimeDelta>,
    ) -> AnalysisResult {
        let segments = target_duration
            .map(|duration| {
                vec![Segment::new(
                    TimeDelta::zero(),
                    duration + self.config.duration_padding,
                )]
            })
            .unwrap_or_default();

        // At most one segment here, so `needs_cut` comes out false.
        AnalysisResult::new(segments, cluster.mean_offset(), vec![cluster.summary()])
    }

    /// One segment per cluster, validated in order.
    fn split_segments(&self) -> SyncResult<Vec<Segment>> {
        let clusters = self.clusters;
        let last_index = clusters.len() - 1;
        let slack: Vec<TimeDelta> = clusters
            .windows(2)
            .map(|pair| boundary_slack(&pair[0], &pair[1]))
            .collect();

        let mut segments: Vec<Segment> = Vec::with_capacity(clusters.len());

        for (i, cluster) in clusters.iter().enumerate() {
            let start = if i == 0 {
                TimeDelta::zero()
            } else {
                cluster.first_occurrence() - slack[i - 1] / 2
            };

            let end = if i == last_index {
                cluster.last_occurrence() + self.config.tail_padding + clusters[0].mean_offset()
            } else {
                cluster.last_occurrence() + slack[i] / 2
            };

            let length = end - start;
            if length < TimeDelta::zero() {
                return Err(AnalysisError::negative_length(cluster.summary()));
            }

            if let Some(previous) = segments.last() {
                let previous_cluster = &clusters[i - 1];
                if start < previous.end() {
                    return Err(AnalysisError::overlap(
                        previous_cluster.summary(),
                        cluster.summary(),
                    ));
                }
                if !previous_cluster.disjoint_from(cluster) {
                    tracing::warn!(
                        "Clusters [{}] and [{}] share part of the video",
                        previous_cluster,
                        cluster
                    );
                }
            }

            tracing::debug!(
                "Segment {}: [{}] starting at {} for {}",
                i,
                cluster,
                format_timestamp(start),
                format_timestamp(length)
            );
            segments.push(Segment::new(start, length));
        }

        Ok(segments)
    }
}
