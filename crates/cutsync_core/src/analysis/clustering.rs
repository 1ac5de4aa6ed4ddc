//! Greedy offset clustering.
//!
//! Matches are visited in the order the matcher produced them. Each one joins
//! the first existing cluster (in creation order) whose mean offset is within
//! tolerance, or starts a new cluster. Nothing is ever moved between clusters
//! afterwards, so the outcome depends on input order by construction.
//!
//! After assignment the clusters are sorted by first occurrence and weak ones
//! are dropped: low mean confidence, or too few matches compared to the
//! largest cluster.

use chrono::TimeDelta;

use super::cluster::OffsetCluster;
use super::types::{AnalysisError, SyncResult};
use crate::config::ClusteringSettings;
use crate::models::{MatchCandidate, RawMatch};

/// Configuration for the clustering pass.
#[derive(Debug, Clone)]
pub struct ClusteringConfig {
    /// Matches below this confidence are discarded before clustering.
    pub min_match_confidence: f32,
    /// Maximum distance from a cluster's mean offset to join it.
    pub offset_tolerance: TimeDelta,
    /// Also require the cluster to have recent evidence when joining.
    pub recency_gate: bool,
    /// How far back the last evidence may be when `recency_gate` is set.
    pub recency_window: TimeDelta,
    /// Clusters must have a mean confidence strictly above this.
    pub min_cluster_confidence: f32,
    /// Clusters need more than `largest / occurrence_divisor` matches.
    pub occurrence_divisor: usize,
    /// Outlier margin below the mean confidence.
    pub outlier_margin: f32,
    /// Number of outlier passes per retained cluster.
    pub outlier_passes: u32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            min_match_confidence: 0.1,
            offset_tolerance: TimeDelta::milliseconds(200),
            recency_gate: false,
            recency_window: TimeDelta::seconds(3),
            min_cluster_confidence: 0.45,
            occurrence_divisor: 6,
            outlier_margin: 0.1,
            outlier_passes: 2,
        }
    }
}

impl From<&ClusteringSettings> for ClusteringConfig {
    fn from(settings: &ClusteringSettings) -> Self {
        Self {
            min_match_confidence: settings.min_match_confidence,
            offset_tolerance: TimeDelta::milliseconds(settings.offset_tolerance_ms),
            recency_gate: settings.recency_gate,
            recency_window: TimeDelta::milliseconds(settings.recency_window_ms),
            min_cluster_confidence: settings.min_cluster_confidence,
            occurrence_divisor: settings.occurrence_divisor as usize,
            outlier_margin: non_negative(settings.outlier_margin),
            outlier_passes: settings.outlier_passes,
        }
    }
}

/// Margins below zero (or NaN) would make every match an outlier.
fn non_negative(margin: f32) -> f32 {
    if margin.is_nan() {
        0.0
    } else {
        margin.max(0.0)
    }
}

/// Counters collected while clustering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusteringReport {
    /// Matches that passed the confidence floor.
    pub admitted: usize,
    /// Matches dropped for low confidence.
    pub discarded: usize,
    /// Clusters created during assignment.
    pub formed: usize,
    /// Clusters that survived filtering.
    pub retained: usize,
    /// Matches removed by outlier filtering.
    pub outliers_removed: usize,
}

/// Clusters that survived filtering, plus counters.
#[derive(Debug, Clone)]
pub struct ClusteringOutput {
    /// Retained clusters sorted by first occurrence.
    pub clusters: Vec<OffsetCluster>,
    pub report: ClusteringReport,
}

/// Runs the clustering pass over a complete match list.
pub struct ClusteringPass {
    config: ClusteringConfig,
}

impl ClusteringPass {
    pub fn new(config: ClusteringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }

    /// Cluster the matches and keep the reliable clusters.
    ///
    /// Fails with `NoOverlapDetected` when there are no matches at all or
    /// when every cluster is filtered out.
    pub fn run(&self, matches: &[RawMatch]) -> SyncResult<ClusteringOutput> {
        if matches.is_empty() {
            return Err(AnalysisError::NoOverlapDetected);
        }

        let mut report = ClusteringReport::default();
        let mut clusters = self.assign(matches, &mut report);
        report.formed = clusters.len();

        clusters.sort_by_key(|c| c.first_occurrence());
        let clusters = self.retain_reliable(clusters, &mut report);
        report.retained = clusters.len();

        tracing::debug!(
            "Clustering: {} admitted, {} discarded, {} formed, {} retained, {} outliers removed",
            report.admitted,
            report.discarded,
            report.formed,
            report.retained,
            report.outliers_removed
        );

        if clusters.is_empty() {
            return Err(AnalysisError::NoOverlapDetected);
        }

        Ok(ClusteringOutput { clusters, report })
    }

    /// Greedy first-fit assignment in input order.
    fn assign(&self, matches: &[RawMatch], report: &mut ClusteringReport) -> Vec<OffsetCluster> {
        let mut clusters: Vec<OffsetCluster> = Vec::new();

        for raw in matches {
            if raw.confidence < self.config.min_match_confidence {
                report.discarded += 1;
                continue;
            }
            report.admitted += 1;

            let candidate = raw.normalized();
            match clusters.iter_mut().find(|c| self.accepts(c, &candidate)) {
                Some(cluster) => {
                    cluster.add(candidate);
                }
                None => clusters.push(OffsetCluster::new(candidate)),
            }
        }

        clusters
    }

    fn accepts(&self, cluster: &OffsetCluster, candidate: &MatchCandidate) -> bool {
        if self.config.recency_gate {
            cluster.is_within_recent(
                candidate.offset,
                self.config.offset_tolerance,
                candidate.video_time,
                self.config.recency_window,
            )
        } else {
            cluster.is_within(candidate.offset, self.config.offset_tolerance)
        }
    }

    /// Drop weak clusters and trim outliers from the rest.
    fn retain_reliable(
        &self,
        clusters: Vec<OffsetCluster>,
        report: &mut ClusteringReport,
    ) -> Vec<OffsetCluster> {
        let largest = clusters.iter().map(|c| c.occurrences()).max().unwrap_or(0);
        let threshold = largest / self.config.occurrence_divisor.max(1);

        clusters
            .into_iter()
            .filter(|c| {
                c.mean_confidence() > self.config.min_cluster_confidence
                    && c.occurrences() > threshold
            })
            .map(|mut cluster| {
                for _ in 0..self.config.outlier_passes {
                    report.outliers_removed += cluster.filter_outliers(self.config.outlier_margin);
                }
                tracing::debug!("Retained cluster {}", cluster);
                cluster
            })
            .collect()
    }
}

impl Default for ClusteringPass {
    fn default() -> Self {
        Self::new(ClusteringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: i64) -> TimeDelta {
        TimeDelta::milliseconds(v)
    }

    fn raw(offset_ms: i64, video_ms: i64, confidence: f32) -> RawMatch {
        RawMatch::new(ms(offset_ms), ms(video_ms), confidence)
    }

    /// `count` matches at one offset, one per second from `start_ms`.
    fn run_of(offset_ms: i64, start_ms: i64, count: i64, confidence: f32) -> Vec<RawMatch> {
        (0..count)
            .map(|i| raw(offset_ms, start_ms + i * 1000, confidence))
            .collect()
    }

    #[test]
    fn empty_input_is_no_overlap() {
        let result = ClusteringPass::default().run(&[]);
        assert!(matches!(result, Err(AnalysisError::NoOverlapDetected)));
    }

    #[test]
    fn all_weak_matches_is_no_overlap() {
        let matches = run_of(1000, 0, 10, 0.3);
        let result = ClusteringPass::default().run(&matches);
        assert!(matches!(result, Err(AnalysisError::NoOverlapDetected)));
    }

    #[test]
    fn discards_matches_below_floor() {
        let mut matches = run_of(1000, 0, 10, 0.9);
        matches.push(raw(1000, 20_000, 0.05));
        let output = ClusteringPass::default().run(&matches).unwrap();
        assert_eq!(output.report.admitted, 10);
        assert_eq!(output.report.discarded, 1);
        assert_eq!(output.clusters[0].occurrences(), 10);
    }

    #[test]
    fn assignment_partitions_admitted_matches() {
        let mut matches = run_of(1000, 0, 20, 0.9);
        matches.extend(run_of(5000, 30_000, 20, 0.8));
        matches.extend(run_of(9000, 60_000, 3, 0.7));
        matches.push(raw(0, 1000, 0.05));

        let pass = ClusteringPass::default();
        let mut report = ClusteringReport::default();
        let clusters = pass.assign(&matches, &mut report);

        let total: usize = clusters.iter().map(|c| c.occurrences()).sum();
        assert_eq!(total, report.admitted);
        assert_eq!(report.admitted, 43);
        assert_eq!(clusters.len(), 3);
    }

    #[test]
    fn first_fit_prefers_earliest_cluster() {
        // 0ms and 300ms become separate clusters; 150ms is within range of
        // both and has to land in the one created first.
        let matches = vec![raw(0, 0, 0.9), raw(300, 1000, 0.9), raw(150, 2000, 0.9)];
        let pass = ClusteringPass::default();
        let mut report = ClusteringReport::default();
        let clusters = pass.assign(&matches, &mut report);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].occurrences(), 2);
        assert_eq!(clusters[0].mean_offset(), ms(75));
        assert_eq!(clusters[1].occurrences(), 1);
    }

    #[test]
    fn drifting_mean_does_not_reabsorb() {
        // The first cluster's mean moves towards the second, but the second
        // cluster keeps its own evidence.
        let matches = vec![
            raw(0, 0, 0.9),
            raw(250, 1000, 0.9),
            raw(150, 2000, 0.9),
            raw(190, 3000, 0.9),
        ];
        let pass = ClusteringPass::default();
        let mut report = ClusteringReport::default();
        let clusters = pass.assign(&matches, &mut report);

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].occurrences(), 3);
        assert_eq!(clusters[1].occurrences(), 1);
    }

    #[test]
    fn swapped_matches_are_normalized() {
        let matches = vec![
            raw(2000, 10_000, 0.9),
            raw(-2000, 14_000, 0.9).swapped(),
        ];
        let pass = ClusteringPass::default();
        let mut report = ClusteringReport::default();
        let clusters = pass.assign(&matches, &mut report);

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].mean_offset(), ms(2000));
        assert_eq!(clusters[0].last_occurrence(), ms(12_000));
    }

    #[test]
    fn recency_gate_splits_distant_evidence() {
        let matches = vec![raw(1000, 0, 0.9), raw(1000, 10_000, 0.9)];
        let config = ClusteringConfig {
            recency_gate: true,
            ..ClusteringConfig::default()
        };
        let pass = ClusteringPass::new(config);
        let mut report = ClusteringReport::default();
        assert_eq!(pass.assign(&matches, &mut report).len(), 2);

        let mut report = ClusteringReport::default();
        assert_eq!(ClusteringPass::default().assign(&matches, &mut report).len(), 1);
    }

    #[test]
    fn drops_small_and_unconfident_clusters() {
        let mut matches = run_of(1000, 0, 60, 0.9);
        // 10 <= 60 / 6, too small
        matches.extend(run_of(4000, 100_000, 10, 0.9));
        // big enough but unconfident
        matches.extend(run_of(8000, 200_000, 30, 0.4));
        // 11 > 10, kept
        matches.extend(run_of(12_000, 300_000, 11, 0.8));

        let output = ClusteringPass::default().run(&matches).unwrap();
        assert_eq!(output.report.formed, 4);
        assert_eq!(output.report.retained, 2);
        assert_eq!(output.clusters[0].mean_offset(), ms(1000));
        assert_eq!(output.clusters[1].mean_offset(), ms(12_000));
    }

    #[test]
    fn retained_clusters_are_sorted_by_first_occurrence() {
        let mut matches = run_of(5000, 100_000, 10, 0.9);
        matches.extend(run_of(1000, 0, 10, 0.9));

        let output = ClusteringPass::default().run(&matches).unwrap();
        assert_eq!(output.clusters.len(), 2);
        assert_eq!(output.clusters[0].first_occurrence(), ms(0));
        assert_eq!(output.clusters[1].first_occurrence(), ms(100_000));
    }

    #[test]
    fn retained_clusters_are_filtered_twice() {
        let matches = vec![
            raw(1000, 0, 1.0),
            raw(1000, 1000, 1.0),
            raw(1000, 2000, 0.8),
            raw(1000, 3000, 0.4),
        ];

        let output = ClusteringPass::default().run(&matches).unwrap();
        assert_eq!(output.report.outliers_removed, 2);
        assert_eq!(output.clusters[0].occurrences(), 2);
    }

    #[test]
    fn negative_outlier_margin_from_settings_is_clamped() {
        let settings = ClusteringSettings {
            outlier_margin: -0.05,
            ..ClusteringSettings::default()
        };
        let config = ClusteringConfig::from(&settings);
        assert_eq!(config.outlier_margin, 0.0);

        let output = ClusteringPass::new(config)
            .run(&run_of(5000, 0, 10, 0.9))
            .unwrap();
        assert_eq!(output.clusters.len(), 1);
        assert_eq!(output.clusters[0].occurrences(), 10);
        assert_eq!(output.clusters[0].mean_offset(), ms(5000));
        assert_eq!(output.report.outliers_removed, 0);
    }

    #[test]
    fn negative_margin_in_config_never_empties_clusters() {
        let config = ClusteringConfig {
            outlier_margin: -0.5,
            ..ClusteringConfig::default()
        };
        let output = ClusteringPass::new(config)
            .run(&run_of(5000, 0, 10, 0.9))
            .unwrap();
        assert!(output.clusters.iter().all(|c| c.occurrences() >= 1));
    }
}
