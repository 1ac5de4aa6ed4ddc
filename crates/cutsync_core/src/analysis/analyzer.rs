//! Main analyzer tying the pipeline together.
//!
//! 1. Fingerprint both tracks (two producers, joined before matching)
//! 2. Ask the matcher for every match
//! 3. Cluster the matches and keep the reliable clusters
//! 4. Build segments and the cut plan

use std::path::PathBuf;

use chrono::TimeDelta;

use crate::config::Settings;
use crate::cut::{build_cut_plan, derive_output_path, CutPlan, FfmpegConcatBuilder};
use crate::fingerprint::{generate_fingerprints, FingerprintGenerator, MatchFinder, TrackInput};
use crate::logging::RunLogger;
use crate::models::time::format_timestamp;
use crate::models::{AnalysisResult, OffsetMode, RawMatch};

use super::clustering::{ClusteringConfig, ClusteringPass, ClusteringReport};
use super::segments::{SegmentBuilder, SegmentConfig};
use super::types::{AnalysisError, SyncResult};

/// One video/reference pair to align.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub video: TrackInput,
    pub reference: TrackInput,
    /// Explicit output path; derived from the video path when unset.
    pub output_path: Option<PathBuf>,
    /// Length of the reference, used for single-offset results.
    pub target_duration: Option<TimeDelta>,
    pub mode: OffsetMode,
}

impl AnalysisRequest {
    pub fn new(video_path: impl Into<PathBuf>, reference_path: impl Into<PathBuf>) -> Self {
        Self {
            video: TrackInput::video(video_path),
            reference: TrackInput::reference(reference_path),
            output_path: None,
            target_duration: None,
            mode: OffsetMode::default(),
        }
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = Some(path.into());
        self
    }

    pub fn with_target_duration(mut self, duration: TimeDelta) -> Self {
        self.target_duration = Some(duration);
        self
    }

    pub fn with_mode(mut self, mode: OffsetMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Everything produced by one analysis run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub result: AnalysisResult,
    /// Cut plan, present whenever the result has segments.
    pub plan: Option<CutPlan>,
    pub clustering: ClusteringReport,
}

/// Offset analyzer.
///
/// Holds the clustering and segment configuration; the fingerprint
/// collaborators are passed per call.
pub struct SyncAnalyzer {
    clustering: ClusteringPass,
    segments: SegmentConfig,
    /// Appended to the video's file stem for the derived output path.
    output_suffix: String,
    /// Write every retained cluster to the run log.
    log_clusters: bool,
}

impl SyncAnalyzer {
    /// Create an analyzer with default settings.
    pub fn new() -> Self {
        Self {
            clustering: ClusteringPass::default(),
            segments: SegmentConfig::default(),
            output_suffix: "-cut".to_string(),
            log_clusters: true,
        }
    }

    /// Create an analyzer from settings.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            clustering: ClusteringPass::new(ClusteringConfig::from(&settings.clustering)),
            segments: SegmentConfig::from(&settings.segments),
            output_suffix: settings.paths.output_suffix.clone(),
            log_clusters: settings.logging.log_clusters,
        }
    }

    pub fn with_clustering(mut self, config: ClusteringConfig) -> Self {
        self.clustering = ClusteringPass::new(config);
        self
    }

    pub fn with_segments(mut self, config: SegmentConfig) -> Self {
        self.segments = config;
        self
    }

    pub fn with_output_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.output_suffix = suffix.into();
        self
    }

    pub fn with_cluster_logging(mut self, enabled: bool) -> Self {
        self.log_clusters = enabled;
        self
    }

    /// Fingerprint, match and analyze one video/reference pair.
    ///
    /// Blocks until both fingerprint producers have finished. A failing
    /// producer aborts the run with `AnalysisError::Fingerprint`.
    pub fn analyze(
        &self,
        generator: &dyn FingerprintGenerator,
        matcher: &dyn MatchFinder,
        request: &AnalysisRequest,
        logger: Option<&RunLogger>,
    ) -> SyncResult<SyncReport> {
        tracing::info!(
            "Fingerprinting {} against {} ({} profile)",
            request.video.path.display(),
            request.reference.path.display(),
            generator.settings().profile
        );
        if let Some(log) = logger {
            log.phase("Fingerprinting");
        }

        let tracks = [request.video.clone(), request.reference.clone()];
        let fingerprints = match generate_fingerprints(generator, &tracks) {
            Ok(fingerprints) => fingerprints,
            Err(err) => return Err(report_failure(logger, AnalysisError::from(err))),
        };
        tracing::debug!("Collected {} sub-fingerprints", fingerprints.len());

        let matches = match matcher.find_all_matches(&fingerprints) {
            Ok(matches) => matches,
            Err(err) => return Err(report_failure(logger, AnalysisError::Matching(err))),
        };
        if let Some(log) = logger {
            log.info(&format!(
                "{} sub-fingerprints, {} matches",
                fingerprints.len(),
                matches.len()
            ));
        }

        self.analyze_matches(&matches, request, logger)
    }

    /// Analyze a complete match list.
    pub fn analyze_matches(
        &self,
        matches: &[RawMatch],
        request: &AnalysisRequest,
        logger: Option<&RunLogger>,
    ) -> SyncResult<SyncReport> {
        self.run_pipeline(matches, request, logger)
            .map_err(|err| report_failure(logger, err))
    }

    fn run_pipeline(
        &self,
        matches: &[RawMatch],
        request: &AnalysisRequest,
        logger: Option<&RunLogger>,
    ) -> SyncResult<SyncReport> {
        if let Some(log) = logger {
            log.phase("Clustering");
        }

        let output = self.clustering.run(matches)?;

        tracing::info!(
            "{} of {} clusters retained from {} matches",
            output.report.retained,
            output.report.formed,
            output.report.admitted
        );
        if let Some(log) = logger {
            log.info(&format!(
                "{} matches admitted, {} discarded, {} clusters formed, {} retained",
                output.report.admitted,
                output.report.discarded,
                output.report.formed,
                output.report.retained
            ));
            if self.log_clusters {
                let summaries: Vec<_> = output.clusters.iter().map(|c| c.summary()).collect();
                log.cluster_table(&summaries);
            }
            log.phase("Segments");
        }

        let result = SegmentBuilder::new(&output.clusters, &self.segments)
            .build(request.target_duration, request.mode)?;

        let plan = if result.segments.is_empty() {
            None
        } else {
            let output_path = request
                .output_path
                .clone()
                .unwrap_or_else(|| derive_output_path(&request.video.path, &self.output_suffix));
            Some(build_cut_plan(
                request.video.path.clone(),
                output_path,
                &result.segments,
            )?)
        };

        tracing::info!(
            "Lead offset {}, {} segment(s), cut needed: {}",
            format_timestamp(result.lead_offset),
            result.segments.len(),
            result.needs_cut
        );
        if let Some(log) = logger {
            log.segments(&result.segments);
            if let Some(plan) = plan.as_ref().filter(|_| result.needs_cut) {
                log.command(&FfmpegConcatBuilder::new(plan).command_line());
            }
            log.outcome(&result, plan.as_ref());
        }

        Ok(SyncReport {
            result,
            plan,
            clustering: output.report,
        })
    }
}

impl Default for SyncAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a failed run and hand the error back.
fn report_failure(logger: Option<&RunLogger>, err: AnalysisError) -> AnalysisError {
    tracing::warn!("Analysis failed: {}", err);
    if let Some(log) = logger {
        log.failure(&err);
    }
    err
}
