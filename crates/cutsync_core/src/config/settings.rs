//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;
use crate::models::FingerprintProfile;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// Path-related settings.
    #[serde(default)]
    pub paths: PathSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,

    /// Offset clustering thresholds.
    #[serde(default)]
    pub clustering: ClusteringSettings,

    /// Segment padding.
    #[serde(default)]
    pub segments: SegmentSettings,

    /// Settings handed to the fingerprint generator and matcher.
    #[serde(default)]
    pub fingerprint: FingerprintSettings,
}

/// Path configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathSettings {
    /// Folder for per-run log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Appended to the video's file stem to name the cut output.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

fn default_output_suffix() -> String {
    "-cut".to_string()
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            logs_folder: default_logs_folder(),
            output_suffix: default_output_suffix(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Minimum level for the per-run log.
    #[serde(default)]
    pub level: LogLevel,

    /// Use compact log format.
    #[serde(default = "default_true")]
    pub compact: bool,

    /// Number of recent lines kept for error reports.
    #[serde(default = "default_error_tail")]
    pub error_tail: u32,

    /// Prefix log lines with the time of day.
    #[serde(default = "default_true")]
    pub show_timestamps: bool,

    /// Write every retained cluster to the run log.
    #[serde(default = "default_true")]
    pub log_clusters: bool,
}

fn default_true() -> bool {
    true
}

fn default_error_tail() -> u32 {
    20
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            compact: true,
            error_tail: default_error_tail(),
            show_timestamps: true,
            log_clusters: true,
        }
    }
}

/// Offset clustering thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusteringSettings {
    /// Matches below this confidence are ignored.
    #[serde(default = "default_min_match_confidence")]
    pub min_match_confidence: f32,

    /// Distance from a cluster's mean offset within which a match joins it.
    #[serde(default = "default_offset_tolerance_ms")]
    pub offset_tolerance_ms: i64,

    /// Only join clusters that had evidence shortly before the match.
    #[serde(default)]
    pub recency_gate: bool,

    /// How recent that evidence must be.
    #[serde(default = "default_recency_window_ms")]
    pub recency_window_ms: i64,

    /// Minimum mean confidence for a cluster to be kept.
    #[serde(default = "default_min_cluster_confidence")]
    pub min_cluster_confidence: f32,

    /// Clusters need more than `largest / divisor` matches to be kept.
    #[serde(default = "default_occurrence_divisor")]
    pub occurrence_divisor: u32,

    /// Matches this far below the cluster's mean confidence are outliers.
    #[serde(default = "default_outlier_margin")]
    pub outlier_margin: f32,

    /// How many times outlier filtering runs on each kept cluster.
    #[serde(default = "default_outlier_passes")]
    pub outlier_passes: u32,
}

fn default_min_match_confidence() -> f32 {
    0.1
}

fn default_offset_tolerance_ms() -> i64 {
    200
}

fn default_recency_window_ms() -> i64 {
    3000
}

fn default_min_cluster_confidence() -> f32 {
    0.45
}

fn default_occurrence_divisor() -> u32 {
    6
}

fn default_outlier_margin() -> f32 {
    0.1
}

fn default_outlier_passes() -> u32 {
    2
}

impl Default for ClusteringSettings {
    fn default() -> Self {
        Self {
            min_match_confidence: default_min_match_confidence(),
            offset_tolerance_ms: default_offset_tolerance_ms(),
            recency_gate: false,
            recency_window_ms: default_recency_window_ms(),
            min_cluster_confidence: default_min_cluster_confidence(),
            occurrence_divisor: default_occurrence_divisor(),
            outlier_margin: default_outlier_margin(),
            outlier_passes: default_outlier_passes(),
        }
    }
}

/// Segment padding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentSettings {
    /// Added to the target duration when only one offset is reported.
    #[serde(default = "default_duration_padding_ms")]
    pub duration_padding_ms: i64,

    /// Kept after the last evidence of the final cluster.
    #[serde(default = "default_tail_padding_ms")]
    pub tail_padding_ms: i64,
}

fn default_duration_padding_ms() -> i64 {
    10_000
}

fn default_tail_padding_ms() -> i64 {
    30_000
}

impl Default for SegmentSettings {
    fn default() -> Self {
        Self {
            duration_padding_ms: default_duration_padding_ms(),
            tail_padding_ms: default_tail_padding_ms(),
        }
    }
}

/// Settings for the external fingerprint generator and matcher.
///
/// Passed to the implementations when they are constructed. Backend names
/// are opaque here; the implementation decides what they map to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintSettings {
    /// Fingerprint profile.
    #[serde(default)]
    pub profile: FingerprintProfile,

    /// Minimum similarity for the matcher to report a match.
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f32,

    /// FFT implementation.
    #[serde(default = "default_fft_backend")]
    pub fft_backend: String,

    /// Resampler implementation.
    #[serde(default = "default_resampler")]
    pub resampler: String,

    /// Audio decoder.
    #[serde(default = "default_decoder")]
    pub decoder: String,
}

fn default_match_threshold() -> f32 {
    0.7
}

fn default_fft_backend() -> String {
    "pffft".to_string()
}

fn default_resampler() -> String {
    "soxr".to_string()
}

fn default_decoder() -> String {
    "ffmpeg".to_string()
}

impl Default for FingerprintSettings {
    fn default() -> Self {
        Self {
            profile: FingerprintProfile::default(),
            match_threshold: default_match_threshold(),
            fft_backend: default_fft_backend(),
            resampler: default_resampler(),
            decoder: default_decoder(),
        }
    }
}

/// Names of config sections for targeted updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigSection {
    Paths,
    Logging,
    Clustering,
    Segments,
    Fingerprint,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 5] = [
        ConfigSection::Paths,
        ConfigSection::Logging,
        ConfigSection::Clustering,
        ConfigSection::Segments,
        ConfigSection::Fingerprint,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "paths",
            ConfigSection::Logging => "logging",
            ConfigSection::Clustering => "clustering",
            ConfigSection::Segments => "segments",
            ConfigSection::Fingerprint => "fingerprint",
        }
    }

    /// Comment written above the section.
    pub fn description(&self) -> &'static str {
        match self {
            ConfigSection::Paths => "Output naming and log folder",
            ConfigSection::Logging => "Logging configuration",
            ConfigSection::Clustering => "Offset clustering thresholds",
            ConfigSection::Segments => "Segment padding",
            ConfigSection::Fingerprint => "Fingerprint generator and matcher settings",
        }
    }
}
