//! Cut plan construction.
//!
//! A `CutPlan` is the payload handed to whatever process extracts and joins
//! the segments. Field names serialize in camelCase:
//! `{videoPath, outputPath, segments: [{startSeconds, lengthSeconds}]}`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::models::Segment;

/// Errors from building or serializing a cut plan.
#[derive(Debug, thiserror::Error)]
pub enum CutError {
    /// A plan needs at least one segment.
    #[error("Cut plan for {0} has no segments")]
    NoSegments(PathBuf),

    /// JSON serialization failed.
    #[error("Failed to serialize cut plan: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One segment of the video to keep, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutSegment {
    pub start_seconds: f64,
    pub length_seconds: f64,
}

impl CutSegment {
    /// End of the segment in seconds.
    pub fn end_seconds(&self) -> f64 {
        self.start_seconds + self.length_seconds
    }
}

impl From<&Segment> for CutSegment {
    fn from(segment: &Segment) -> Self {
        Self {
            start_seconds: segment.start_seconds(),
            length_seconds: segment.length_seconds(),
        }
    }
}

/// Everything an extraction process needs to produce the aligned video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CutPlan {
    /// Source video.
    pub video_path: PathBuf,
    /// Where the joined result should go.
    pub output_path: PathBuf,
    /// Segments to extract, in order.
    pub segments: Vec<CutSegment>,
}

impl CutPlan {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, CutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a plan back from JSON.
    pub fn from_json(json: &str) -> Result<Self, CutError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Build a cut plan for `video_path`.
pub fn build_cut_plan(
    video_path: impl Into<PathBuf>,
    output_path: impl Into<PathBuf>,
    segments: &[Segment],
) -> Result<CutPlan, CutError> {
    let video_path = video_path.into();
    if segments.is_empty() {
        return Err(CutError::NoSegments(video_path));
    }

    Ok(CutPlan {
        video_path,
        output_path: output_path.into(),
        segments: segments.iter().map(CutSegment::from).collect(),
    })
}

/// Output path next to the video: `<stem><suffix><ext>`.
///
/// `concert.mp4` with suffix `-cut` becomes `concert-cut.mp4`.
pub fn derive_output_path(video_path: &Path, suffix: &str) -> PathBuf {
    let stem = video_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let file_name = match video_path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };

    video_path.with_file_name(file_name)
}
