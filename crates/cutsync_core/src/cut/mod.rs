//! Cut plan output for the external segment-extraction step.
//!
//! Nothing here runs a media tool. The analysis result is turned into a
//! `CutPlan` and rendered in the forms the cutting tools accept.
//!
//! # Architecture
//!
//! - **plan_builder**: Builds a `CutPlan` from the video path and segments
//! - **commands**: Renders a `CutPlan` as ffmpeg tokens, helper-script
//!   arguments and ffconcat demux entries

mod commands;
mod plan_builder;

pub use commands::{
    demux_entries, describe_segments, ffconcat_script, helper_arguments, powershell_arguments,
    results_line, FfmpegConcatBuilder,
};
pub use plan_builder::{build_cut_plan, derive_output_path, CutError, CutPlan, CutSegment};
