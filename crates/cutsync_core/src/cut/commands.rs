//! Command renderings of a cut plan.
//!
//! The ffmpeg form trims each segment from the source with `-ss/-t` and
//! joins them with the concat filter:
//!
//! ```text
//! ffmpeg -ss 0.000 -t 124.750 -i in.mp4 -ss 125.250 -t 156.750 -i in.mp4 \
//!   -filter_complex '[0:v:0][0:a:0][1:v:0][1:a:0]concat=n=2:v=1:a=1 [v] [a1]' \
//!   -map '[v]' -map '[a1]' in-cut.mp4
//! ```

use super::plan_builder::{CutPlan, CutSegment};
use crate::models::{AnalysisResult, Segment};

/// Human-readable list of segments: `start->end | start->end`.
pub fn describe_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" | ")
        .trim()
        .to_string()
}

/// Builder for the ffmpeg concat command.
pub struct FfmpegConcatBuilder<'a> {
    plan: &'a CutPlan,
}

impl<'a> FfmpegConcatBuilder<'a> {
    pub fn new(plan: &'a CutPlan) -> Self {
        Self { plan }
    }

    /// Build the argument tokens (without the `ffmpeg` program name).
    pub fn build(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        let video = self.plan.video_path.to_string_lossy().to_string();

        for segment in &self.plan.segments {
            tokens.push("-ss".to_string());
            tokens.push(seconds(segment.start_seconds));
            tokens.push("-t".to_string());
            tokens.push(seconds(segment.length_seconds));
            tokens.push("-i".to_string());
            tokens.push(video.clone());
        }

        tokens.push("-filter_complex".to_string());
        tokens.push(self.concat_filter());

        tokens.push("-map".to_string());
        tokens.push("[v]".to_string());
        tokens.push("-map".to_string());
        tokens.push("[a1]".to_string());

        tokens.push(self.plan.output_path.to_string_lossy().to_string());
        tokens
    }

    /// Full command line, quoted for a POSIX shell.
    pub fn command_line(&self) -> String {
        let mut line = String::from("ffmpeg");
        for token in self.build() {
            line.push(' ');
            line.push_str(&shell_quote(&token));
        }
        line
    }

    fn concat_filter(&self) -> String {
        let count = self.plan.segments.len();
        let inputs: String = (0..count)
            .map(|i| format!("[{i}:v:0][{i}:a:0]"))
            .collect();
        format!("{}concat=n={}:v=1:a=1 [v] [a1]", inputs, count)
    }
}

/// Arguments for the helper script: `"video" "output" "s,l|s,l"`.
pub fn helper_arguments(plan: &CutPlan) -> String {
    let ranges = plan
        .segments
        .iter()
        .map(|s| format!("{},{}", seconds(s.start_seconds), seconds(s.length_seconds)))
        .collect::<Vec<_>>()
        .join("|");

    format!(
        "\"{}\" \"{}\" \"{}\"",
        plan.video_path.display(),
        plan.output_path.display(),
        ranges
    )
}

/// One-line summary: `Results: <lead offset ms> <needs cut> <helper arguments>`.
///
/// The helper arguments are left out when there is no plan.
pub fn results_line(result: &AnalysisResult, plan: Option<&CutPlan>) -> String {
    let mut line = format!(
        "Results: {} {}",
        result.lead_offset.num_milliseconds(),
        result.needs_cut
    );
    if let Some(plan) = plan {
        line.push(' ');
        line.push_str(&helper_arguments(plan));
    }
    line
}

/// PowerShell demux arguments: `"video" @(@("s","l"),...) "output"`.
pub fn powershell_arguments(plan: &CutPlan) -> String {
    let pairs = plan
        .segments
        .iter()
        .map(|s| {
            format!(
                "@(\"{}\",\"{}\")",
                seconds(s.start_seconds),
                seconds(s.length_seconds)
            )
        })
        .collect::<Vec<_>>()
        .join(",");

    format!(
        "\"{}\" @({}) \"{}\"",
        plan.video_path.display(),
        pairs,
        plan.output_path.display()
    )
}

/// ffconcat entries for each segment, each block followed by a blank line.
pub fn demux_entries(plan: &CutPlan) -> Vec<String> {
    let file = plan.video_path.to_string_lossy().replace('\'', "'\\''");
    plan.segments
        .iter()
        .flat_map(|s| entry_block(&file, s))
        .collect()
}

/// A complete ffconcat script for the demuxer.
pub fn ffconcat_script(plan: &CutPlan) -> String {
    let mut script = String::from("ffconcat version 1.0\n\n");
    for line in demux_entries(plan) {
        script.push_str(&line);
        script.push('\n');
    }
    script
}

fn entry_block(file: &str, segment: &CutSegment) -> [String; 5] {
    [
        format!("file '{}'", file),
        format!("inpoint {}", seconds(segment.start_seconds)),
        format!("duration {}", seconds(segment.length_seconds)),
        format!("outpoint {}", seconds(segment.end_seconds())),
        String::new(),
    ]
}

fn seconds(value: f64) -> String {
    format!("{:.3}", value)
}

fn shell_quote(token: &str) -> String {
    let safe = !token.is_empty()
        && token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./:=,+".contains(c));
    if safe {
        token.to_string()
    } else {
        format!("'{}'", token.replace('\'', "'\\''"))
    }
}
