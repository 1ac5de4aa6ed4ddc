//! Video segments kept when reassembling the aligned output.

use chrono::TimeDelta;

use super::time::{format_timestamp, to_secs_f64};

/// A contiguous range of the video, `[start, start + length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Position in the video where the segment begins.
    pub start: TimeDelta,
    /// Length of the segment (never negative once validated).
    pub length: TimeDelta,
}

impl Segment {
    pub fn new(start: TimeDelta, length: TimeDelta) -> Self {
        Self { start, length }
    }

    /// Position in the video where the segment ends.
    pub fn end(&self) -> TimeDelta {
        self.start + self.length
    }

    pub fn start_seconds(&self) -> f64 {
        to_secs_f64(self.start)
    }

    pub fn length_seconds(&self) -> f64 {
        to_secs_f64(self.length)
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}->{}",
            format_timestamp(self.start),
            format_timestamp(self.end())
        )
    }
}
