//! Match evidence produced by the fingerprint matcher.

use chrono::TimeDelta;

/// A match exactly as the external matcher reports it.
///
/// The matcher does not know which of its two tracks is the video, so the
/// orientation may be flipped. `video_time` is the position on the matcher's
/// first track and `offset` is second-track time minus first-track time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawMatch {
    /// Time difference between the two tracks.
    pub offset: TimeDelta,
    /// Position on the matcher's first track.
    pub video_time: TimeDelta,
    /// Similarity score (0.0 - 1.0).
    pub confidence: f32,
    /// Set when the matcher's first track is the reference, not the video.
    pub track_is_swapped: bool,
}

impl RawMatch {
    /// Create a match whose first track is already the video.
    pub fn new(offset: TimeDelta, video_time: TimeDelta, confidence: f32) -> Self {
        Self {
            offset,
            video_time,
            confidence,
            track_is_swapped: false,
        }
    }

    /// Mark the match as reported with the tracks the other way round.
    pub fn swapped(mut self) -> Self {
        self.track_is_swapped = true;
        self
    }

    /// Flip the match (if needed) so `video_time` refers to the video track.
    ///
    /// Swapping the tracks moves the position to the other track and negates
    /// the offset.
    pub fn normalized(&self) -> MatchCandidate {
        if self.track_is_swapped {
            MatchCandidate {
                offset: -self.offset,
                video_time: self.video_time + self.offset,
                confidence: self.confidence,
            }
        } else {
            MatchCandidate {
                offset: self.offset,
                video_time: self.video_time,
                confidence: self.confidence,
            }
        }
    }
}

/// One piece of offset evidence, oriented so `video_time` is on the video.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchCandidate {
    /// Reference time minus video time.
    pub offset: TimeDelta,
    /// Position in the video where the evidence was found.
    pub video_time: TimeDelta,
    /// Similarity score (0.0 - 1.0).
    pub confidence: f32,
}

impl MatchCandidate {
    pub fn new(offset: TimeDelta, video_time: TimeDelta, confidence: f32) -> Self {
        Self {
            offset,
            video_time,
            confidence,
        }
    }
}
