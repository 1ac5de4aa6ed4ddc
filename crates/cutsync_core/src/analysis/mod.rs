//! Offset analysis: from fingerprint matches to video segments.
//!
//! # Architecture
//!
//! The pipeline is a chain of synchronous steps that `SyncAnalyzer` composes:
//!
//! 1. **Fingerprinting** (`crate::fingerprint`): video and reference tracks are
//!    fingerprinted concurrently into one collector, then matched.
//!
//! 2. **Offset clusters** (`cluster`): matches that agree on one offset.
//!
//! 3. **Clustering pass** (`clustering`): greedy first-fit assignment in input
//!    order, then confidence/occurrence filtering and outlier trimming.
//!
//! 4. **Segment building** (`segments`): one segment per retained cluster,
//!    with the boundary slack split between neighbours.
//!
//! # Usage
//!
//! ```ignore
//! use cutsync_core::analysis::{AnalysisRequest, SyncAnalyzer};
//!
//! let analyzer = SyncAnalyzer::from_settings(&settings);
//! let request = AnalysisRequest::new("concert.mp4", "soundboard.flac");
//! let report = analyzer.analyze(&generator, &matcher, &request, Some(&logger))?;
//!
//! if report.result.needs_cut {
//!     println!("{}", describe_segments(&report.result.segments));
//! }
//! ```

mod analyzer;
mod cluster;
mod clustering;
mod segments;
mod types;

pub use analyzer::{AnalysisRequest, SyncAnalyzer, SyncReport};
pub use cluster::OffsetCluster;
pub use clustering::{ClusteringConfig, ClusteringOutput, ClusteringPass, ClusteringReport};
pub use segments::{boundary_slack, SegmentBuilder, SegmentConfig};
pub use types::{AnalysisError, BoundaryViolation, SyncResult};
