//! Configuration management for cutsync.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Defaults for every missing key
//!
//! # Example
//!
//! ```no_run
//! use cutsync_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/cutsync.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Offset tolerance: {}ms", config.settings().clustering.offset_tolerance_ms);
//!
//! config.settings_mut().clustering.recency_gate = true;
//! config.update_section(ConfigSection::Clustering).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    ClusteringSettings, ConfigSection, FingerprintSettings, LoggingSettings, PathSettings,
    SegmentSettings, Settings,
};
