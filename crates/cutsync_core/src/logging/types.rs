//! Logging types and configuration.

use serde::{Deserialize, Serialize};

use crate::config::LoggingSettings;

/// Minimum severity written to a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string for `EnvFilter`.
    pub fn filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// How a run log is written.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Lines below this level are dropped.
    pub level: LogLevel,
    /// Keep per-cluster rows out of the file; they only reach the tail.
    pub compact: bool,
    /// Cluster rows remembered for replay after a failure.
    pub error_tail: usize,
    /// Prefix every line with the time of day.
    pub show_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig::from(&LoggingSettings::default())
    }
}

impl From<&LoggingSettings> for LogConfig {
    fn from(settings: &LoggingSettings) -> Self {
        Self {
            level: settings.level,
            compact: settings.compact,
            error_tail: settings.error_tail as usize,
            show_timestamps: settings.show_timestamps,
        }
    }
}

/// Receives every line written to a run log.
pub type LogCallback = Box<dyn Fn(&str) + Send + Sync>;

/// Marker put in front of a run-log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Start of a pipeline stage: `=== Clustering ===`
    Phase,
    /// External command for the cutting step: `$ ffmpeg ...`
    Command,
    /// `[SUCCESS] ...`
    Success,
    /// `[ERROR] ...`
    Failure,
    Plain,
}

impl LineKind {
    /// Decorate `text` with this marker.
    pub fn decorate(&self, text: &str) -> String {
        match self {
            LineKind::Phase => format!("=== {} ===", text),
            LineKind::Command => format!("$ {}", text),
            LineKind::Success => format!("[SUCCESS] {}", text),
            LineKind::Failure => format!("[ERROR] {}", text),
            LineKind::Plain => text.to_string(),
        }
    }

    /// Level the line is logged at.
    pub fn level(&self) -> LogLevel {
        match self {
            LineKind::Failure => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_kinds_decorate_text() {
        assert_eq!(LineKind::Phase.decorate("Clustering"), "=== Clustering ===");
        assert_eq!(LineKind::Command.decorate("ffmpeg"), "$ ffmpeg");
        assert_eq!(LineKind::Plain.decorate("plain"), "plain");
        assert_eq!(LineKind::Failure.level(), LogLevel::Error);
        assert_eq!(LineKind::Success.level(), LogLevel::Info);
    }

    #[test]
    fn levels_are_ordered() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Error > LogLevel::Warn);
    }

    #[test]
    fn config_follows_settings() {
        let settings = LoggingSettings {
            error_tail: 7,
            level: LogLevel::Debug,
            compact: false,
            ..LoggingSettings::default()
        };
        let config = LogConfig::from(&settings);
        assert_eq!(config.error_tail, 7);
        assert_eq!(config.level, LogLevel::Debug);
        assert!(!config.compact);
        assert_eq!(LogConfig::default().error_tail, 20);
    }
}
