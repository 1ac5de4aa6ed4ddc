//! Log file for one analysis run.
//!
//! The log follows the pipeline: a phase marker per stage, the retained
//! clusters as a numbered table, the segments that were cut out and the
//! final results line. Every line also goes to an optional callback.
//!
//! In compact mode the cluster rows stay out of the file. They are kept in a
//! bounded tail instead and replayed if the run fails, since a rejected
//! segment boundary is only explainable with the clusters in view.

use std::collections::VecDeque;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use parking_lot::Mutex;

use super::types::{LineKind, LogCallback, LogConfig};
use crate::cut::{results_line, CutPlan};
use crate::models::time::{format_seconds, format_timestamp};
use crate::models::{AnalysisResult, ClusterSummary, Segment};

const CLUSTER_HEADER: &str = "  #  first -> last                offset        conf   occ";

/// Where formatted lines end up.
struct Outputs {
    file: BufWriter<File>,
    callback: Option<LogCallback>,
}

/// Log of one analysis run, written to `<log_dir>/<run name>.log`.
pub struct RunLogger {
    log_path: PathBuf,
    config: LogConfig,
    outputs: Mutex<Outputs>,
    tail: Mutex<VecDeque<String>>,
}

impl RunLogger {
    /// Create the log file, replacing any log left by an earlier run.
    pub fn new(
        run_name: &str,
        log_dir: impl AsRef<Path>,
        config: LogConfig,
        callback: Option<LogCallback>,
    ) -> io::Result<Self> {
        let log_dir = log_dir.as_ref();
        fs::create_dir_all(log_dir)?;

        let log_path = log_dir.join(format!("{}.log", file_safe(run_name)));
        let file = BufWriter::new(File::create(&log_path)?);

        Ok(Self {
            log_path,
            tail: Mutex::new(VecDeque::with_capacity(config.error_tail)),
            config,
            outputs: Mutex::new(Outputs { file, callback }),
        })
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Mark the start of a pipeline stage.
    pub fn phase(&self, name: &str) {
        self.write(LineKind::Phase, name);
    }

    pub fn info(&self, message: &str) {
        self.write(LineKind::Plain, message);
    }

    /// Record a command line meant for the cutting step.
    pub fn command(&self, command_line: &str) {
        self.write(LineKind::Command, command_line);
    }

    /// Numbered table of the retained clusters.
    pub fn cluster_table(&self, clusters: &[ClusterSummary]) {
        self.info(&format!("{} cluster(s) retained", clusters.len()));
        if !self.config.compact {
            self.info(CLUSTER_HEADER);
        }

        for (i, summary) in clusters.iter().enumerate() {
            let row = format!("{:>3}  {}", i + 1, summary);
            if !self.config.compact {
                self.info(&row);
            }
            self.remember(row);
        }
    }

    /// One line per segment: bounds and length.
    pub fn segments(&self, segments: &[Segment]) {
        for (i, segment) in segments.iter().enumerate() {
            self.info(&format!(
                "Segment {}: {} ({}s)",
                i + 1,
                segment,
                format_seconds(segment.length)
            ));
        }
    }

    /// Final lines of a successful run.
    pub fn outcome(&self, result: &AnalysisResult, plan: Option<&CutPlan>) {
        self.info(&format!("Lead offset: {}", format_timestamp(result.lead_offset)));
        self.info(&results_line(result, plan));
        self.write(LineKind::Success, "Analysis complete");
    }

    /// Record a failed run and replay the remembered cluster rows.
    pub fn failure(&self, error: &dyn std::fmt::Display) {
        self.write(LineKind::Failure, &error.to_string());

        let tail = self.tail();
        if tail.is_empty() {
            return;
        }
        self.info(&format!("Last {} cluster row(s):", tail.len()));
        self.info(CLUSTER_HEADER);
        for row in &tail {
            self.info(row);
        }
    }

    /// Cluster rows currently remembered.
    pub fn tail(&self) -> Vec<String> {
        self.tail.lock().iter().cloned().collect()
    }

    pub fn flush(&self) {
        let _ = self.outputs.lock().file.flush();
    }

    fn remember(&self, row: String) {
        if self.config.error_tail == 0 {
            return;
        }
        let mut tail = self.tail.lock();
        while tail.len() >= self.config.error_tail {
            tail.pop_front();
        }
        tail.push_back(row);
    }

    fn write(&self, kind: LineKind, text: &str) {
        if kind.level() < self.config.level {
            return;
        }

        let mut line = kind.decorate(text);
        if self.config.show_timestamps {
            line = format!("[{}] {}", Local::now().format("%H:%M:%S%.3f"), line);
        }

        let mut outputs = self.outputs.lock();
        let _ = writeln!(outputs.file, "{}", line);
        if let Some(callback) = &outputs.callback {
            callback(&line);
        }
    }
}

impl Drop for RunLogger {
    fn drop(&mut self) {
        self.flush();
    }
}

/// Replace characters that are not allowed in file names.
fn file_safe(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            _ => c,
        })
        .collect()
}

/// Fluent construction of a [`RunLogger`].
pub struct RunLoggerBuilder {
    run_name: String,
    log_dir: PathBuf,
    config: LogConfig,
    callback: Option<LogCallback>,
}

impl RunLoggerBuilder {
    pub fn new(run_name: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            run_name: run_name.into(),
            log_dir: log_dir.into(),
            config: LogConfig::default(),
            callback: None,
        }
    }

    pub fn config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    pub fn callback(mut self, callback: LogCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    pub fn build(self) -> io::Result<RunLogger> {
        RunLogger::new(&self.run_name, self.log_dir, self.config, self.callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use chrono::TimeDelta;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::tempdir;

    fn plain(compact: bool) -> LogConfig {
        LogConfig {
            compact,
            show_timestamps: false,
            ..LogConfig::default()
        }
    }

    fn summary(offset_ms: i64) -> ClusterSummary {
        ClusterSummary {
            first_occurrence: TimeDelta::seconds(1),
            last_occurrence: TimeDelta::seconds(61),
            mean_offset: TimeDelta::milliseconds(offset_ms),
            mean_confidence: 0.8,
            occurrences: 12,
        }
    }

    fn read(logger: &RunLogger) -> String {
        logger.flush();
        fs::read_to_string(logger.log_path()).unwrap()
    }

    #[test]
    fn log_file_named_after_run() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("live: part 1", dir.path().join("logs"), plain(true), None)
            .unwrap();
        assert!(logger.log_path().exists());
        assert!(logger.log_path().ends_with("live_ part 1.log"));
    }

    #[test]
    fn verbose_table_lists_every_cluster() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), plain(false), None).unwrap();

        logger.cluster_table(&[summary(2000), summary(2500)]);
        let content = read(&logger);

        assert!(content.contains("2 cluster(s) retained"));
        assert!(content.contains(CLUSTER_HEADER));
        assert!(content.contains(&format!("  1  {}", summary(2000))));
        assert!(content.contains(&format!("  2  {}", summary(2500))));
    }

    #[test]
    fn compact_table_only_fills_tail() {
        let dir = tempdir().unwrap();
        let mut config = plain(true);
        config.error_tail = 2;
        let logger = RunLogger::new("run", dir.path(), config, None).unwrap();

        logger.cluster_table(&[summary(1000), summary(2000), summary(3000)]);
        let content = read(&logger);

        assert!(content.contains("3 cluster(s) retained"));
        assert!(!content.contains(CLUSTER_HEADER));
        let tail = logger.tail();
        assert_eq!(tail.len(), 2);
        assert!(tail[0].starts_with("  2  "));
        assert!(tail[1].starts_with("  3  "));
    }

    #[test]
    fn failure_replays_tail() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), plain(true), None).unwrap();

        logger.cluster_table(&[summary(5000), summary(2000)]);
        logger.failure(&"segment overlaps the previous one");
        let content = read(&logger);

        assert!(content.contains("[ERROR] segment overlaps the previous one"));
        assert!(content.contains("Last 2 cluster row(s):"));
        assert!(content.contains(&summary(2000).to_string()));
    }

    #[test]
    fn segments_and_outcome() {
        let dir = tempdir().unwrap();
        let logger = RunLogger::new("run", dir.path(), plain(true), None).unwrap();

        let segments = vec![
            Segment::new(TimeDelta::zero(), TimeDelta::milliseconds(124_750)),
            Segment::new(TimeDelta::milliseconds(125_250), TimeDelta::milliseconds(156_750)),
        ];
        let result = AnalysisResult::new(segments.clone(), TimeDelta::seconds(2), Vec::new());
        logger.segments(&segments);
        logger.outcome(&result, None);
        let content = read(&logger);

        assert!(content.contains("Segment 1: 00:00:00.000->00:02:04.750 (124.750s)"));
        assert!(content.contains("Segment 2: 00:02:05.250->00:04:42.000 (156.750s)"));
        assert!(content.contains("Lead offset: 00:00:02.000"));
        assert!(content.contains("Results: 2000 true"));
        assert!(content.contains("[SUCCESS] Analysis complete"));
    }

    #[test]
    fn level_drops_informational_lines() {
        let dir = tempdir().unwrap();
        let mut config = plain(false);
        config.level = LogLevel::Error;
        let logger = RunLogger::new("run", dir.path(), config, None).unwrap();

        logger.phase("Clustering");
        logger.failure(&"no overlap");
        let content = read(&logger);

        assert!(!content.contains("Clustering"));
        assert!(content.contains("[ERROR] no overlap"));
    }

    #[test]
    fn callback_sees_every_line() {
        let dir = tempdir().unwrap();
        let lines = Arc::new(AtomicUsize::new(0));
        let counter = lines.clone();

        let logger = RunLoggerBuilder::new("run", dir.path())
            .config(plain(true))
            .callback(Box::new(move |_line| {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .build()
            .unwrap();

        logger.phase("Segments");
        logger.command("ffmpeg -i concert.mp4");
        assert_eq!(lines.load(Ordering::SeqCst), 2);
        assert!(read(&logger).contains("$ ffmpeg -i concert.mp4"));
    }
}
