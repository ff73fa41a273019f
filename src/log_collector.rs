//! Logging pipeline for widget builds.
//!
//! Every record is echoed to stderr immediately. When a log directory is
//! configured, records are also handed to a background writer thread over an
//! unbounded channel and appended to a per-run log file.
//!
//! ```text
//! log::info!() / subprocess output
//!     |
//! [LogCollector] ---> stderr
//!     | (crossbeam channel)
//!     v
//! [writer thread] ---> <log_dir>/<timestamp>_build.log
//! ```

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Target used for subprocess output lines.
pub const OUTPUT_TARGET: &str = "output";

/// Target used for high-level step milestones.
pub const PARSED_TARGET: &str = "parsed";

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// A log line with metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLine {
    pub message: String,
    pub level: Level,
    pub target: String,
    /// HH:MM:SS.mmm at creation time
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, target: impl Into<String>, message: impl Into<String>) -> Self {
        LogLine {
            message: message.into(),
            level,
            target: target.into(),
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    /// Render the line the way it appears on stderr and on disk.
    pub fn render(&self) -> String {
        match self.target.as_str() {
            OUTPUT_TARGET => format!("[{}]   | {}", self.timestamp, self.message),
            _ => format!("[{}] [{}] {}", self.timestamp, self.level, self.message),
        }
    }
}

/// Unified logger: stderr echo plus optional on-disk persistence.
#[derive(Clone)]
pub struct LogCollector {
    max_level: LevelFilter,
    /// Present only when a log directory was configured
    tx: Option<Sender<LogMessage>>,
    log_path: Option<PathBuf>,
}

impl LogCollector {
    /// Collector that only echoes to stderr.
    pub fn stderr_only(max_level: LevelFilter) -> Self {
        LogCollector {
            max_level,
            tx: None,
            log_path: None,
        }
    }

    /// Collector that also persists every line under `log_dir`.
    pub fn with_log_dir(max_level: LevelFilter, log_dir: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(log_dir)
            .map_err(|e| format!("Failed to create log dir {}: {}", log_dir.display(), e))?;

        let log_path = log_dir.join(format!("{}_build.log", Local::now().format("%Y%m%d_%H%M%S")));
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
            .map_err(|e| format!("Failed to open log file {}: {}", log_path.display(), e))?;

        let (tx, rx) = unbounded::<LogMessage>();

        // Plain OS thread: keeps draining after the tokio runtime is gone.
        std::thread::spawn(move || {
            while let Ok(msg) = rx.recv() {
                match msg {
                    LogMessage::Line(line) => {
                        let _ = writeln!(file, "{}", line.render());
                    }
                    LogMessage::Flush(done) => {
                        let _ = file.flush();
                        let _ = done.send(());
                    }
                }
            }
            let _ = file.flush();
        });

        Ok(LogCollector {
            max_level,
            tx: Some(tx),
            log_path: Some(log_path),
        })
    }

    /// Install this collector as the global `log` backend.
    pub fn install(self) -> Result<(), log::SetLoggerError> {
        let max_level = self.max_level;
        log::set_boxed_logger(Box::new(self)).map(|()| log::set_max_level(max_level))
    }

    pub fn log_path(&self) -> Option<&Path> {
        self.log_path.as_deref()
    }

    /// Route one line to stderr and, if configured, to disk.
    pub fn log_line(&self, line: LogLine) {
        eprintln!("{}", line.render());
        if let Some(tx) = &self.tx {
            let _ = tx.send(LogMessage::Line(line));
        }
    }

    /// Block until every line sent so far has been written out.
    pub fn wait_for_empty(&self) -> Result<(), String> {
        let Some(tx) = &self.tx else {
            return Ok(());
        };
        let (done_tx, done_rx) = std::sync::mpsc::channel::<()>();
        tx.send(LogMessage::Flush(done_tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        done_rx
            .recv()
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            self.log_line(LogLine::new(
                record.level(),
                record.target(),
                record.args().to_string(),
            ));
        }
    }

    fn flush(&self) {
        let _ = self.wait_for_empty();
    }
}

/// Map `-v` occurrences onto a level filter.
pub fn level_for_verbosity(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_render_output_line() {
        let line = LogLine::new(Level::Info, OUTPUT_TARGET, "yarn install v1.22.19");
        let rendered = line.render();
        assert!(rendered.ends_with("  | yarn install v1.22.19"));
        assert!(!rendered.contains("INFO"));
    }

    #[test]
    fn test_render_regular_line() {
        let line = LogLine::new(Level::Warn, "widget_build", "careful");
        assert!(line.render().ends_with("[WARN] careful"));
    }

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), LevelFilter::Info);
        assert_eq!(level_for_verbosity(1), LevelFilter::Debug);
        assert_eq!(level_for_verbosity(5), LevelFilter::Trace);
    }

    #[test]
    fn test_enabled_respects_max_level() {
        let collector = LogCollector::stderr_only(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let error = Metadata::builder().level(Level::Error).build();
        assert!(!collector.enabled(&debug));
        assert!(collector.enabled(&error));
    }

    #[test]
    fn test_stderr_only_flush_is_noop() {
        let collector = LogCollector::stderr_only(LevelFilter::Info);
        assert!(collector.log_path().is_none());
        assert!(collector.wait_for_empty().is_ok());
    }

    #[test]
    fn test_lines_persisted_after_flush() {
        let dir = tempdir().expect("Failed to create temp dir");
        let collector = LogCollector::with_log_dir(LevelFilter::Info, dir.path())
            .expect("Failed to create collector");

        for i in 0..100 {
            collector.log_line(LogLine::new(Level::Info, "widget_build", format!("line {}", i)));
        }
        collector.wait_for_empty().expect("Flush failed");

        let path = collector.log_path().expect("log path missing");
        let content = std::fs::read_to_string(path).expect("Failed to read log file");
        assert_eq!(content.lines().count(), 100);
        assert!(content.contains("line 99"));
    }
}
