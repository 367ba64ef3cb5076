//! File logging setup.
//!
//! [`setup_logging`] installs a global `tracing` subscriber that appends one
//! line per event to `<log_folder>/<unique_log_name>.log`:
//!
//! ```text
//! 2026/10/19 09:14:02 Monday ||| INFO ||| Created table 'FOO'.
//! ```
//!
//! Pair it with [`TracingLogger`](crate::logger::TracingLogger) to route the
//! table operations' messages into the file.

use std::fmt::Write as FmtWrite;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::LoggingConfig;
use crate::error::{HelperError, Result};
use crate::logger::LoggingLevel;

/// Timestamp format of every log line.
pub const LOG_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S %A";

/// A tracing layer that appends formatted lines to a file.
///
/// Events below `threshold` are dropped. The check runs on the computed
/// [`LoggingLevel`], so a CRITICAL threshold also drops plain ERROR events.
pub struct FileLogLayer {
    file: Mutex<File>,
    threshold: LoggingLevel,
}

impl FileLogLayer {
    /// Open (or create) `path` in append mode.
    pub fn open(path: &Path, threshold: LoggingLevel) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
            threshold,
        })
    }
}

impl<S> Layer<S> for FileLogLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = MessageVisitor::new();
        event.record(&mut visitor);

        let level = if visitor.critical {
            LoggingLevel::Critical
        } else {
            level_name(event.metadata().level())
        };
        if level < self.threshold {
            return;
        }

        let now = chrono::Local::now();
        let line = format!(
            "{} ||| {} ||| {}\n",
            now.format(LOG_TIME_FORMAT),
            level,
            visitor.message
        );

        if let Ok(mut file) = self.file.lock() {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

fn level_name(level: &Level) -> LoggingLevel {
    match *level {
        Level::TRACE | Level::DEBUG => LoggingLevel::Debug,
        Level::INFO => LoggingLevel::Info,
        Level::WARN => LoggingLevel::Warning,
        Level::ERROR => LoggingLevel::Error,
    }
}

/// Visitor for extracting the message from a tracing event.
struct MessageVisitor {
    message: String,
    critical: bool,
}

impl MessageVisitor {
    fn new() -> Self {
        Self {
            message: String::new(),
            critical: false,
        }
    }

    fn push_field(&mut self, name: &str, value: &dyn std::fmt::Display) {
        if !self.message.is_empty() {
            self.message.push(' ');
        }
        let _ = write!(self.message, "{}={}", name, value);
    }
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            self.push_field(field.name(), &format!("{:?}", value));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            self.push_field(field.name(), &value);
        }
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        if field.name() == "critical" {
            self.critical = value;
        } else {
            self.push_field(field.name(), &value);
        }
    }
}

/// Path of the log file for a run.
pub fn log_file_path(log_folder: &Path, unique_log_name: &str) -> PathBuf {
    log_folder.join(format!("{}.log", unique_log_name))
}

/// Create `log_folder` if needed and install a global subscriber writing to
/// `<log_folder>/<unique_log_name>.log` at `level` and above.
///
/// Returns the log file path. Fails with a configuration error if a global
/// subscriber is already installed.
pub fn setup_logging(
    log_folder: impl AsRef<Path>,
    unique_log_name: &str,
    level: LoggingLevel,
) -> Result<PathBuf> {
    let log_folder = log_folder.as_ref();
    if unique_log_name.trim().is_empty() {
        return Err(HelperError::argument("log name cannot be empty"));
    }
    std::fs::create_dir_all(log_folder)?;

    let path = log_file_path(log_folder, unique_log_name);
    let layer = FileLogLayer::open(&path, level)?;

    tracing_subscriber::registry()
        .with(level.level_filter())
        .with(layer)
        .try_init()
        .map_err(|e| HelperError::Config(format!("failed to install log subscriber: {}", e)))?;

    Ok(path)
}

/// [`setup_logging`] with the folder, name and level of a [`LoggingConfig`].
pub fn setup_logging_from_config(config: &LoggingConfig) -> Result<PathBuf> {
    setup_logging(&config.folder, &config.name, config.level)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::{Logger, TracingLogger};

    #[test]
    fn test_log_file_path() {
        let path = log_file_path(Path::new("/var/log/loads"), "nightly_2026");
        assert_eq!(path, PathBuf::from("/var/log/loads/nightly_2026.log"));
    }

    #[test]
    fn test_layer_writes_formatted_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path(), "run");
        let layer = FileLogLayer::open(&path, LoggingLevel::Debug).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let logger = TracingLogger;
            logger.info("Created table 'FOO'.");
            logger.warning("slow upload");
            logger.critical("disk full");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" ||| INFO ||| Created table 'FOO'."));
        assert!(lines[1].ends_with(" ||| WARNING ||| slow upload"));
        assert!(lines[2].ends_with(" ||| CRITICAL ||| disk full"));
    }

    #[test]
    fn test_critical_threshold_drops_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path(), "critical_only");
        let layer = FileLogLayer::open(&path, LoggingLevel::Critical).unwrap();
        let subscriber = tracing_subscriber::registry()
            .with(LoggingLevel::Critical.level_filter())
            .with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let logger = TracingLogger;
            logger.warning("slow upload");
            logger.error("plain error");
            logger.critical("disk full");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with(" ||| CRITICAL ||| disk full"));
    }

    #[test]
    fn test_warning_threshold_keeps_higher_levels() {
        let dir = tempfile::tempdir().unwrap();
        let path = log_file_path(dir.path(), "warnings");
        let layer = FileLogLayer::open(&path, LoggingLevel::Warning).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            let logger = TracingLogger;
            logger.debug("hidden");
            logger.info("hidden");
            logger.warning("kept");
            logger.error("kept");
        });

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(!content.contains("hidden"));
    }

    // Installs the process-wide subscriber; no other test in this crate
    // calls setup_logging successfully.
    #[test]
    fn test_setup_logging_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggingConfig {
            folder: dir.path().join("loads").join("nightly"),
            name: "run_2026".to_string(),
            level: LoggingLevel::Info,
        };

        let path = setup_logging_from_config(&config).unwrap();
        assert_eq!(path, config.folder.join("run_2026.log"));
        assert!(path.exists());

        let again = setup_logging_from_config(&config);
        assert!(matches!(again, Err(HelperError::Config(_))));
    }

    #[test]
    fn test_setup_logging_rejects_empty_name() {
        let dir = tempfile::tempdir().unwrap();
        let result = setup_logging(dir.path(), "  ", LoggingLevel::Info);
        assert!(matches!(result, Err(HelperError::Argument(_))));
    }
}
