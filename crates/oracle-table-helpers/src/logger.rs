//! Logger capability used by every table operation.
//!
//! Operations log through the [`Logger`] trait rather than calling `tracing`
//! directly so that callers can inject their own sink. Two implementations
//! ship with the crate:
//!
//! - [`MockLogger`]: prints `LEVEL: message` lines to stdout when the message
//!   severity reaches the instance threshold. This is the default when no
//!   logger is supplied.
//! - [`TracingLogger`]: forwards to the `tracing` macros, so records reach
//!   whatever subscriber [`setup_logging`](crate::logging::setup_logging)
//!   or the host application installed.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::HelperError;

/// Ordered logging severities, lowest first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoggingLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LoggingLevel {
    /// Upper-case name used in log lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            LoggingLevel::Debug => "DEBUG",
            LoggingLevel::Info => "INFO",
            LoggingLevel::Warning => "WARNING",
            LoggingLevel::Error => "ERROR",
            LoggingLevel::Critical => "CRITICAL",
        }
    }

    /// Closest `tracing` filter. CRITICAL has no tracing counterpart and
    /// filters as ERROR; [`FileLogLayer`](crate::logging::FileLogLayer)
    /// drops the remaining plain ERROR events.
    pub fn level_filter(&self) -> LevelFilter {
        match self {
            LoggingLevel::Debug => LevelFilter::DEBUG,
            LoggingLevel::Info => LevelFilter::INFO,
            LoggingLevel::Warning => LevelFilter::WARN,
            LoggingLevel::Error | LoggingLevel::Critical => LevelFilter::ERROR,
        }
    }
}

impl fmt::Display for LoggingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoggingLevel {
    type Err = HelperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LoggingLevel::Debug),
            "INFO" => Ok(LoggingLevel::Info),
            "WARNING" | "WARN" => Ok(LoggingLevel::Warning),
            "ERROR" => Ok(LoggingLevel::Error),
            "CRITICAL" => Ok(LoggingLevel::Critical),
            other => Err(HelperError::argument(format!(
                "unknown logging level '{}', expected one of DEBUG, INFO, WARNING, ERROR, CRITICAL",
                other
            ))),
        }
    }
}

/// Severity-tagged message sink.
pub trait Logger: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warning(&self, message: &str);
    fn error(&self, message: &str);
    fn critical(&self, message: &str);

    /// Dispatch on a runtime level.
    fn log(&self, level: LoggingLevel, message: &str) {
        match level {
            LoggingLevel::Debug => self.debug(message),
            LoggingLevel::Info => self.info(message),
            LoggingLevel::Warning => self.warning(message),
            LoggingLevel::Error => self.error(message),
            LoggingLevel::Critical => self.critical(message),
        }
    }
}

/// Stand-in logger for callers without a configured logging backend.
///
/// The threshold belongs to the instance. It is fixed at construction and
/// only changed through [`set_level`](Self::set_level), which needs `&mut
/// self`: a logger shared behind an `Arc` keeps the threshold it was built
/// with.
#[derive(Debug, Default)]
pub struct MockLogger {
    level: LoggingLevel,
    captured: Option<Mutex<Vec<(LoggingLevel, String)>>>,
}

impl MockLogger {
    /// Printing logger with the given threshold.
    pub fn new(level: LoggingLevel) -> Self {
        Self {
            level,
            captured: None,
        }
    }

    /// Logger that records messages in memory instead of printing them.
    pub fn capturing(level: LoggingLevel) -> Self {
        Self {
            level,
            captured: Some(Mutex::new(Vec::new())),
        }
    }

    pub fn level(&self) -> LoggingLevel {
        self.level
    }

    pub fn set_level(&mut self, level: LoggingLevel) {
        self.level = level;
    }

    /// Messages recorded so far. Always empty for a printing logger.
    pub fn records(&self) -> Vec<(LoggingLevel, String)> {
        self.captured
            .as_ref()
            .map(|c| c.lock().map(|r| r.clone()).unwrap_or_default())
            .unwrap_or_default()
    }

    fn emit(&self, level: LoggingLevel, message: &str) {
        if level < self.level {
            return;
        }
        match &self.captured {
            Some(captured) => {
                if let Ok(mut records) = captured.lock() {
                    records.push((level, message.to_string()));
                }
            }
            None => println!("{}: {}", level, message),
        }
    }
}

impl Logger for MockLogger {
    fn debug(&self, message: &str) {
        self.emit(LoggingLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(LoggingLevel::Info, message);
    }

    fn warning(&self, message: &str) {
        self.emit(LoggingLevel::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(LoggingLevel::Error, message);
    }

    fn critical(&self, message: &str) {
        self.emit(LoggingLevel::Critical, message);
    }
}

/// Logger backed by the `tracing` macros.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!("{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }

    fn critical(&self, message: &str) {
        tracing::error!(critical = true, "{}", message);
    }
}

/// Center `text` in a run of dashes `line_width` wide, for banner lines.
///
/// When the text is wider than the line no dashes are added.
pub fn format_text_with_dashes(text: &str, line_width: usize) -> String {
    let text_width = text.chars().count();
    let num_dashes = line_width.saturating_sub(text_width);
    let first = "-".repeat(num_dashes / 2);
    let mut second = first.clone();
    if text_width % 2 != 0 {
        second.push('-');
    }
    format!("{}{}{}", first, text, second)
}
