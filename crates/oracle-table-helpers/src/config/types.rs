//! Configuration type definitions.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{EmptyColumnPolicy, TrailingBatchPolicy};
use crate::logger::LoggingLevel;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Oracle connection settings.
    pub database: DatabaseConfig,

    /// Log file settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Upload behavior.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Oracle database configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// ODBC driver name as registered with the driver manager.
    #[serde(default = "default_driver")]
    pub driver: String,

    /// Database host.
    #[serde(default)]
    pub host: String,

    /// Listener port (default: 1521).
    #[serde(default = "default_oracle_port")]
    pub port: u16,

    /// Service name.
    #[serde(default)]
    pub service_name: String,

    /// Username.
    #[serde(default)]
    pub user: String,

    /// Password.
    #[serde(default)]
    pub password: String,

    /// Full ODBC connection string, overriding the fields above.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("driver", &self.driver)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("service_name", &self.service_name)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field(
                "connection_string",
                &self.connection_string.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Log file configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Folder holding log files (created if missing).
    #[serde(default = "default_log_folder")]
    pub folder: PathBuf,

    /// Log file name without the `.log` extension.
    #[serde(default = "default_log_name")]
    pub name: String,

    /// Minimum level written to the file.
    #[serde(default)]
    pub level: LoggingLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            folder: default_log_folder(),
            name: default_log_name(),
            level: LoggingLevel::default(),
        }
    }
}

/// Upload and table-creation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Rows per INSERT ALL statement (default: 500).
    #[serde(default = "default_partition_size")]
    pub partition_size: usize,

    /// Allow NULLs in created tables (default: true).
    #[serde(default = "default_true")]
    pub allow_nulls: bool,

    /// How a text column without any non-null value is typed.
    #[serde(default)]
    pub empty_column_policy: EmptyColumnPolicy,

    /// Whether an empty final batch still issues an INSERT.
    #[serde(default)]
    pub trailing_batch_policy: TrailingBatchPolicy,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            partition_size: default_partition_size(),
            allow_nulls: true,
            empty_column_policy: EmptyColumnPolicy::default(),
            trailing_batch_policy: TrailingBatchPolicy::default(),
        }
    }
}

fn default_driver() -> String {
    "Oracle ODBC Driver".to_string()
}

fn default_oracle_port() -> u16 {
    1521
}

fn default_log_folder() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_name() -> String {
    "oracle_table_helpers".to_string()
}

fn default_partition_size() -> usize {
    500
}

fn default_true() -> bool {
    true
}
