//! Error types for the table helpers.

use thiserror::Error;

use crate::logger::Logger;

/// Sentinel line written after every logged error.
pub const END_OF_ERROR: &str = "----------END:ERROR----------";

/// Substring Oracle reports when a table is absent (ORA-00942).
pub const TABLE_MISSING_MARKER: &str = "table or view does not exist";

/// Main error type for table helper operations.
#[derive(Error, Debug)]
pub enum HelperError {
    /// Invalid caller input (bad identifier, zero partition size, ...).
    #[error("The error in the arguments is as follows: {0}")]
    Argument(String),

    /// Dataset or schema mismatch.
    #[error("The error in the data is as follows: {0}")]
    Data(String),

    /// Any failure reported by the database handle.
    #[error("The error in the database is as follows: {0}")]
    Database(String),

    /// External command failed to spawn or exited unsuccessfully.
    #[error("The error encountered when using subprocess is as follows: {0}")]
    Subprocess(String),

    /// Configuration error (invalid YAML, missing fields, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (log folder, config file)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl HelperError {
    /// Create an Argument error.
    pub fn argument(message: impl Into<String>) -> Self {
        HelperError::Argument(message.into())
    }

    /// Create a Data error.
    pub fn data(message: impl Into<String>) -> Self {
        HelperError::Data(message.into())
    }

    /// Create a Database error.
    pub fn database(message: impl Into<String>) -> Self {
        HelperError::Database(message.into())
    }

    /// Create a Subprocess error.
    pub fn subprocess(message: impl Into<String>) -> Self {
        HelperError::Subprocess(message.into())
    }

    /// The bare message carried by the error, without the kind prefix.
    pub fn message(&self) -> String {
        match self {
            HelperError::Argument(m)
            | HelperError::Data(m)
            | HelperError::Database(m)
            | HelperError::Subprocess(m)
            | HelperError::Config(m) => m.clone(),
            HelperError::Io(e) => e.to_string(),
            HelperError::Yaml(e) => e.to_string(),
            HelperError::Json(e) => e.to_string(),
        }
    }

    /// Write the message and the end-of-error sentinel to `logger` at ERROR
    /// severity, then hand the error back for propagation.
    pub fn logged(self, logger: &dyn Logger) -> Self {
        logger.error(&self.message());
        logger.error(END_OF_ERROR);
        self
    }

    /// True for the database error Oracle raises against an absent table.
    pub fn is_table_missing(&self) -> bool {
        matches!(self, HelperError::Database(m) if m.contains(TABLE_MISSING_MARKER))
    }
}

/// Result type alias for table helper operations.
pub type Result<T> = std::result::Result<T, HelperError>;
