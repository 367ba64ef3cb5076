//! Configuration validation.

use super::Config;
use crate::error::{HelperError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // A full connection string carries its own host and credentials
    if config.database.connection_string.is_none() {
        if config.database.host.is_empty() {
            return Err(HelperError::Config("database.host is required".into()));
        }
        if config.database.service_name.is_empty() {
            return Err(HelperError::Config(
                "database.service_name is required".into(),
            ));
        }
        if config.database.user.is_empty() {
            return Err(HelperError::Config("database.user is required".into()));
        }
        if config.database.port == 0 {
            return Err(HelperError::Config("database.port must be non-zero".into()));
        }
    }

    if config.logging.name.trim().is_empty() {
        return Err(HelperError::Config("logging.name cannot be empty".into()));
    }

    if config.upload.partition_size == 0 {
        return Err(HelperError::Config(
            "upload.partition_size must be at least 1".into(),
        ));
    }

    Ok(())
}
