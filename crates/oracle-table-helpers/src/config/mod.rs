//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl DatabaseConfig {
    /// Build an ODBC connection string for the Oracle driver.
    ///
    /// An explicit `connection_string` in the config wins over the
    /// individual fields.
    pub fn connection_string(&self) -> String {
        if let Some(ref explicit) = self.connection_string {
            return explicit.clone();
        }
        format!(
            "Driver={{{}}};DBQ={}:{}/{};UID={};PWD={};",
            self.driver, self.host, self.port, self.service_name, self.user, self.password
        )
    }

    /// Connection target without credentials, for log messages.
    pub fn display_target(&self) -> String {
        format!("{}:{}/{}", self.host, self.port, self.service_name)
    }
}
