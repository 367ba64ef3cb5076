//! # oracle-table-helpers
//!
//! Table lifecycle helpers for loading in-memory tabular data into Oracle.
//!
//! The crate covers:
//!
//! - **Schema inference** from typed dataset columns to Oracle column types
//! - **Query generation** for existence checks, DDL and multi-row `INSERT ALL`
//! - **Table orchestration** (create, compare, upload, truncate, drop) over a
//!   pluggable [`DatabaseHandle`]
//! - **Logging** through an injectable [`Logger`], with a file-backed
//!   `tracing` setup
//!
//! ## Example
//!
//! ```rust
//! use oracle_table_helpers::core::{InferenceOptions, TableSchema};
//! use oracle_table_helpers::dialect::create_table_query;
//! use oracle_table_helpers::{CellValue, ColumnType, DataColumn, TabularDataset};
//!
//! let dataset = TabularDataset::new(vec![
//!     DataColumn::new("ID", ColumnType::Int64, vec![CellValue::Int64(1)]).unwrap(),
//!     DataColumn::new("City Name", ColumnType::Text, vec![CellValue::from("New York")]).unwrap(),
//! ])
//! .unwrap();
//!
//! let schema = TableSchema::infer(&dataset, "CITIES", &InferenceOptions::default());
//! assert_eq!(
//!     create_table_query(&schema, true),
//!     "CREATE TABLE CITIES( ID NUMBER, City_Name VARCHAR2(200) )"
//! );
//! ```
//!
//! With the `odbc` feature, [`OdbcDatabase`](target::OdbcDatabase) connects
//! to Oracle and a [`TableManager`] runs the operations against it.

pub mod command;
pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod logger;
pub mod logging;
pub mod orchestrator;
pub mod target;
pub mod typemap;

// Re-exports for convenient access
pub use command::run_external_command;
pub use config::{Config, DatabaseConfig, LoggingConfig, UploadConfig};
pub use crate::core::{CellValue, ColumnType, DataColumn, TabularDataset};
pub use error::{HelperError, Result};
pub use logger::{Logger, LoggingLevel, MockLogger, TracingLogger};
pub use logging::{setup_logging, setup_logging_from_config};
pub use orchestrator::{CreateOutcome, TableManager, UploadSummary};
pub use target::{DatabaseHandle, QueryResult};
