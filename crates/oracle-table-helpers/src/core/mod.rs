//! Core data model for table uploads.
//!
//! - [`value`]: cell values and declared column types
//! - [`dataset`]: the in-memory dataset and its row batches
//! - [`identifier`]: identifier sanitization and validation
//! - [`schema`]: inferred column specs and schema comparison

pub mod dataset;
pub mod identifier;
pub mod schema;
pub mod value;

pub use dataset::{partition_rows, DataColumn, RowBatch, TabularDataset, TrailingBatchPolicy};
pub use schema::{
    ColumnSpec, EmptyColumnPolicy, InferenceOptions, InferredType, SchemaDiff, TableSchema,
};
pub use value::{CellValue, ColumnType, DATE_LITERAL_MARKER};
