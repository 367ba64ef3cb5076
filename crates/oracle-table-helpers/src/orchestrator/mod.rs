//! Table lifecycle orchestration.
//!
//! [`TableManager`] ties schema inference, query generation and the
//! database handle together. Every operation awaits each statement before
//! issuing the next one, so uploads run strictly batch after batch.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::UploadConfig;
use crate::core::identifier::validate_identifier;
use crate::core::{
    CellValue, InferenceOptions, SchemaDiff, TableSchema, TabularDataset, TrailingBatchPolicy,
};
use crate::dialect::{
    check_existence_query, column_names_query, create_table_query, drop_table_query,
    generate_insert_query, row_count_query, table_to_table_insert_query, truncate_table_query,
    update_column_by_value_query,
};
use crate::error::{HelperError, Result};
use crate::logger::{Logger, MockLogger};
use crate::target::{DatabaseHandle, QueryResult};

/// Outcome of [`TableManager::create_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The table did not exist and was created.
    Created,
    /// The table already existed with the same columns.
    AlreadyMatches,
}

/// Result of an upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadSummary {
    /// Target table.
    pub table: String,

    /// INSERT statements executed.
    pub batches: usize,

    /// Rows sent to the database.
    pub rows: usize,
}

impl UploadSummary {
    /// Convert summary to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs table operations against one database handle.
pub struct TableManager<D: DatabaseHandle> {
    db: D,
    logger: Arc<dyn Logger>,
    inference: InferenceOptions,
    trailing_batch_policy: TrailingBatchPolicy,
    partition_size: usize,
    allow_nulls: bool,
}

impl<D: DatabaseHandle> TableManager<D> {
    /// Manager logging through a [`MockLogger`] at INFO.
    pub fn new(db: D) -> Self {
        let upload = UploadConfig::default();
        Self {
            db,
            logger: Arc::new(MockLogger::default()),
            inference: InferenceOptions::default(),
            trailing_batch_policy: upload.trailing_batch_policy,
            partition_size: upload.partition_size,
            allow_nulls: upload.allow_nulls,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_inference_options(mut self, options: InferenceOptions) -> Self {
        self.inference = options;
        self
    }

    pub fn with_trailing_batch_policy(mut self, policy: TrailingBatchPolicy) -> Self {
        self.trailing_batch_policy = policy;
        self
    }

    /// Apply every setting of an upload config. `partition_size` and
    /// `allow_nulls` become the defaults of [`upload`](Self::upload) and
    /// [`create_configured_table`](Self::create_configured_table).
    pub fn with_upload_config(mut self, upload: &UploadConfig) -> Self {
        self.partition_size = upload.partition_size;
        self.allow_nulls = upload.allow_nulls;
        self.with_inference_options(InferenceOptions {
            empty_column_policy: upload.empty_column_policy,
        })
        .with_trailing_batch_policy(upload.trailing_batch_policy)
    }

    pub fn database(&self) -> &D {
        &self.db
    }

    pub fn logger(&self) -> &dyn Logger {
        self.logger.as_ref()
    }

    /// Run a SELECT. Logs `success_message` at DEBUG on success; on failure
    /// logs `error_message` and returns a logged database error.
    pub async fn execute_select(
        &self,
        query: &str,
        success_message: &str,
        error_message: &str,
    ) -> Result<QueryResult> {
        match self.db.query(query).await {
            Ok(result) => {
                self.logger.debug(success_message);
                Ok(result)
            }
            Err(e) => Err(self.database_failure(error_message, e)),
        }
    }

    /// Run a DDL/DML statement. Logging as for [`execute_select`](Self::execute_select).
    pub async fn execute_action(
        &self,
        query: &str,
        success_message: &str,
        error_message: &str,
    ) -> Result<()> {
        match self.db.execute(query).await {
            Ok(()) => {
                self.logger.debug(success_message);
                Ok(())
            }
            Err(e) => Err(self.database_failure(error_message, e)),
        }
    }

    /// Whether `table` exists.
    ///
    /// The missing-table database error means `false`; any other failure
    /// is returned as a logged database error.
    pub async fn table_exists(&self, table: &str) -> Result<bool> {
        self.check_table_name(table)?;
        match self.db.query(&check_existence_query(table)).await {
            Ok(_) => {
                self.logger.debug(&format!("Table '{}' exists.", table));
                Ok(true)
            }
            Err(e) if e.is_table_missing() => {
                self.logger
                    .debug(&format!("Table '{}' does not exist.", table));
                Ok(false)
            }
            Err(e) => Err(self.database_failure(
                &format!("Failed to check existence of table '{}'.", table),
                e,
            )),
        }
    }

    /// Column names of `table` in database order, or `None` if absent.
    pub async fn column_names(&self, table: &str) -> Result<Option<Vec<String>>> {
        if !self.table_exists(table).await? {
            return Ok(None);
        }

        let result = self
            .execute_select(
                &column_names_query(table),
                &format!("Fetched column names of table '{}'.", table),
                &format!("Failed to fetch column names of table '{}'.", table),
            )
            .await?;

        self.logger
            .debug(&format!("Column Names: {}", result.columns.join(", ")));
        Ok(Some(result.columns))
    }

    /// Row count of `table`, or `None` if absent.
    pub async fn row_count(&self, table: &str) -> Result<Option<i64>> {
        if !self.table_exists(table).await? {
            return Ok(None);
        }

        let result = self
            .execute_select(
                &row_count_query(table),
                &format!("Counted rows of table '{}'.", table),
                &format!("Failed to count rows of table '{}'.", table),
            )
            .await?;

        let count = result
            .scalar()
            .and_then(|s| s.trim().parse::<i64>().ok())
            .ok_or_else(|| {
                HelperError::data(format!(
                    "Row count of table '{}' is not an integer: {:?}",
                    table, result.rows
                ))
                .logged(self.logger())
            })?;

        Ok(Some(count))
    }

    /// Create `table` from the dataset's inferred schema.
    ///
    /// An existing table is left alone when its columns match the dataset's
    /// (sanitized, case-insensitive). A mismatch is a logged data error
    /// naming the differing columns.
    pub async fn create_table(
        &self,
        dataset: &TabularDataset,
        table: &str,
        allow_nulls: bool,
    ) -> Result<CreateOutcome> {
        self.check_table_name(table)?;
        if dataset.columns().is_empty() {
            return Err(HelperError::argument(format!(
                "Cannot create table '{}' from a dataset without columns",
                table
            ))
            .logged(self.logger()));
        }

        let schema = TableSchema::infer(dataset, table, &self.inference);

        let existing = match self.column_names(table).await? {
            Some(columns) => columns,
            None => {
                self.execute_action(
                    &create_table_query(&schema, allow_nulls),
                    &format!("Created table '{}'.", table),
                    &format!("Failed to create table '{}'.", table),
                )
                .await?;
                return Ok(CreateOutcome::Created);
            }
        };

        let diff = SchemaDiff::compare(&existing, schema.column_names());
        if !diff.is_match() {
            return Err(HelperError::data(format!(
                "Local data columns do not match DB columns: {:?} for table '{}'",
                diff.symmetric_difference(),
                table
            ))
            .logged(self.logger()));
        }

        self.logger.debug(&format!(
            "Column names on DB match those of local data for table '{}'.",
            table
        ));
        Ok(CreateOutcome::AlreadyMatches)
    }

    /// Insert every row of `dataset` into `table`, `partition_size` rows per
    /// INSERT ALL statement.
    ///
    /// Batches commit independently: a failure leaves earlier batches in
    /// place and returns a logged database error.
    pub async fn upload_data(
        &self,
        dataset: &TabularDataset,
        partition_size: usize,
        table: &str,
    ) -> Result<UploadSummary> {
        self.check_table_name(table)?;
        if dataset.columns().is_empty() {
            return Err(HelperError::argument(format!(
                "Cannot upload a dataset without columns to '{}'",
                table
            ))
            .logged(self.logger()));
        }

        let batches = dataset
            .batches(partition_size, self.trailing_batch_policy)
            .map_err(|e| e.logged(self.logger()))?;

        let mut summary = UploadSummary {
            table: table.to_string(),
            batches: 0,
            rows: 0,
        };

        for batch in &batches {
            let query =
                generate_insert_query(batch, table).map_err(|e| e.logged(self.logger()))?;
            // Inclusive row indices; an empty batch reports its start twice
            let first = batch.start();
            let last = batch.end().max(first + 1) - 1;
            self.execute_action(
                &query,
                &format!("Uploaded rows: {} - {} to '{}'", first, last, table),
                &format!("Failed to upload rows: {} - {} to '{}'", first, last, table),
            )
            .await?;

            summary.batches += 1;
            summary.rows += batch.len();
        }

        self.logger.info(&format!(
            "Uploaded {} rows in {} batches to '{}'.",
            summary.rows, summary.batches, table
        ));
        Ok(summary)
    }

    /// [`create_table`](Self::create_table) with the configured `allow_nulls`.
    pub async fn create_configured_table(
        &self,
        dataset: &TabularDataset,
        table: &str,
    ) -> Result<CreateOutcome> {
        self.create_table(dataset, table, self.allow_nulls).await
    }

    /// [`upload_data`](Self::upload_data) with the configured partition size.
    pub async fn upload(&self, dataset: &TabularDataset, table: &str) -> Result<UploadSummary> {
        self.upload_data(dataset, self.partition_size, table).await
    }

    /// Remove every row of `table`. No-op when the table is absent.
    pub async fn truncate_table(&self, table: &str) -> Result<()> {
        if !self.table_exists(table).await? {
            return Ok(());
        }
        self.execute_action(
            &truncate_table_query(table),
            &format!("Truncated table '{}'.", table),
            &format!("Failed to truncate table '{}'.", table),
        )
        .await
    }

    /// Drop `table` with PURGE. No-op when the table is absent.
    pub async fn drop_table(&self, table: &str) -> Result<()> {
        if !self.table_exists(table).await? {
            return Ok(());
        }
        self.execute_action(
            &drop_table_query(table),
            &format!("Dropped table '{}'.", table),
            &format!("Failed to drop table '{}'.", table),
        )
        .await
    }

    /// Set `column` to `new_value` wherever it equals `old_value`.
    pub async fn update_column_by_value(
        &self,
        table: &str,
        column: &str,
        old_value: &CellValue,
        new_value: &CellValue,
    ) -> Result<()> {
        self.check_table_name(table)?;
        validate_identifier(column).map_err(|e| e.logged(self.logger()))?;

        if old_value.is_null() {
            self.logger.warning(&format!(
                "'{}' = NULL matches no rows; nothing in '{}' will be updated.",
                column, table
            ));
        }

        let query = update_column_by_value_query(table, column, old_value, new_value);
        self.execute_action(
            &query,
            &format!(
                "Updated rows in '{}' table: '{}'={} -> '{}'={}.",
                table,
                column,
                old_value,
                column,
                new_value
            ),
            &format!(
                "Failed to update rows in '{}' table: '{}'={} -> '{}'={}.",
                table,
                column,
                old_value,
                column,
                new_value
            ),
        )
        .await
    }

    /// Append every row of `source` to `target`.
    pub async fn copy_table_data(&self, source: &str, target: &str) -> Result<()> {
        self.check_table_name(source)?;
        self.check_table_name(target)?;
        self.execute_action(
            &table_to_table_insert_query(source, target),
            &format!("Copied rows from '{}' to '{}'.", source, target),
            &format!("Failed to copy rows from '{}' to '{}'.", source, target),
        )
        .await
    }

    fn check_table_name(&self, table: &str) -> Result<()> {
        validate_identifier(table).map_err(|e| e.logged(self.logger()))
    }

    fn database_failure(&self, message: &str, cause: HelperError) -> HelperError {
        self.logger.error(message);
        HelperError::database(cause.message()).logged(self.logger())
    }
}
