//! ODBC-backed Oracle database handle.
//!
//! **Requirements:**
//! - The `odbc` feature must be enabled
//! - An Oracle ODBC driver must be registered with the driver manager
//!   (Oracle Instant Client ODBC package plus unixODBC on Linux/macOS)
//!
//! Every statement opens its own connection, which is closed when dropped.
//! DDL/DML runs with autocommit off and is committed explicitly, or rolled
//! back if execution fails.

use async_trait::async_trait;
use odbc_api::buffers::TextRowSet;
use odbc_api::{ConnectionOptions, Cursor, Environment, ResultSetMetadata};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::DatabaseConfig;
use crate::error::{HelperError, Result};
use crate::logger::Logger;
use crate::target::{DatabaseHandle, QueryResult};

/// Rows fetched per ODBC round trip.
const FETCH_BATCH_ROWS: usize = 1000;

/// Upper bound for a single text cell (VARCHAR2 limit).
const MAX_CELL_BYTES: usize = 4000;

/// Oracle database reached through ODBC.
pub struct OdbcDatabase {
    env: Environment,
    connection_string: String,
    target: String,
    /// Serializes ODBC operations (ODBC is not fully thread-safe)
    conn_mutex: Mutex<()>,
}

impl OdbcDatabase {
    /// Create the handle and test that a connection can be opened.
    ///
    /// # Errors
    ///
    /// Returns a logged `HelperError::Database` if:
    /// - The ODBC environment cannot be created (driver manager not installed)
    /// - The connection to the database fails
    pub async fn connect(config: &DatabaseConfig, logger: &dyn Logger) -> Result<Self> {
        let target = config.display_target();

        let env = Environment::new().map_err(|e| {
            HelperError::database(format!(
                "Failed to create ODBC environment: {}. \
                 Install unixODBC and the Oracle ODBC driver.",
                e
            ))
            .logged(logger)
        })?;

        let db = Self {
            env,
            connection_string: config.connection_string(),
            target,
            conn_mutex: Mutex::new(()),
        };

        {
            let _guard = db.conn_mutex.lock().await;
            db.get_connection().map_err(|e| {
                HelperError::database(format!(
                    "Failed to connect to DB: {}\n{}",
                    db.target,
                    e.message()
                ))
                .logged(logger)
            })?;
        }

        logger.debug(&format!("Got DB Connection: {}", db.target));
        Ok(db)
    }

    /// Get a new ODBC connection.
    fn get_connection(&self) -> Result<odbc_api::Connection<'_>> {
        self.env
            .connect_with_connection_string(&self.connection_string, ConnectionOptions::default())
            .map_err(|e| HelperError::database(format!("ODBC connection failed: {}", e)))
    }

    /// Execute a statement inside a transaction.
    fn execute_sync(&self, sql: &str) -> Result<()> {
        let conn = self.get_connection()?;
        conn.set_autocommit(false)
            .map_err(|e| HelperError::database(format!("begin failed: {}", e)))?;

        if let Err(e) = conn.execute(sql, ()) {
            let _ = conn.rollback();
            return Err(HelperError::database(e.to_string()));
        }

        conn.commit()
            .map_err(|e| HelperError::database(format!("commit failed: {}", e)))?;
        Ok(())
    }

    /// Execute a query and collect every row as text.
    fn query_sync(&self, sql: &str) -> Result<QueryResult> {
        let conn = self.get_connection()?;

        let Some(mut cursor) = conn
            .execute(sql, ())
            .map_err(|e| HelperError::database(e.to_string()))?
        else {
            return Ok(QueryResult::default());
        };

        let columns = cursor
            .column_names()
            .map_err(|e| HelperError::database(format!("column_names failed: {}", e)))?
            .collect::<std::result::Result<Vec<String>, _>>()
            .map_err(|e| HelperError::database(format!("column_names failed: {}", e)))?;

        let buffers = TextRowSet::for_cursor(FETCH_BATCH_ROWS, &mut cursor, Some(MAX_CELL_BYTES))
            .map_err(|e| HelperError::database(format!("create buffer failed: {}", e)))?;
        let mut row_cursor = cursor
            .bind_buffer(buffers)
            .map_err(|e| HelperError::database(format!("bind buffer failed: {}", e)))?;

        let mut rows = Vec::new();
        while let Some(batch) = row_cursor
            .fetch()
            .map_err(|e| HelperError::database(format!("fetch failed: {}", e)))?
        {
            for row in 0..batch.num_rows() {
                let cells = (0..batch.num_cols())
                    .map(|col| {
                        batch
                            .at(col, row)
                            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
                    })
                    .collect();
                rows.push(cells);
            }
        }

        Ok(QueryResult::new(columns, rows))
    }
}

#[async_trait]
impl DatabaseHandle for OdbcDatabase {
    async fn execute(&self, sql: &str) -> Result<()> {
        let _guard = self.conn_mutex.lock().await;
        debug!("ODBC execute on {}: {}", self.target, sql);
        self.execute_sync(sql)
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        let _guard = self.conn_mutex.lock().await;
        debug!("ODBC query on {}: {}", self.target, sql);
        self.query_sync(sql)
    }
}
