//! Database handle abstraction.
//!
//! The table operations never hold a connection themselves. Each call on a
//! [`DatabaseHandle`] acquires a connection, runs a single statement and
//! releases the connection before returning, on success and on error alike.

#[cfg(feature = "odbc")]
pub mod odbc;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[cfg(feature = "odbc")]
pub use odbc::OdbcDatabase;

/// Trait for the database a table manager works against.
#[async_trait]
pub trait DatabaseHandle: Send + Sync {
    /// Run a DDL/DML statement in its own transaction and commit it.
    async fn execute(&self, sql: &str) -> Result<()>;

    /// Run a SELECT and return its column names and rows.
    async fn query(&self, sql: &str) -> Result<QueryResult>;

    /// Verify a connection can be opened.
    async fn check_connection(&self) -> Result<()> {
        self.query("SELECT 1 FROM DUAL").await.map(|_| ())
    }
}

#[async_trait]
impl<T> DatabaseHandle for Arc<T>
where
    T: DatabaseHandle + ?Sized,
{
    async fn execute(&self, sql: &str) -> Result<()> {
        (**self).execute(sql).await
    }

    async fn query(&self, sql: &str) -> Result<QueryResult> {
        (**self).query(sql).await
    }

    async fn check_connection(&self) -> Result<()> {
        (**self).check_connection().await
    }
}

/// Result of a SELECT: column names plus rows of nullable text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl QueryResult {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self { columns, rows }
    }

    /// Result with columns but no rows, as returned by a metadata probe.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// First column of the first row.
    pub fn scalar(&self) -> Option<&str> {
        self.rows.first()?.first()?.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
