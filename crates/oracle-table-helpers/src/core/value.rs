//! Cell values and declared column types of an in-memory dataset.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Substring marking a text cell that already holds an Oracle date
/// constructor such as `to_date('19/OCT/26 09:00:00','dd/mon/yy hh24:mi:ss')`.
pub const DATE_LITERAL_MARKER: &str = "to_date(";

/// Declared storage type of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    DateTime,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Text => "text",
            ColumnType::Int32 => "int32",
            ColumnType::Int64 => "int64",
            ColumnType::Float32 => "float32",
            ColumnType::Float64 => "float64",
            ColumnType::DateTime => "datetime",
        };
        f.write_str(name)
    }
}

/// A single, possibly null, dataset cell.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Text(String),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Check if this value is NULL.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Text content, if this is a text cell.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// True for text cells carrying a pre-formatted date expression.
    #[must_use]
    pub fn is_date_literal(&self) -> bool {
        self.as_text()
            .is_some_and(|s| s.contains(DATE_LITERAL_MARKER))
    }

    /// Column type this value can be stored in. `None` for NULL, which fits
    /// any column.
    #[must_use]
    pub fn column_type(&self) -> Option<ColumnType> {
        match self {
            CellValue::Null => None,
            CellValue::Text(_) => Some(ColumnType::Text),
            CellValue::Int32(_) => Some(ColumnType::Int32),
            CellValue::Int64(_) => Some(ColumnType::Int64),
            CellValue::Float32(_) => Some(ColumnType::Float32),
            CellValue::Float64(_) => Some(ColumnType::Float64),
            CellValue::DateTime(_) => Some(ColumnType::DateTime),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Int32(v) => write!(f, "{}", v),
            CellValue::Int64(v) => write!(f, "{}", v),
            CellValue::Float32(v) => write!(f, "{}", v),
            CellValue::Float64(v) => write!(f, "{}", v),
            CellValue::DateTime(v) => write!(f, "{}", v.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int32(v)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int64(v)
    }
}

impl From<f32> for CellValue {
    fn from(v: f32) -> Self {
        CellValue::Float32(v)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float64(v)
    }
}

impl From<NaiveDateTime> for CellValue {
    fn from(v: NaiveDateTime) -> Self {
        CellValue::DateTime(v)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Null)
    }
}
