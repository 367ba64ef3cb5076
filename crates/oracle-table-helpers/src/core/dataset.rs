//! In-memory tabular dataset and row batching.
//!
//! A [`TabularDataset`] is an ordered list of named, typed columns of equal
//! length. Uploads walk it in contiguous [`RowBatch`] views produced by
//! [`TabularDataset::batches`]; batches borrow the dataset and never copy
//! cells.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::core::value::{CellValue, ColumnType};
use crate::error::{HelperError, Result};

/// One named column of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct DataColumn {
    name: String,
    column_type: ColumnType,
    values: Vec<CellValue>,
}

impl DataColumn {
    /// Build a column, checking that every non-null cell matches
    /// `column_type`.
    pub fn new<I, V>(name: impl Into<String>, column_type: ColumnType, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<CellValue>,
    {
        let name = name.into();
        let values: Vec<CellValue> = values.into_iter().map(Into::into).collect();

        for (row, value) in values.iter().enumerate() {
            if let Some(actual) = value.column_type() {
                if actual != column_type {
                    return Err(HelperError::argument(format!(
                        "column '{}' is declared {} but row {} holds a {} value",
                        name, column_type, row, actual
                    )));
                }
            }
        }

        Ok(Self {
            name,
            column_type,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_type(&self) -> ColumnType {
        self.column_type
    }

    pub fn values(&self) -> &[CellValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Ordered set of equal-length columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TabularDataset {
    columns: Vec<DataColumn>,
}

impl TabularDataset {
    /// Build a dataset; all columns must hold the same number of rows.
    pub fn new(columns: Vec<DataColumn>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(HelperError::argument(format!(
                    "column '{}' has {} rows, expected {} (from column '{}')",
                    bad.name(),
                    bad.len(),
                    expected,
                    first.name()
                )));
            }
        }
        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(DataColumn::name).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, DataColumn::len)
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Cells of one row in column order.
    pub fn row(&self, index: usize) -> Option<Vec<&CellValue>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    /// View over `rows`, clamped to the dataset.
    pub fn batch(&self, rows: Range<usize>) -> RowBatch<'_> {
        let end = rows.end.min(self.row_count());
        let start = rows.start.min(end);
        RowBatch {
            dataset: self,
            rows: start..end,
        }
    }

    /// Split the dataset into consecutive batches of `partition_size` rows.
    pub fn batches(
        &self,
        partition_size: usize,
        policy: TrailingBatchPolicy,
    ) -> Result<Vec<RowBatch<'_>>> {
        Ok(partition_rows(self.row_count(), partition_size, policy)?
            .into_iter()
            .map(|rows| self.batch(rows))
            .collect())
    }
}

/// Borrowed contiguous row range of a dataset.
#[derive(Debug, Clone)]
pub struct RowBatch<'a> {
    dataset: &'a TabularDataset,
    rows: Range<usize>,
}

impl<'a> RowBatch<'a> {
    pub fn dataset(&self) -> &'a TabularDataset {
        self.dataset
    }

    /// First row index (inclusive).
    pub fn start(&self) -> usize {
        self.rows.start
    }

    /// Last row index (exclusive).
    pub fn end(&self) -> usize {
        self.rows.end
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows of the batch, each as cells in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&'a CellValue>> + '_ {
        let dataset = self.dataset;
        self.rows
            .clone()
            .map(move |i| dataset.columns.iter().map(|c| &c.values[i]).collect())
    }
}

/// Whether an upload always finishes with a final INSERT statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TrailingBatchPolicy {
    /// Never issue an INSERT without rows.
    #[default]
    SkipEmpty,
    /// Always issue the final remainder INSERT, even when it holds no rows.
    /// This only happens for an empty dataset and keeps statement counts
    /// identical to older loaders.
    AlwaysIssue,
}

/// Row ranges covering `0..row_count` in chunks of `partition_size`.
pub fn partition_rows(
    row_count: usize,
    partition_size: usize,
    policy: TrailingBatchPolicy,
) -> Result<Vec<Range<usize>>> {
    if partition_size == 0 {
        return Err(HelperError::argument("upload partition size must be at least 1"));
    }

    let mut ranges = Vec::with_capacity(row_count / partition_size + 1);
    let mut start = 0;
    while start + partition_size < row_count {
        ranges.push(start..start + partition_size);
        start += partition_size;
    }

    // Remainder, which is a full partition when row_count divides evenly
    if start < row_count || policy == TrailingBatchPolicy::AlwaysIssue {
        ranges.push(start..row_count);
    }

    Ok(ranges)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TabularDataset {
        TabularDataset::new(vec![
            DataColumn::new("ID", ColumnType::Int64, vec![1i64, 2, 3]).unwrap(),
            DataColumn::new("NAME", ColumnType::Text, vec![Some("a"), None, Some("c")]).unwrap(),
        ])
        .unwrap()
    }

    fn sizes(ranges: &[Range<usize>]) -> Vec<usize> {
        ranges.iter().map(|r| r.len()).collect()
    }

    #[test]
    fn test_column_type_mismatch_rejected() {
        let err = DataColumn::new(
            "ID",
            ColumnType::Int64,
            vec![CellValue::Int64(1), CellValue::from("two")],
        )
        .unwrap_err();
        assert!(matches!(err, HelperError::Argument(_)));
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_ragged_columns_rejected() {
        let result = TabularDataset::new(vec![
            DataColumn::new("A", ColumnType::Int32, vec![1i32, 2]).unwrap(),
            DataColumn::new("B", ColumnType::Int32, vec![1i32]).unwrap(),
        ]);
        assert!(matches!(result, Err(HelperError::Argument(_))));
    }

    #[test]
    fn test_row_access() {
        let data = sample();
        assert_eq!(data.row_count(), 3);
        assert_eq!(data.column_names(), vec!["ID", "NAME"]);
        assert_eq!(
            data.row(1).unwrap(),
            vec![&CellValue::Int64(2), &CellValue::Null]
        );
        assert!(data.row(3).is_none());
    }

    #[test]
    fn test_empty_dataset() {
        let data = TabularDataset::new(vec![]).unwrap();
        assert_eq!(data.row_count(), 0);
        assert!(data.is_empty());
    }

    #[test]
    fn test_partition_with_remainder() {
        let ranges = partition_rows(1000, 300, TrailingBatchPolicy::SkipEmpty).unwrap();
        assert_eq!(sizes(&ranges), vec![300, 300, 300, 100]);
        assert_eq!(ranges[3], 900..1000);
    }

    #[test]
    fn test_partition_evenly_divisible() {
        for policy in [TrailingBatchPolicy::SkipEmpty, TrailingBatchPolicy::AlwaysIssue] {
            let ranges = partition_rows(900, 300, policy).unwrap();
            assert_eq!(sizes(&ranges), vec![300, 300, 300]);
        }
    }

    #[test]
    fn test_partition_empty_dataset() {
        assert!(partition_rows(0, 300, TrailingBatchPolicy::SkipEmpty)
            .unwrap()
            .is_empty());
        assert_eq!(
            partition_rows(0, 300, TrailingBatchPolicy::AlwaysIssue).unwrap(),
            vec![0..0]
        );
    }

    #[test]
    fn test_partition_larger_than_dataset() {
        let ranges = partition_rows(5, 300, TrailingBatchPolicy::SkipEmpty).unwrap();
        assert_eq!(ranges, vec![0..5]);
    }

    #[test]
    fn test_partition_size_zero() {
        assert!(matches!(
            partition_rows(10, 0, TrailingBatchPolicy::SkipEmpty),
            Err(HelperError::Argument(_))
        ));
    }

    #[test]
    fn test_batches_borrow_rows() {
        let data = sample();
        let batches = data.batches(2, TrailingBatchPolicy::SkipEmpty).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!((batches[0].start(), batches[0].end()), (0, 2));
        assert_eq!((batches[1].start(), batches[1].end()), (2, 3));

        let last: Vec<Vec<&CellValue>> = batches[1].rows().collect();
        assert_eq!(
            last,
            vec![vec![&CellValue::Int64(3), &CellValue::Text("c".to_string())]]
        );
    }

    #[test]
    fn test_batch_clamps_range() {
        let data = sample();
        let batch = data.batch(2..10);
        assert_eq!(batch.len(), 1);
        assert!(data.batch(5..9).is_empty());
    }
}
