//! Column specifications inferred from a dataset, and schema comparison.
//!
//! Inference runs once per operation: [`TableSchema::infer`] turns the
//! declared column types of a [`TabularDataset`] into [`ColumnSpec`]s with
//! sanitized names. The CREATE TABLE generator and the schema check both
//! consume the result instead of re-inspecting the dataset.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::core::dataset::{DataColumn, TabularDataset};
use crate::core::identifier::{comparison_key, sanitize_identifier};
use crate::core::value::ColumnType;
use crate::typemap::oracle_type;

/// Column type after inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    Text,
    Int32,
    Int64,
    Float32,
    Float64,
    DateTime,
    /// Text column whose values are all `to_date(...)` expressions.
    DateLikeText,
}

impl InferredType {
    /// Oracle column type for this inferred type.
    pub fn sql_type(&self) -> &'static str {
        oracle_type(*self)
    }
}

impl From<ColumnType> for InferredType {
    fn from(t: ColumnType) -> Self {
        match t {
            ColumnType::Text => InferredType::Text,
            ColumnType::Int32 => InferredType::Int32,
            ColumnType::Int64 => InferredType::Int64,
            ColumnType::Float32 => InferredType::Float32,
            ColumnType::Float64 => InferredType::Float64,
            ColumnType::DateTime => InferredType::DateTime,
        }
    }
}

/// How a text column with no non-null values is typed.
///
/// Such a column satisfies "every value is a date literal" vacuously.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EmptyColumnPolicy {
    /// Keep the declared type (VARCHAR2 for text).
    #[default]
    BaseType,
    /// Treat the column as date-like and create it as DATE.
    DateLike,
}

/// Options for [`TableSchema::infer`].
#[derive(Debug, Clone, Copy, Default)]
pub struct InferenceOptions {
    pub empty_column_policy: EmptyColumnPolicy,
}

/// A sanitized column name with its inferred type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub inferred: InferredType,
}

impl ColumnSpec {
    /// Infer the spec of one dataset column.
    pub fn infer(column: &DataColumn, options: &InferenceOptions) -> Self {
        let base = InferredType::from(column.column_type());
        let inferred = if base == InferredType::Text {
            let mut non_null = column.values().iter().filter(|v| !v.is_null()).peekable();
            if non_null.peek().is_none() {
                match options.empty_column_policy {
                    EmptyColumnPolicy::BaseType => base,
                    EmptyColumnPolicy::DateLike => InferredType::DateLikeText,
                }
            } else if non_null.all(|v| v.is_date_literal()) {
                InferredType::DateLikeText
            } else {
                base
            }
        } else {
            base
        };

        Self {
            name: sanitize_identifier(column.name()),
            inferred,
        }
    }

    /// Oracle column type.
    pub fn sql_type(&self) -> &'static str {
        self.inferred.sql_type()
    }
}

/// Ordered column specs for one table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table: String,
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Run the inference pass over every column of `dataset`.
    pub fn infer(dataset: &TabularDataset, table: &str, options: &InferenceOptions) -> Self {
        Self {
            table: table.to_string(),
            columns: dataset
                .columns()
                .iter()
                .map(|c| ColumnSpec::infer(c, options))
                .collect(),
        }
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Column-set difference between an existing table and local data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SchemaDiff {
    /// Comparison keys present on the database table only.
    pub only_in_database: BTreeSet<String>,
    /// Comparison keys present in the local data only.
    pub only_in_dataset: BTreeSet<String>,
}

impl SchemaDiff {
    /// Compare column names as case-insensitive sets after sanitization.
    pub fn compare<D, L>(database_columns: D, dataset_columns: L) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        L: IntoIterator,
        L::Item: AsRef<str>,
    {
        let db: BTreeSet<String> = database_columns
            .into_iter()
            .map(|c| comparison_key(c.as_ref()))
            .collect();
        let local: BTreeSet<String> = dataset_columns
            .into_iter()
            .map(|c| comparison_key(c.as_ref()))
            .collect();

        Self {
            only_in_database: db.difference(&local).cloned().collect(),
            only_in_dataset: local.difference(&db).cloned().collect(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.only_in_database.is_empty() && self.only_in_dataset.is_empty()
    }

    /// All mismatched names, sorted.
    pub fn symmetric_difference(&self) -> Vec<String> {
        self.only_in_database
            .union(&self.only_in_dataset)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::CellValue;

    const CREATED: &str = "to_date('19/OCT/26 09:00:00','dd/mon/yy hh24:mi:ss')";

    fn text_column(name: &str, values: Vec<Option<&str>>) -> DataColumn {
        DataColumn::new(name, ColumnType::Text, values).unwrap()
    }

    #[test]
    fn test_infer_base_types() {
        let data = TabularDataset::new(vec![
            DataColumn::new("id", ColumnType::Int32, vec![1i32]).unwrap(),
            DataColumn::new("big", ColumnType::Int64, vec![1i64]).unwrap(),
            DataColumn::new("ratio", ColumnType::Float32, vec![0.5f32]).unwrap(),
            DataColumn::new("score", ColumnType::Float64, vec![0.5f64]).unwrap(),
            DataColumn::new("seen", ColumnType::DateTime, vec![CellValue::Null]).unwrap(),
            text_column("label", vec![Some("x")]),
        ])
        .unwrap();

        let schema = TableSchema::infer(&data, "T", &InferenceOptions::default());
        let types: Vec<&str> = schema.columns.iter().map(ColumnSpec::sql_type).collect();
        assert_eq!(
            types,
            vec!["NUMBER", "NUMBER", "FLOAT(32)", "FLOAT(64)", "VARCHAR2(200)", "VARCHAR2(200)"]
        );
    }

    #[test]
    fn test_date_like_text_requires_every_non_null_value() {
        let all_dates = text_column("created", vec![Some(CREATED), None, Some(CREATED)]);
        let mixed = text_column("created", vec![Some(CREATED), Some("yesterday")]);
        let options = InferenceOptions::default();

        assert_eq!(ColumnSpec::infer(&all_dates, &options).inferred, InferredType::DateLikeText);
        assert_eq!(ColumnSpec::infer(&mixed, &options).inferred, InferredType::Text);
    }

    #[test]
    fn test_empty_column_policy() {
        let empty = text_column("maybe date", vec![None, None]);
        let base = InferenceOptions {
            empty_column_policy: EmptyColumnPolicy::BaseType,
        };
        let date_like = InferenceOptions {
            empty_column_policy: EmptyColumnPolicy::DateLike,
        };

        assert_eq!(ColumnSpec::infer(&empty, &base).sql_type(), "VARCHAR2(200)");
        assert_eq!(ColumnSpec::infer(&empty, &date_like).sql_type(), "DATE");

        // Non-text columns are never reclassified
        let numbers = DataColumn::new("n", ColumnType::Int64, Vec::<i64>::new()).unwrap();
        assert_eq!(ColumnSpec::infer(&numbers, &date_like).inferred, InferredType::Int64);
    }

    #[test]
    fn test_names_are_sanitized() {
        let column = text_column("Customer Name", vec![Some("Ada")]);
        let spec = ColumnSpec::infer(&column, &InferenceOptions::default());
        assert_eq!(spec.name, "Customer_Name");
    }

    #[test]
    fn test_schema_diff_match_is_case_insensitive() {
        let diff = SchemaDiff::compare(["ID", "CUSTOMER_NAME"], ["customer name", "id"]);
        assert!(diff.is_match());
        assert!(diff.symmetric_difference().is_empty());
    }

    #[test]
    fn test_schema_diff_reports_both_sides() {
        let diff = SchemaDiff::compare(["ID", "LEGACY"], ["id", "new col"]);
        assert!(!diff.is_match());
        assert_eq!(diff.only_in_database, BTreeSet::from(["LEGACY".to_string()]));
        assert_eq!(diff.only_in_dataset, BTreeSet::from(["NEW_COL".to_string()]));
        assert_eq!(diff.symmetric_difference(), vec!["LEGACY", "NEW_COL"]);
    }
}
