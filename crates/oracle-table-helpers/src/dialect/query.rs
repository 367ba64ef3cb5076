//! DDL/DML generators.
//!
//! Table names are interpolated as given (after validation by the caller);
//! column names from datasets are sanitized. Keyword case follows the
//! statements older loaders issued, which some audit tooling greps for.

use crate::core::identifier::sanitize_identifier;
use crate::core::{CellValue, RowBatch, TableSchema};
use crate::dialect::literal::{encode_literal, encode_row};
use crate::error::Result;

/// Succeeds with one row when the table exists.
pub fn check_existence_query(table: &str) -> String {
    format!("SELECT 1 from {} where rownum < 2", table)
}

/// Returns no rows, only the column metadata of the table.
pub fn column_names_query(table: &str) -> String {
    format!("SELECT * FROM {} WHERE rownum < 1", table)
}

pub fn row_count_query(table: &str) -> String {
    format!("select count(*) from {}", table)
}

pub fn truncate_table_query(table: &str) -> String {
    format!("truncate table {}", table)
}

pub fn drop_table_query(table: &str) -> String {
    format!("drop table {} purge", table)
}

/// CREATE TABLE for an inferred schema.
///
/// ```
/// use oracle_table_helpers::core::{ColumnSpec, InferredType, TableSchema};
/// use oracle_table_helpers::dialect::create_table_query;
///
/// let schema = TableSchema {
///     table: "FOO".to_string(),
///     columns: vec![
///         ColumnSpec { name: "ID".to_string(), inferred: InferredType::Int64 },
///         ColumnSpec { name: "NAME".to_string(), inferred: InferredType::Text },
///     ],
/// };
/// assert_eq!(
///     create_table_query(&schema, true),
///     "CREATE TABLE FOO( ID NUMBER, NAME VARCHAR2(200) )"
/// );
/// ```
pub fn create_table_query(schema: &TableSchema, allow_nulls: bool) -> String {
    let not_null = if allow_nulls { "" } else { " NOT NULL" };
    let columns: Vec<String> = schema
        .columns
        .iter()
        .map(|c| format!("{} {}{}", c.name, c.sql_type(), not_null))
        .collect();

    format!("CREATE TABLE {}( {} )", schema.table, columns.join(", "))
}

/// Multi-row INSERT ALL from pre-encoded VALUES lists.
pub fn insert_query<S: AsRef<str>>(table: &str, columns: &[&str], rows: &[S]) -> String {
    let column_list = columns
        .iter()
        .map(|c| sanitize_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");

    let mut query = String::from("INSERT ALL");
    for row in rows {
        query.push_str(&format!(
            " INTO {} ({}) VALUES ({})",
            table,
            column_list,
            row.as_ref()
        ));
    }
    query.push_str(" SELECT 1 FROM DUAL");
    query
}

/// INSERT ALL for every row of a batch.
///
/// # Errors
///
/// Returns `HelperError::Data` if a row cannot be encoded into one literal
/// per column.
pub fn generate_insert_query(batch: &RowBatch<'_>, table: &str) -> Result<String> {
    let columns = batch.dataset().column_names();
    let rows = batch
        .rows()
        .map(|cells| encode_row(&cells))
        .collect::<Result<Vec<String>>>()?;

    Ok(insert_query(table, &columns, &rows))
}

/// Set `column` to `new_value` on every row where it equals `old_value`.
///
/// The match is a plain `=` comparison. A NULL `old_value` renders as
/// `WHERE col = NULL`, which Oracle evaluates to unknown for every row, so
/// the statement succeeds without updating anything.
pub fn update_column_by_value_query(
    table: &str,
    column: &str,
    old_value: &CellValue,
    new_value: &CellValue,
) -> String {
    format!(
        "UPDATE {} SET {} = {} WHERE {} = {}",
        table,
        column,
        encode_literal(new_value),
        column,
        encode_literal(old_value)
    )
}

/// Copy every row of `source` into `target`.
pub fn table_to_table_insert_query(source: &str, target: &str) -> String {
    format!("INSERT INTO {} SELECT * FROM {}", target, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        ColumnType, DataColumn, InferenceOptions, TabularDataset, TrailingBatchPolicy,
    };

    #[test]
    fn test_lifecycle_queries() {
        assert_eq!(check_existence_query("FOO"), "SELECT 1 from FOO where rownum < 2");
        assert_eq!(column_names_query("FOO"), "SELECT * FROM FOO WHERE rownum < 1");
        assert_eq!(row_count_query("FOO"), "select count(*) from FOO");
        assert_eq!(truncate_table_query("FOO"), "truncate table FOO");
        assert_eq!(drop_table_query("FOO"), "drop table FOO purge");
    }

    #[test]
    fn test_create_table_query() {
        let data = TabularDataset::new(vec![
            DataColumn::new("ID", ColumnType::Int64, vec![1i64]).unwrap(),
            DataColumn::new("NAME", ColumnType::Text, vec!["Ada"]).unwrap(),
            DataColumn::new(
                "CREATED",
                ColumnType::Text,
                vec!["to_date('19/OCT/26 09:30:00','dd/mon/yy hh24:mi:ss')"],
            )
            .unwrap(),
        ])
        .unwrap();
        let schema = TableSchema::infer(&data, "FOO", &InferenceOptions::default());

        assert_eq!(
            create_table_query(&schema, true),
            "CREATE TABLE FOO( ID NUMBER, NAME VARCHAR2(200), CREATED DATE )"
        );
        assert_eq!(
            create_table_query(&schema, false),
            "CREATE TABLE FOO( ID NUMBER NOT NULL, NAME VARCHAR2(200) NOT NULL, \
             CREATED DATE NOT NULL )"
        );
    }

    #[test]
    fn test_insert_query() {
        let query = insert_query("FOO", &["ID", "Unit Price"], &["1,2.5", "2,NULL"]);
        assert_eq!(
            query,
            "INSERT ALL INTO FOO (ID, Unit_Price) VALUES (1,2.5) \
             INTO FOO (ID, Unit_Price) VALUES (2,NULL) SELECT 1 FROM DUAL"
        );
    }

    #[test]
    fn test_insert_query_without_rows() {
        let rows: Vec<String> = Vec::new();
        assert_eq!(insert_query("FOO", &["ID"], &rows), "INSERT ALL SELECT 1 FROM DUAL");
    }

    #[test]
    fn test_generate_insert_query_for_batch() {
        let data = TabularDataset::new(vec![
            DataColumn::new("ID", ColumnType::Int32, vec![1i32, 2, 3]).unwrap(),
            DataColumn::new("CITY", ColumnType::Text, vec![Some("New York"), None, Some("Oslo")])
                .unwrap(),
        ])
        .unwrap();
        let batches = data.batches(2, TrailingBatchPolicy::SkipEmpty).unwrap();

        assert_eq!(
            generate_insert_query(&batches[0], "CITIES").unwrap(),
            "INSERT ALL INTO CITIES (ID, CITY) VALUES (1,'New York') \
             INTO CITIES (ID, CITY) VALUES (2,NULL) SELECT 1 FROM DUAL"
        );
        assert_eq!(
            generate_insert_query(&batches[1], "CITIES").unwrap(),
            "INSERT ALL INTO CITIES (ID, CITY) VALUES (3,'Oslo') SELECT 1 FROM DUAL"
        );
    }

    #[test]
    fn test_update_column_by_value_query() {
        assert_eq!(
            update_column_by_value_query(
                "PREDICTIONS",
                "LATEST_PREDICTION",
                &CellValue::Int32(1),
                &CellValue::Int32(0)
            ),
            "UPDATE PREDICTIONS SET LATEST_PREDICTION = 0 WHERE LATEST_PREDICTION = 1"
        );
        assert_eq!(
            update_column_by_value_query(
                "T",
                "STATUS",
                &CellValue::from("new"),
                &CellValue::from("done")
            ),
            "UPDATE T SET STATUS = 'done' WHERE STATUS = 'new'"
        );
    }

    #[test]
    fn test_update_from_null_keeps_equality() {
        assert_eq!(
            update_column_by_value_query(
                "FOO",
                "STATUS",
                &CellValue::Null,
                &CellValue::from("done")
            ),
            "UPDATE FOO SET STATUS = 'done' WHERE STATUS = NULL"
        );
    }

    #[test]
    fn test_table_to_table_insert_query() {
        assert_eq!(
            table_to_table_insert_query("STAGING_SALES", "SALES"),
            "INSERT INTO SALES SELECT * FROM STAGING_SALES"
        );
    }
}
