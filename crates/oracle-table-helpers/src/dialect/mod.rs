//! Oracle statement text.
//!
//! - [`literal`]: value literal encoding and row composition
//! - [`query`]: the DDL/DML generators used by the table operations
//!
//! Everything here is a pure function of its inputs; nothing touches the
//! database.

pub mod literal;
pub mod query;

pub use literal::{current_db_compatible_time, encode_literal, encode_row, to_date_literal};
pub use query::{
    check_existence_query, column_names_query, create_table_query, drop_table_query,
    generate_insert_query, insert_query, row_count_query, table_to_table_insert_query,
    truncate_table_query, update_column_by_value_query,
};
