//! Type mapping from inferred dataset types to Oracle column types.

use crate::core::InferredType;

/// Oracle type used for text columns and for datetimes, which are uploaded
/// as their text rendering.
pub const ORACLE_TEXT_TYPE: &str = "VARCHAR2(200)";

/// Map an inferred column type to the Oracle type used in CREATE TABLE.
pub fn oracle_type(inferred: InferredType) -> &'static str {
    match inferred {
        // Text and datetime both land as text
        InferredType::Text | InferredType::DateTime => ORACLE_TEXT_TYPE,

        // Floating point keeps its binary precision
        InferredType::Float32 => "FLOAT(32)",
        InferredType::Float64 => "FLOAT(64)",

        // Integer types
        InferredType::Int32 | InferredType::Int64 => "NUMBER",

        // Values are to_date(...) expressions
        InferredType::DateLikeText => "DATE",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_types() {
        assert_eq!(oracle_type(InferredType::Text), "VARCHAR2(200)");
        assert_eq!(oracle_type(InferredType::DateTime), "VARCHAR2(200)");
    }

    #[test]
    fn test_numeric_types() {
        assert_eq!(oracle_type(InferredType::Int32), "NUMBER");
        assert_eq!(oracle_type(InferredType::Int64), "NUMBER");
        assert_eq!(oracle_type(InferredType::Float32), "FLOAT(32)");
        assert_eq!(oracle_type(InferredType::Float64), "FLOAT(64)");
    }

    #[test]
    fn test_date_like_text() {
        assert_eq!(oracle_type(InferredType::DateLikeText), "DATE");
    }
}
