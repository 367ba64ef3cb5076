//! Identifier sanitization and validation.
//!
//! Table and column names are interpolated into statement text unquoted, so
//! Oracle folds them to upper case. Column names coming from a dataset may
//! contain spaces; [`sanitize_identifier`] turns those into underscores so the
//! same name is used in CREATE TABLE and INSERT statements.
//! [`comparison_key`] is the form used when comparing dataset columns to the
//! columns Oracle reports for an existing table.

use crate::error::{HelperError, Result};

/// Maximum identifier length in bytes (Oracle 12.2+).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier before it is placed into statement text.
///
/// Rejects:
/// - Empty (or all-whitespace) identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `HelperError::Argument` with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(HelperError::argument("Identifier cannot be empty"));
    }

    if name.contains('\0') {
        return Err(HelperError::argument(format!(
            "Identifier contains null byte: {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(HelperError::argument(format!(
            "Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Trim surrounding whitespace and replace inner spaces with underscores.
///
/// ```
/// use oracle_table_helpers::core::identifier::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier(" Unit Price "), "Unit_Price");
/// ```
pub fn sanitize_identifier(name: &str) -> String {
    name.trim().replace(' ', "_")
}

/// Sanitized, upper-cased name used for case-insensitive column comparison.
pub fn comparison_key(name: &str) -> String {
    sanitize_identifier(name).to_uppercase()
}
