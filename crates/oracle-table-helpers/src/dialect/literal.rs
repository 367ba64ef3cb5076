//! Value literal encoding.
//!
//! Every cell placed into an INSERT or UPDATE statement goes through
//! [`encode_literal`]. The rules, in order:
//!
//! 1. NULL becomes the bare token `NULL`.
//! 2. Text containing `to_date(` is already an Oracle expression and is
//!    emitted verbatim.
//! 3. Other text is cut to its first 100 characters and wrapped in single
//!    quotes. Embedded quotes are *not* doubled, so a value such as
//!    `O'Brien` produces invalid SQL. Callers that upload free text must
//!    clean it first.
//! 4. Float NaN becomes the quoted string `'NaN'` (not NULL); infinities
//!    become `'inf'` / `'-inf'`.
//! 5. Datetimes are quoted `YYYY-MM-DD HH24:MI:SS` text, matching their
//!    VARCHAR2 column type.
//!
//! A row is assembled by [`encode_row`]: literals are joined with single
//! spaces into one composed text, whitespace belonging to a literal having
//! first been replaced by sentinel tokens ([`protect_whitespace`]). Splitting
//! the composed text on whitespace then finds exactly the value boundaries,
//! and [`restore_whitespace`] puts the original whitespace back.

use chrono::NaiveDateTime;

use crate::core::CellValue;
use crate::error::{HelperError, Result};

/// Text literals are cut to this many characters.
pub const MAX_TEXT_LITERAL_CHARS: usize = 100;

/// Literal written for NaN floats.
pub const NAN_LITERAL: &str = "'NaN'";

/// Format of quoted datetime literals.
pub const DATETIME_LITERAL_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Marks a protected character; the next char encodes the original.
const WHITESPACE_SENTINEL: char = '\u{E000}';

/// Protected characters are stored at this offset in plane 15.
const PROTECTED_CHAR_BASE: u32 = 0xF_0000;

/// Encode one cell as SQL literal text.
pub fn encode_literal(value: &CellValue) -> String {
    match value {
        CellValue::Null => "NULL".to_string(),
        CellValue::Text(s) if value.is_date_literal() => s.clone(),
        CellValue::Text(s) => {
            let truncated: String = s.chars().take(MAX_TEXT_LITERAL_CHARS).collect();
            format!("'{}'", truncated)
        }
        CellValue::Int32(n) => n.to_string(),
        CellValue::Int64(n) => n.to_string(),
        CellValue::Float32(f) => encode_float(f64::from(*f), f.to_string()),
        CellValue::Float64(f) => encode_float(*f, f.to_string()),
        CellValue::DateTime(dt) => format!("'{}'", dt.format(DATETIME_LITERAL_FORMAT)),
    }
}

fn encode_float(value: f64, rendered: String) -> String {
    if value.is_nan() {
        NAN_LITERAL.to_string()
    } else if value.is_infinite() {
        let sentinel = if value > 0.0 { "'inf'" } else { "'-inf'" };
        sentinel.to_string()
    } else {
        rendered
    }
}

/// Replace every whitespace character (and any literal sentinel) with a
/// sentinel token so that the text contains no whitespace.
pub fn protect_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_whitespace() || c == WHITESPACE_SENTINEL {
            out.push(WHITESPACE_SENTINEL);
            // Whitespace and the sentinel all sit below U+FFFE, so the
            // shifted code point stays inside plane 15.
            out.push(char::from_u32(PROTECTED_CHAR_BASE + c as u32).unwrap_or(c));
        } else {
            out.push(c);
        }
    }
    out
}

/// Inverse of [`protect_whitespace`].
pub fn restore_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != WHITESPACE_SENTINEL {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(encoded) => {
                let original = (encoded as u32)
                    .checked_sub(PROTECTED_CHAR_BASE)
                    .and_then(char::from_u32);
                match original {
                    Some(o) => out.push(o),
                    None => {
                        out.push(c);
                        out.push(encoded);
                    }
                }
            }
            None => out.push(c),
        }
    }
    out
}

/// Join literals into one whitespace-separated row text, protecting the
/// whitespace inside each literal.
pub fn compose_row<S: AsRef<str>>(literals: &[S]) -> String {
    literals
        .iter()
        .map(|l| protect_whitespace(l.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split a composed row text back into its literals.
pub fn split_row(row: &str) -> Vec<String> {
    row.split_whitespace().map(restore_whitespace).collect()
}

/// Encode a row of cells into the comma-separated VALUES list.
///
/// # Errors
///
/// Returns `HelperError::Data` if the composed row does not split back into
/// one value per cell.
pub fn encode_row(cells: &[&CellValue]) -> Result<String> {
    let literals: Vec<String> = cells.iter().map(|c| encode_literal(c)).collect();
    let values = split_row(&compose_row(&literals));

    if values.len() != cells.len() {
        return Err(HelperError::data(format!(
            "row encodes to {} values but has {} cells: {}",
            values.len(),
            cells.len(),
            literals.join(" | ")
        )));
    }

    Ok(values.join(","))
}

/// Oracle date constructor for `dt`, e.g.
/// `to_date('19/OCT/26 09:30:00','dd/mon/yy hh24:mi:ss')`.
pub fn to_date_literal(dt: NaiveDateTime) -> String {
    let date_created = dt.format("%d/%b/%y %H:%M:%S").to_string().to_uppercase();
    format!("to_date('{}','dd/mon/yy hh24:mi:ss')", date_created)
}

/// [`to_date_literal`] for the current local time.
pub fn current_db_compatible_time() -> String {
    to_date_literal(chrono::Local::now().naive_local())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn test_null_is_bare_token() {
        assert_eq!(encode_literal(&CellValue::Null), "NULL");
    }

    #[test]
    fn test_text_is_quoted() {
        assert_eq!(encode_literal(&CellValue::from("New York")), "'New York'");
        assert_eq!(encode_literal(&CellValue::from("")), "''");
    }

    #[test]
    fn test_text_truncated_to_100_chars() {
        let long = "é".repeat(150);
        let encoded = encode_literal(&CellValue::from(long.as_str()));
        assert_eq!(encoded.chars().count(), 102);
        assert_eq!(encoded, format!("'{}'", "é".repeat(100)));
    }

    #[test]
    fn test_quotes_are_not_escaped() {
        assert_eq!(encode_literal(&CellValue::from("O'Brien")), "'O'Brien'");
    }

    #[test]
    fn test_date_literal_passes_through() {
        let expr = "to_date('19/OCT/26 09:30:00','dd/mon/yy hh24:mi:ss')";
        assert_eq!(encode_literal(&CellValue::from(expr)), expr);

        // Not truncated either
        let padded = format!("{}{}", expr, " ".repeat(120));
        assert_eq!(encode_literal(&CellValue::from(padded.as_str())), padded);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(encode_literal(&CellValue::Int32(-100)), "-100");
        assert_eq!(encode_literal(&CellValue::Int64(9_999_999_999)), "9999999999");
        assert_eq!(encode_literal(&CellValue::Float32(0.5)), "0.5");
        assert_eq!(encode_literal(&CellValue::Float64(2.25)), "2.25");
    }

    #[test]
    fn test_nan_and_infinity_sentinels() {
        assert_eq!(encode_literal(&CellValue::Float64(f64::NAN)), "'NaN'");
        assert_eq!(encode_literal(&CellValue::Float32(f32::NAN)), "'NaN'");
        assert_eq!(encode_literal(&CellValue::Float64(f64::INFINITY)), "'inf'");
        assert_eq!(encode_literal(&CellValue::Float32(f32::NEG_INFINITY)), "'-inf'");
    }

    #[test]
    fn test_datetime_is_quoted_text() {
        let value = CellValue::DateTime(ts(2026, 1, 2, 3, 4, 5));
        assert_eq!(encode_literal(&value), "'2026-01-02 03:04:05'");
    }

    #[test]
    fn test_protect_restore_round_trip() {
        for text in [
            "'New York'",
            "'a  b'",
            "' leading and trailing '",
            "'tab\there'",
            "'line\nbreak\r\n'",
            "'nbsp\u{a0}ideographic\u{3000}'",
            "'Fish & Chips'",
            "'has sentinel \u{E000} already'",
        ] {
            let protected = protect_whitespace(text);
            assert!(!protected.chars().any(char::is_whitespace), "{:?}", protected);
            assert_eq!(restore_whitespace(&protected), text);
        }
    }

    #[test]
    fn test_compose_and_split_preserve_spacing() {
        let literals = vec![
            "1".to_string(),
            "'New  York'".to_string(),
            "NULL".to_string(),
            "'Salt & Pepper'".to_string(),
        ];
        let composed = compose_row(&literals);
        assert_eq!(composed.split(' ').count(), 4);
        assert_eq!(split_row(&composed), literals);
    }

    #[test]
    fn test_encode_row() {
        let created = CellValue::from("to_date('19/OCT/26 09:30:00','dd/mon/yy hh24:mi:ss')");
        let cells = vec![
            CellValue::Int64(7),
            CellValue::from("New York"),
            CellValue::Null,
            CellValue::Float64(f64::NAN),
            created,
        ];
        let refs: Vec<&CellValue> = cells.iter().collect();
        assert_eq!(
            encode_row(&refs).unwrap(),
            "7,'New York',NULL,'NaN',to_date('19/OCT/26 09:30:00','dd/mon/yy hh24:mi:ss')"
        );
    }

    #[test]
    fn test_to_date_literal() {
        assert_eq!(
            to_date_literal(ts(2026, 10, 19, 9, 30, 0)),
            "to_date('19/OCT/26 09:30:00','dd/mon/yy hh24:mi:ss')"
        );
    }

    #[test]
    fn test_current_db_compatible_time_is_date_literal() {
        let now = CellValue::from(current_db_compatible_time());
        assert!(now.is_date_literal());
        assert!(now.as_text().unwrap().ends_with(",'dd/mon/yy hh24:mi:ss')"));
    }
}
