//! Cell extraction and lenient numeric coercion.
//!
//! None of these functions fail: an absent column, an out-of-range index, an empty cell or an
//! unparseable number all come back as `None`, and callers treat that as "no value".

use crate::types::{RawRow, Value};

/// Read the trimmed text of the cell at `index`, if any.
///
/// Numbers read from workbooks are rendered without a spurious `.0` (`101.0` -> `"101"`) so unit
/// numbers and postal codes typed as numbers survive.
pub fn cell_text(row: &RawRow, index: Option<usize>) -> Option<String> {
    let cell = row.cells.get(index?)?;
    value_to_text(cell)
}

/// Render a single cell as trimmed text; blank cells yield `None`.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Utf8(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Int64(i) => Some(i.to_string()),
        Value::Float64(f) => {
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                Some((*f as i64).to_string())
            } else {
                Some(f.to_string())
            }
        }
        Value::Bool(b) => Some(b.to_string()),
    }
}

/// Parse a decimal number, tolerating Brazilian and international formatting.
///
/// - A leading `R$` is ignored.
/// - With both `.` and `,` present, whichever comes last is the decimal separator and the other
///   is a thousands separator.
/// - A single `,` (or `.`) is the decimal separator.
/// - Repeated separators are accepted only as thousands groups of three digits.
///
/// ```
/// use obras_his_ingest::normalize::parse_decimal;
///
/// assert_eq!(parse_decimal("150000"), Some(150000.0));
/// assert_eq!(parse_decimal("150000.50"), Some(150000.5));
/// assert_eq!(parse_decimal("65,5"), Some(65.5));
/// assert_eq!(parse_decimal("R$ 150.000,00"), Some(150000.0));
/// assert_eq!(parse_decimal("a combinar"), None);
/// ```
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    if let Some(rest) = s.strip_prefix("R$").or_else(|| s.strip_prefix("r$")) {
        s = rest.trim_start();
    }
    if s.is_empty() {
        return None;
    }

    let canonical = match (s.rfind(','), s.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => s.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => s.replace(',', ""),
        (Some(_), None) => single_or_grouped(s, ',')?,
        (None, Some(_)) => single_or_grouped(s, '.')?,
        (None, None) => s.to_string(),
    };

    canonical.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an integer through the decimal parser, truncating toward zero (`"3.0"` -> `3`).
pub fn parse_integer(raw: &str) -> Option<i64> {
    let value = parse_decimal(raw)?.trunc();
    if value >= i64::MIN as f64 && value <= i64::MAX as f64 {
        Some(value as i64)
    } else {
        None
    }
}

// One occurrence of `sep` is a decimal point; several must be thousands groups ("1.500.000").
fn single_or_grouped(s: &str, sep: char) -> Option<String> {
    let parts: Vec<&str> = s.split(sep).collect();
    if parts.len() == 2 {
        return Some(format!("{}.{}", parts[0], parts[1]));
    }

    let head = parts[0].trim_start_matches(['-', '+']);
    let grouped = !head.is_empty()
        && head.len() <= 3
        && parts[1..]
            .iter()
            .all(|p| p.len() == 3 && p.chars().all(|c| c.is_ascii_digit()));
    grouped.then(|| parts.concat())
}
