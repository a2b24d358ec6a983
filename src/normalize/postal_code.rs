//! Brazilian postal code (CEP) extraction from free-text addresses.
//!
//! Source spreadsheets mix dedicated CEP columns with CEPs embedded in the address text
//! (`"Rua X, 100 - CEP: 72302-004"`, `"QR 104 - 72302004"`). [`extract_postal_code`] recovers the
//! code, and [`strip_postal_code`] removes the fragment from the address so it is not shown twice.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Value;

use super::values::value_to_text;

/// `cep` label followed by an optional colon and a 5+3 digit code, hyphen optional.
static LABELED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcep\s*:?\s*([0-9]{5}-?[0-9]{3})\b").expect("valid labeled CEP regex")
});

/// Bare hyphenated code.
static HYPHENATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b([0-9]{5}-[0-9]{3})\b").expect("valid hyphenated CEP regex")
});

/// Bare run of exactly eight digits.
static BARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([0-9]{8})\b").expect("valid bare CEP regex"));

/// Any of the three shapes above, including the label, for removal.
static STRIP_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bcep\s*:?\s*[0-9]{5}-?[0-9]{3}\b|\b[0-9]{5}-[0-9]{3}\b|\b[0-9]{8}\b")
        .expect("valid CEP strip regex")
});

/// Separator left behind when a CEP is cut out of the middle of an address (`"A -  - B"`).
static DOUBLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*-\s*){2,}").expect("valid separator regex"));

/// Extract a postal code from free text.
///
/// Patterns are tried in priority order (labeled, hyphenated, bare eight digits); the first
/// pattern that matches anywhere in the text wins. Eight extracted digits are formatted as
/// `DDDDD-DDD`.
///
/// ```
/// use obras_his_ingest::normalize::extract_postal_code;
///
/// assert_eq!(
///     extract_postal_code("Rua X, 100 - cep 72302-004").as_deref(),
///     Some("72302-004")
/// );
/// assert_eq!(
///     extract_postal_code("QR 104 conjunto 4 - 72302004").as_deref(),
///     Some("72302-004")
/// );
/// assert_eq!(extract_postal_code("Rua sem número"), None);
/// ```
pub fn extract_postal_code(text: &str) -> Option<String> {
    [&*LABELED_RE, &*HYPHENATED_RE, &*BARE_RE]
        .into_iter()
        .find_map(|re| re.captures(text))
        .and_then(|caps| caps.get(1))
        .map(|m| format_digits(m.as_str()))
}

/// Remove every postal-code fragment from `text`, plus the separators it leaves dangling.
///
/// Only meaningful when a code was actually extracted from the same text.
pub fn strip_postal_code(text: &str) -> String {
    let stripped = STRIP_RE.replace_all(text, "");
    let collapsed = DOUBLE_SEPARATOR_RE.replace_all(&stripped, " - ");
    collapsed
        .trim_matches(|c: char| c == '-' || c == ',' || c.is_whitespace())
        .to_string()
}

/// Normalize the content of a dedicated postal-code cell.
///
/// Eight digits (with or without punctuation) become `DDDDD-DDD`; anything else is kept as
/// trimmed text. Blank input yields `None`.
pub fn normalize_postal_code(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 {
        Some(format_digits(&digits))
    } else {
        Some(trimmed.to_string())
    }
}

/// Normalize a dedicated postal-code cell, keeping track of how it was stored.
///
/// Spreadsheets that type the CEP column as a number drop the leading zero
/// (`01310-100` becomes `1310100`); seven digits read from a numeric cell are padded back.
pub fn postal_code_from_cell(value: &Value) -> Option<String> {
    let text = value_to_text(value)?;
    let numeric = matches!(value, Value::Int64(_) | Value::Float64(_));
    if numeric && text.len() == 7 && text.bytes().all(|b| b.is_ascii_digit()) {
        return normalize_postal_code(&format!("0{text}"));
    }
    normalize_postal_code(&text)
}

fn format_digits(matched: &str) -> String {
    let digits: String = matched.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == 8 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cell_regains_leading_zero() {
        assert_eq!(
            postal_code_from_cell(&Value::Float64(1310100.0)).as_deref(),
            Some("01310-100")
        );
        assert_eq!(
            postal_code_from_cell(&Value::Int64(72302004)).as_deref(),
            Some("72302-004")
        );
        // Text cells are taken as written.
        assert_eq!(
            postal_code_from_cell(&Value::Utf8("1310100".to_string())).as_deref(),
            Some("1310100")
        );
        assert_eq!(postal_code_from_cell(&Value::Null), None);
    }

    #[test]
    fn labeled_code_with_colon() {
        let addr = "Rua Teste, 123 - Centro - São Paulo/SP - CEP: 01234-567";
        assert_eq!(extract_postal_code(addr).as_deref(), Some("01234-567"));
        assert_eq!(strip_postal_code(addr), "Rua Teste, 123 - Centro - São Paulo/SP");
    }

    #[test]
    fn labeled_code_without_hyphen() {
        let addr = "Av. José de Alencar, 456 - cep 71234567";
        assert_eq!(extract_postal_code(addr).as_deref(), Some("71234-567"));
        assert_eq!(strip_postal_code(addr), "Av. José de Alencar, 456");
    }

    #[test]
    fn round_trip_on_labeled_address() {
        let addr = "Rua X, 100 - cep 72302-004";
        assert_eq!(extract_postal_code(addr).as_deref(), Some("72302-004"));
        assert_eq!(strip_postal_code(addr), "Rua X, 100");
    }

    #[test]
    fn bare_eight_digits() {
        let addr = "QR 104 Conjunto 4 Casa 15 - Samambaia/DF - 72302004";
        assert_eq!(extract_postal_code(addr).as_deref(), Some("72302-004"));
        assert_eq!(strip_postal_code(addr), "QR 104 Conjunto 4 Casa 15 - Samambaia/DF");
    }

    #[test]
    fn label_wins_over_earlier_bare_code() {
        let text = "lote 12345-678, cep 72302004";
        assert_eq!(extract_postal_code(text).as_deref(), Some("72302-004"));
    }

    #[test]
    fn longer_digit_runs_are_not_codes() {
        assert_eq!(extract_postal_code("protocolo 123456789"), None);
        assert_eq!(extract_postal_code("tel 3333-4444"), None);
    }

    #[test]
    fn stripping_from_the_middle_keeps_one_separator() {
        let addr = "SHIS QI 15 - CEP 71635-030 - Lago Sul";
        assert_eq!(strip_postal_code(addr), "SHIS QI 15 - Lago Sul");
    }

    #[test]
    fn dedicated_cell_normalization() {
        assert_eq!(normalize_postal_code("72302004").as_deref(), Some("72302-004"));
        assert_eq!(normalize_postal_code(" 72.302-004 ").as_deref(), Some("72302-004"));
        assert_eq!(normalize_postal_code("7230").as_deref(), Some("7230"));
        assert_eq!(normalize_postal_code("  "), None);
    }
}
