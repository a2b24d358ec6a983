//! Unicode text canonicalization.

use unicode_normalization::UnicodeNormalization;

/// Canonicalize `s` to Unicode NFC, collapse whitespace runs to a single space and trim the ends.
///
/// Idempotent: normalizing an already-normalized string returns it unchanged.
///
/// ```
/// use obras_his_ingest::normalize::normalize_text;
///
/// // "São" written with a combining tilde.
/// assert_eq!(normalize_text("  Sa\u{0303}o   José \t"), "S\u{00e3}o José");
/// ```
pub fn normalize_text(s: &str) -> String {
    let composed: String = s.nfc().collect();
    composed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalize `s`, mapping a blank result to `None`.
pub fn normalize_optional(s: Option<String>) -> Option<String> {
    s.map(|v| normalize_text(&v)).filter(|v| !v.is_empty())
}
