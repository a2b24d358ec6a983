//! Field-level building blocks used by the import pipeline.
//!
//! - [`headers`]: map raw header text to [`CanonicalField`]s
//! - [`values`]: read cells as trimmed text and coerce numbers leniently
//! - [`text`]: Unicode NFC + whitespace normalization
//! - [`postal_code`]: find and strip CEPs embedded in addresses

pub mod headers;
pub mod postal_code;
pub mod text;
pub mod values;

pub use headers::{
    resolve_headers, CanonicalField, ColumnIndexMap, HeaderVariantTable, HeaderVariants,
};
pub use postal_code::{
    extract_postal_code, normalize_postal_code, postal_code_from_cell, strip_postal_code,
};
pub use text::{normalize_optional, normalize_text};
pub use values::{cell_text, parse_decimal, parse_integer, value_to_text};
