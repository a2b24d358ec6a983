//! Reading uploaded files into [`crate::types::RawTable`]s.
//!
//! Most callers should use [`read_table_from_path`] or [`read_table_from_bytes`] (from
//! [`unified`]), which:
//!
//! - auto-detect the format by file extension (or you can override via [`ImportOptions`])
//! - read the header row and every data row, keeping source line numbers
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - `excel` (Cargo feature `excel`, on by default)
//!
//! [`observability`] holds the observer hooks the import pipeline reports to.

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod observability;
pub mod unified;

pub use observability::{
    CompositeObserver, FileObserver, ImportContext, ImportObserver, ImportSeverity, ImportStats,
    StdErrObserver, TracingObserver,
};
pub use unified::{
    infer_format_from_path, read_table_from_bytes, read_table_from_path, severity_for_error,
    ExcelSheetSelection, ImportFormat, ImportOptions,
};
