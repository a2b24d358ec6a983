//! Unified table reading entrypoint and import options.
//!
//! Most callers go through [`crate::import::preview_from_path`] / [`crate::import::commit_from_path`],
//! which use [`read_table_from_path`] under the hood.
//!
//! - If [`ImportOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::ImportObserver`] is provided, the import pipeline reports
//!   completion, issues, failures and alerts to it.

use std::error::Error as StdError;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{IngestionError, IngestionResult};
use crate::normalize::HeaderVariantTable;
use crate::types::RawTable;

use super::csv;
use super::observability::{ImportObserver, ImportSeverity};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    /// Comma- (or semicolon-) separated values.
    Csv,
    /// Spreadsheet/workbook formats (feature-gated behind `excel`).
    Excel,
}

impl ImportFormat {
    /// Parse a format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" | "txt" => Some(Self::Csv),
            "xlsx" | "xls" | "xlsm" | "xlsb" | "ods" => Some(Self::Excel),
            _ => None,
        }
    }
}

/// How to choose the sheet when reading a workbook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExcelSheetSelection {
    /// Read the first sheet (default).
    #[default]
    First,
    /// Read a single named sheet.
    Sheet(String),
}

/// Options controlling an import.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct ImportOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<ImportFormat>,
    /// Excel-specific options.
    pub excel_sheet_selection: ExcelSheetSelection,
    /// CSV field delimiter. If `None`, sniffed from the header line (`,` or `;`).
    pub csv_delimiter: Option<u8>,
    /// Header dialects to accept. If `None`, uses [`HeaderVariantTable::builtin`].
    pub header_variants: Option<Arc<HeaderVariantTable>>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn ImportObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: ImportSeverity,
}

impl ImportOptions {
    /// The header table in effect for this import.
    pub fn header_table(&self) -> &HeaderVariantTable {
        match self.header_variants.as_deref() {
            Some(table) => table,
            None => HeaderVariantTable::builtin(),
        }
    }
}

impl fmt::Debug for ImportOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportOptions")
            .field("format", &self.format)
            .field("excel_sheet_selection", &self.excel_sheet_selection)
            .field("csv_delimiter", &self.csv_delimiter)
            .field("custom_header_variants", &self.header_variants.is_some())
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            format: None,
            excel_sheet_selection: ExcelSheetSelection::default(),
            csv_delimiter: None,
            header_variants: None,
            observer: None,
            alert_at_or_above: ImportSeverity::Critical,
        }
    }
}

/// Read a file into a [`RawTable`], picking the reader by `options.format` or the extension.
pub fn read_table_from_path(path: impl AsRef<Path>, options: &ImportOptions) -> IngestionResult<RawTable> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    match fmt {
        ImportFormat::Csv => csv::read_csv_from_path(path, options.csv_delimiter),
        ImportFormat::Excel => read_excel_dispatch(ExcelSource::Path(path), &options.excel_sheet_selection),
    }
}

/// Read an in-memory upload into a [`RawTable`].
///
/// `file_name` is only used to infer the format when `options.format` is `None`.
pub fn read_table_from_bytes(
    file_name: &str,
    bytes: &[u8],
    options: &ImportOptions,
) -> IngestionResult<RawTable> {
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(Path::new(file_name))?,
    };

    match fmt {
        ImportFormat::Csv => csv::read_csv_from_bytes(bytes, options.csv_delimiter),
        ImportFormat::Excel => read_excel_dispatch(ExcelSource::Bytes(bytes), &options.excel_sheet_selection),
    }
}

/// Infer the upload format from a path's extension.
pub fn infer_format_from_path(path: &Path) -> IngestionResult<ImportFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| IngestionError::Format {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    ImportFormat::from_extension(ext).ok_or_else(|| IngestionError::Format {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// Severity of a read failure: I/O problems are critical, malformed content is an error.
pub fn severity_for_error(e: &IngestionError) -> ImportSeverity {
    match e {
        IngestionError::Io(_) => ImportSeverity::Critical,
        IngestionError::Csv(err) => match err.kind() {
            ::csv::ErrorKind::Io(_) => ImportSeverity::Critical,
            _ => ImportSeverity::Error,
        },
        #[cfg(feature = "excel")]
        IngestionError::Excel(err) => {
            if error_chain_contains_io(err) {
                ImportSeverity::Critical
            } else {
                ImportSeverity::Error
            }
        }
        IngestionError::Format { .. } => ImportSeverity::Error,
        IngestionError::EmptyInput { .. } => ImportSeverity::Error,
    }
}

#[cfg_attr(not(feature = "excel"), allow(dead_code))]
fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

enum ExcelSource<'a> {
    Path(&'a Path),
    Bytes(&'a [u8]),
}

fn read_excel_dispatch(source: ExcelSource<'_>, sel: &ExcelSheetSelection) -> IngestionResult<RawTable> {
    // Avoid unused warnings when the feature is off.
    let _ = (&source, sel);

    #[cfg(feature = "excel")]
    {
        use super::excel;

        let sheet = match sel {
            ExcelSheetSelection::First => None,
            ExcelSheetSelection::Sheet(name) => Some(name.as_str()),
        };
        match source {
            ExcelSource::Path(path) => excel::read_excel_from_path(path, sheet),
            ExcelSource::Bytes(bytes) => excel::read_excel_from_bytes(bytes, sheet),
        }
    }

    #[cfg(not(feature = "excel"))]
    {
        Err(IngestionError::Format {
            message: "excel ingestion not enabled (enable cargo feature 'excel')".to_string(),
        })
    }
}
