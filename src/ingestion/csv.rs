//! CSV reading.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawRow, RawTable, Value};

/// Read a CSV file into a [`RawTable`].
///
/// Rules:
///
/// - The first record is the header row.
/// - Rows may be shorter or longer than the header row.
/// - Bytes that are not valid UTF-8 are replaced rather than failing the file.
/// - If `delimiter` is `None`, `;` is used when the header line has more semicolons than commas.
pub fn read_csv_from_path(path: impl AsRef<Path>, delimiter: Option<u8>) -> IngestionResult<RawTable> {
    let bytes = std::fs::read(path)?;
    read_csv_from_bytes(&bytes, delimiter)
}

/// Read CSV from an in-memory buffer (e.g. an uploaded file body).
pub fn read_csv_from_bytes(bytes: &[u8], delimiter: Option<u8>) -> IngestionResult<RawTable> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(bytes));
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);
    read_csv_from_reader(&mut rdr)
}

/// Read CSV records from an existing reader configured with `has_headers(true)`.
pub fn read_csv_from_reader<R: std::io::Read>(rdr: &mut csv::Reader<R>) -> IngestionResult<RawTable> {
    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| String::from_utf8_lossy(h).trim_start_matches('\u{feff}').to_string())
        .collect();
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestionError::EmptyInput {
            message: "csv has no header row".to_string(),
        });
    }

    let mut rows: Vec<RawRow> = Vec::new();
    for (row_idx0, result) in rdr.byte_records().enumerate() {
        let record = result?;
        // Header is line 1; quoted multi-line cells make the reader's position authoritative.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(row_idx0 + 2);

        let cells = record
            .iter()
            .map(|raw| {
                let text = String::from_utf8_lossy(raw);
                if text.trim().is_empty() {
                    Value::Null
                } else {
                    Value::Utf8(text.into_owned())
                }
            })
            .collect();
        rows.push(RawRow::new(line, cells));
    }

    Ok(RawTable::new(headers, rows))
}

fn sniff_delimiter(bytes: &[u8]) -> u8 {
    let first_line = bytes.split(|b| *b == b'\n').next().unwrap_or_default();
    let semicolons = first_line.iter().filter(|b| **b == b';').count();
    let commas = first_line.iter().filter(|b| **b == b',').count();
    if semicolons > commas { b';' } else { b',' }
}
