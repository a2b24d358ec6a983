#![cfg(feature = "excel")]

use std::io::{Cursor, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};

use crate::error::{IngestionError, IngestionResult};
use crate::types::{RawRow, RawTable, Value};

/// Read one sheet of a workbook (`.xlsx`, `.xls`, `.ods`, etc.) into a [`RawTable`].
///
/// Behavior:
/// - Picks `sheet_name` if provided; otherwise uses the first sheet in the workbook
/// - Detects the first non-empty row as the header row
/// - Keeps cells typed (numbers stay numbers) and records 1-based spreadsheet row numbers
pub fn read_excel_from_path(path: impl AsRef<Path>, sheet_name: Option<&str>) -> IngestionResult<RawTable> {
    let workbook = open_workbook_auto(path)?;
    read_workbook(workbook, sheet_name)
}

/// Read a workbook held in memory (e.g. an uploaded file body).
pub fn read_excel_from_bytes(bytes: &[u8], sheet_name: Option<&str>) -> IngestionResult<RawTable> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    read_workbook(workbook, sheet_name)
}

fn read_workbook<RS: Read + Seek>(mut workbook: Sheets<RS>, sheet_name: Option<&str>) -> IngestionResult<RawTable> {
    let sheet = match sheet_name {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestionError::EmptyInput {
                message: "workbook has no sheets".to_string(),
            })?,
    };

    let range = workbook.worksheet_range(&sheet)?;
    read_sheet_range(&sheet, &range)
}

fn read_sheet_range(sheet: &str, range: &calamine::Range<Data>) -> IngestionResult<RawTable> {
    // Ranges start at the first used cell, which is not necessarily A1.
    let row_offset = range.start().map(|(r, _)| r as usize).unwrap_or(0);

    let header_row_idx = range
        .rows()
        .position(|row| row.iter().any(|c| !is_empty_cell(c)))
        .ok_or_else(|| IngestionError::EmptyInput {
            message: format!("sheet '{sheet}' has no non-empty rows (no header row found)"),
        })?;

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<RawRow> = Vec::new();
    for (idx0, row) in range.rows().enumerate() {
        if idx0 < header_row_idx {
            continue;
        }
        if idx0 == header_row_idx {
            headers = row.iter().map(cell_to_header_string).collect();
            continue;
        }

        // Report 1-based row number (Excel-like).
        let line = row_offset + idx0 + 1;
        rows.push(RawRow::new(line, row.iter().map(convert_cell).collect()));
    }

    Ok(RawTable::new(headers, rows))
}

fn is_empty_cell(c: &Data) -> bool {
    match c {
        Data::Empty => true,
        Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

fn cell_to_header_string(c: &Data) -> String {
    match c {
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => {
            if f.fract() == 0.0 {
                (*f as i64).to_string()
            } else {
                f.to_string()
            }
        }
        Data::Bool(b) => b.to_string(),
        Data::DateTime(f) => f.to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(_) => "".to_string(),
        Data::Empty => "".to_string(),
    }
}

fn convert_cell(c: &Data) -> Value {
    match c {
        Data::Empty => Value::Null,
        // Formula errors (#N/A, #REF!...) carry no usable data.
        Data::Error(_) => Value::Null,
        Data::String(s) => Value::Utf8(s.clone()),
        Data::Int(i) => Value::Int64(*i),
        Data::Float(f) => Value::Float64(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(d) => Value::Utf8(d.to_string()),
        Data::DateTimeIso(s) => Value::Utf8(s.clone()),
        Data::DurationIso(s) => Value::Utf8(s.clone()),
    }
}
