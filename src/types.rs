//! Core data model types for spreadsheet import.
//!
//! Uploaded files are read into a [`RawTable`] of typed [`Value`] cells. The import pipeline turns
//! those rows into [`DevelopmentDraft`]s with nested [`UnitDraft`]s, and the commit path hands
//! them to a repository as [`NewDevelopment`] / [`NewUnit`] records, getting back
//! identifier-bearing [`Development`] / [`Unit`] records.

use serde::{Deserialize, Serialize};

/// A single typed cell value as read from the source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Missing/empty value.
    Null,
    /// 64-bit signed integer.
    Int64(i64),
    /// 64-bit float.
    Float64(f64),
    /// Boolean.
    Bool(bool),
    /// UTF-8 string.
    Utf8(String),
}

impl Value {
    /// Returns `true` for [`Value::Null`] and for strings that are blank after trimming.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Utf8(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

/// One data row of an uploaded table.
///
/// `cells` are positionally aligned to [`RawTable::headers`]; a row may be shorter than the
/// header row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line number in the source file (the header row has its own line number).
    pub line: usize,
    /// Cell values in column order.
    pub cells: Vec<Value>,
}

impl RawRow {
    /// Create a row from its source line number and cells.
    pub fn new(line: usize, cells: Vec<Value>) -> Self {
        Self { line, cells }
    }

    /// Returns `true` when every cell is empty.
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(Value::is_blank)
    }
}

/// In-memory tabular input: the header row plus all data rows, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Raw header strings, as written in the file.
    pub headers: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    /// Create a table from headers and rows.
    pub fn new(headers: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from string literals, numbering data lines from 2 (header on line 1).
    ///
    /// Empty strings become [`Value::Null`]. Handy for tests and for callers that already hold
    /// the grid in memory.
    pub fn from_strings(headers: &[&str], rows: &[&[&str]]) -> Self {
        let headers = headers.iter().map(|h| h.to_string()).collect();
        let rows = rows
            .iter()
            .enumerate()
            .map(|(idx0, cells)| {
                let cells = cells
                    .iter()
                    .map(|c| {
                        if c.is_empty() {
                            Value::Null
                        } else {
                            Value::Utf8(c.to_string())
                        }
                    })
                    .collect();
                RawRow::new(idx0 + 2, cells)
            })
            .collect();
        Self { headers, rows }
    }

    /// Number of data rows (header excluded).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Publication state of a development. Imported developments start as [`Self::Awaiting`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PublicationStatus {
    /// Not yet published.
    #[default]
    #[serde(rename = "aguardando")]
    Awaiting,
    /// Visible in listings.
    #[serde(rename = "publicado")]
    Published,
    /// Publication window elapsed.
    #[serde(rename = "expirado")]
    Expired,
}

/// A development (empreendimento) assembled from one or more rows, not yet persisted.
///
/// Within one import, `(name, postal_code)` identifies at most one draft.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DevelopmentDraft {
    pub name: String,
    /// Defaults to `name` when the file has no company column or the cell is blank.
    pub company_name: String,
    /// Canonically `DDDDD-DDD` when the source held eight digits.
    pub postal_code: String,
    pub address: Option<String>,
    pub note: Option<String>,
    pub building_company_id: Option<i64>,
    /// Line of the first row that mentioned this development.
    pub source_line: usize,
    /// Units in row encounter order.
    pub units: Vec<UnitDraft>,
}

impl DevelopmentDraft {
    /// The deduplication key for this draft.
    pub fn key(&self) -> (&str, &str) {
        (&self.name, &self.postal_code)
    }

    /// Fields handed to the repository when committing this draft.
    pub fn to_new_development(&self) -> NewDevelopment {
        NewDevelopment {
            name: self.name.clone(),
            company_name: self.company_name.clone(),
            postal_code: self.postal_code.clone(),
            address: self.address.clone(),
            note: self.note.clone(),
            building_company_id: self.building_company_id,
            status: PublicationStatus::Awaiting,
        }
    }
}

/// A sellable unit read from a row, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDraft {
    pub number: String,
    pub area_m2: Option<f64>,
    pub sale_price: Option<f64>,
    /// Free-text label; `"outros"` when the cell is blank.
    pub payment_mechanism: String,
    pub source_line: usize,
}

impl UnitDraft {
    /// Fields handed to the repository, attached to the persisted parent `development_id`.
    pub fn to_new_unit(&self, development_id: i64) -> NewUnit {
        NewUnit {
            development_id,
            number: self.number.clone(),
            area_m2: self.area_m2,
            sale_price: self.sale_price,
            payment_mechanism: self.payment_mechanism.clone(),
        }
    }
}

/// Input to [`crate::persistence::DevelopmentRepository::create_development`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDevelopment {
    pub name: String,
    pub company_name: String,
    pub postal_code: String,
    pub address: Option<String>,
    pub note: Option<String>,
    pub building_company_id: Option<i64>,
    pub status: PublicationStatus,
}

/// A persisted development.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Development {
    pub id: i64,
    pub name: String,
    pub company_name: String,
    pub postal_code: String,
    pub address: Option<String>,
    pub note: Option<String>,
    pub building_company_id: Option<i64>,
    pub status: PublicationStatus,
}

impl Development {
    /// Attach a generated identifier to the submitted fields.
    pub fn from_new(id: i64, new: &NewDevelopment) -> Self {
        Self {
            id,
            name: new.name.clone(),
            company_name: new.company_name.clone(),
            postal_code: new.postal_code.clone(),
            address: new.address.clone(),
            note: new.note.clone(),
            building_company_id: new.building_company_id,
            status: new.status,
        }
    }
}

/// A building company (construtora) developments can be attached to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingCompany {
    pub id: i64,
    pub name: String,
}

/// Input to [`crate::persistence::DevelopmentRepository::create_unit`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUnit {
    pub development_id: i64,
    pub number: String,
    pub area_m2: Option<f64>,
    pub sale_price: Option<f64>,
    pub payment_mechanism: String,
}

/// A persisted unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub development_id: i64,
    pub number: String,
    pub area_m2: Option<f64>,
    pub sale_price: Option<f64>,
    pub payment_mechanism: String,
}

impl Unit {
    /// Attach a generated identifier to the submitted fields.
    pub fn from_new(id: i64, new: &NewUnit) -> Self {
        Self {
            id,
            development_id: new.development_id,
            number: new.number.clone(),
            area_m2: new.area_m2,
            sale_price: new.sale_price,
            payment_mechanism: new.payment_mechanism.clone(),
        }
    }
}
