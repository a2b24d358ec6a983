//! Grouping flat rows into developments with nested units.

use std::collections::HashMap;

use crate::normalize::{
    cell_text, extract_postal_code, normalize_optional, normalize_text, parse_decimal,
    parse_integer, postal_code_from_cell, strip_postal_code, CanonicalField, ColumnIndexMap,
};
use crate::types::{DevelopmentDraft, RawRow, RawTable, UnitDraft};

use super::report::ImportIssue;

/// Payment mechanism recorded for units whose cell is blank.
pub const DEFAULT_PAYMENT_MECHANISM: &str = "outros";

/// Output of [`group_rows`].
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping {
    /// Developments in first-encounter order.
    pub developments: Vec<DevelopmentDraft>,
    /// One issue per skipped row, in file order.
    pub issues: Vec<ImportIssue>,
}

/// Accumulates rows into [`DevelopmentDraft`]s keyed by `(name, postal code)`.
///
/// Rows must be pushed in file order: unit order within a development and development order
/// in the output both follow encounter order.
#[derive(Debug)]
pub struct RowGrouper<'a> {
    columns: &'a ColumnIndexMap,
    drafts: Vec<DevelopmentDraft>,
    by_key: HashMap<(String, String), usize>,
    issues: Vec<ImportIssue>,
}

impl<'a> RowGrouper<'a> {
    pub fn new(columns: &'a ColumnIndexMap) -> Self {
        Self {
            columns,
            drafts: Vec::new(),
            by_key: HashMap::new(),
            issues: Vec::new(),
        }
    }

    /// Fold one row into the groups. Never fails: unusable rows become issues.
    pub fn push_row(&mut self, row: &RawRow) {
        if row.is_blank() {
            return;
        }

        let name = normalize_optional(self.text(row, CanonicalField::NomeEmpreendimento));
        let (postal_code, address) = self.postal_code_and_address(row);

        let (name, postal_code) = match (name, postal_code) {
            (Some(name), Some(postal_code)) => (name, postal_code),
            (None, None) => {
                return self.skip(row, "development name and postal code not found");
            }
            (None, Some(_)) => return self.skip(row, "development name not found"),
            (Some(_), None) => {
                return self.skip(
                    row,
                    "postal code not found (no CEP value and none recognized in the address)",
                );
            }
        };

        let key = (name, postal_code);
        let idx = match self.by_key.get(&key) {
            Some(&idx) => idx,
            None => {
                let draft = self.new_draft(row, &key.0, &key.1, address);
                self.drafts.push(draft);
                let idx = self.drafts.len() - 1;
                self.by_key.insert(key, idx);
                idx
            }
        };

        if let Some(unit) = self.unit(row) {
            self.drafts[idx].units.push(unit);
        }
    }

    pub fn finish(self) -> Grouping {
        Grouping {
            developments: self.drafts,
            issues: self.issues,
        }
    }

    fn text(&self, row: &RawRow, field: CanonicalField) -> Option<String> {
        cell_text(row, self.columns.get(field))
    }

    // A dedicated CEP cell wins; otherwise the CEP is recovered from the address, which is then
    // cleaned of the fragment.
    fn postal_code_and_address(&self, row: &RawRow) -> (Option<String>, Option<String>) {
        let address = self.text(row, CanonicalField::Endereco);
        let dedicated = self
            .columns
            .get(CanonicalField::Cep)
            .and_then(|idx| row.cells.get(idx))
            .and_then(postal_code_from_cell);

        match dedicated {
            Some(cep) => (Some(normalize_text(&cep)), normalize_optional(address)),
            None => match address.as_deref().and_then(extract_postal_code) {
                Some(cep) => {
                    let cleaned = address.as_deref().map(strip_postal_code);
                    (Some(cep), normalize_optional(cleaned))
                }
                None => (None, normalize_optional(address)),
            },
        }
    }

    fn new_draft(
        &self,
        row: &RawRow,
        name: &str,
        postal_code: &str,
        address: Option<String>,
    ) -> DevelopmentDraft {
        DevelopmentDraft {
            name: name.to_string(),
            company_name: normalize_optional(self.text(row, CanonicalField::NomeEmpresa))
                .unwrap_or_else(|| name.to_string()),
            postal_code: postal_code.to_string(),
            address,
            note: normalize_optional(self.text(row, CanonicalField::Observacao)),
            building_company_id: self
                .text(row, CanonicalField::ConstrutoraId)
                .and_then(|v| parse_integer(&v)),
            source_line: row.line,
            units: Vec::new(),
        }
    }

    fn unit(&self, row: &RawRow) -> Option<UnitDraft> {
        let number = normalize_optional(self.text(row, CanonicalField::NumeroUnidade))?;
        Some(UnitDraft {
            number,
            area_m2: self
                .text(row, CanonicalField::TamanhoM2)
                .and_then(|v| parse_decimal(&v)),
            sale_price: self
                .text(row, CanonicalField::PrecoVenda)
                .and_then(|v| parse_decimal(&v)),
            payment_mechanism: normalize_optional(self.text(row, CanonicalField::MecanismoPagamento))
                .unwrap_or_else(|| DEFAULT_PAYMENT_MECHANISM.to_string()),
            source_line: row.line,
        })
    }

    fn skip(&mut self, row: &RawRow, message: &str) {
        tracing::debug!(line = row.line, reason = message, "row skipped");
        self.issues.push(ImportIssue::row(row.line, message));
    }
}

/// Group every row of `table` using an already-resolved column map.
pub fn group_rows(table: &RawTable, columns: &ColumnIndexMap) -> Grouping {
    let mut grouper = RowGrouper::new(columns);
    for row in &table.rows {
        grouper.push_row(row);
    }
    grouper.finish()
}
