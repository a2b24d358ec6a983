//! Header resolution: map raw spreadsheet headers to canonical fields.
//!
//! Uploaded files name the same column in many ways (`"Nome do Empreendimento"`, `"projeto"`,
//! `"EMPRESA"`, `"área"`...). A [`HeaderVariantTable`] lists the accepted spellings for each
//! [`CanonicalField`], and [`resolve_headers`] turns a header row into a [`ColumnIndexMap`].

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::text::normalize_text;

/// Logical fields the import pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    NomeEmpreendimento,
    #[serde(rename = "CEP")]
    Cep,
    Endereco,
    NumeroUnidade,
    TamanhoM2,
    PrecoVenda,
    MecanismoPagamento,
    NomeEmpresa,
    Observacao,
    #[serde(rename = "ConstrutoraID")]
    ConstrutoraId,
}

impl CanonicalField {
    /// Canonical field name as used in templates and error messages.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NomeEmpreendimento => "NomeEmpreendimento",
            Self::Cep => "CEP",
            Self::Endereco => "Endereco",
            Self::NumeroUnidade => "NumeroUnidade",
            Self::TamanhoM2 => "TamanhoM2",
            Self::PrecoVenda => "PrecoVenda",
            Self::MecanismoPagamento => "MecanismoPagamento",
            Self::NomeEmpresa => "NomeEmpresa",
            Self::Observacao => "Observacao",
            Self::ConstrutoraId => "ConstrutoraID",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of a [`HeaderVariantTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderVariants {
    pub field: CanonicalField,
    pub variants: Vec<String>,
}

/// Ordered table of accepted header spellings per canonical field.
///
/// Order matters: when one header could match several fields, the field listed first claims it.
/// The table is read-only once built; the built-in one is shared through [`Self::builtin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderVariantTable {
    entries: Vec<HeaderVariants>,
}

static BUILTIN: LazyLock<HeaderVariantTable> = LazyLock::new(|| {
    use CanonicalField::*;

    HeaderVariantTable::new(vec![
        (
            NomeEmpreendimento,
            &[
                "NomeEmpreendimento",
                "nome_empreendimento",
                "Nome do Empreendimento",
                "Nome Empreendimento",
                "Empreendimento",
                "Nome",
                "Projeto",
                "Residencial",
            ][..],
        ),
        (
            Cep,
            &["CEP", "cep_empreendimento", "Código Postal", "Codigo Postal"][..],
        ),
        (
            Endereco,
            &[
                "Endereco",
                "Endereço",
                "Endereço Completo",
                "Endereco Completo",
                "Logradouro",
                "Rua",
                "Local",
                "Localização",
                "Localizacao",
            ][..],
        ),
        (
            NumeroUnidade,
            &[
                "NumeroUnidade",
                "numero_unidade",
                "Número da Unidade",
                "Numero da Unidade",
                "Unidade",
                "Apartamento",
                "Apto",
                "Apt",
                "Casa",
                "Lote",
            ][..],
        ),
        (
            TamanhoM2,
            &[
                "TamanhoM2",
                "tamanho_m2",
                "Tamanho (m²)",
                "Tamanho",
                "Área",
                "Area",
                "Área (m²)",
                "Metragem",
                "m²",
                "m2",
            ][..],
        ),
        (
            PrecoVenda,
            &[
                "PrecoVenda",
                "preco_venda",
                "Preço de Venda",
                "Preco de Venda",
                "Preço",
                "Preco",
                "Valor",
                "Valor de Venda",
            ][..],
        ),
        (
            MecanismoPagamento,
            &[
                "MecanismoPagamento",
                "mecanismo_pagamento",
                "Mecanismo de Pagamento",
                "Forma de Pagamento",
                "forma_pagamento",
                "forma_pagto",
                "Pagamento",
            ][..],
        ),
        (
            NomeEmpresa,
            &[
                "NomeEmpresa",
                "nome_empresa",
                "Nome da Empresa",
                "Empresa",
                "Construtora",
                "Incorporadora",
            ][..],
        ),
        (
            Observacao,
            &[
                "Observacao",
                "Observação",
                "Observacoes",
                "Observações",
                "Obs",
                "Notas",
                "Descrição",
                "Descricao",
            ][..],
        ),
        (
            ConstrutoraId,
            &["ConstrutoraID", "construtora_id", "ID Construtora", "id_construtora"][..],
        ),
    ])
});

impl HeaderVariantTable {
    /// Build a table from `(field, spellings)` pairs, in priority order.
    pub fn new(entries: Vec<(CanonicalField, &[&str])>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(field, variants)| HeaderVariants {
                    field,
                    variants: variants.iter().map(|v| v.to_string()).collect(),
                })
                .collect(),
        }
    }

    /// The built-in table covering the header dialects seen in uploaded spreadsheets.
    pub fn builtin() -> &'static HeaderVariantTable {
        &BUILTIN
    }

    /// Parse a table from JSON: `[{"field": "CEP", "variants": ["cep", "código postal"]}, ...]`.
    pub fn from_json_str(input: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(input)
    }

    /// Read a JSON table from disk.
    pub fn from_json_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text).map_err(std::io::Error::other)
    }

    /// Entries in priority order.
    pub fn entries(&self) -> &[HeaderVariants] {
        &self.entries
    }
}

impl Default for HeaderVariantTable {
    fn default() -> Self {
        Self::builtin().clone()
    }
}

/// Canonical field -> zero-based column position, resolved once per file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnIndexMap {
    columns: HashMap<CanonicalField, usize>,
}

impl ColumnIndexMap {
    /// Column index of `field`, if a header resolved to it.
    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn contains(&self, field: CanonicalField) -> bool {
        self.columns.contains_key(&field)
    }

    /// Number of resolved fields.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Resolve raw header strings against `table`.
///
/// Matching ignores case, surrounding whitespace and Unicode composition. For each field (in
/// table order) the leftmost matching header wins; a column already claimed by an earlier field
/// is not reused. Unmatched fields are simply absent.
pub fn resolve_headers(headers: &[String], table: &HeaderVariantTable) -> ColumnIndexMap {
    let keys: Vec<String> = headers.iter().map(|h| header_key(h)).collect();
    let mut claimed: HashSet<usize> = HashSet::new();
    let mut columns = HashMap::new();

    for entry in &table.entries {
        let accepted: HashSet<String> = entry.variants.iter().map(|v| header_key(v)).collect();
        let hit = keys
            .iter()
            .enumerate()
            .find(|(idx, key)| !key.is_empty() && !claimed.contains(idx) && accepted.contains(*key))
            .map(|(idx, _)| idx);

        if let Some(idx) = hit {
            claimed.insert(idx);
            columns.insert(entry.field, idx);
        }
    }

    ColumnIndexMap { columns }
}

fn header_key(raw: &str) -> String {
    normalize_text(raw).to_lowercase()
}
