//! `obras-his-ingest` turns uploaded spreadsheets of real-estate developments (empreendimentos)
//! and their units into structured records, either as a dry-run preview or committed through a
//! repository.
//!
//! The primary entrypoints are [`import::preview_from_path`] and [`import::commit_from_path`]
//! (plus `*_upload` variants for in-memory request bodies). They auto-detect the format from the
//! file extension, or you can force one via [`ingestion::ImportOptions`].
//!
//! ## What the pipeline does
//!
//! - **Header resolution**: columns are matched against a table of accepted spellings per field
//!   ([`normalize::HeaderVariantTable`]), case-insensitively and after Unicode normalization.
//! - **Postal codes**: a dedicated `CEP` column is used when present and filled; otherwise the
//!   CEP is recovered from the free-text address, which is then cleaned of it.
//! - **Grouping**: rows sharing `(name, postal code)` become one development; each row with a
//!   unit number adds a unit to it, in file order.
//! - **Error isolation**: a malformed row, or a development/unit the repository rejects, is
//!   reported as an [`import::ImportIssue`] and the rest of the batch proceeds.
//!
//! **File formats (auto-detected by extension):**
//!
//! - **CSV**: `.csv`, `.txt` (`,` or `;` delimited, sniffed from the header line)
//! - **Excel/workbooks** (Cargo feature `excel`, on by default): `.xlsx`, `.xls`, `.xlsm`, `.xlsb`, `.ods`
//!
//! ## Quick example
//!
//! ```rust
//! use obras_his_ingest::import::{commit, preview};
//! use obras_his_ingest::ingestion::ImportOptions;
//! use obras_his_ingest::persistence::InMemoryRepository;
//! use obras_his_ingest::types::RawTable;
//!
//! let table = RawTable::from_strings(
//!     &["Nome do Empreendimento", "Endereço", "Unidade", "Área (m²)"],
//!     &[
//!         &["Residencial Ipê", "QR 104 - Samambaia/DF - 72302004", "101", "48,5"],
//!         &["Residencial Ipê", "QR 104 - Samambaia/DF - 72302004", "102", "52"],
//!     ],
//! );
//! let options = ImportOptions::default();
//!
//! let report = preview(&table, &options);
//! assert!(report.valid);
//! assert_eq!(report.development_count, 1);
//! assert_eq!(report.developments[0].postal_code, "72302-004");
//! assert_eq!(report.unit_count, 2);
//!
//! let mut repo = InMemoryRepository::new();
//! let committed = commit(&table, &mut repo, &options);
//! assert_eq!(committed.developments_created, 1);
//! assert_eq!(committed.units_created, 2);
//! assert!(repo.units().iter().all(|u| u.development_id == repo.developments()[0].id));
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: reading CSV and workbook uploads into [`types::RawTable`]s, import options,
//!   observer hooks
//! - [`normalize`]: header resolution, text/postal-code normalization, numeric coercion
//! - [`import`]: row grouping and the preview/commit pipeline
//! - [`persistence`]: the repository seam used by commit, with an in-memory implementation
//! - [`types`]: raw tables, drafts and persisted records
//! - [`error`]: error types

pub mod error;
pub mod import;
pub mod ingestion;
pub mod normalize;
pub mod persistence;
pub mod types;

pub use error::{IngestionError, IngestionResult, RepositoryError};
