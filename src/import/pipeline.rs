//! Preview and commit entrypoints.
//!
//! Every import runs the same stages:
//!
//! 1. structural check: resolve headers; without a development-name column, or without both a
//!    postal-code and an address column, the batch is invalid and no row is processed
//! 2. row processing: [`group_rows`] folds rows into developments, recording one issue per
//!    skipped row
//! 3. result assembly: a [`PreviewReport`] as-is, or (commit) each development persisted through
//!    a [`DevelopmentRepository`], then each of its units
//!
//! Failures stay local to the row, development or unit they came from. Only an unreadable file
//! surfaces as `Err`, from the `*_from_path` / `*_upload` variants.

use std::path::Path;

use crate::error::{IngestionError, IngestionResult};
use crate::ingestion::{
    infer_format_from_path, read_table_from_bytes, read_table_from_path, severity_for_error,
    ImportContext, ImportOptions, ImportStats,
};
use crate::normalize::{resolve_headers, CanonicalField, ColumnIndexMap, HeaderVariantTable};
use crate::persistence::DevelopmentRepository;
use crate::types::RawTable;

use super::grouping::{group_rows, Grouping};
use super::report::{
    CommitReport, ImportIssue, ImportMode, PersistedDevelopment, PreviewReport,
};

/// Validate and group `table` without persisting anything.
pub fn preview(table: &RawTable, options: &ImportOptions) -> PreviewReport {
    let ctx = memory_context(ImportMode::Preview);
    run_preview(table, &ctx, options)
}

/// Group `table` and persist the result through `repo`.
pub fn commit<R>(table: &RawTable, repo: &mut R, options: &ImportOptions) -> CommitReport
where
    R: DevelopmentRepository + ?Sized,
{
    let ctx = memory_context(ImportMode::Commit);
    run_commit(table, repo, &ctx, options)
}

/// Read a file and preview it.
///
/// # Examples
///
/// ```no_run
/// use obras_his_ingest::import::preview_from_path;
/// use obras_his_ingest::ingestion::ImportOptions;
///
/// # fn main() -> Result<(), obras_his_ingest::IngestionError> {
/// let report = preview_from_path("planilha.xlsx", &ImportOptions::default())?;
/// println!(
///     "valid={} developments={} units={}",
///     report.valid, report.development_count, report.unit_count
/// );
/// for issue in &report.issues {
///     println!("{issue}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn preview_from_path(path: impl AsRef<Path>, options: &ImportOptions) -> IngestionResult<PreviewReport> {
    let path = path.as_ref();
    let ctx = file_context(path, ImportMode::Preview, options);
    let table = observe_read(read_table_from_path(path, options), &ctx, options)?;
    Ok(run_preview(&table, &ctx, options))
}

/// Read a file and commit it through `repo`.
pub fn commit_from_path<R>(
    path: impl AsRef<Path>,
    repo: &mut R,
    options: &ImportOptions,
) -> IngestionResult<CommitReport>
where
    R: DevelopmentRepository + ?Sized,
{
    let path = path.as_ref();
    let ctx = file_context(path, ImportMode::Commit, options);
    let table = observe_read(read_table_from_path(path, options), &ctx, options)?;
    Ok(run_commit(&table, repo, &ctx, options))
}

/// Preview an uploaded file body. `file_name` selects the format unless `options.format` is set.
pub fn preview_upload(file_name: &str, bytes: &[u8], options: &ImportOptions) -> IngestionResult<PreviewReport> {
    let ctx = file_context(Path::new(file_name), ImportMode::Preview, options);
    let table = observe_read(read_table_from_bytes(file_name, bytes, options), &ctx, options)?;
    Ok(run_preview(&table, &ctx, options))
}

/// Commit an uploaded file body through `repo`.
pub fn commit_upload<R>(
    file_name: &str,
    bytes: &[u8],
    repo: &mut R,
    options: &ImportOptions,
) -> IngestionResult<CommitReport>
where
    R: DevelopmentRepository + ?Sized,
{
    let ctx = file_context(Path::new(file_name), ImportMode::Commit, options);
    let table = observe_read(read_table_from_bytes(file_name, bytes, options), &ctx, options)?;
    Ok(run_commit(&table, repo, &ctx, options))
}

/// Header-level problems that make row processing pointless.
pub fn structural_issues(columns: &ColumnIndexMap, table: &HeaderVariantTable) -> Vec<ImportIssue> {
    let mut issues = Vec::new();
    if !columns.contains(CanonicalField::NomeEmpreendimento) {
        issues.push(ImportIssue::structural(format!(
            "no development name column (accepted headers: {})",
            accepted_headers(table, CanonicalField::NomeEmpreendimento)
        )));
    }
    if !columns.contains(CanonicalField::Cep) && !columns.contains(CanonicalField::Endereco) {
        issues.push(ImportIssue::structural(format!(
            "no postal code or address column (accepted headers: {}; {})",
            accepted_headers(table, CanonicalField::Cep),
            accepted_headers(table, CanonicalField::Endereco)
        )));
    }
    issues
}

fn run_preview(table: &RawTable, ctx: &ImportContext, options: &ImportOptions) -> PreviewReport {
    let report = match prepare(table, options) {
        Ok(grouping) => PreviewReport::new(table.row_count(), grouping.developments, grouping.issues),
        Err(issues) => PreviewReport::new(table.row_count(), Vec::new(), issues),
    };
    notify(&report.issues, report.stats(), ctx, options);
    report
}

fn run_commit<R>(table: &RawTable, repo: &mut R, ctx: &ImportContext, options: &ImportOptions) -> CommitReport
where
    R: DevelopmentRepository + ?Sized,
{
    let report = match prepare(table, options) {
        Ok(grouping) => persist(table.row_count(), grouping, repo),
        Err(issues) => CommitReport::new(table.row_count(), Vec::new(), issues),
    };
    notify(&report.issues, report.stats(), ctx, options);
    report
}

fn prepare(table: &RawTable, options: &ImportOptions) -> Result<Grouping, Vec<ImportIssue>> {
    let variants = options.header_table();
    let columns = resolve_headers(&table.headers, variants);
    let structural = structural_issues(&columns, variants);
    if !structural.is_empty() {
        tracing::warn!(headers = ?table.headers, "header row rejected");
        return Err(structural);
    }

    let grouping = group_rows(table, &columns);
    tracing::debug!(
        rows = table.row_count(),
        developments = grouping.developments.len(),
        skipped = grouping.issues.len(),
        "rows grouped"
    );
    Ok(grouping)
}

fn persist<R>(rows_read: usize, grouping: Grouping, repo: &mut R) -> CommitReport
where
    R: DevelopmentRepository + ?Sized,
{
    let Grouping {
        developments: drafts,
        mut issues,
    } = grouping;
    let mut persisted = Vec::with_capacity(drafts.len());

    for draft in &drafts {
        let development = match repo.create_development(&draft.to_new_development()) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(name = %draft.name, error = %e, "development not persisted");
                issues.push(ImportIssue::development(
                    &draft.name,
                    format!(
                        "failed to persist (postal code {}): {e}; {} unit(s) skipped",
                        draft.postal_code,
                        draft.units.len()
                    ),
                ));
                continue;
            }
        };
        tracing::debug!(id = development.id, name = %development.name, "development persisted");

        let mut units = Vec::with_capacity(draft.units.len());
        for unit in &draft.units {
            match repo.create_unit(&unit.to_new_unit(development.id)) {
                Ok(u) => units.push(u),
                Err(e) => {
                    tracing::warn!(name = %draft.name, unit = %unit.number, error = %e, "unit not persisted");
                    issues.push(ImportIssue::unit(
                        &draft.name,
                        &unit.number,
                        format!("failed to persist (line {}): {e}", unit.source_line),
                    ));
                }
            }
        }
        persisted.push(PersistedDevelopment { development, units });
    }

    CommitReport::new(rows_read, persisted, issues)
}

fn notify(issues: &[ImportIssue], stats: ImportStats, ctx: &ImportContext, options: &ImportOptions) {
    let Some(obs) = options.observer.as_ref() else {
        return;
    };
    for issue in issues {
        let sev = issue.severity();
        obs.on_issue(ctx, sev, issue);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, &issue.to_string());
        }
    }
    obs.on_complete(ctx, stats);
}

fn observe_read<T>(
    result: IngestionResult<T>,
    ctx: &ImportContext,
    options: &ImportOptions,
) -> Result<T, IngestionError> {
    if let (Err(e), Some(obs)) = (&result, options.observer.as_ref()) {
        let sev = severity_for_error(e);
        obs.on_failure(ctx, sev, e);
        if sev >= options.alert_at_or_above {
            obs.on_alert(ctx, sev, &e.to_string());
        }
    }
    result
}

fn memory_context(mode: ImportMode) -> ImportContext {
    ImportContext {
        source: None,
        format: None,
        mode,
    }
}

fn file_context(path: &Path, mode: ImportMode, options: &ImportOptions) -> ImportContext {
    ImportContext {
        source: Some(path.to_path_buf()),
        format: options.format.or_else(|| infer_format_from_path(path).ok()),
        mode,
    }
}

fn accepted_headers(table: &HeaderVariantTable, field: CanonicalField) -> String {
    table
        .entries()
        .iter()
        .filter(|e| e.field == field)
        .flat_map(|e| e.variants.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(", ")
}
