//! The import pipeline: header resolution, row grouping, then preview or commit.
//!
//! Entry points come in three shapes:
//!
//! - [`preview`] / [`commit`] over an already-read [`crate::types::RawTable`]
//! - [`preview_from_path`] / [`commit_from_path`] for files on disk
//! - [`preview_upload`] / [`commit_upload`] for in-memory upload bodies
//!
//! Row, development and unit failures never abort a batch; they are reported as
//! [`ImportIssue`]s next to whatever was grouped or persisted.

pub mod grouping;
pub mod pipeline;
pub mod report;

pub use grouping::{group_rows, Grouping, RowGrouper, DEFAULT_PAYMENT_MECHANISM};
pub use pipeline::{
    commit, commit_from_path, commit_upload, preview, preview_from_path, preview_upload,
    structural_issues,
};
pub use report::{
    CommitReport, ImportIssue, ImportMode, ImportReport, IssueKind, PersistedDevelopment,
    PreviewReport,
};
