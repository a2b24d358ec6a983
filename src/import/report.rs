//! Issues and reports produced by an import.

use std::fmt;

use serde::Serialize;

use crate::ingestion::{ImportSeverity, ImportStats};
use crate::types::{Development, DevelopmentDraft, Unit};

/// Which terminal behavior an import ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportMode {
    /// Validate and shape the data; nothing is persisted.
    Preview,
    /// Persist developments, then their units.
    Commit,
}

/// Where an [`ImportIssue`] originated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum IssueKind {
    /// Required columns are missing from the header row; no row was processed.
    Structural,
    /// A data row was skipped.
    Row { line: usize },
    /// A development could not be persisted; its units were skipped.
    Development { name: String },
    /// A single unit could not be persisted.
    Unit { development: String, unit: String },
}

/// A localized, human-readable problem recorded during an import.
///
/// Issues never abort the batch; they are returned alongside whatever was grouped or persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportIssue {
    #[serde(flatten)]
    pub kind: IssueKind,
    pub message: String,
}

impl ImportIssue {
    pub fn structural(message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Structural,
            message: message.into(),
        }
    }

    pub fn row(line: usize, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Row { line },
            message: message.into(),
        }
    }

    pub fn development(name: &str, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Development {
                name: name.to_string(),
            },
            message: message.into(),
        }
    }

    pub fn unit(development: &str, unit: &str, message: impl Into<String>) -> Self {
        Self {
            kind: IssueKind::Unit {
                development: development.to_string(),
                unit: unit.to_string(),
            },
            message: message.into(),
        }
    }

    /// Severity used for observer callbacks: skipped rows warn, everything else is an error.
    pub fn severity(&self) -> ImportSeverity {
        match self.kind {
            IssueKind::Row { .. } => ImportSeverity::Warning,
            IssueKind::Structural | IssueKind::Development { .. } | IssueKind::Unit { .. } => {
                ImportSeverity::Error
            }
        }
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Structural => write!(f, "header row: {}", self.message),
            IssueKind::Row { line } => write!(f, "line {line}: {}", self.message),
            IssueKind::Development { name } => write!(f, "development '{name}': {}", self.message),
            IssueKind::Unit { development, unit } => {
                write!(f, "development '{development}' unit '{unit}': {}", self.message)
            }
        }
    }
}

/// Result of a preview: grouped drafts, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PreviewReport {
    /// `true` only when no issue of any kind was recorded.
    pub valid: bool,
    pub rows_read: usize,
    pub development_count: usize,
    pub unit_count: usize,
    /// Developments in first-encounter order, each with its units.
    pub developments: Vec<DevelopmentDraft>,
    pub issues: Vec<ImportIssue>,
}

impl PreviewReport {
    pub(crate) fn new(rows_read: usize, developments: Vec<DevelopmentDraft>, issues: Vec<ImportIssue>) -> Self {
        let unit_count = developments.iter().map(|d| d.units.len()).sum();
        Self {
            valid: issues.is_empty(),
            rows_read,
            development_count: developments.len(),
            unit_count,
            developments,
            issues,
        }
    }

    pub fn stats(&self) -> ImportStats {
        ImportStats {
            rows: self.rows_read,
            developments: self.development_count,
            units: self.unit_count,
            issues: self.issues.len(),
        }
    }
}

/// A development as stored, with the units stored under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PersistedDevelopment {
    #[serde(flatten)]
    pub development: Development,
    pub units: Vec<Unit>,
}

/// Result of a commit: what was persisted, plus every localized failure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommitReport {
    pub rows_read: usize,
    pub developments_created: usize,
    pub units_created: usize,
    /// Persisted developments in first-encounter order.
    pub developments: Vec<PersistedDevelopment>,
    pub issues: Vec<ImportIssue>,
}

impl CommitReport {
    pub(crate) fn new(rows_read: usize, developments: Vec<PersistedDevelopment>, issues: Vec<ImportIssue>) -> Self {
        let units_created = developments.iter().map(|d| d.units.len()).sum();
        Self {
            rows_read,
            developments_created: developments.len(),
            units_created,
            developments,
            issues,
        }
    }

    pub fn stats(&self) -> ImportStats {
        ImportStats {
            rows: self.rows_read,
            developments: self.developments_created,
            units: self.units_created,
            issues: self.issues.len(),
        }
    }
}

/// Either terminal result, tagged by mode when serialized.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ImportReport {
    Preview(PreviewReport),
    Commit(CommitReport),
}

impl ImportReport {
    pub fn mode(&self) -> ImportMode {
        match self {
            Self::Preview(_) => ImportMode::Preview,
            Self::Commit(_) => ImportMode::Commit,
        }
    }

    pub fn issues(&self) -> &[ImportIssue] {
        match self {
            Self::Preview(r) => &r.issues,
            Self::Commit(r) => &r.issues,
        }
    }

    /// Counters in the shape observers receive.
    pub fn stats(&self) -> ImportStats {
        match self {
            Self::Preview(r) => r.stats(),
            Self::Commit(r) => r.stats(),
        }
    }
}

impl From<PreviewReport> for ImportReport {
    fn from(r: PreviewReport) -> Self {
        Self::Preview(r)
    }
}

impl From<CommitReport> for ImportReport {
    fn from(r: CommitReport) -> Self {
        Self::Commit(r)
    }
}
