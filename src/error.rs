use thiserror::Error;

/// Convenience result type for reading an uploaded table.
pub type IngestionResult<T> = Result<T, IngestionError>;

/// Error type returned when an uploaded file cannot be read at all.
///
/// Only whole-file failures live here. Problems with individual rows, developments or units are
/// collected as [`crate::import::ImportIssue`]s in the import report instead.
#[derive(Debug, Error)]
pub enum IngestionError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "excel")]
    /// Workbook read error (feature-gated behind `excel`).
    #[error("excel error: {0}")]
    Excel(#[from] calamine::Error),

    /// CSV read error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// The file format could not be determined or is not supported.
    #[error("unsupported format: {message}")]
    Format { message: String },

    /// The file has no header row.
    #[error("empty input: {message}")]
    EmptyInput { message: String },
}

/// Error reported by a [`crate::persistence::DevelopmentRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The store rejected the record (uniqueness, foreign key, not-null...).
    #[error("constraint violation: {0}")]
    Constraint(String),

    /// The referenced parent record does not exist.
    #[error("record not found: {0}")]
    NotFound(String),

    /// The store could not be reached or failed internally.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
