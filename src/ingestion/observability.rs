use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::IngestionError;
use crate::import::{ImportIssue, ImportMode};

use super::unified::ImportFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImportSeverity {
    /// Informational event.
    Info,
    /// A row was skipped; the batch continues.
    Warning,
    /// A development or unit could not be persisted, or the file structure is unusable.
    Error,
    /// The file could not be read at all (typically I/O).
    Critical,
}

/// Context about an import attempt.
#[derive(Debug, Clone)]
pub struct ImportContext {
    /// Path or upload name of the source, when known.
    pub source: Option<PathBuf>,
    /// Format used for reading, when the input came from a file.
    pub format: Option<ImportFormat>,
    /// Preview or commit.
    pub mode: ImportMode,
}

/// Counters reported when an import completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportStats {
    /// Data rows read from the table.
    pub rows: usize,
    /// Developments found (preview) or created (commit).
    pub developments: usize,
    /// Units found (preview) or created (commit).
    pub units: usize,
    /// Issues recorded.
    pub issues: usize,
}

/// Observer interface for import outcomes.
///
/// Implementors can record metrics, logs, or trigger alerts. All methods default to no-ops.
pub trait ImportObserver: Send + Sync {
    /// Called once per import that produced a report (even one with issues).
    fn on_complete(&self, _ctx: &ImportContext, _stats: ImportStats) {}

    /// Called for every issue recorded in the report.
    fn on_issue(&self, _ctx: &ImportContext, _severity: ImportSeverity, _issue: &ImportIssue) {}

    /// Called when the source file cannot be read.
    fn on_failure(&self, _ctx: &ImportContext, _severity: ImportSeverity, _error: &IngestionError) {}

    /// Called when an issue or failure meets the alert threshold.
    fn on_alert(&self, _ctx: &ImportContext, _severity: ImportSeverity, _message: &str) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ImportObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn ImportObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl ImportObserver for CompositeObserver {
    fn on_complete(&self, ctx: &ImportContext, stats: ImportStats) {
        for o in &self.observers {
            o.on_complete(ctx, stats);
        }
    }

    fn on_issue(&self, ctx: &ImportContext, severity: ImportSeverity, issue: &ImportIssue) {
        for o in &self.observers {
            o.on_issue(ctx, severity, issue);
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &IngestionError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, message: &str) {
        for o in &self.observers {
            o.on_alert(ctx, severity, message);
        }
    }
}

/// Logs import events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl ImportObserver for StdErrObserver {
    fn on_complete(&self, ctx: &ImportContext, stats: ImportStats) {
        eprintln!(
            "[import][{:?}][ok] source={} rows={} developments={} units={} issues={}",
            ctx.mode,
            display_source(ctx),
            stats.rows,
            stats.developments,
            stats.units,
            stats.issues
        );
    }

    fn on_issue(&self, ctx: &ImportContext, severity: ImportSeverity, issue: &ImportIssue) {
        eprintln!(
            "[import][{:?}][{:?}] source={} {}",
            ctx.mode,
            severity,
            display_source(ctx),
            issue
        );
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &IngestionError) {
        eprintln!(
            "[import][{:?}][{:?}] format={:?} source={} err={}",
            ctx.mode,
            severity,
            ctx.format,
            display_source(ctx),
            error
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, message: &str) {
        eprintln!(
            "[ALERT][import][{:?}][{:?}] source={} {}",
            ctx.mode,
            severity,
            display_source(ctx),
            message
        );
    }
}

/// Forwards import events to `tracing`, for services that already install a subscriber.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl ImportObserver for TracingObserver {
    fn on_complete(&self, ctx: &ImportContext, stats: ImportStats) {
        tracing::info!(
            mode = ?ctx.mode,
            source = %display_source(ctx),
            rows = stats.rows,
            developments = stats.developments,
            units = stats.units,
            issues = stats.issues,
            "import finished"
        );
    }

    fn on_issue(&self, ctx: &ImportContext, severity: ImportSeverity, issue: &ImportIssue) {
        match severity {
            ImportSeverity::Info => tracing::info!(mode = ?ctx.mode, %issue, "import issue"),
            ImportSeverity::Warning => tracing::warn!(mode = ?ctx.mode, %issue, "import issue"),
            ImportSeverity::Error | ImportSeverity::Critical => {
                tracing::error!(mode = ?ctx.mode, %issue, "import issue")
            }
        }
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &IngestionError) {
        tracing::error!(
            mode = ?ctx.mode,
            ?severity,
            format = ?ctx.format,
            source = %display_source(ctx),
            %error,
            "import failed"
        );
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, message: &str) {
        tracing::error!(mode = ?ctx.mode, ?severity, alert = true, "{message}");
    }
}

/// Appends import events to a local log file.
#[derive(Debug)]
pub struct FileObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    /// Create a file observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append_line(&self, line: &str) {
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{line}");
        }
    }
}

impl ImportObserver for FileObserver {
    fn on_complete(&self, ctx: &ImportContext, stats: ImportStats) {
        self.append_line(&format!(
            "{} ok mode={:?} source={} rows={} developments={} units={} issues={}",
            unix_ts(),
            ctx.mode,
            display_source(ctx),
            stats.rows,
            stats.developments,
            stats.units,
            stats.issues
        ));
    }

    fn on_issue(&self, ctx: &ImportContext, severity: ImportSeverity, issue: &ImportIssue) {
        self.append_line(&format!(
            "{} issue severity={:?} mode={:?} source={} {}",
            unix_ts(),
            severity,
            ctx.mode,
            display_source(ctx),
            issue
        ));
    }

    fn on_failure(&self, ctx: &ImportContext, severity: ImportSeverity, error: &IngestionError) {
        self.append_line(&format!(
            "{} fail severity={:?} format={:?} source={} err={}",
            unix_ts(),
            severity,
            ctx.format,
            display_source(ctx),
            error
        ));
    }

    fn on_alert(&self, ctx: &ImportContext, severity: ImportSeverity, message: &str) {
        self.append_line(&format!(
            "{} ALERT severity={:?} mode={:?} source={} {}",
            unix_ts(),
            severity,
            ctx.mode,
            display_source(ctx),
            message
        ));
    }
}

fn display_source(ctx: &ImportContext) -> String {
    ctx.source
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<memory>".to_string())
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
