use std::sync::{Arc, Mutex};

use obras_his_ingest::import::{commit, preview, preview_from_path, ImportIssue, ImportMode};
use obras_his_ingest::ingestion::{
    CompositeObserver, FileObserver, ImportContext, ImportFormat, ImportObserver, ImportOptions,
    ImportSeverity, ImportStats,
};
use obras_his_ingest::persistence::InMemoryRepository;
use obras_his_ingest::types::RawTable;
use obras_his_ingest::IngestionError;

#[derive(Default)]
struct RecordingObserver {
    completed: Mutex<Vec<(ImportMode, ImportStats)>>,
    issues: Mutex<Vec<ImportSeverity>>,
    failures: Mutex<Vec<ImportSeverity>>,
    alerts: Mutex<Vec<ImportSeverity>>,
}

impl ImportObserver for RecordingObserver {
    fn on_complete(&self, ctx: &ImportContext, stats: ImportStats) {
        self.completed.lock().unwrap().push((ctx.mode, stats));
    }

    fn on_issue(&self, _ctx: &ImportContext, severity: ImportSeverity, _issue: &ImportIssue) {
        self.issues.lock().unwrap().push(severity);
    }

    fn on_failure(&self, _ctx: &ImportContext, severity: ImportSeverity, _error: &IngestionError) {
        self.failures.lock().unwrap().push(severity);
    }

    fn on_alert(&self, _ctx: &ImportContext, severity: ImportSeverity, _message: &str) {
        self.alerts.lock().unwrap().push(severity);
    }
}

fn options_with(obs: Arc<RecordingObserver>, threshold: ImportSeverity) -> ImportOptions {
    ImportOptions {
        observer: Some(obs),
        alert_at_or_above: threshold,
        ..Default::default()
    }
}

fn table_with_one_bad_row() -> RawTable {
    RawTable::from_strings(
        &["Nome", "CEP", "Unidade"],
        &[&["Alfa", "70000000", "1"], &["", "", "2"]],
    )
}

#[test]
fn observer_receives_failure_and_alert_on_critical_io_error() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = ImportOptions {
        format: Some(ImportFormat::Csv),
        ..options_with(obs.clone(), ImportSeverity::Critical)
    };

    let _ = preview_from_path("tests/fixtures/does_not_exist.csv", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![ImportSeverity::Critical]);
    assert_eq!(*obs.alerts.lock().unwrap(), vec![ImportSeverity::Critical]);
    assert!(obs.completed.lock().unwrap().is_empty());
}

#[test]
fn unknown_extension_is_an_error_without_alert() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), ImportSeverity::Critical);

    let _ = preview_from_path("tests/fixtures/developments.json", &opts).unwrap_err();

    assert_eq!(*obs.failures.lock().unwrap(), vec![ImportSeverity::Error]);
    assert!(obs.alerts.lock().unwrap().is_empty());
}

#[test]
fn row_issues_are_warnings_and_complete_carries_stats() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), ImportSeverity::Critical);

    let report = preview(&table_with_one_bad_row(), &opts);
    assert_eq!(report.issues.len(), 1);

    assert_eq!(*obs.issues.lock().unwrap(), vec![ImportSeverity::Warning]);
    assert!(obs.alerts.lock().unwrap().is_empty());
    assert_eq!(
        *obs.completed.lock().unwrap(),
        vec![(
            ImportMode::Preview,
            ImportStats {
                rows: 2,
                developments: 1,
                units: 1,
                issues: 1
            }
        )]
    );
}

#[test]
fn alert_threshold_is_inclusive() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), ImportSeverity::Warning);

    let mut repo = InMemoryRepository::new();
    let _ = commit(&table_with_one_bad_row(), &mut repo, &opts);

    assert_eq!(*obs.alerts.lock().unwrap(), vec![ImportSeverity::Warning]);
    let completed = obs.completed.lock().unwrap();
    assert_eq!(completed[0].0, ImportMode::Commit);
    assert_eq!(completed[0].1.developments, 1);
}

#[test]
fn structural_issues_are_errors() {
    let obs = Arc::new(RecordingObserver::default());
    let opts = options_with(obs.clone(), ImportSeverity::Error);
    let table = RawTable::from_strings(&["Unidade"], &[&["1"]]);

    let _ = preview(&table, &opts);

    assert_eq!(
        *obs.issues.lock().unwrap(),
        vec![ImportSeverity::Error, ImportSeverity::Error]
    );
    assert_eq!(obs.alerts.lock().unwrap().len(), 2);
}

#[test]
fn composite_fans_out_and_file_observer_appends() {
    let log = std::env::temp_dir().join(format!(
        "obras-his-ingest-observer-{}.log",
        std::process::id()
    ));
    let _ = std::fs::remove_file(&log);

    let recorder = Arc::new(RecordingObserver::default());
    let composite = CompositeObserver::new(vec![
        recorder.clone() as Arc<dyn ImportObserver>,
        Arc::new(FileObserver::new(&log)) as Arc<dyn ImportObserver>,
    ]);
    let opts = ImportOptions {
        observer: Some(Arc::new(composite)),
        ..Default::default()
    };

    let _ = preview(&table_with_one_bad_row(), &opts);

    assert_eq!(recorder.completed.lock().unwrap().len(), 1);
    let text = std::fs::read_to_string(&log).unwrap();
    assert!(text.contains("issue severity=Warning"));
    assert!(text.contains("line 3"));
    assert!(text.contains("ok mode=Preview"));
    let _ = std::fs::remove_file(&log);
}
