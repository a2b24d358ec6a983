#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use obras_his_ingest::import::{commit_from_path, preview_from_path, preview_upload, IssueKind};
use obras_his_ingest::ingestion::excel::read_excel_from_path;
use obras_his_ingest::ingestion::{ExcelSheetSelection, ImportOptions};
use obras_his_ingest::persistence::InMemoryRepository;
use obras_his_ingest::types::Value;

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("obras-his-ingest-{name}-{nanos}.xlsx"))
}

fn write_developments_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();

    let ws = wb.add_worksheet();
    ws.set_name("Empreendimentos").unwrap();
    // header
    ws.write_string(0, 0, "Nome do Empreendimento").unwrap();
    ws.write_string(0, 1, "CEP").unwrap();
    ws.write_string(0, 2, "Unidade").unwrap();
    ws.write_string(0, 3, "Área").unwrap();
    ws.write_string(0, 4, "Valor").unwrap();

    // numeric CEP and unit numbers, as typed into a spreadsheet
    ws.write_string(1, 0, "Residencial Ipê").unwrap();
    ws.write_number(1, 1, 72302004).unwrap();
    ws.write_number(1, 2, 101).unwrap();
    ws.write_number(1, 3, 48.5).unwrap();
    ws.write_number(1, 4, 180000).unwrap();

    ws.write_string(2, 0, "Residencial Ipê").unwrap();
    ws.write_string(2, 1, "72302-004").unwrap();
    ws.write_number(2, 2, 102).unwrap();
    ws.write_string(2, 3, "52,0").unwrap();

    // row 4 left empty on purpose; row 5 misses the CEP
    ws.write_string(4, 0, "Sem CEP").unwrap();
    ws.write_number(4, 2, 1).unwrap();

    let other = wb.add_worksheet();
    other.set_name("Outra").unwrap();
    other.write_string(0, 0, "Nome").unwrap();
    other.write_string(0, 1, "CEP").unwrap();
    other.write_string(1, 0, "Vila Nova").unwrap();
    other.write_string(1, 1, "70000000").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn read_excel_keeps_typed_cells_and_row_numbers() {
    let path = tmp_file("read");
    write_developments_xlsx(&path);

    let table = read_excel_from_path(&path, None).unwrap();
    assert_eq!(table.headers[0], "Nome do Empreendimento");
    assert_eq!(table.rows[0].line, 2);
    assert_eq!(table.rows[0].cells[3], Value::Float64(48.5));
    assert_eq!(table.rows.last().unwrap().line, 5);

    let _ = std::fs::remove_file(path);
}

#[test]
fn preview_workbook_groups_numeric_cells() {
    let path = tmp_file("preview");
    write_developments_xlsx(&path);

    let report = preview_from_path(&path, &ImportOptions::default()).unwrap();
    assert_eq!(report.development_count, 1);
    let ipe = &report.developments[0];
    assert_eq!(ipe.postal_code, "72302-004");
    let numbers: Vec<&str> = ipe.units.iter().map(|u| u.number.as_str()).collect();
    assert_eq!(numbers, vec!["101", "102"]);
    assert_eq!(ipe.units[0].sale_price, Some(180000.0));
    assert_eq!(ipe.units[1].area_m2, Some(52.0));

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].kind, IssueKind::Row { line: 5 });

    let _ = std::fs::remove_file(path);
}

#[test]
fn named_sheet_and_upload_bytes() {
    let path = tmp_file("sheet");
    write_developments_xlsx(&path);

    let opts = ImportOptions {
        excel_sheet_selection: ExcelSheetSelection::Sheet("Outra".to_string()),
        ..Default::default()
    };
    let mut repo = InMemoryRepository::new();
    let report = commit_from_path(&path, &mut repo, &opts).unwrap();
    assert_eq!(report.developments_created, 1);
    assert_eq!(repo.developments()[0].name, "Vila Nova");
    assert_eq!(report.units_created, 0);

    let bytes = std::fs::read(&path).unwrap();
    let uploaded = preview_upload("planilha.xlsx", &bytes, &ImportOptions::default()).unwrap();
    assert_eq!(uploaded.unit_count, 2);

    let missing = ImportOptions {
        excel_sheet_selection: ExcelSheetSelection::Sheet("Nope".to_string()),
        ..Default::default()
    };
    assert!(preview_from_path(&path, &missing).is_err());

    let _ = std::fs::remove_file(path);
}
