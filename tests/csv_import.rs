use obras_his_ingest::import::{preview, preview_from_path, IssueKind};
use obras_his_ingest::ingestion::csv::{read_csv_from_path, read_csv_from_reader};
use obras_his_ingest::ingestion::ImportOptions;
use obras_his_ingest::types::Value;

#[test]
fn read_csv_keeps_headers_and_line_numbers() {
    let table = read_csv_from_path("tests/fixtures/developments.csv", None).unwrap();

    assert_eq!(table.headers[0], "Nome do Empreendimento");
    assert_eq!(table.headers.len(), 8);
    assert_eq!(table.row_count(), 6);
    assert_eq!(table.rows[0].line, 2);
    assert_eq!(table.rows[5].line, 7);
    assert_eq!(table.rows[1].cells[6], Value::Null);
}

#[test]
fn preview_fixture_groups_and_reports_bad_rows() {
    let report = preview_from_path("tests/fixtures/developments.csv", &ImportOptions::default()).unwrap();

    assert!(!report.valid);
    assert_eq!(report.rows_read, 6);
    assert_eq!(report.development_count, 2);
    assert_eq!(report.unit_count, 4);

    let ipe = &report.developments[0];
    assert_eq!(ipe.name, "Residencial Ipê");
    assert_eq!(ipe.company_name, "Construtora Alfa");
    assert_eq!(ipe.postal_code, "72302-004");
    assert_eq!(ipe.address.as_deref(), Some("QR 104 Conjunto 4 - Samambaia/DF"));
    assert_eq!(ipe.note.as_deref(), Some("Entrega 2025"));
    assert_eq!(ipe.units[0].area_m2, Some(48.5));
    assert_eq!(ipe.units[0].sale_price, Some(180000.0));
    assert_eq!(ipe.units[1].sale_price, Some(195500.0));
    assert_eq!(ipe.units[1].payment_mechanism, "outros");

    let vila = &report.developments[1];
    assert_eq!(vila.company_name, "Vila Esperança");
    assert_eq!(vila.postal_code, "72000-100");
    assert_eq!(vila.address.as_deref(), Some("Quadra 7, Lote 3"));
    let numbers: Vec<&str> = vila.units.iter().map(|u| u.number.as_str()).collect();
    assert_eq!(numbers, vec!["1", "2"]);

    let lines: Vec<IssueKind> = report.issues.iter().map(|i| i.kind.clone()).collect();
    assert_eq!(lines, vec![IssueKind::Row { line: 5 }, IssueKind::Row { line: 7 }]);
    assert!(report.issues[0].message.contains("name"));
    assert!(report.issues[1].message.contains("postal code"));
}

#[test]
fn comma_delimited_reader_with_reordered_columns() {
    let input = "Unidade,CEP,Nome\n101,72302004,Vila A\n102,72302004,Vila A\n";
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(input.as_bytes());

    let table = read_csv_from_reader(&mut rdr).unwrap();
    let report = preview(&table, &ImportOptions::default());
    assert!(report.valid);
    assert_eq!(report.development_count, 1);
    assert_eq!(report.unit_count, 2);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = preview_from_path("tests/fixtures/does_not_exist.csv", &ImportOptions::default()).unwrap_err();
    assert!(err.to_string().contains("io error"));
}
