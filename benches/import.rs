//! Benchmarks for reading, grouping and committing development spreadsheets.
//!
//! Run with: cargo bench --bench import

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use obras_his_ingest::import::{commit, preview};
use obras_his_ingest::ingestion::csv::read_csv_from_bytes;
use obras_his_ingest::ingestion::ImportOptions;
use obras_his_ingest::persistence::InMemoryRepository;

/// Semicolon CSV with `rows` units spread over developments of 20 units each, CEP in the address.
fn build_csv(rows: usize) -> Vec<u8> {
    let mut out = String::from("Nome do Empreendimento;Endereço;Unidade;Área (m²);Preço de Venda\n");
    for i in 0..rows {
        let dev = i / 20;
        out.push_str(&format!(
            "Residencial {dev};Quadra {dev}, Lote 1 - Samambaia/DF - CEP: 72{:03}-{:03};{};{},5;R$ {}.000,00\n",
            dev % 1000,
            (dev * 7) % 1000,
            100 + i % 20,
            40 + i % 30,
            150 + i % 50,
        ));
    }
    out.into_bytes()
}

fn bench_import(c: &mut Criterion) {
    let mut group = c.benchmark_group("import");
    let options = ImportOptions::default();

    for rows in [1_000, 10_000] {
        let bytes = build_csv(rows);
        let table = read_csv_from_bytes(&bytes, None).unwrap();

        group.bench_with_input(BenchmarkId::new("read_csv", rows), &bytes, |b, bytes| {
            b.iter(|| black_box(read_csv_from_bytes(black_box(bytes), None).unwrap()));
        });

        group.bench_with_input(BenchmarkId::new("preview", rows), &table, |b, table| {
            b.iter(|| black_box(preview(black_box(table), &options)));
        });

        group.bench_with_input(BenchmarkId::new("commit_in_memory", rows), &table, |b, table| {
            b.iter(|| {
                let mut repo = InMemoryRepository::new();
                black_box(commit(black_box(table), &mut repo, &options))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_import);
criterion_main!(benches);
