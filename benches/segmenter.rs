//! Benchmarks for the chunked line segmenter and the full census pass
//!
//! Run with: cargo bench --bench segmenter

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;
use subcell::{run_census, CategoryTaxonomy, ChunkSource, LineSegmenter};

/// Generate a synthetic knowledgebase dump of `records` entries
fn generate_dump(records: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for i in 0..records {
        data.extend_from_slice(format!("ID   TEST{i}_HUMAN  Reviewed;  {} AA.\n", 100 + i % 400).as_bytes());
        data.extend_from_slice(b"OS   Homo sapiens (Human).\n");
        if i % 3 == 0 {
            data.extend_from_slice(b"RC   TISSUE=Brain;\n");
        }
        if i % 2 == 0 {
            data.extend_from_slice(b"FT   TRANSMEM        35..58\n");
            data.extend_from_slice(b"CC   -!- SUBCELLULAR LOCATION: Cell membrane.\n");
        } else {
            data.extend_from_slice(b"DR   GO; GO:0005634; C:nucleus; IEA:UniProtKB-SubCell.\n");
        }
        data.extend_from_slice(b"//\n");
    }
    data
}

fn bench_segmentation(c: &mut Criterion) {
    let data = generate_dump(5_000);
    let mut group = c.benchmark_group("line_segmentation");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for block_exp in [12u32, 14, 16, 20] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("2^{block_exp}")),
            &block_exp,
            |b, &exp| {
                b.iter(|| {
                    let source =
                        ChunkSource::from_reader(Cursor::new(data.clone()), 1usize << exp);
                    let mut seg = LineSegmenter::new(source);
                    let mut lines = 0u64;
                    while let Some(line) = seg.next_line() {
                        black_box(line);
                        lines += 1;
                    }
                    lines
                })
            },
        );
    }
    group.finish();
}

fn bench_full_census(c: &mut Criterion) {
    let taxonomy = CategoryTaxonomy::compile().unwrap();
    let data = generate_dump(2_000);
    let mut group = c.benchmark_group("full_census");
    group.throughput(Throughput::Bytes(data.len() as u64));

    group.bench_function("block_exp_14", |b| {
        b.iter(|| {
            let source = ChunkSource::from_reader(Cursor::new(data.clone()), 1 << 14);
            run_census(LineSegmenter::new(source), &taxonomy)
        })
    });
    group.finish();
}

criterion_group!(benches, bench_segmentation, bench_full_census);
criterion_main!(benches);
