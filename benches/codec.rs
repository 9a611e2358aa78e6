//! Load/save throughput benchmarks
//!
//! Run benchmarks: `cargo bench --bench codec`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dxf_codec::{CadDocument, Circle, DxfVersion, DxfWriter, Line, Vector3};

/// A document with `count` lines and `count` circles
fn drawing(count: usize) -> CadDocument {
    let mut doc = CadDocument::with_defaults();
    for i in 0..count {
        let x = i as f64;
        doc.add_entity(Line::from_points(Vector3::new(x, 0.0, 0.0), Vector3::new(x, 10.0, 0.0)))
            .expect("line");
        doc.add_entity(Circle::from_center_radius(Vector3::new(x, 5.0, 0.0), 0.5))
            .expect("circle");
    }
    doc
}

fn bench_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");
    for count in [10, 1_000] {
        let doc = drawing(count);
        group.throughput(Throughput::Elements(2 * count as u64));
        for binary in [false, true] {
            let label = if binary { "binary" } else { "text" };
            group.bench_with_input(BenchmarkId::new(label, count), &doc, |b, doc| {
                b.iter(|| DxfWriter::new(doc).binary(binary).write_to_vec().expect("save"))
            });
        }
    }
    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");
    for count in [10, 1_000] {
        let doc = drawing(count);
        for binary in [false, true] {
            let bytes = DxfWriter::new(&doc)
                .version(DxfVersion::AC1015)
                .binary(binary)
                .write_to_vec()
                .expect("save");
            let label = if binary { "binary" } else { "text" };
            group.throughput(Throughput::Bytes(bytes.len() as u64));
            group.bench_with_input(BenchmarkId::new(label, count), &bytes, |b, bytes| {
                b.iter(|| CadDocument::load(bytes.as_slice()).expect("load"))
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_save, bench_load);
criterion_main!(benches);
