use cfgtext::{from_str, to_string, Document, Formatting, Reader};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn generate_config(sections: usize, entries: usize) -> String {
    let mut text = String::new();
    for s in 0..sections {
        text.push_str(&format!("# Section number {s}\nSection{s} {{\n"));
        for e in 0..entries {
            text.push_str(&format!("\tKey{e}=value number {e}\n"));
        }
        text.push_str(&format!("\tList=[alpha, beta, \"gamma, delta\", {s}]\n"));
        text.push_str("\tNested {\n\t\tLeaf='  padded  '\n\t}\n}\n\n");
    }
    text
}

fn benchmark_tokenize(c: &mut Criterion) {
    let text = generate_config(50, 20);

    c.bench_function("tokenize_50x20", |b| {
        b.iter(|| Reader::new(black_box(&text)).count())
    });
}

fn benchmark_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    for size in [10, 100, 1000].iter() {
        let text = generate_config(*size, 10);
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| from_str(black_box(text)))
        });
    }

    group.finish();
}

fn benchmark_save(c: &mut Criterion) {
    let mut group = c.benchmark_group("save");

    for size in [10, 100, 1000].iter() {
        let doc = from_str(&generate_config(*size, 10)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), &doc, |b, doc| {
            b.iter(|| to_string(black_box(doc)))
        });
    }

    group.finish();
}

fn benchmark_flatten(c: &mut Criterion) {
    let doc = from_str(&generate_config(100, 10)).unwrap();

    c.bench_function("flatten_100x10", |b| b.iter(|| black_box(&doc).to_map()));
}

fn benchmark_compact_roundtrip(c: &mut Criterion) {
    let text = generate_config(100, 10);
    let formatting = Formatting::compact();

    c.bench_function("roundtrip_compact_100x10", |b| {
        b.iter(|| {
            let doc: Document = from_str(black_box(&text)).unwrap();
            cfgtext::to_string_with_formatting(&doc, &formatting).unwrap()
        })
    });
}

criterion_group!(
    benches,
    benchmark_tokenize,
    benchmark_load,
    benchmark_save,
    benchmark_flatten,
    benchmark_compact_roundtrip
);
criterion_main!(benches);
