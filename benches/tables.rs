use criterion::{criterion_group, criterion_main, Criterion};
use intercoder::Language;

fn build_tables() {
  let _language = Language::new().unwrap();
}

fn translate(language: &Language) {
  let _translation = language
    .translate("{ int i; int[4] a; i = 0; while (i < 4) { a[0] = a[0] + i * 2; i = i + 1; } }")
    .unwrap();
}

fn tables_benchmark(c: &mut Criterion) {
  c.bench_function("tables", |b| b.iter(|| build_tables()));

  let language = Language::new().unwrap();
  c.bench_function("translate", |b| b.iter(|| translate(&language)));
}

criterion_group!{
  name = benches;
  config = Criterion::default().significance_level(0.1).sample_size(10);
  targets = tables_benchmark
}
criterion_main!(benches);
