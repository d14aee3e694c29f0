//! Benchmarks for preview truncation and result set serialization.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use newsflow::content::{serialize, truncate_chars, ArticleSummary, ResultSet};

fn article(i: usize, body: &str) -> ArticleSummary {
    ArticleSummary {
        publication_date: "2023-11-21T11:11:31Z".to_string(),
        title: format!("Article {i}"),
        url: format!("https://www.theguardian.com/info/{i}"),
        content_preview: truncate_chars(body, 1000),
    }
}

fn truncation_benchmark(c: &mut Criterion) {
    let ascii = "a".repeat(20_000);
    let multibyte = "é–😀".repeat(5_000);

    c.bench_function("truncate_ascii_body", |b| {
        b.iter(|| truncate_chars(black_box(&ascii), 1000));
    });
    c.bench_function("truncate_multibyte_body", |b| {
        b.iter(|| truncate_chars(black_box(&multibyte), 1000));
    });
}

fn serialize_benchmark(c: &mut Criterion) {
    let body = "<p>Lorem ipsum dolor sit amet, café naïve.</p>".repeat(50);
    let result_set = ResultSet::from_articles((1..=10).map(|i| article(i, &body)));

    c.bench_function("serialize_ten_articles", |b| {
        b.iter(|| serialize(Some(black_box(&result_set))));
    });
}

criterion_group!(benches, truncation_benchmark, serialize_benchmark);
criterion_main!(benches);
