//! Benchmarks for the per-item hot paths of a batch.
//!
//! Run with: cargo bench -p bxl-core

use bxl_core::pipeline::{pad_width, Blake3Hasher, ContentHasher, GlobMatcher, Template};
use bxl_core::types::{Dimensions, ItemContext};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn file_names(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| match i % 3 {
            0 => format!("IMG_{i:05}.png"),
            1 => format!("scan-{i}.pdf"),
            _ => format!("notes {i}.txt"),
        })
        .collect()
}

fn benchmark_glob_match(c: &mut Criterion) {
    let names = file_names(1_000);
    let matcher = GlobMatcher::compile("IMG_*.png").unwrap();

    c.bench_function("glob_match_1000_names", |b| {
        b.iter(|| {
            names
                .iter()
                .filter(|name| matcher.is_match(black_box(name)))
                .count()
        })
    });
}

fn benchmark_placeholder_expand(c: &mut Criterion) {
    let template = Template::parse("trip_{index}_{width}x{height}");
    let pad = pad_width(1_000);

    c.bench_function("placeholder_expand_1000", |b| {
        b.iter(|| {
            for index in 1..=1_000 {
                let ctx = ItemContext {
                    index,
                    pad_width: pad,
                    dimensions: Some(Dimensions {
                        width: 1920,
                        height: 1080,
                    }),
                };
                let _ = template.expand(black_box(&ctx), ".jpg");
            }
        })
    });
}

fn benchmark_content_hash(c: &mut Criterion) {
    let hasher = Blake3Hasher::new();
    let data = vec![0x5au8; 4 * 1024 * 1024];

    c.bench_function("content_hash_blake3_4mib", |b| {
        b.iter(|| hasher.digest(black_box(&data)))
    });
}

criterion_group!(
    benches,
    benchmark_glob_match,
    benchmark_placeholder_expand,
    benchmark_content_hash,
);
criterion_main!(benches);
