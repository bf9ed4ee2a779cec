//! Benchmarks for intent classification
//!
//! Run with: cargo bench --package oracle

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use oracle::{classify, detect_discussed_movie};

const QUERIES: &[&str] = &[
    "tell me more about The Exorcist",
    "I want something bloody and full of zombies",
    "what are the weirdest kills in horror",
    "vampire movies from the eighties",
    "recommend me something like Hereditary",
    "The Babadook",
    "what should I watch tonight with my friends who hate jump scares",
];

fn bench_classify(c: &mut Criterion) {
    c.bench_function("classify_mixed_queries", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(classify(black_box(query)));
            }
        })
    });

    // Worst case: no rule matches, every keyword is scanned
    let long_query = "an evening film for a quiet night at home with the family ".repeat(8);
    c.bench_function("classify_no_rule_match", |b| {
        b.iter(|| black_box(classify(black_box(&long_query))))
    });
}

fn bench_detect_discussed_movie(c: &mut Criterion) {
    c.bench_function("detect_discussed_movie", |b| {
        b.iter(|| black_box(detect_discussed_movie(black_box("more about candyman please"))))
    });
}

criterion_group!(benches, bench_classify, bench_detect_discussed_movie);
criterion_main!(benches);
