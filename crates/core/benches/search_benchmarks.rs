//! Benchmarks for similarity scoring and tiered search.
//!
//! Measures the three search strategies over pools of generated item names
//! and the raw Jaro-Winkler kernel.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use keygrid_config::SearchOptions;
use keygrid_core::{SearchResults, jaro_winkler, search};

const WORDS: [&str; 12] = [
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    "kilo", "lima",
];

fn pool(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            format!(
                "{} {} {}",
                WORDS[i % WORDS.len()],
                WORDS[(i / WORDS.len()) % WORDS.len()],
                i
            )
        })
        .collect()
}

fn bench_jaro_winkler(c: &mut Criterion) {
    c.bench_function("jaro_winkler_short", |b| {
        b.iter(|| jaro_winkler(black_box("foxtrot"), black_box("foxtort")))
    });
    c.bench_function("jaro_winkler_long", |b| {
        b.iter(|| {
            jaro_winkler(
                black_box("keyboard driven grid navigation"),
                black_box("keybaord driven gird navigation"),
            )
        })
    });
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_strategy");
    let options = SearchOptions::default();

    for size in [100usize, 1_000, 10_000] {
        let items = pool(size);
        for query in ["f", "lim", "foxtrt"] {
            group.bench_with_input(
                BenchmarkId::new(query, size),
                &items,
                |b, items| b.iter(|| search(black_box(items), black_box(query), &options)),
            );
        }
    }

    group.finish();
}

fn bench_result_cursor(c: &mut Criterion) {
    let mut results = SearchResults::new(pool(1_000), SearchOptions::default());
    results.search("e");

    c.bench_function("search_results_next_match", |b| {
        b.iter(|| {
            results.next_match();
        })
    });
}

criterion_group!(
    benches,
    bench_jaro_winkler,
    bench_strategies,
    bench_result_cursor
);
criterion_main!(benches);
