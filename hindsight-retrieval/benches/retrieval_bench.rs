use criterion::{criterion_group, criterion_main, Criterion};

use hindsight_retrieval::budget::filter_to_budget;
use hindsight_retrieval::rrf::fuse;
use hindsight_tokens::{TiktokenTokenizer, Tokenizer};

fn ranked_list(n: usize, offset: usize) -> Vec<String> {
    (0..n).map(|i| format!("unit-{}", (i + offset) % n)).collect()
}

fn bench_rrf_fuse_100(c: &mut Criterion) {
    let list_a = ranked_list(100, 0);
    let list_b: Vec<String> = list_a.iter().rev().cloned().collect();
    let lists = vec![list_a, list_b];

    c.bench_function("rrf_fuse_100", |b| {
        b.iter(|| fuse(&lists, 60));
    });
}

fn bench_rrf_fuse_10k(c: &mut Criterion) {
    let list_a = ranked_list(10_000, 0);
    let list_b: Vec<String> = list_a.iter().rev().cloned().collect();
    let lists = vec![list_a, list_b];

    c.bench_function("rrf_fuse_10k", |b| {
        b.iter(|| fuse(&lists, 60));
    });
}

fn bench_filter_to_budget(c: &mut Criterion) {
    let tokenizer = TiktokenTokenizer::new();
    let items: Vec<String> = (0..200).map(|i| format!("memory unit number {i} with some representative filler text")).collect();

    c.bench_function("filter_to_budget_200", |b| {
        b.iter(|| {
            let dyn_tokenizer: &dyn Tokenizer = &tokenizer;
            filter_to_budget(items.clone(), 2_000, dyn_tokenizer, |s: &String| s.as_str())
        });
    });
}

criterion_group!(benches, bench_rrf_fuse_100, bench_rrf_fuse_10k, bench_filter_to_budget);
criterion_main!(benches);
