//! Benchmarks for the text encoding hot path
//!
//! Run with: cargo bench --package encoder
//!
//! Encoding sits on the request path of every prediction, so regressions here
//! translate directly into serving latency.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use encoder::{Encoder, Vocabulary};
use std::sync::Arc;

const SHORT_REVIEW: &str = "Absolutely brilliant film with a stunning finale";

fn long_review() -> String {
    // ~400 words, forces the truncation branch at the default max length
    SHORT_REVIEW
        .split_whitespace()
        .cycle()
        .take(400)
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_vocab() -> Arc<Vocabulary> {
    // A few thousand synthetic tokens approximates the real min-freq vocab
    Arc::new(Vocabulary::from_tokens(
        (0..5000).map(|i| format!("word{i}")),
    ))
}

fn bench_encode_short(c: &mut Criterion) {
    let encoder = Encoder::new(bench_vocab());

    c.bench_function("encode_short_review", |b| {
        b.iter(|| black_box(encoder.encode(black_box(SHORT_REVIEW))))
    });
}

fn bench_encode_long(c: &mut Criterion) {
    let encoder = Encoder::new(bench_vocab());
    let review = long_review();

    c.bench_function("encode_long_review_truncating", |b| {
        b.iter(|| black_box(encoder.encode(black_box(&review))))
    });
}

criterion_group!(benches, bench_encode_short, bench_encode_long);
criterion_main!(benches);
