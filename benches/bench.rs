//! Criterion benchmarks for the statute classifier.
//!
//! Covers text normalization, model training and end-to-end prediction.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use statute_classifier::ml::section_classifier::{
    KeywordRuleEngine, ModelHandle, ModelLifecycle, ModelStore, SectionEngine, TRAINING_DATA,
};
use statute_classifier::normalizer::TextNormalizer;
use statute_classifier::storage::memory::MemoryStorage;

const QUERIES: &[&str] = &[
    "Someone stole my phone",
    "He threatened to kill me and my family",
    "My husband and in-laws are torturing me for dowry",
    "I paid online but the product was never delivered",
    "xyz abcde",
];

fn lifecycle() -> ModelLifecycle {
    ModelLifecycle::new(
        TextNormalizer::english(),
        ModelStore::new(Arc::new(MemoryStorage::default())),
        Arc::new(ModelHandle::new()),
    )
}

/// Benchmark text normalization.
fn bench_normalization(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalization");

    let english = TextNormalizer::english();
    let lowercase = TextNormalizer::lowercase_only();

    group.bench_function("english_single", |b| {
        b.iter(|| black_box(english.normalize(black_box(QUERIES[2]))))
    });

    group.throughput(Throughput::Elements(TRAINING_DATA.len() as u64));
    group.bench_function("english_corpus", |b| {
        b.iter(|| {
            for example in TRAINING_DATA {
                black_box(english.normalize(black_box(example.text)));
            }
        })
    });

    group.bench_function("lowercase_corpus", |b| {
        b.iter(|| {
            for example in TRAINING_DATA {
                black_box(lowercase.normalize(black_box(example.text)));
            }
        })
    });

    group.finish();
}

/// Benchmark training and persistence.
fn bench_training(c: &mut Criterion) {
    let mut group = c.benchmark_group("training");
    group.sample_size(20);

    let lifecycle = lifecycle();

    group.throughput(Throughput::Elements(TRAINING_DATA.len() as u64));
    group.bench_function("train_corpus", |b| {
        b.iter(|| black_box(lifecycle.train(black_box(TRAINING_DATA)).unwrap()))
    });

    let model = lifecycle.train(TRAINING_DATA).unwrap();
    group.bench_function("persist_model", |b| {
        b.iter(|| lifecycle.persist(black_box(&model)).unwrap())
    });

    group.bench_function("restore_model", |b| {
        b.iter(|| black_box(lifecycle.restore().unwrap()))
    });

    group.finish();
}

/// Benchmark prediction.
fn bench_prediction(c: &mut Criterion) {
    let mut group = c.benchmark_group("prediction");

    let engine = SectionEngine::new(lifecycle());
    engine.start().unwrap();
    let keywords = KeywordRuleEngine::new();

    group.bench_function("predict_single", |b| {
        b.iter(|| black_box(engine.predict(black_box(QUERIES[0])).unwrap()))
    });

    group.throughput(Throughput::Elements(QUERIES.len() as u64));
    group.bench_function("predict_batch", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(engine.predict(black_box(query)).unwrap());
            }
        })
    });

    group.bench_function("keyword_batch", |b| {
        b.iter(|| {
            for query in QUERIES {
                black_box(keywords.match_text(black_box(query)));
            }
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_normalization,
    bench_training,
    bench_prediction
);
criterion_main!(benches);
