use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fpmatch_core::{correlate_fingerprints, score_fingerprints};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// roughly 120 s of audio at Chromaprint's frame rate
const FRAMES: usize = 950;

fn make_pair(shift: usize) -> (Vec<u32>, Vec<u32>) {
    let mut rng = StdRng::seed_from_u64(42);
    let a: Vec<u32> = (0..FRAMES + shift).map(|_| rng.gen()).collect();
    let b = a[shift..].to_vec();
    (a, b)
}

fn bench_score(c: &mut Criterion) {
    let (a, b) = make_pair(40);

    c.bench_function("score_fingerprints_120s", |bench| {
        bench.iter(|| {
            let _ = black_box(score_fingerprints(black_box(&a), black_box(&b), 80));
        });
    });
}

fn bench_correlate_full_window(c: &mut Criterion) {
    let (a, b) = make_pair(40);

    c.bench_function("correlate_fingerprints_120s_exhaustive", |bench| {
        bench.iter(|| {
            let _ = black_box(correlate_fingerprints(
                black_box(&a),
                black_box(&b),
                80,
                2.0,
            ));
        });
    });
}

fn bench_correlate_early_exit(c: &mut Criterion) {
    let (a, b) = make_pair(40);

    c.bench_function("correlate_fingerprints_120s_threshold", |bench| {
        bench.iter(|| {
            let _ = black_box(correlate_fingerprints(
                black_box(&a),
                black_box(&b),
                80,
                0.9,
            ));
        });
    });
}

criterion_group!(
    benches,
    bench_score,
    bench_correlate_full_window,
    bench_correlate_early_exit,
);
criterion_main!(benches);
