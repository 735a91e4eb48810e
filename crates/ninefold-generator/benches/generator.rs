//! Benchmarks for Sudoku puzzle generation.
//!
//! Measures the complete generation pipeline (solution grid, carving with
//! uniqueness checks, tier verification) at two difficulty levels.
//!
//! # Test Data
//!
//! Uses fixed seeds so each measurement reproduces the same work:
//!
//! - **`seed_0`**: `c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1`
//! - **`seed_1`**: `a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3`
//!
//! # Running
//!
//! ```sh
//! cargo bench --bench generator
//! ```

use std::{hint, str::FromStr as _, time::Duration};

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use ninefold_generator::{Difficulty, PuzzleGenerator, PuzzleSeed};

const SEEDS: [&str; 2] = [
    "c1d44bd6afaf8af64f126546884e19298acbdc33c3924a28136715de946ef3f1",
    "a2b3c4d5e6f7a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b3",
];

fn bench_difficulty(c: &mut Criterion, difficulty: Difficulty, name: &str) {
    let generator = PuzzleGenerator::new();

    for (i, seed) in SEEDS.into_iter().enumerate() {
        let seed = PuzzleSeed::from_str(seed).unwrap();
        c.bench_with_input(BenchmarkId::new(name, format!("seed_{i}")), &seed, |b, seed| {
            b.iter_batched(
                || hint::black_box(*seed),
                |seed| generator.generate_with_seed(difficulty, seed),
                BatchSize::SmallInput,
            );
        });
    }
}

fn bench_generator_easy(c: &mut Criterion) {
    bench_difficulty(c, Difficulty::Easy, "generator_easy");
}

fn bench_generator_hard(c: &mut Criterion) {
    bench_difficulty(c, Difficulty::Hard, "generator_hard");
}

criterion_group!(
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(12));
    targets = bench_generator_easy, bench_generator_hard
);
criterion_main!(benches);
