//! Benchmarks for the scanning drivers.
//!
//! Measures throughput of the streaming scanner over random DNA for several
//! pattern lengths, with and without lookahead, and of the one-shot drivers.
//! The misprediction rate for each configuration is printed once up front.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use myers_lanes::{bounded_distance, find_all, Backend, Config, MatchTable, Scanner};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const TEXT_LEN: usize = 64 * 1024;

fn random_dna(seed: u64, len: usize) -> Vec<u8> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len).map(|_| b"ACGT"[rng.gen_range(0..4)]).collect()
}

fn bench_scanner(c: &mut Criterion) {
    let text = random_dna(42, TEXT_LEN);
    let mut group = c.benchmark_group("scanner");
    group.throughput(Throughput::Bytes(TEXT_LEN as u64));

    for &len in &[32usize, 128, 512] {
        let pattern = random_dna(len as u64, len);
        let table = MatchTable::from_bytes(&pattern).unwrap();

        for backend in [Backend::Portable, Backend::Auto] {
            let config = Config::search().with_backend(backend);
            let mut probe = Scanner::new(&table, config);
            probe.feed(&text);
            eprintln!(
                "len={} backend={:?}: misprediction rate {:.4}",
                len,
                probe.backend(),
                probe.stats().misprediction_rate()
            );

            group.bench_with_input(
                BenchmarkId::new(format!("feed/{:?}", backend), len),
                &text,
                |b, text| {
                    b.iter(|| {
                        let mut scanner = Scanner::new(&table, config);
                        scanner.feed(black_box(text));
                        scanner.score()
                    })
                },
            );
            group.bench_with_input(
                BenchmarkId::new(format!("feed_unpipelined/{:?}", backend), len),
                &text,
                |b, text| {
                    b.iter(|| {
                        let mut scanner = Scanner::new(&table, config);
                        scanner.feed_unpipelined(black_box(text));
                        scanner.score()
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_drivers(c: &mut Criterion) {
    let mut text = random_dna(7, TEXT_LEN);
    let pattern = random_dna(8, 100);
    text[TEXT_LEN / 2..TEXT_LEN / 2 + 100].copy_from_slice(&pattern);
    let table = MatchTable::from_bytes(&pattern).unwrap();

    let mut group = c.benchmark_group("drivers");
    group.throughput(Throughput::Bytes(TEXT_LEN as u64));
    group.bench_function("find_all", |b| {
        b.iter(|| find_all(black_box(&table), black_box(&text), 5))
    });
    group.bench_function("bounded_distance", |b| {
        b.iter(|| bounded_distance(black_box(&table), black_box(&text[..200]), 10))
    });
    group.finish();
}

criterion_group!(benches, bench_scanner, bench_drivers);
criterion_main!(benches);
