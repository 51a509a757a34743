//! Benchmarks for the sample codecs

use bytes::BytesMut;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use segy::{get_codec, SampleFormat};
use std::hint::black_box;

/// Samples per simulated trace batch
const SIZES: &[usize] = &[1_000, 100_000];

fn samples(n: usize) -> Vec<f32> {
    (0..n).map(|i| (i as f32 * 0.01).sin() * 1000.0).collect()
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");

    for format in [SampleFormat::IbmFloat, SampleFormat::IeeeFloat] {
        let codec = get_codec(format);
        for &n in SIZES {
            let mut raw = BytesMut::new();
            codec.encode(&samples(n), &mut raw);
            let mut out = vec![0.0f32; n];

            group.throughput(Throughput::Bytes(raw.len() as u64));
            group.bench_with_input(BenchmarkId::new(format!("{format:?}"), n), &raw, |b, raw| {
                b.iter(|| codec.decode(black_box(raw), black_box(&mut out)));
            });
        }
    }
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for format in [SampleFormat::IbmFloat, SampleFormat::IeeeFloat] {
        let codec = get_codec(format);
        for &n in SIZES {
            let data = samples(n);
            let mut out = BytesMut::with_capacity(n * 4);

            group.throughput(Throughput::Bytes(n as u64 * 4));
            group.bench_with_input(BenchmarkId::new(format!("{format:?}"), n), &data, |b, data| {
                b.iter(|| {
                    out.clear();
                    codec.encode(black_box(data), &mut out);
                });
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_decode, bench_encode);
criterion_main!(benches);
