//! Benchmarks for the embedded-content codec

use carton_rs::Codec;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn benchmark_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_encode");
    let codec = Codec::default();

    for size in [1024, 16 * 1024, 256 * 1024].iter() {
        let data = payload(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| codec.encode(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec_decode");
    let codec = Codec::default();

    for size in [1024, 16 * 1024, 256 * 1024].iter() {
        let blob = codec.encode(&payload(*size)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, _| {
            b.iter(|| codec.decode(black_box(&blob)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_encode, benchmark_decode);
criterion_main!(benches);
