//! Benchmarks for rasterlz compression and decompression throughput.
//!
//! Covers the data patterns that exercise different code paths: random
//! (store fallback), constant columns (adaptive scan selection), gradients
//! (model transform), and binary dithering (bit packing).

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rasterlz::{compress, decompress, CodecConfig};

/// Generate random data using a simple xorshift PRNG
fn generate_random_data(size: usize, seed: u64) -> Vec<u8> {
    let mut data = Vec::with_capacity(size);
    let mut state = seed;
    for _ in 0..size {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        data.push((state & 0xFF) as u8);
    }
    data
}

/// Grid whose columns are constant
fn generate_constant_columns(width: usize, height: usize) -> Vec<u8> {
    let column_values = generate_random_data(width, 0x5EED);
    let mut data = Vec::with_capacity(width * height);
    for _ in 0..height {
        data.extend_from_slice(&column_values);
    }
    data
}

/// Smooth horizontal gradient
fn generate_gradient(width: usize, height: usize) -> Vec<u8> {
    (0..width * height).map(|i| ((i % width) + (i / width) / 2) as u8).collect()
}

/// 0x00/0xFF dithering pattern
fn generate_binary_pattern(size: usize) -> Vec<u8> {
    generate_random_data(size, 0xB17)
        .into_iter()
        .map(|b| if b & 1 != 0 { 0xFF } else { 0x00 })
        .collect()
}

fn bench_compress(c: &mut Criterion) {
    let width = 256u32;
    let size = 256 * 256;
    let datasets = [
        ("random", generate_random_data(size, 42)),
        ("constant_columns", generate_constant_columns(256, 256)),
        ("gradient", generate_gradient(256, 256)),
        ("binary", generate_binary_pattern(size)),
    ];

    let mut group = c.benchmark_group("compress");
    group.throughput(Throughput::Bytes(size as u64));

    for (name, data) in &datasets {
        group.bench_with_input(BenchmarkId::new("plain", name), data, |b, data| {
            let config = CodecConfig::default();
            b.iter(|| compress(data, width, &config).unwrap());
        });
        group.bench_with_input(BenchmarkId::new("adaptive_model", name), data, |b, data| {
            let config = CodecConfig { adaptive: true, model: true, ..Default::default() };
            b.iter(|| compress(data, width, &config).unwrap());
        });
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let width = 256u32;
    let size = 256 * 256;
    let config = CodecConfig { adaptive: true, ..Default::default() };
    let datasets = [
        ("constant_columns", generate_constant_columns(256, 256)),
        ("gradient", generate_gradient(256, 256)),
    ];

    let mut group = c.benchmark_group("decompress");
    group.throughput(Throughput::Bytes(size as u64));

    for (name, data) in &datasets {
        let (compressed, _) = compress(data, width, &config).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &compressed, |b, compressed| {
            b.iter(|| decompress(compressed).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
