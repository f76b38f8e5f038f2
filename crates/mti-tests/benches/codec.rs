//! Criterion benchmarks for the encode/decode/inspect pipelines on a
//! 256×256 single-band uint16 tile (128 KiB of raw payload).

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use mti_decoder::{decode_tile, inspect_tile};
use mti_tests::TileFixture;
use mti_types::CompressionMode;

fn grid_fixture(compression: CompressionMode) -> TileFixture {
    let values: Vec<f64> = (0..256_u32 * 256)
        .map(|i| f64::from(i % 4096))
        .collect();
    TileFixture::uint16_2x2()
        .with_compression(compression)
        .with_grid(256, 256, 1, values)
}

fn bench_encode(c: &mut Criterion) {
    let plain = grid_fixture(CompressionMode::None);
    let deflate = grid_fixture(CompressionMode::DeflateRaw);

    c.bench_function("encode_256x256_uint16_none", |b| {
        b.iter(|| black_box(plain.encode()));
    });
    c.bench_function("encode_256x256_uint16_deflate", |b| {
        b.iter(|| black_box(deflate.encode()));
    });
}

fn bench_decode(c: &mut Criterion) {
    let plain = grid_fixture(CompressionMode::None).encode_bytes();
    let deflate = grid_fixture(CompressionMode::DeflateRaw).encode_bytes();

    c.bench_function("decode_256x256_uint16_none", |b| {
        b.iter(|| black_box(decode_tile(black_box(&plain)).unwrap()));
    });
    c.bench_function("decode_256x256_uint16_deflate", |b| {
        b.iter(|| black_box(decode_tile(black_box(&deflate)).unwrap()));
    });
    c.bench_function("inspect_256x256_uint16", |b| {
        b.iter(|| black_box(inspect_tile(black_box(&plain)).unwrap()));
    });
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
