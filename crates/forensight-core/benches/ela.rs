//! Benchmarks for error level analysis and the hashing around it.
//!
//! Run with: cargo bench -p forensight-core

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use forensight_core::ela::{compute_ela, difference, recompress, Raster};
use forensight_core::pipeline::Hasher;

fn gradient(width: u32, height: u32) -> Raster {
    let mut samples = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            samples.push((x * 255 / width) as u8);
            samples.push((y * 255 / height) as u8);
            samples.push(((x + y) % 256) as u8);
        }
    }
    Raster::new(width, height, 3, samples).unwrap()
}

fn benchmark_compute_ela(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute_ela");
    for size in [256u32, 1024] {
        let raster = gradient(size, size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &raster, |b, raster| {
            b.iter(|| compute_ela(black_box(raster), 90, None).unwrap())
        });
    }
    group.finish();
}

fn benchmark_stages(c: &mut Criterion) {
    let raster = gradient(512, 512);
    let recompressed = recompress(&raster, 90).unwrap();

    c.bench_function("recompress_512", |b| {
        b.iter(|| recompress(black_box(&raster), 90).unwrap())
    });
    c.bench_function("difference_512", |b| {
        b.iter(|| difference(black_box(&raster), black_box(&recompressed)).unwrap())
    });
}

fn benchmark_file_hashes(c: &mut Criterion) {
    let data: Vec<u8> = (0..4 * 1024 * 1024u32).map(|i| (i % 251) as u8).collect();

    c.bench_function("file_hashes_4mb", |b| {
        b.iter(|| Hasher::file_hashes(black_box(&data)))
    });
}

criterion_group!(
    benches,
    benchmark_compute_ela,
    benchmark_stages,
    benchmark_file_hashes
);
criterion_main!(benches);
