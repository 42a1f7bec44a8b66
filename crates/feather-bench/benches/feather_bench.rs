//! Benchmarks for the feathered blur stages.
//!
//! Run with: `cargo bench -p feather-bench`

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;

use feather_core::{PixelBuffer, Rect};
use feather_ops::{apply, area_len, convolve, extract, BlurParams, Kernel, KernelShape, Mask};

fn noise_image(width: u32, height: u32, channels: u8) -> PixelBuffer {
    let len = (width * height * channels as u32) as usize;
    let data = (0..len).map(|i| ((i as u32).wrapping_mul(2654435761) >> 13) as u8).collect();
    PixelBuffer::from_data(width, height, channels, data).unwrap()
}

/// Benchmark kernel and mask construction.
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for size in [5usize, 15, 31].iter() {
        group.bench_with_input(BenchmarkId::new("gaussian_kernel", size), size, |b, &s| {
            b.iter(|| Kernel::build(black_box(s), KernelShape::Gaussian, true).unwrap())
        });
        group.bench_with_input(BenchmarkId::new("ramp_mask", size), size, |b, &s| {
            b.iter(|| Mask::ramp(black_box(s)).unwrap())
        });
    }

    group.finish();
}

/// Benchmark one convolution pass over regions of growing size.
fn bench_convolve(c: &mut Criterion) {
    let mut group = c.benchmark_group("convolve");
    let img = noise_image(512, 512, 3);
    let kernel = Kernel::build(5, KernelShape::Gaussian, true).unwrap();

    for size in [32u32, 64, 128].iter() {
        let region = Rect::square(100, 100, *size);
        let len = area_len(region, img.channels()).unwrap();
        let mut tile = vec![0u8; len];
        let mut out = vec![0u8; len];
        extract(&img, &mut tile, region).unwrap();

        group.throughput(Throughput::Elements((*size as u64) * (*size as u64)));
        group.bench_with_input(BenchmarkId::new("kernel_5", size), &region, |b, &r| {
            b.iter(|| convolve(black_box(&tile), &mut out, r, 3, &img, &kernel).unwrap())
        });
    }

    group.finish();
}

/// Benchmark the whole pipeline, including the image copy.
fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let img = noise_image(256, 256, 3);

    for iterations in [1u32, 3].iter() {
        let params = BlurParams::at(128, 128)
            .with_size(64)
            .with_kernel_size(7)
            .with_iterations(*iterations);
        group.bench_with_input(BenchmarkId::new("size_64", iterations), &params, |b, p| {
            b.iter(|| apply(black_box(&img), p).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_convolve, bench_pipeline);
criterion_main!(benches);
