use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use harris_core::{HarrisConfig, Image};
use harris_detect::{
    Convolution, CornerResponse, GradientOperator, HarrisDetector, Kernel, PointExtractor,
    SeparableKernel, StructureTensorBuilder,
};

/// Create benchmark image with corner-like structures
fn create_benchmark_image(width: usize, height: usize, complexity: &str) -> Image {
    Image::from_fn(width, height, 1, |x, y, _| match complexity {
        // single bright quadrant
        "simple" => {
            if x >= width / 2 && y >= height / 2 { 1.0 } else { 0.0 }
        }
        // checkerboard with 16px cells
        "checker" => {
            if (x / 16 + y / 16) % 2 == 0 { 0.9 } else { 0.1 }
        }
        // gradient plus deterministic noise and squares
        _ => {
            let gradient = x as f32 / width as f32 * 0.2;
            let noise = ((x * 7 + y * 13) % 11) as f32 / 110.0;
            let square = if (x / 24) % 3 == 1 && (y / 24) % 3 == 1 { 0.5 } else { 0.0 };
            0.2 + gradient + noise + square
        }
    })
    .unwrap()
}

fn create_test_config() -> HarrisConfig {
    HarrisConfig {
        sigma: 2.0,
        threshold: 1.0,
        window: 3,
        k: 0.06,
        n_threads: 1, // Single-threaded for consistent benchmarks
    }
}

/// Benchmark full detection pipeline
fn bench_full_detection(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_detection");
    let detector = HarrisDetector::from_core(create_test_config()).unwrap();

    for &(width, height) in &[(64, 64), (128, 128), (256, 256), (512, 512)] {
        for complexity in ["simple", "checker", "realistic"] {
            let img = create_benchmark_image(width, height, complexity);
            group.bench_with_input(
                BenchmarkId::new(format!("{}x{}", width, height), complexity),
                &img,
                |b, img| b.iter(|| black_box(detector.detect(black_box(img)).unwrap())),
            );
        }
    }

    group.finish();
}

/// Separable against direct Gaussian smoothing
fn bench_convolution(c: &mut Criterion) {
    let img = create_benchmark_image(256, 256, "realistic");
    let mut group = c.benchmark_group("convolution");

    for sigma in [1.0f32, 2.0, 3.0] {
        let separable = SeparableKernel::gaussian(sigma).unwrap();
        let direct = separable.to_kernel();
        group.bench_with_input(BenchmarkId::new("separable", sigma), &separable, |b, k| {
            b.iter(|| black_box(Convolution::convolve_separable(black_box(&img), k).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("direct", sigma), &direct, |b, k| {
            b.iter(|| black_box(Convolution::convolve(black_box(&img), k).unwrap()))
        });
    }

    group.bench_function("sobel_x", |b| {
        let k = Kernel::sobel_x();
        b.iter(|| black_box(Convolution::convolve(black_box(&img), &k).unwrap()))
    });

    group.finish();
}

/// Benchmark individual pipeline stages
fn bench_pipeline_stages(c: &mut Criterion) {
    let img = create_benchmark_image(256, 256, "checker");
    let mut group = c.benchmark_group("pipeline_stages");

    group.bench_function("structure_tensor", |b| {
        b.iter(|| {
            black_box(
                StructureTensorBuilder::structure_tensor(black_box(&img), 2.0, GradientOperator::Sobel)
                    .unwrap(),
            )
        })
    });

    let tensor = StructureTensorBuilder::structure_tensor(&img, 2.0, GradientOperator::Sobel).unwrap();
    group.bench_function("corner_response", |b| {
        b.iter(|| black_box(CornerResponse::compute(black_box(&tensor), 0.06).unwrap()))
    });

    let response = CornerResponse::compute(&tensor, 0.06).unwrap();
    for window in [1, 3, 7] {
        group.bench_with_input(BenchmarkId::new("extract", window), &window, |b, &w| {
            b.iter(|| black_box(PointExtractor::extract(black_box(&response), 1.0, w).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_full_detection,
    bench_convolution,
    bench_pipeline_stages
);
criterion_main!(benches);
