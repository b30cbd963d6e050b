//! Benchmarks for sheet layout and assembly.
//!
//! Run with: cargo bench

use criterion::Criterion;
use image::{DynamicImage, Rgb, RgbImage};
use thumbsheet::{SampledFrame, SheetAssembler, SheetLayout, SheetOptions};

fn frames(count: usize, width: u32, height: u32) -> Vec<SampledFrame> {
    (0..count)
        .map(|index| SampledFrame {
            offset: index as u64 * 60,
            image: DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
                Rgb([(x % 256) as u8, (y % 256) as u8, (index * 40) as u8])
            })),
        })
        .collect()
}

fn benchmark_layout(criterion: &mut Criterion) {
    let options = SheetOptions::new(17.0);
    criterion.bench_function("compute sheet layout", |bencher| {
        bencher.iter(|| SheetLayout::compute(3, 9.0 / 16.0, &options));
    });
}

fn benchmark_assembly(criterion: &mut Criterion) {
    let options = SheetOptions::new(17.0);

    let hd = frames(3, 1280, 720);
    criterion.bench_function("assemble 3 frames (720p)", |bencher| {
        bencher.iter(|| SheetAssembler::assemble(&hd, "/videos/clip.mp4", &options).unwrap());
    });

    let full_hd = frames(3, 1920, 1080);
    criterion.bench_function("assemble 3 frames (1080p)", |bencher| {
        bencher.iter(|| SheetAssembler::assemble(&full_hd, "/videos/clip.mp4", &options).unwrap());
    });

    let many = frames(8, 640, 360);
    criterion.bench_function("assemble 8 frames (360p)", |bencher| {
        bencher.iter(|| SheetAssembler::assemble(&many, "/videos/clip.mp4", &options).unwrap());
    });
}

fn benchmark_save(criterion: &mut Criterion) {
    let directory = tempfile::tempdir().unwrap();
    let destination = directory.path().join("bench.jpg");
    let sheet =
        SheetAssembler::assemble(&frames(3, 1280, 720), "/videos/clip.mp4", &SheetOptions::new(17.0))
            .unwrap();

    criterion.bench_function("encode sheet as JPEG", |bencher| {
        bencher.iter(|| SheetAssembler::save(&sheet, &destination).unwrap());
    });
}

criterion::criterion_group!(benches, benchmark_layout, benchmark_assembly, benchmark_save);
criterion::criterion_main!(benches);
