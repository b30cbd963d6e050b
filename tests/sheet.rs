//! Sheet assembly integration tests.

mod common;

use image::{DynamicImage, Rgb, RgbImage};
use thumbsheet::{SampledFrame, SheetAssembler, SheetLayout, SheetOptions, sample_offsets};

fn gradient_frame(offset: u64, width: u32, height: u32) -> SampledFrame {
    let image = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
    });
    SampledFrame {
        offset,
        image: DynamicImage::ImageRgb8(image),
    }
}

#[test]
fn saved_sheet_is_a_jpeg_with_layout_size() {
    let directory = common::temporary_directory();
    let destination = directory.path().join("clip.jpg");

    let offsets = sample_offsets(1200, &[0.30, 0.60, 0.80]);
    assert_eq!(offsets, [360, 720, 960]);
    let frames: Vec<_> = offsets
        .iter()
        .map(|&offset| gradient_frame(offset, 320, 180))
        .collect();

    let options = SheetOptions::new(17.0);
    let sheet = SheetAssembler::assemble(&frames, "/videos/a very long title.mp4", &options)
        .expect("Assembly failed");
    SheetAssembler::save(&sheet, &destination).expect("Save failed");

    let bytes = std::fs::read(&destination).expect("Read failed");
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

    let reopened = image::open(&destination).expect("Failed to decode sheet");
    let layout = SheetLayout::compute(3, 180.0 / 320.0, &options);
    assert_eq!(reopened.width(), layout.sheet_width);
    assert_eq!(reopened.height(), layout.sheet_height);
}

#[test]
fn title_longer_than_sheet_still_assembles() {
    let frames = vec![gradient_frame(10, 40, 30)];
    let title = "x".repeat(500);
    let sheet = SheetAssembler::assemble(&frames, &title, &SheetOptions::new(1.0))
        .expect("Assembly failed");
    assert_eq!(sheet.width(), 100);
}

#[test]
fn save_into_missing_directory_fails() {
    let directory = common::temporary_directory();
    let frames = vec![gradient_frame(10, 40, 30)];
    let sheet = SheetAssembler::assemble(&frames, "t", &SheetOptions::new(1.0))
        .expect("Assembly failed");
    let destination = directory.path().join("missing").join("t.jpg");
    assert!(SheetAssembler::save(&sheet, &destination).is_err());
}
