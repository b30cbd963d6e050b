//! Thumbnail sheet assembly.
//!
//! A sheet is one row of sampled frames, left to right, separated by a small
//! gutter, below a white title band that carries the source path. Each frame
//! is labelled with its offset in its upper-left corner. The layout depends
//! only on the frame count, the first frame's aspect ratio, and the
//! [`SheetOptions`], so identical inputs always give identical sheets.

use std::path::Path;

use image::{DynamicImage, GenericImage, ImageFormat, Rgb, RgbImage, imageops::FilterType};

use crate::annotation::{GLYPH_SIZE, draw_outlined_text, draw_text, text_width};
use crate::error::ThumbsheetError;
use crate::sampler::SampledFrame;

/// Share of the frame band used by gutters, spread across all gaps.
const GUTTER_FRACTION: f64 = 0.02;

/// Minimum title band height, as a share of the cell height.
const TITLE_FRACTION: f64 = 0.07;

/// Band width (pixels) per text scale step.
const PIXELS_PER_TEXT_SCALE: f64 = 850.0;

/// Largest sheet side, in pixels, that a JPEG can hold.
pub const MAX_SHEET_DIMENSION: u32 = 65_535;

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const INK: Rgb<u8> = Rgb([0, 0, 0]);

/// Sheet size settings.
///
/// # Example
///
/// ```
/// use thumbsheet::{SheetLayout, SheetOptions};
///
/// let options = SheetOptions::new(17.0).with_dpi(100);
/// let layout = SheetLayout::compute(3, 9.0 / 16.0, &options);
/// assert_eq!(layout.cell_width, 566);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct SheetOptions {
    /// Width of the frame band in units.
    pub width: f64,
    /// Pixels per unit.
    pub dpi: u32,
}

impl SheetOptions {
    /// Create options for a band `width` units wide at 100 pixels per unit.
    pub fn new(width: f64) -> Self {
        Self { width, dpi: 100 }
    }

    /// Set the pixels per unit.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }
}

/// Pixel geometry of one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SheetLayout {
    /// Number of frames.
    pub frame_count: u32,
    /// Width of each frame cell.
    pub cell_width: u32,
    /// Height of each frame cell.
    pub cell_height: u32,
    /// Horizontal gap between cells.
    pub gutter: u32,
    /// Height of the title band above the cells.
    pub title_height: u32,
    /// Integer glyph scale for labels and title.
    pub text_scale: u32,
    /// Index of the cell the title is centred over.
    pub title_cell: u32,
    /// Total sheet width.
    pub sheet_width: u32,
    /// Total sheet height.
    pub sheet_height: u32,
}

impl SheetLayout {
    /// Compute the layout for `frame_count` frames of the given
    /// height-to-width `aspect`.
    pub fn compute(frame_count: usize, aspect: f64, options: &SheetOptions) -> Self {
        let count = frame_count.max(1) as u32;
        let band = (options.width * options.dpi as f64).round().max(1.0);

        let cell_width = ((band / count as f64).floor() as u32).max(1);
        let gutter = if count > 1 {
            (band * GUTTER_FRACTION / (count - 1) as f64).round() as u32
        } else {
            0
        };
        let cell_height = ((cell_width as f64 * aspect).round() as u32).max(1);

        let text_scale = ((band / PIXELS_PER_TEXT_SCALE).round() as u32).max(1);
        let text_band = (GLYPH_SIZE + 4).saturating_mul(text_scale);
        let title_height = ((cell_height as f64 * TITLE_FRACTION).round() as u32).max(text_band);

        Self {
            frame_count: count,
            cell_width,
            cell_height,
            gutter,
            title_height,
            text_scale,
            title_cell: (count - 1) / 2,
            sheet_width: cell_width
                .saturating_mul(count)
                .saturating_add(gutter.saturating_mul(count - 1)),
            sheet_height: title_height.saturating_add(cell_height),
        }
    }

    /// Top-left corner of cell `index`.
    pub fn cell_origin(&self, index: u32) -> (u32, u32) {
        let step = self.cell_width.saturating_add(self.gutter);
        (index.saturating_mul(step), self.title_height)
    }
}

/// Builds thumbnail sheets from sampled frames.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use thumbsheet::{FfmpegTool, FrameSampler, SheetAssembler, SheetOptions};
///
/// let tool = FfmpegTool::new(None);
/// let source = Path::new("/videos/clip.mp4");
/// let frames = FrameSampler::new(&tool).sample(source, 1200, &[0.3, 0.6, 0.8])?;
/// let sheet = SheetAssembler::assemble(&frames, &source.display().to_string(), &SheetOptions::new(17.0))?;
/// SheetAssembler::save(&sheet, Path::new("clip.jpg"))?;
/// # Ok::<(), thumbsheet::ThumbsheetError>(())
/// ```
pub struct SheetAssembler;

impl SheetAssembler {
    /// Composite `frames` into one sheet titled `title`.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsheetError::InvalidOption`] if `frames` is empty,
    /// [`ThumbsheetError::SheetTooLarge`] if a side would exceed
    /// [`MAX_SHEET_DIMENSION`], or an image error if compositing fails.
    pub fn assemble(
        frames: &[SampledFrame],
        title: &str,
        options: &SheetOptions,
    ) -> Result<DynamicImage, ThumbsheetError> {
        let first = frames.first().ok_or_else(|| {
            ThumbsheetError::InvalidOption("cannot assemble a sheet without frames".to_string())
        })?;
        let aspect = first.image.height() as f64 / first.image.width() as f64;
        let layout = SheetLayout::compute(frames.len(), aspect, options);
        log::debug!("Sheet layout for {title}: {layout:?}");
        if layout.sheet_width > MAX_SHEET_DIMENSION || layout.sheet_height > MAX_SHEET_DIMENSION {
            return Err(ThumbsheetError::SheetTooLarge {
                width: layout.sheet_width,
                height: layout.sheet_height,
            });
        }

        let mut canvas = RgbImage::from_pixel(layout.sheet_width, layout.sheet_height, BACKGROUND);
        let scale = layout.text_scale;
        let padding = (2 * scale) as i64;

        for (index, frame) in frames.iter().enumerate() {
            let (x, y) = layout.cell_origin(index as u32);
            let cell = frame
                .image
                .resize_exact(layout.cell_width, layout.cell_height, FilterType::Triangle)
                .to_rgb8();
            canvas.copy_from(&cell, x, y)?;

            let label = format!("{}s", frame.offset);
            draw_outlined_text(
                &mut canvas,
                &label,
                x as i64 + padding,
                y as i64 + padding,
                scale,
                INK,
                BACKGROUND,
            );
        }

        let (title_x, _) = layout.cell_origin(layout.title_cell);
        let centre = title_x as i64 + layout.cell_width as i64 / 2;
        let width = text_width(title, scale) as i64;
        let left = (centre - width / 2)
            .min(layout.sheet_width as i64 - width)
            .max(0);
        let top = (layout.title_height as i64 - (GLYPH_SIZE * scale) as i64) / 2;
        draw_text(&mut canvas, title, left, top, scale, INK);

        Ok(DynamicImage::ImageRgb8(canvas))
    }

    /// Encode `sheet` as JPEG at `destination`.
    pub fn save(sheet: &DynamicImage, destination: &Path) -> Result<(), ThumbsheetError> {
        sheet.save_with_format(destination, ImageFormat::Jpeg)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(offset: u64, width: u32, height: u32, shade: u8) -> SampledFrame {
        SampledFrame {
            offset,
            image: DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([shade; 3]))),
        }
    }

    #[test]
    fn default_layout_for_three_widescreen_frames() {
        let layout = SheetLayout::compute(3, 9.0 / 16.0, &SheetOptions::new(17.0));
        assert_eq!(layout.cell_width, 566);
        assert_eq!(layout.cell_height, 318);
        assert_eq!(layout.gutter, 17);
        assert_eq!(layout.text_scale, 2);
        assert_eq!(layout.title_cell, 1);
        assert_eq!(layout.sheet_width, 566 * 3 + 17 * 2);
        assert_eq!(layout.sheet_height, layout.title_height + 318);
        assert_eq!(layout.cell_origin(2), (2 * (566 + 17), layout.title_height));
    }

    #[test]
    fn single_frame_has_no_gutter() {
        let layout = SheetLayout::compute(1, 0.75, &SheetOptions::new(4.0));
        assert_eq!(layout.gutter, 0);
        assert_eq!(layout.title_cell, 0);
        assert_eq!(layout.sheet_width, 400);
        assert_eq!(layout.cell_height, 300);
    }

    #[test]
    fn title_cell_is_nearest_the_middle() {
        let options = SheetOptions::new(10.0);
        assert_eq!(SheetLayout::compute(2, 1.0, &options).title_cell, 0);
        assert_eq!(SheetLayout::compute(4, 1.0, &options).title_cell, 1);
        assert_eq!(SheetLayout::compute(5, 1.0, &options).title_cell, 2);
    }

    #[test]
    fn title_band_fits_text() {
        let layout = SheetLayout::compute(8, 0.1, &SheetOptions::new(17.0));
        assert!(layout.title_height >= GLYPH_SIZE * layout.text_scale);
    }

    #[test]
    fn assembly_matches_layout_and_is_deterministic() {
        let frames = vec![frame(360, 160, 90, 40), frame(720, 320, 240, 90), frame(960, 64, 36, 200)];
        let options = SheetOptions::new(6.0);
        let first = SheetAssembler::assemble(&frames, "/videos/clip.mp4", &options).unwrap();
        let second = SheetAssembler::assemble(&frames, "/videos/clip.mp4", &options).unwrap();

        let layout = SheetLayout::compute(3, 90.0 / 160.0, &options);
        assert_eq!((first.width(), first.height()), (layout.sheet_width, layout.sheet_height));
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn frames_are_placed_below_the_title() {
        let frames = vec![frame(1, 100, 100, 0), frame(2, 100, 100, 0)];
        let options = SheetOptions::new(4.0);
        let sheet = SheetAssembler::assemble(&frames, "t", &options).unwrap().to_rgb8();
        let layout = SheetLayout::compute(2, 1.0, &options);

        let (x, y) = layout.cell_origin(1);
        let bottom_right = sheet.get_pixel(x + layout.cell_width - 1, y + layout.cell_height - 1);
        assert_eq!(*bottom_right, Rgb([0, 0, 0]));
        let gutter = sheet.get_pixel(layout.cell_width, layout.sheet_height - 1);
        assert_eq!(*gutter, BACKGROUND);
    }

    #[test]
    fn huge_width_saturates_instead_of_overflowing() {
        let layout = SheetLayout::compute(3, 0.5625, &SheetOptions::new(1e9));
        assert_eq!(layout.sheet_width, u32::MAX);
        assert!(layout.sheet_height > MAX_SHEET_DIMENSION);
        assert_eq!(layout.cell_origin(2).0, u32::MAX);
    }

    #[test]
    fn oversized_sheet_is_rejected_before_allocation() {
        let frames = vec![frame(1, 20, 4000, 0)];
        let error = SheetAssembler::assemble(&frames, "t", &SheetOptions::new(17.0)).unwrap_err();
        assert!(
            matches!(error, ThumbsheetError::SheetTooLarge { width: 1700, .. }),
            "{error}"
        );
    }

    #[test]
    fn empty_frame_list_is_an_error() {
        assert!(SheetAssembler::assemble(&[], "t", &SheetOptions::new(1.0)).is_err());
    }
}
