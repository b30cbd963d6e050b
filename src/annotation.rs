//! Bitmap text for sheet labels.
//!
//! Glyphs come from the 8×8 fonts in [`font8x8`] and are drawn as solid
//! squares of `scale × scale` pixels. Characters without a glyph are drawn
//! as `?`. Drawing is clipped to the canvas.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};

/// Width and height of one unscaled glyph.
pub(crate) const GLYPH_SIZE: u32 = 8;

/// Width in pixels of `text` at `scale`.
pub(crate) fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIZE * scale
}

/// Draw `text` with its top-left corner at `(x, y)`.
pub(crate) fn draw_text(canvas: &mut RgbImage, text: &str, x: i64, y: i64, scale: u32, color: Rgb<u8>) {
    let step = (GLYPH_SIZE * scale) as i64;
    for (index, character) in text.chars().enumerate() {
        draw_glyph(canvas, glyph(character), x + index as i64 * step, y, scale, color);
    }
}

/// Draw `text` in `color` surrounded by a one-unit `outline`, so it stays
/// legible on any background.
pub(crate) fn draw_outlined_text(
    canvas: &mut RgbImage,
    text: &str,
    x: i64,
    y: i64,
    scale: u32,
    color: Rgb<u8>,
    outline: Rgb<u8>,
) {
    let width = scale.div_ceil(2).max(1) as i64;
    for dy in [-width, 0, width] {
        for dx in [-width, 0, width] {
            if dx != 0 || dy != 0 {
                draw_text(canvas, text, x + dx, y + dy, scale, outline);
            }
        }
    }
    draw_text(canvas, text, x, y, scale, color);
}

fn glyph(character: char) -> [u8; 8] {
    BASIC_FONTS
        .get(character)
        .or_else(|| LATIN_FONTS.get(character))
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

fn draw_glyph(canvas: &mut RgbImage, rows: [u8; 8], x: i64, y: i64, scale: u32, color: Rgb<u8>) {
    let scale = scale as i64;
    for (row, bits) in rows.iter().enumerate() {
        for column in 0..GLYPH_SIZE as i64 {
            if bits & (1 << column) == 0 {
                continue;
            }
            let left = x + column * scale;
            let top = y + row as i64 * scale;
            fill_square(canvas, left, top, scale, color);
        }
    }
}

fn fill_square(canvas: &mut RgbImage, left: i64, top: i64, size: i64, color: Rgb<u8>) {
    let (width, height) = (canvas.width() as i64, canvas.height() as i64);
    for py in top.max(0)..(top + size).min(height) {
        for px in left.max(0)..(left + size).min(width) {
            canvas.put_pixel(px as u32, py as u32, color);
        }
    }
}
