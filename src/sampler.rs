//! Frame sampling.
//!
//! [`FrameSampler`] turns sample fractions into whole-second offsets and asks
//! the external tool for one frame at each offset. Every frame goes through
//! its own temporary file, which is removed as soon as it has been decoded,
//! whether decoding succeeded or not. One bad frame fails the whole video.

use std::path::Path;

use image::DynamicImage;
use tempfile::{Builder as TempFileBuilder, TempPath};

use crate::error::ThumbsheetError;
use crate::ffmpeg::FfmpegTool;

/// Frames must be larger than this in both dimensions.
pub const MIN_FRAME_DIMENSION: u32 = 10;

/// One decoded frame and the offset it was taken at.
#[derive(Debug, Clone)]
pub struct SampledFrame {
    /// Seek offset in whole seconds.
    pub offset: u64,
    /// Decoded frame.
    pub image: DynamicImage,
}

/// Convert sample fractions to whole-second offsets, preserving order.
pub fn sample_offsets(duration: u64, points: &[f64]) -> Vec<u64> {
    points
        .iter()
        .map(|point| (duration as f64 * point).round() as u64)
        .collect()
}

/// Extracts the sample frames of one video.
pub struct FrameSampler<'a> {
    tool: &'a FfmpegTool,
}

impl<'a> FrameSampler<'a> {
    /// Create a sampler that runs `tool`.
    pub fn new(tool: &'a FfmpegTool) -> Self {
        Self { tool }
    }

    /// Extract one frame per sample point, in order.
    ///
    /// # Errors
    ///
    /// Fails on the first frame that cannot be extracted, decoded, or is
    /// not larger than [`MIN_FRAME_DIMENSION`] in both dimensions. No
    /// partial frame list is ever returned.
    pub fn sample(
        &self,
        input: &Path,
        duration: u64,
        points: &[f64],
    ) -> Result<Vec<SampledFrame>, ThumbsheetError> {
        let offsets = sample_offsets(duration, points);
        log::debug!("Sampling {} at {:?}", input.display(), offsets);

        offsets
            .into_iter()
            .map(|offset| self.frame_at(input, offset))
            .collect()
    }

    fn frame_at(&self, input: &Path, offset: u64) -> Result<SampledFrame, ThumbsheetError> {
        // Dropping the TempPath deletes the file on every exit path below.
        let temporary = temporary_frame_path()?;
        self.tool.extract_frame(input, offset, &temporary)?;
        let image = read_frame(&temporary, offset)?;
        Ok(SampledFrame { offset, image })
    }
}

fn temporary_frame_path() -> Result<TempPath, ThumbsheetError> {
    let file = TempFileBuilder::new()
        .prefix("thumbsheet-")
        .suffix(".png")
        .tempfile()?;
    Ok(file.into_temp_path())
}

fn read_frame(path: &Path, offset: u64) -> Result<DynamicImage, ThumbsheetError> {
    if std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0) == 0 {
        return Err(ThumbsheetError::MissingFrame { offset });
    }
    let image = image::open(path)?;
    let (width, height) = (image.width(), image.height());
    if width <= MIN_FRAME_DIMENSION || height <= MIN_FRAME_DIMENSION {
        return Err(ThumbsheetError::FrameTooSmall {
            offset,
            width,
            height,
        });
    }
    Ok(image)
}
