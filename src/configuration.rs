//! Generator configuration.
//!
//! [`GeneratorOptions`] is a builder that carries every setting of a run.
//! Once a run starts the value is only ever shared by reference, so all
//! workers see the same immutable configuration.
//!
//! # Example
//!
//! ```no_run
//! use thumbsheet::GeneratorOptions;
//!
//! let options = GeneratorOptions::new("/videos", "/videos/thumbs")
//!     .with_sample_points(vec![0.1, 0.5, 0.9])
//!     .with_bucket_minutes(vec![10.0, 30.0])
//!     .with_workers(4);
//! options.validate()?;
//! # Ok::<(), thumbsheet::ThumbsheetError>(())
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::ThumbsheetError;
use crate::ffmpeg::FfmpegLogLevel;
use crate::progress::{NoOpProgress, ProgressCallback};
use crate::thumbnail::{MAX_SHEET_DIMENSION, SheetLayout, SheetOptions};

/// Default sample points, as fractions of the duration.
pub const DEFAULT_SAMPLE_POINTS: [f64; 3] = [0.30, 0.60, 0.80];

/// Default recognized extensions.
pub const DEFAULT_EXTENSIONS: [&str; 8] = ["mp4", "avi", "mov", "mpg", "wmv", "mkv", "m4v", "flv"];

/// Default sheet width in units (inches at [`DEFAULT_DPI`]).
pub const DEFAULT_SHEET_WIDTH: f64 = 17.0;

/// Default pixels per sheet width unit.
pub const DEFAULT_DPI: u32 = 100;

/// Default number of parallel workers.
pub const DEFAULT_WORKERS: usize = 3;

/// Default upper bound on the number of discovered files.
pub const DEFAULT_MAX_FILES: usize = 10_000;

/// Settings for one generation run.
#[derive(Clone)]
#[must_use]
pub struct GeneratorOptions {
    /// Directory searched recursively for videos.
    pub input_root: PathBuf,
    /// Directory that receives the bucket folders.
    pub output_root: PathBuf,
    /// Ordered fractions of the duration at which frames are taken.
    pub sample_points: Vec<f64>,
    /// Width of the frame band, in units of [`dpi`](Self::dpi) pixels.
    pub sheet_width: f64,
    /// Pixels per sheet width unit.
    pub dpi: u32,
    /// Bucket thresholds in minutes.
    pub bucket_minutes: Vec<f64>,
    /// Number of files processed concurrently.
    pub workers: usize,
    /// Directory containing the `ffmpeg` executable. `None` searches `PATH`.
    pub tool_directory: Option<PathBuf>,
    /// Recognized extensions, without the leading dot.
    pub extensions: Vec<String>,
    /// Verbosity passed to the tool for frame extraction.
    pub tool_log_level: FfmpegLogLevel,
    /// Discovery aborts if more files than this are found.
    pub max_files: usize,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for GeneratorOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeneratorOptions")
            .field("input_root", &self.input_root)
            .field("output_root", &self.output_root)
            .field("sample_points", &self.sample_points)
            .field("sheet_width", &self.sheet_width)
            .field("dpi", &self.dpi)
            .field("bucket_minutes", &self.bucket_minutes)
            .field("workers", &self.workers)
            .field("tool_directory", &self.tool_directory)
            .field("extensions", &self.extensions)
            .field("tool_log_level", &self.tool_log_level)
            .field("max_files", &self.max_files)
            .finish()
    }
}

impl GeneratorOptions {
    /// Create options with defaults for everything except the two roots.
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            input_root: input_root.into(),
            output_root: output_root.into(),
            sample_points: DEFAULT_SAMPLE_POINTS.to_vec(),
            sheet_width: DEFAULT_SHEET_WIDTH,
            dpi: DEFAULT_DPI,
            bucket_minutes: vec![10.0],
            workers: DEFAULT_WORKERS,
            tool_directory: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|ext| ext.to_string()).collect(),
            tool_log_level: FfmpegLogLevel::default(),
            max_files: DEFAULT_MAX_FILES,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the sample points (fractions in `[0, 1]`, kept in the given order).
    pub fn with_sample_points(mut self, points: Vec<f64>) -> Self {
        self.sample_points = points;
        self
    }

    /// Set the sheet width in units.
    pub fn with_sheet_width(mut self, width: f64) -> Self {
        self.sheet_width = width;
        self
    }

    /// Set the pixels per sheet width unit.
    pub fn with_dpi(mut self, dpi: u32) -> Self {
        self.dpi = dpi;
        self
    }

    /// Set the bucket thresholds in minutes.
    pub fn with_bucket_minutes(mut self, minutes: Vec<f64>) -> Self {
        self.bucket_minutes = minutes;
        self
    }

    /// Set the number of parallel workers. `1` processes files sequentially
    /// in discovery order.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the directory containing the `ffmpeg` executable.
    pub fn with_tool_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.tool_directory = Some(directory.into());
        self
    }

    /// Set the recognized extensions. A leading dot is stripped.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Set the verbosity of frame extraction.
    pub fn with_tool_log_level(mut self, level: FfmpegLogLevel) -> Self {
        self.tool_log_level = level;
        self
    }

    /// Set the discovered-file guard.
    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    /// Attach a progress callback, invoked once per processed file.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// The tool install directory, if set.
    pub fn tool_directory(&self) -> Option<&Path> {
        self.tool_directory.as_deref()
    }

    /// Check value ranges that do not depend on the file system.
    ///
    /// Bucket thresholds are checked when the
    /// [`BucketLayout`](crate::BucketLayout) is built.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsheetError::InvalidOption`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ThumbsheetError> {
        if self.sample_points.is_empty() {
            return Err(ThumbsheetError::InvalidOption(
                "at least one sample point is required".to_string(),
            ));
        }
        if let Some(point) = self
            .sample_points
            .iter()
            .find(|point| !(0.0..=1.0).contains(*point))
        {
            return Err(ThumbsheetError::InvalidOption(format!(
                "sample point {point} is outside [0, 1]"
            )));
        }
        if self.workers == 0 {
            return Err(ThumbsheetError::InvalidOption(
                "worker count must be at least 1".to_string(),
            ));
        }
        if !self.sheet_width.is_finite() || self.sheet_width <= 0.0 {
            return Err(ThumbsheetError::InvalidOption(format!(
                "sheet width {} must be positive",
                self.sheet_width
            )));
        }
        if self.dpi == 0 {
            return Err(ThumbsheetError::InvalidOption(
                "dpi must be at least 1".to_string(),
            ));
        }
        let options = SheetOptions::new(self.sheet_width).with_dpi(self.dpi);
        let layout = SheetLayout::compute(self.sample_points.len(), 1.0, &options);
        if layout.sheet_width > MAX_SHEET_DIMENSION {
            return Err(ThumbsheetError::InvalidOption(format!(
                "sheet width {} at {} dpi gives {} pixels, at most {MAX_SHEET_DIMENSION} allowed",
                self.sheet_width, self.dpi, layout.sheet_width
            )));
        }
        if self.extensions.is_empty() || self.extensions.iter().any(String::is_empty) {
            return Err(ThumbsheetError::InvalidOption(
                "extensions must be non-empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let options = GeneratorOptions::new("in", "out");
        assert_eq!(options.sample_points, vec![0.30, 0.60, 0.80]);
        assert_eq!(options.bucket_minutes, vec![10.0]);
        assert_eq!(options.workers, 3);
        assert_eq!(options.sheet_width, 17.0);
        assert_eq!(options.extensions.len(), 8);
        assert!(options.tool_directory().is_none());
        assert!(options.validate().is_ok());
    }

    #[test]
    fn extensions_lose_leading_dot() {
        let options = GeneratorOptions::new("in", "out").with_extensions([".mp4", "webm"]);
        assert_eq!(options.extensions, vec!["mp4", "webm"]);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let base = GeneratorOptions::new("in", "out");
        assert!(base.clone().with_sample_points(vec![]).validate().is_err());
        assert!(base.clone().with_sample_points(vec![0.5, 1.5]).validate().is_err());
        assert!(base.clone().with_workers(0).validate().is_err());
        assert!(base.clone().with_sheet_width(0.0).validate().is_err());
        assert!(base.clone().with_sheet_width(f64::INFINITY).validate().is_err());
        assert!(base.clone().with_dpi(0).validate().is_err());
        assert!(base.clone().with_extensions(Vec::<String>::new()).validate().is_err());
    }

    #[test]
    fn sheet_wider_than_jpeg_limit_is_rejected() {
        let base = GeneratorOptions::new("in", "out");
        let error = base.clone().with_sheet_width(1e9).validate().unwrap_err();
        assert!(matches!(error, ThumbsheetError::InvalidOption(_)), "{error}");

        let error = base.clone().with_sheet_width(700.0).validate().unwrap_err();
        assert!(error.to_string().contains("71399"), "{error}");

        assert!(base.clone().with_sheet_width(600.0).validate().is_ok());
        assert!(base.clone().with_sheet_width(17.0).with_dpi(10_000).validate().is_err());
    }

    #[test]
    fn debug_omits_callback() {
        let debug = format!("{:?}", GeneratorOptions::new("in", "out"));
        assert!(debug.contains("GeneratorOptions"));
        assert!(debug.contains("workers: 3"));
        assert!(!debug.contains("progress"));
    }
}
