//! Error types for the `thumbsheet` crate.
//!
//! This module defines [`ThumbsheetError`], the unified error type returned by
//! all fallible operations in the crate. Configuration errors abort a run
//! before any worker starts; per-file errors are turned into a
//! [`RejectReason`](crate::RejectReason) by the file task and never abort
//! the run.

use std::{io::Error as IoError, path::PathBuf};

use image::ImageError;
use rayon::ThreadPoolBuildError;
use thiserror::Error;

/// The unified error type for all `thumbsheet` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThumbsheetError {
    /// The input root is missing or not a directory.
    #[error("Invalid input root {path}: {reason}")]
    InputRoot {
        /// Root that was configured.
        path: PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// A generator option is out of range.
    #[error("Invalid option: {0}")]
    InvalidOption(String),

    /// A duration bucket boundary is out of range, or there are too many.
    #[error("Invalid bucket boundaries: {0}")]
    InvalidBucketBoundary(String),

    /// Too many discovered files share one base name.
    #[error("Too many files named {base_name:?} (more than {limit} collisions)")]
    NameCollisions {
        /// The colliding base name (file name without extension).
        base_name: String,
        /// Collision limit that was exceeded.
        limit: usize,
    },

    /// Discovery found more files than the configured guard allows.
    #[error("Found {found} video files, limit is {limit}")]
    TooManyFiles {
        /// Number of discovered files.
        found: usize,
        /// Configured upper bound.
        limit: usize,
    },

    /// The external decoding tool could not be started.
    #[error("Cannot run {program}: {reason}")]
    ToolUnavailable {
        /// Program that was invoked.
        program: PathBuf,
        /// Underlying reason.
        reason: String,
    },

    /// The external decoding tool exited unsuccessfully.
    #[error("{program} failed on {input}: {reason}")]
    ToolFailed {
        /// Program that was invoked.
        program: PathBuf,
        /// Video the tool was working on.
        input: PathBuf,
        /// Exit status and the last diagnostic line.
        reason: String,
    },

    /// The tool reported success but produced no frame image.
    #[error("No frame was written for offset {offset}s")]
    MissingFrame {
        /// Seek offset in whole seconds.
        offset: u64,
    },

    /// A decoded frame is too small to be a real picture.
    #[error("Frame at {offset}s is only {width}x{height} pixels")]
    FrameTooSmall {
        /// Seek offset in whole seconds.
        offset: u64,
        /// Decoded width.
        width: u32,
        /// Decoded height.
        height: u32,
    },

    /// The computed sheet is larger than a JPEG can hold.
    #[error("Sheet of {width}x{height} pixels exceeds the 65535x65535 JPEG limit")]
    SheetTooLarge {
        /// Computed sheet width.
        width: u32,
        /// Computed sheet height.
        height: u32,
    },

    /// An index file line does not have three `;`-separated fields.
    #[error("Malformed index line {line_number}: {line:?}")]
    InvalidIndexLine {
        /// One-based line number.
        line_number: usize,
        /// Offending line.
        line: String,
    },

    /// An index file could not be written.
    #[error("Failed to write index file {path}: {source}")]
    IndexWrite {
        /// Destination index path.
        path: PathBuf,
        /// Underlying I/O error.
        source: IoError,
    },

    /// The worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    /// Directory traversal failed.
    #[error("Directory traversal error: {0}")]
    WalkError(#[from] walkdir::Error),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while decoding or encoding.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl ThumbsheetError {
    /// Returns `true` for errors that abort a run before any file is
    /// processed.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ThumbsheetError::InputRoot { .. }
                | ThumbsheetError::InvalidOption(_)
                | ThumbsheetError::InvalidBucketBoundary(_)
                | ThumbsheetError::NameCollisions { .. }
                | ThumbsheetError::TooManyFiles { .. }
                | ThumbsheetError::ToolUnavailable { .. }
        )
    }
}

impl From<ThreadPoolBuildError> for ThumbsheetError {
    fn from(error: ThreadPoolBuildError) -> Self {
        ThumbsheetError::WorkerPool(error.to_string())
    }
}
