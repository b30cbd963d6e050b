//! Progress reporting.
//!
//! A [`ProgressCallback`] receives a [`ProgressInfo`] snapshot each time a
//! file finishes, from whichever worker thread finished it.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use thumbsheet::{GeneratorOptions, ProgressCallback, ProgressInfo, ThumbnailGenerator};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("[{}/{}] {:?} {}", info.completed, info.total, info.status, info.source.display());
//!     }
//! }
//!
//! let options = GeneratorOptions::new("/videos", "/thumbs")
//!     .with_progress(Arc::new(PrintProgress));
//! ThumbnailGenerator::new(options).run()?;
//! # Ok::<(), thumbsheet::ThumbsheetError>(())
//! ```

use std::path::{Path, PathBuf};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::{Duration, Instant};

use crate::task::TaskStatus;

/// A snapshot of run progress, delivered after each file.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Files finished so far, including this one.
    pub completed: u64,
    /// Total files in the run.
    pub total: u64,
    /// Completion percentage (0.0 – 100.0).
    pub percentage: f32,
    /// Wall-clock time since processing started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// The file that just finished.
    pub source: PathBuf,
    /// How it finished.
    pub status: TaskStatus,
}

/// Trait for receiving progress updates during a run.
///
/// Implementations must be [`Send`] and [`Sync`] because callbacks are
/// invoked from worker threads. Callbacks observe the run but cannot stop it.
pub trait ProgressCallback: Send + Sync {
    /// Called once per finished file.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. This is the default.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Shared, thread-safe counter that emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    total: u64,
    completed: AtomicU64,
    start_time: Instant,
}

impl ProgressTracker {
    pub(crate) fn new(callback: Arc<dyn ProgressCallback>, total: u64) -> Self {
        Self {
            callback,
            total,
            completed: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record one finished file and notify the callback.
    pub(crate) fn advance(&self, source: &Path, status: TaskStatus) {
        let completed = self.completed.fetch_add(1, Ordering::AcqRel) + 1;
        let elapsed = self.start_time.elapsed();

        let percentage = if self.total > 0 {
            (completed as f32 / self.total as f32) * 100.0
        } else {
            100.0
        };
        let remaining = self.total.saturating_sub(completed);
        let estimated_remaining = u32::try_from(completed)
            .ok()
            .zip(u32::try_from(remaining).ok())
            .map(|(done, left)| (elapsed / done) * left);

        self.callback.on_progress(&ProgressInfo {
            completed,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            source: source.to_path_buf(),
            status,
        });
    }

    pub(crate) fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}
