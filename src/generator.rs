//! Run orchestration.
//!
//! [`ThumbnailGenerator`] is the main entry point of the crate. A run has
//! three phases:
//!
//! 1. **Setup**: validate options, build the bucket layout, check the tool,
//!    discover files and create the bucket folders. Any error here aborts
//!    the run before a single file is touched.
//! 2. **Generation**: run the file pipeline on every discovered video with
//!    the configured parallelism.
//! 3. **Indexing**: once every file is finished, regenerate each bucket's
//!    index file from the successful outcomes.

use std::path::PathBuf;

use crate::bucket::BucketLayout;
use crate::catalog::{self, CatalogEntry};
use crate::configuration::GeneratorOptions;
use crate::error::ThumbsheetError;
use crate::ffmpeg::FfmpegTool;
use crate::index::write_indexes;
use crate::parallel::run_tasks;
use crate::progress::ProgressTracker;
use crate::report::RunSummary;
use crate::task::{TaskContext, TaskOutcome};
use crate::thumbnail::SheetOptions;

/// Generates thumbnail sheets and index files for a directory tree.
///
/// # Example
///
/// ```no_run
/// use thumbsheet::{GeneratorOptions, ThumbnailGenerator};
///
/// let options = GeneratorOptions::new("/videos", "/videos/thumbs").with_workers(4);
/// let summary = ThumbnailGenerator::new(options).run()?;
/// println!("{summary}");
/// # Ok::<(), thumbsheet::ThumbsheetError>(())
/// ```
#[derive(Debug)]
pub struct ThumbnailGenerator {
    options: GeneratorOptions,
}

/// Everything phase 1 produces.
#[derive(Debug)]
pub struct PreparedRun {
    /// Shared, immutable task state.
    pub context: TaskContext,
    /// Discovered files in processing order.
    pub entries: Vec<CatalogEntry>,
    /// Videos discovery had to skip because their names are not UTF-8.
    pub skipped: Vec<PathBuf>,
}

impl ThumbnailGenerator {
    /// Create a generator for `options`.
    pub fn new(options: GeneratorOptions) -> Self {
        Self { options }
    }

    /// The options this generator runs with.
    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Run setup only: validate, discover, and create bucket folders.
    ///
    /// # Errors
    ///
    /// Returns a configuration error (see
    /// [`ThumbsheetError::is_configuration_error`]) or an I/O error while
    /// creating folders.
    pub fn prepare(&self) -> Result<PreparedRun, ThumbsheetError> {
        let options = &self.options;
        options.validate()?;

        let output_root = std::path::absolute(&options.output_root)?;
        let layout = BucketLayout::new(&output_root, &options.bucket_minutes)?;

        let tool = FfmpegTool::new(options.tool_directory()).with_log_level(options.tool_log_level);
        tool.verify()?;

        let catalog::Catalog { entries, skipped } =
            catalog::scan(&options.input_root, &options.extensions)?;
        if entries.len() > options.max_files {
            return Err(ThumbsheetError::TooManyFiles {
                found: entries.len(),
                limit: options.max_files,
            });
        }
        log::info!("Total {} files found", entries.len() + skipped.len());

        layout.create_folders()?;

        let context = TaskContext {
            tool,
            layout,
            sample_points: options.sample_points.clone(),
            sheet: SheetOptions::new(options.sheet_width).with_dpi(options.dpi),
        };
        Ok(PreparedRun {
            context,
            entries,
            skipped,
        })
    }

    /// Run all three phases.
    ///
    /// # Errors
    ///
    /// Fails on setup errors, if the worker pool cannot start, or if an
    /// index file cannot be written. Individual files that cannot be
    /// processed are counted in the summary instead.
    pub fn run(&self) -> Result<RunSummary, ThumbsheetError> {
        log::info!("Phase 1: setting parameters");
        let prepared = self.prepare()?;

        log::info!("Phase 2: generating thumbnails");
        let tracker = ProgressTracker::new(self.options.progress.clone(), prepared.entries.len() as u64);
        let outcomes = run_tasks(&prepared.entries, &prepared.context, self.options.workers, &tracker)?;
        let mut summary = RunSummary::from_outcomes(&outcomes, tracker.elapsed());
        summary.skipped = prepared.skipped.len();
        log::info!(
            "{} files processed in {:.1}s ({:.2} files/sec)",
            summary.discovered,
            summary.elapsed.as_secs_f64(),
            summary.files_per_second()
        );

        log::info!("Phase 3: writing index files");
        log::info!("{}/{} files failed", summary.failed(), summary.total());
        summary.index_files =
            write_indexes(&prepared.context.layout, outcomes.iter().filter_map(TaskOutcome::record))?;

        Ok(summary)
    }
}
