//! Parallel file processing.
//!
//! [`run_tasks`] runs the file pipeline over every catalog entry on a
//! dedicated [`rayon`] pool of the configured size. Workers share only the
//! immutable [`TaskContext`]; each one writes files whose paths derive from
//! its own unique output name, so no locking is needed. Results come back
//! in discovery order once every task has finished.

use rayon::ThreadPoolBuilder;
use rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};

use crate::catalog::CatalogEntry;
use crate::error::ThumbsheetError;
use crate::progress::ProgressTracker;
use crate::task::{TaskContext, TaskOutcome, process_file};

/// Process every entry with at most `workers` files in flight.
///
/// With `workers == 1` files are processed sequentially on the calling
/// thread, in discovery order. The returned vector is index-aligned with
/// `entries`.
///
/// # Errors
///
/// Returns [`ThumbsheetError::WorkerPool`] if the thread pool cannot be
/// created. Per-file failures are reported in the outcomes instead.
pub(crate) fn run_tasks(
    entries: &[CatalogEntry],
    context: &TaskContext,
    workers: usize,
    tracker: &ProgressTracker,
) -> Result<Vec<TaskOutcome>, ThumbsheetError> {
    let run_one = |entry: &CatalogEntry| {
        let outcome = process_file(entry, context);
        tracker.advance(&entry.video.path, outcome.status());
        outcome
    };

    if workers <= 1 {
        return Ok(entries.iter().map(run_one).collect());
    }

    let pool = ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("thumbsheet-worker-{index}"))
        .build()?;

    // One file per rayon job.
    let outcomes: Vec<TaskOutcome> = pool.install(|| {
        entries
            .par_iter()
            .with_max_len(1)
            .map(run_one)
            .collect()
    });
    Ok(outcomes)
}
