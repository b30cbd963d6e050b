//! The per-file pipeline.
//!
//! ```text
//! Start → Probed → Rejected(zero duration | too short)
//!                → Classified → AlreadyExists
//!                             → Sampled → Assembled → Done
//!                             → Rejected(sampling failed | write failed)
//! ```
//!
//! Every rejection is terminal for the run; nothing is retried.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;

use crate::bucket::BucketLayout;
use crate::catalog::CatalogEntry;
use crate::error::ThumbsheetError;
use crate::ffmpeg::FfmpegTool;
use crate::index::ThumbnailRecord;
use crate::probe::DurationProbe;
use crate::sampler::{FrameSampler, SampledFrame};
use crate::thumbnail::{SheetAssembler, SheetOptions};

/// Videos shorter than this many seconds are rejected.
pub const MIN_DURATION_SECONDS: u64 = 5;

/// Immutable state shared by every task of a run.
#[derive(Debug)]
pub struct TaskContext {
    /// The external tool.
    pub tool: FfmpegTool,
    /// Output buckets.
    pub layout: BucketLayout,
    /// Ordered sample fractions.
    pub sample_points: Vec<f64>,
    /// Sheet size.
    pub sheet: SheetOptions,
}

/// Why a file produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// The tool reported no usable duration.
    ZeroDuration,
    /// The video is shorter than [`MIN_DURATION_SECONDS`].
    TooShort {
        /// Probed duration.
        seconds: u64,
    },
    /// The tool could not be run for probing.
    ProbeFailed(String),
    /// A sample frame could not be extracted or was invalid.
    SamplingFailed(String),
    /// The sheet could not be assembled or written.
    WriteFailed(String),
}

impl RejectReason {
    /// Short, stable label used in logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            RejectReason::ZeroDuration => "zero duration",
            RejectReason::TooShort { .. } => "too short",
            RejectReason::ProbeFailed(_) => "probe failed",
            RejectReason::SamplingFailed(_) => "sampling failed",
            RejectReason::WriteFailed(_) => "write failed",
        }
    }
}

impl Display for RejectReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            RejectReason::ZeroDuration => write!(f, "zero duration"),
            RejectReason::TooShort { seconds } => write!(f, "too short ({seconds}s)"),
            RejectReason::ProbeFailed(detail)
            | RejectReason::SamplingFailed(detail)
            | RejectReason::WriteFailed(detail) => write!(f, "{}: {detail}", self.label()),
        }
    }
}

/// Result of running the pipeline on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// A new sheet was written.
    Created {
        /// Bucket index.
        bucket: usize,
        /// Index record for the sheet.
        record: ThumbnailRecord,
    },
    /// A sheet from an earlier run was found and reused.
    AlreadyExists {
        /// Bucket index.
        bucket: usize,
        /// Index record for the existing sheet.
        record: ThumbnailRecord,
    },
    /// No record; the reason is only logged and counted.
    Rejected(RejectReason),
}

/// Coarse outcome kind, without payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// A new sheet was written.
    Created,
    /// An existing sheet was reused.
    AlreadyExists,
    /// The file was skipped.
    Rejected,
}

impl TaskOutcome {
    /// Bucket and record for successful outcomes.
    pub fn record(&self) -> Option<(usize, &ThumbnailRecord)> {
        match self {
            TaskOutcome::Created { bucket, record }
            | TaskOutcome::AlreadyExists { bucket, record } => Some((*bucket, record)),
            TaskOutcome::Rejected(_) => None,
        }
    }

    /// The outcome kind.
    pub fn status(&self) -> TaskStatus {
        match self {
            TaskOutcome::Created { .. } => TaskStatus::Created,
            TaskOutcome::AlreadyExists { .. } => TaskStatus::AlreadyExists,
            TaskOutcome::Rejected(_) => TaskStatus::Rejected,
        }
    }
}

/// Run the pipeline for one discovered file.
///
/// Never fails: every problem becomes [`TaskOutcome::Rejected`].
pub fn process_file(entry: &CatalogEntry, context: &TaskContext) -> TaskOutcome {
    let source = &entry.video.path;
    let outcome = run_pipeline(entry, context);

    match &outcome {
        TaskOutcome::Created { .. } => log::info!("DONE {}", source.display()),
        TaskOutcome::AlreadyExists { .. } => log::info!("DONE (old found) {}", source.display()),
        TaskOutcome::Rejected(reason) => log::warn!("FAILED ({reason}) {}", source.display()),
    }
    outcome
}

fn run_pipeline(entry: &CatalogEntry, context: &TaskContext) -> TaskOutcome {
    let source = &entry.video.path;

    let duration = match DurationProbe::probe(&context.tool, source) {
        Ok(seconds) => seconds,
        Err(error) => return TaskOutcome::Rejected(RejectReason::ProbeFailed(error.to_string())),
    };
    if duration == 0 {
        return TaskOutcome::Rejected(RejectReason::ZeroDuration);
    }
    if duration < MIN_DURATION_SECONDS {
        return TaskOutcome::Rejected(RejectReason::TooShort { seconds: duration });
    }

    let bucket = context.layout.classify(duration);
    let folder = context.layout.folder(bucket);
    let destination = folder.join(&entry.output_name);
    let record = ThumbnailRecord::new(folder, &entry.output_name, source);

    if destination.is_file() {
        return TaskOutcome::AlreadyExists { bucket, record };
    }

    let frames = match FrameSampler::new(&context.tool).sample(source, duration, &context.sample_points) {
        Ok(frames) => frames,
        Err(error) => return TaskOutcome::Rejected(RejectReason::SamplingFailed(error.to_string())),
    };

    let title = source.display().to_string();
    if let Err(error) = write_sheet(&frames, &title, &context.sheet, &destination) {
        return TaskOutcome::Rejected(RejectReason::WriteFailed(error.to_string()));
    }

    TaskOutcome::Created { bucket, record }
}

fn write_sheet(
    frames: &[SampledFrame],
    title: &str,
    options: &SheetOptions,
    destination: &Path,
) -> Result<(), ThumbsheetError> {
    let sheet = SheetAssembler::assemble(frames, title, options)?;
    if let Err(error) = SheetAssembler::save(&sheet, destination) {
        // An existing sheet marks the file as done on the next run.
        let _ = std::fs::remove_file(destination);
        return Err(error);
    }
    Ok(())
}
