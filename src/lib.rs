//! # thumbsheet
//!
//! Batch-generate thumbnail sheets for large, nested video collections.
//!
//! For every video below an input root, `thumbsheet` probes the duration,
//! picks a duration bucket, extracts a handful of frames with `ffmpeg`, and
//! lays them out side by side in one JPEG "sheet". Each bucket folder also
//! receives a `MyVideoThumbs.dat` index file listing its sheets, which a
//! browser can use to let someone skim thousands of videos without opening
//! any of them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use thumbsheet::{GeneratorOptions, ThumbnailGenerator};
//!
//! let options = GeneratorOptions::new("/videos", "/videos/thumbs")
//!     .with_bucket_minutes(vec![10.0, 30.0])
//!     .with_workers(4);
//! let summary = ThumbnailGenerator::new(options).run()?;
//! print!("{summary}");
//! # Ok::<(), thumbsheet::ThumbsheetError>(())
//! ```
//!
//! ## Output layout
//!
//! ```text
//! thumbs/
//!   less_than_10min/            clip.jpg, other.jpg, MyVideoThumbs.dat
//!   between_10min_and_30min/    clip_1.jpg, MyVideoThumbs.dat
//!   over_30min/                 MyVideoThumbs.dat
//! ```
//!
//! Sheets that already exist are reused, so an interrupted run can simply
//! be started again. Index files are rewritten on every run.
//!
//! ## Requirements
//!
//! An `ffmpeg` executable must be on `PATH` or in the directory given by
//! [`GeneratorOptions::with_tool_directory`].

mod annotation;
pub mod bucket;
pub mod catalog;
pub mod configuration;
pub mod error;
pub mod ffmpeg;
pub mod generator;
pub mod index;
mod parallel;
pub mod probe;
pub mod progress;
pub mod report;
pub mod sampler;
pub mod task;
pub mod thumbnail;

pub use bucket::{Bucket, BucketLayout, classify};
pub use catalog::{Catalog, CatalogEntry, VideoFile, assign_output_names, scan};
pub use configuration::GeneratorOptions;
pub use error::ThumbsheetError;
pub use ffmpeg::{FfmpegLogLevel, FfmpegTool};
pub use generator::{PreparedRun, ThumbnailGenerator};
pub use index::{INDEX_FILE_NAME, ThumbnailRecord, read_index, write_indexes};
pub use probe::{DurationProbe, parse_duration};
pub use progress::{ProgressCallback, ProgressInfo};
pub use report::RunSummary;
pub use sampler::{FrameSampler, SampledFrame, sample_offsets};
pub use task::{RejectReason, TaskContext, TaskOutcome, TaskStatus, process_file};
pub use thumbnail::{SheetAssembler, SheetLayout, SheetOptions};
