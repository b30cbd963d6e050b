//! Per-bucket index files.
//!
//! Each bucket folder gets one `MyVideoThumbs.dat`: UTF-8 text, one record
//! per line, fields `bucketFolder;outputFileName;sourcePath`, lines joined
//! with `\n` and no trailing newline. This format is what browsers of the
//! generated sheets read, so it must stay stable.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs;
use std::path::{Path, PathBuf};

use crate::bucket::BucketLayout;
use crate::error::ThumbsheetError;

/// File name of every index file.
pub const INDEX_FILE_NAME: &str = "MyVideoThumbs.dat";

const FIELD_SEPARATOR: char = ';';

/// One line of an index file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThumbnailRecord {
    /// Bucket folder containing the sheet.
    pub bucket_folder: String,
    /// Sheet file name inside the folder.
    pub output_file_name: String,
    /// Absolute path of the source video.
    pub source_path: String,
}

impl ThumbnailRecord {
    /// Build a record from paths.
    pub fn new(bucket_folder: &Path, output_file_name: &str, source_path: &Path) -> Self {
        Self {
            bucket_folder: bucket_folder.to_string_lossy().into_owned(),
            output_file_name: output_file_name.to_string(),
            source_path: source_path.to_string_lossy().into_owned(),
        }
    }

    /// Path of the sheet image this record points at.
    pub fn sheet_path(&self) -> PathBuf {
        Path::new(&self.bucket_folder).join(&self.output_file_name)
    }

    /// Parse one index line.
    ///
    /// Splits on the first two `;`, so only the source path may itself
    /// contain `;`. Returns `None` if there are fewer than three fields.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.splitn(3, FIELD_SEPARATOR);
        let bucket_folder = fields.next()?;
        let output_file_name = fields.next()?;
        let source_path = fields.next()?;
        Some(Self {
            bucket_folder: bucket_folder.to_string(),
            output_file_name: output_file_name.to_string(),
            source_path: source_path.to_string(),
        })
    }
}

impl Display for ThumbnailRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(
            f,
            "{}{FIELD_SEPARATOR}{}{FIELD_SEPARATOR}{}",
            self.bucket_folder, self.output_file_name, self.source_path
        )
    }
}

/// Write one index file per bucket, replacing any existing one.
///
/// `records` are `(bucket index, record)` pairs; their relative order is
/// kept within each bucket. Buckets without records get an empty file.
/// Returns the written paths in bucket order.
///
/// # Errors
///
/// Returns [`ThumbsheetError::IndexWrite`] on the first file that cannot be
/// written.
pub fn write_indexes<'a, I>(layout: &BucketLayout, records: I) -> Result<Vec<PathBuf>, ThumbsheetError>
where
    I: IntoIterator<Item = (usize, &'a ThumbnailRecord)>,
{
    let mut lines: Vec<Vec<String>> = vec![Vec::new(); layout.len()];
    for (bucket, record) in records {
        lines[bucket].push(record.to_string());
    }

    let mut written = Vec::with_capacity(layout.len());
    for (bucket, bucket_lines) in layout.buckets().iter().zip(lines) {
        let path = bucket.folder.join(INDEX_FILE_NAME);
        fs::write(&path, bucket_lines.join("\n")).map_err(|source| ThumbsheetError::IndexWrite {
            path: path.clone(),
            source,
        })?;
        log::info!(
            "Index written: {} ({} records, {}s and longer)",
            path.display(),
            bucket_lines.len(),
            bucket.lower_bound
        );
        written.push(path);
    }
    Ok(written)
}

/// Read the records of an index file, skipping blank lines.
///
/// # Errors
///
/// Returns an I/O error if the file cannot be read, or
/// [`ThumbsheetError::InvalidIndexLine`] for a line with fewer than three
/// fields.
pub fn read_index(path: &Path) -> Result<Vec<ThumbnailRecord>, ThumbsheetError> {
    let contents = fs::read_to_string(path)?;
    contents
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            ThumbnailRecord::parse(line).ok_or_else(|| ThumbsheetError::InvalidIndexLine {
                line_number: index + 1,
                line: line.to_string(),
            })
        })
        .collect()
}
