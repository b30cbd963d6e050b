//! Duration buckets.
//!
//! Videos are sorted into output folders by duration. A sorted list of minute
//! thresholds `t0 < t1 < … < tk` yields `k + 2` buckets:
//! `less_than_<t0>min`, `between_<ti>min_and_<ti+1>min`, and
//! `over_<tk>min`. An empty threshold list yields one bucket, the output root
//! itself.

use std::path::{Path, PathBuf};

use crate::error::ThumbsheetError;

/// Exclusive upper bound on a single threshold, in minutes.
pub const MAX_BOUNDARY_MINUTES: u32 = 1000;

/// Exclusive upper bound on the number of thresholds.
pub const MAX_BOUNDARIES: usize = 100;

/// Map a duration to its bucket index.
///
/// `boundaries` are in seconds and strictly increasing. Returns 0 below the
/// first boundary, the last index at or above the last boundary, and
/// otherwise the index of the first boundary the duration is still below.
/// The result is always a valid index into a layout with
/// `boundaries.len() + 1` buckets and never decreases as `duration` grows.
pub fn classify(duration: u64, boundaries: &[u64]) -> usize {
    boundaries.partition_point(|&boundary| boundary <= duration)
}

/// One output bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bucket {
    /// Folder that receives this bucket's sheets and index file.
    pub folder: PathBuf,
    /// Inclusive lower bound in seconds (0 for the first bucket).
    pub lower_bound: u64,
}

/// The ordered set of buckets for one run.
#[derive(Debug, Clone)]
pub struct BucketLayout {
    buckets: Vec<Bucket>,
    boundaries: Vec<u64>,
}

impl BucketLayout {
    /// Build a layout below `output_root` from thresholds in minutes.
    ///
    /// Thresholds are rounded to whole minutes, deduplicated and sorted.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsheetError::InvalidBucketBoundary`] if a threshold is
    /// not in `(0, 1000)` minutes or if there are 100 or more thresholds.
    pub fn new(output_root: &Path, minutes: &[f64]) -> Result<Self, ThumbsheetError> {
        let mut rounded = Vec::with_capacity(minutes.len());
        for &value in minutes {
            let whole = value.round();
            if !whole.is_finite() || whole <= 0.0 || whole >= MAX_BOUNDARY_MINUTES as f64 {
                return Err(ThumbsheetError::InvalidBucketBoundary(format!(
                    "{value} minutes is outside (0, {MAX_BOUNDARY_MINUTES})"
                )));
            }
            rounded.push(whole as u32);
        }
        rounded.sort_unstable();
        rounded.dedup();

        if rounded.len() >= MAX_BOUNDARIES {
            return Err(ThumbsheetError::InvalidBucketBoundary(format!(
                "{} thresholds given, at most {} allowed",
                rounded.len(),
                MAX_BOUNDARIES - 1
            )));
        }

        let names = folder_names(&rounded);
        let boundaries: Vec<u64> = rounded.iter().map(|&minutes| minutes as u64 * 60).collect();
        let buckets = names
            .into_iter()
            .enumerate()
            .map(|(index, name)| Bucket {
                folder: match name {
                    Some(name) => output_root.join(name),
                    None => output_root.to_path_buf(),
                },
                lower_bound: if index == 0 { 0 } else { boundaries[index - 1] },
            })
            .collect();

        Ok(Self {
            buckets,
            boundaries,
        })
    }

    /// Bucket boundaries in seconds, strictly increasing.
    pub fn boundaries(&self) -> &[u64] {
        &self.boundaries
    }

    /// All buckets, in duration order.
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Number of buckets (always at least one).
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Always `false`; a layout has at least one bucket.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Bucket index for a duration in seconds.
    pub fn classify(&self, duration: u64) -> usize {
        classify(duration, &self.boundaries)
    }

    /// Folder of bucket `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a value returned by [`classify`](Self::classify).
    pub fn folder(&self, index: usize) -> &Path {
        &self.buckets[index].folder
    }

    /// Create every bucket folder that does not exist yet.
    pub fn create_folders(&self) -> Result<(), ThumbsheetError> {
        for bucket in &self.buckets {
            std::fs::create_dir_all(&bucket.folder)?;
        }
        Ok(())
    }
}

fn folder_names(minutes: &[u32]) -> Vec<Option<String>> {
    let (Some(first), Some(last)) = (minutes.first(), minutes.last()) else {
        return vec![None];
    };

    let mut names = Vec::with_capacity(minutes.len() + 1);
    names.push(Some(format!("less_than_{first}min")));
    for pair in minutes.windows(2) {
        names.push(Some(format!("between_{}min_and_{}min", pair[0], pair[1])));
    }
    names.push(Some(format!("over_{last}min")));
    names
}
