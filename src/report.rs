//! Run summary.
//!
//! [`RunSummary`] aggregates the outcomes of a run: how many sheets were
//! created or reused, how many files were rejected and why, the wall-clock
//! time, and which index files were written.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::PathBuf;
use std::time::Duration;

use crate::task::TaskOutcome;

/// Totals for one generation run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files found by discovery.
    pub discovered: usize,
    /// Sheets written in this run.
    pub created: usize,
    /// Sheets reused from an earlier run.
    pub reused: usize,
    /// Files that produced no record.
    pub rejected: usize,
    /// Videos skipped during discovery (non UTF-8 names).
    pub skipped: usize,
    /// Rejection counts keyed by reason label.
    pub rejections: BTreeMap<&'static str, usize>,
    /// Wall-clock time spent processing files.
    pub elapsed: Duration,
    /// Index files written, in bucket order.
    pub index_files: Vec<PathBuf>,
}

impl RunSummary {
    /// Tally a set of outcomes.
    pub fn from_outcomes(outcomes: &[TaskOutcome], elapsed: Duration) -> Self {
        let mut summary = Self {
            discovered: outcomes.len(),
            elapsed,
            ..Self::default()
        };
        for outcome in outcomes {
            match outcome {
                TaskOutcome::Created { .. } => summary.created += 1,
                TaskOutcome::AlreadyExists { .. } => summary.reused += 1,
                TaskOutcome::Rejected(reason) => {
                    summary.rejected += 1;
                    *summary.rejections.entry(reason.label()).or_default() += 1;
                }
            }
        }
        summary
    }

    /// Files that produced a record.
    pub fn succeeded(&self) -> usize {
        self.created + self.reused
    }

    /// Discovered and skipped videos together.
    pub fn total(&self) -> usize {
        self.discovered + self.skipped
    }

    /// Rejected and skipped videos together.
    pub fn failed(&self) -> usize {
        self.rejected + self.skipped
    }

    /// Processing throughput. Zero when nothing was processed.
    pub fn files_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if self.discovered == 0 || seconds <= 0.0 {
            0.0
        } else {
            self.discovered as f64 / seconds
        }
    }
}

impl Display for RunSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(
            f,
            "{} files processed in {:.1}s ({:.2} files/sec)",
            self.discovered,
            self.elapsed.as_secs_f64(),
            self.files_per_second()
        )?;
        writeln!(f, "{} created, {} reused", self.created, self.reused)?;
        writeln!(f, "{}/{} files failed", self.failed(), self.total())?;
        for (reason, count) in &self.rejections {
            writeln!(f, "  {reason}: {count}")?;
        }
        if self.skipped > 0 {
            writeln!(f, "  non UTF-8 name: {}", self.skipped)?;
        }
        for path in &self.index_files {
            writeln!(f, "index: {}", path.display())?;
        }
        Ok(())
    }
}
