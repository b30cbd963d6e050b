//! Duration probing.
//!
//! [`DurationProbe`] asks the external tool for a video's summary and reads
//! the `Duration: HH:MM:SS.ss` token from its diagnostic output. A missing or
//! malformed token is not an error: it yields a duration of zero, which the
//! file task treats as "undecodable".

use std::path::Path;

use crate::error::ThumbsheetError;
use crate::ffmpeg::FfmpegTool;

const DURATION_MARKER: &str = "Duration: ";

/// Lightweight duration probe.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use thumbsheet::{DurationProbe, FfmpegTool};
///
/// let tool = FfmpegTool::new(None);
/// let seconds = DurationProbe::probe(&tool, Path::new("input.mp4"))?;
/// println!("{seconds}s");
/// # Ok::<(), thumbsheet::ThumbsheetError>(())
/// ```
pub struct DurationProbe;

impl DurationProbe {
    /// Probe a video and return its duration in whole seconds (floored).
    ///
    /// Returns `Ok(0)` when the tool output has no usable duration.
    ///
    /// # Errors
    ///
    /// Returns an error only if the tool process cannot be spawned.
    pub fn probe(tool: &FfmpegTool, input: &Path) -> Result<u64, ThumbsheetError> {
        let report = tool.probe_report(input)?;
        let seconds = parse_duration(&report).unwrap_or(0);
        log::debug!("Probed {}: {}s", input.display(), seconds);
        Ok(seconds)
    }
}

/// Extract the first `Duration: HH:MM:SS.ss` token from tool output.
///
/// Returns `None` when the marker is absent or the value is not a valid
/// `hours:minutes:seconds` triple (for example `Duration: N/A`).
pub fn parse_duration(report: &str) -> Option<u64> {
    let start = report.find(DURATION_MARKER)? + DURATION_MARKER.len();
    let token = report[start..]
        .split(|c: char| c == ',' || c.is_whitespace())
        .next()?;

    let mut parts = token.split(':');
    let hours: u64 = parts.next()?.parse().ok()?;
    let minutes: u64 = parts.next()?.parse().ok()?;
    let seconds: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || minutes >= 60 || !(0.0..60.0).contains(&seconds) {
        return None;
    }

    hours
        .checked_mul(3600)?
        .checked_add(minutes * 60)?
        .checked_add(seconds.floor() as u64)
}
