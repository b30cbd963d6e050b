//! External `ffmpeg` invocation.
//!
//! All decoding is delegated to an `ffmpeg` executable run as a child
//! process. Arguments are always passed as an explicit argument vector, so
//! file names are never interpreted by a shell.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use thumbsheet::{FfmpegLogLevel, FfmpegTool};
//!
//! let tool = FfmpegTool::new(None).with_log_level(FfmpegLogLevel::Fatal);
//! tool.verify()?;
//! tool.extract_frame(Path::new("input.mp4"), 42, Path::new("frame.png"))?;
//! # Ok::<(), thumbsheet::ThumbsheetError>(())
//! ```

use std::{
    env::consts::EXE_SUFFIX,
    ffi::OsString,
    path::{Path, PathBuf},
    process::{Command, Output, Stdio},
};

use crate::error::ThumbsheetError;

/// FFmpeg log verbosity, passed to the tool as `-loglevel`.
///
/// # Ordering (most verbose → most quiet)
///
/// `Trace` > `Debug` > `Verbose` > `Info` > `Warning` > `Error` > `Fatal` > `Panic` > `Quiet`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FfmpegLogLevel {
    /// Print no output at all.
    Quiet,
    /// Only log conditions the tool cannot recover from.
    Panic,
    /// Only log unrecoverable errors.
    Fatal,
    /// Log recoverable errors. This is the default for frame extraction.
    #[default]
    Error,
    /// Log warnings.
    Warning,
    /// Log informational messages.
    Info,
    /// Log verbose informational messages.
    Verbose,
    /// Log debugging messages.
    Debug,
    /// Extremely verbose tracing output.
    Trace,
}

impl FfmpegLogLevel {
    /// The value passed after `-loglevel`.
    pub fn as_arg(self) -> &'static str {
        match self {
            FfmpegLogLevel::Quiet => "quiet",
            FfmpegLogLevel::Panic => "panic",
            FfmpegLogLevel::Fatal => "fatal",
            FfmpegLogLevel::Error => "error",
            FfmpegLogLevel::Warning => "warning",
            FfmpegLogLevel::Info => "info",
            FfmpegLogLevel::Verbose => "verbose",
            FfmpegLogLevel::Debug => "debug",
            FfmpegLogLevel::Trace => "trace",
        }
    }

    /// Parse a level name as accepted by the tool (`warn` is an alias).
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" => Some(FfmpegLogLevel::Quiet),
            "panic" => Some(FfmpegLogLevel::Panic),
            "fatal" => Some(FfmpegLogLevel::Fatal),
            "error" => Some(FfmpegLogLevel::Error),
            "warning" | "warn" => Some(FfmpegLogLevel::Warning),
            "info" => Some(FfmpegLogLevel::Info),
            "verbose" => Some(FfmpegLogLevel::Verbose),
            "debug" => Some(FfmpegLogLevel::Debug),
            "trace" => Some(FfmpegLogLevel::Trace),
            _ => None,
        }
    }
}

/// Handle to the `ffmpeg` executable.
///
/// Cheap to clone and immutable; one instance is shared by every worker.
#[derive(Debug, Clone)]
pub struct FfmpegTool {
    program: PathBuf,
    log_level: FfmpegLogLevel,
}

impl FfmpegTool {
    /// Locate the tool inside `install_directory`, or on `PATH` when `None`.
    pub fn new(install_directory: Option<&Path>) -> Self {
        let executable = format!("ffmpeg{EXE_SUFFIX}");
        let program = match install_directory {
            Some(directory) => directory.join(executable),
            None => PathBuf::from(executable),
        };
        Self {
            program,
            log_level: FfmpegLogLevel::default(),
        }
    }

    /// Set the verbosity used for frame extraction.
    #[must_use]
    pub fn with_log_level(mut self, level: FfmpegLogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Path of the executable that will be spawned.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Check that the executable can be started at all.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsheetError::ToolUnavailable`] if spawning fails or
    /// `-version` exits unsuccessfully.
    pub fn verify(&self) -> Result<(), ThumbsheetError> {
        let output = self
            .run(&[OsString::from("-version")])
            .map_err(|error| ThumbsheetError::ToolUnavailable {
                program: self.program.clone(),
                reason: error.to_string(),
            })?;
        if !output.status.success() {
            return Err(ThumbsheetError::ToolUnavailable {
                program: self.program.clone(),
                reason: format!("`-version` exited with {}", output.status),
            });
        }
        log::debug!("Using {}", self.program.display());
        Ok(())
    }

    /// Run the tool in metadata mode and return its diagnostic output.
    ///
    /// No output file is given, so the tool prints the input summary and
    /// exits with an error status, which is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsheetError::IoError`] only if the process cannot be
    /// spawned.
    pub fn probe_report(&self, input: &Path) -> Result<String, ThumbsheetError> {
        let args = [
            OsString::from("-hide_banner"),
            OsString::from("-nostdin"),
            OsString::from("-i"),
            input.as_os_str().to_owned(),
        ];
        let output = self.run(&args)?;
        Ok(String::from_utf8_lossy(&output.stderr).into_owned())
    }

    /// Seek to `offset` seconds and write exactly one frame to `destination`.
    ///
    /// The image format is chosen by the tool from the destination
    /// extension. An existing file at `destination` is overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbsheetError::ToolFailed`] if the tool exits
    /// unsuccessfully, or [`ThumbsheetError::IoError`] if it cannot be
    /// spawned.
    pub fn extract_frame(
        &self,
        input: &Path,
        offset: u64,
        destination: &Path,
    ) -> Result<(), ThumbsheetError> {
        let args = [
            OsString::from("-hide_banner"),
            OsString::from("-nostdin"),
            OsString::from("-loglevel"),
            OsString::from(self.log_level.as_arg()),
            OsString::from("-y"),
            OsString::from("-ss"),
            OsString::from(offset.to_string()),
            OsString::from("-i"),
            input.as_os_str().to_owned(),
            OsString::from("-frames:v"),
            OsString::from("1"),
            destination.as_os_str().to_owned(),
        ];
        let output = self.run(&args)?;
        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let last_line = stderr
            .lines()
            .rev()
            .find(|line| !line.trim().is_empty())
            .unwrap_or("no diagnostic output");
        Err(ThumbsheetError::ToolFailed {
            program: self.program.clone(),
            input: input.to_path_buf(),
            reason: format!("{}: {}", output.status, last_line.trim()),
        })
    }

    fn run(&self, args: &[OsString]) -> Result<Output, ThumbsheetError> {
        log::debug!("Running {} {:?}", self.program.display(), args);
        let output = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_round_trips_through_arg() {
        for level in [
            FfmpegLogLevel::Quiet,
            FfmpegLogLevel::Panic,
            FfmpegLogLevel::Fatal,
            FfmpegLogLevel::Error,
            FfmpegLogLevel::Warning,
            FfmpegLogLevel::Info,
            FfmpegLogLevel::Verbose,
            FfmpegLogLevel::Debug,
            FfmpegLogLevel::Trace,
        ] {
            assert_eq!(FfmpegLogLevel::parse(level.as_arg()), Some(level));
        }
        assert_eq!(FfmpegLogLevel::parse("WARN"), Some(FfmpegLogLevel::Warning));
        assert_eq!(FfmpegLogLevel::parse("loud"), None);
    }

    #[test]
    fn program_resolves_inside_install_directory() {
        let tool = FfmpegTool::new(Some(Path::new("/opt/ffmpeg/bin")));
        assert!(tool.program().starts_with("/opt/ffmpeg/bin"));
        assert!(tool.program().to_string_lossy().contains("ffmpeg"));

        let on_path = FfmpegTool::new(None);
        assert_eq!(on_path.program().parent(), Some(Path::new("")));
    }

    #[test]
    fn missing_program_is_unavailable() {
        let tool = FfmpegTool::new(Some(Path::new("/definitely/not/a/real/dir")));
        let error = tool.verify().unwrap_err();
        assert!(error.is_configuration_error(), "{error}");
    }
}
