//! Shared fixtures for integration tests.
//!
//! Pipeline tests run against a fake `ffmpeg` shell script instead of the
//! real tool. A "video" is a text file whose first line is the duration the
//! fake tool reports (for example `00:20:00.00`). Content containing
//! `broken` makes frame extraction fail. Each extraction is appended to
//! `<video>.calls` so tests can count tool invocations per file.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    sync::OnceLock,
};

use tempfile::TempDir;
use thumbsheet::GeneratorOptions;

pub const FRAME_WIDTH: u32 = 64;
pub const FRAME_HEIGHT: u32 = 36;

const FAKE_FFMPEG: &str = r#"#!/bin/sh
here=$(dirname "$0")
if [ "$1" = "-version" ]; then
    echo "ffmpeg version fake"
    exit 0
fi

input=""
previous=""
last=""
extract=0
for arg in "$@"; do
    if [ "$previous" = "-i" ]; then
        input="$arg"
    fi
    if [ "$arg" = "-frames:v" ]; then
        extract=1
    fi
    previous="$arg"
    last="$arg"
done

if [ "$extract" = "1" ]; then
    echo "extract" >> "$input.calls"
    case "$(cat "$input")" in
        *broken*)
            echo "Invalid data found when processing input" >&2
            exit 1
            ;;
    esac
    cp "$here/frame.png" "$last"
    exit 0
fi

echo "Input #0, mov,mp4,m4a, from '$input':" >&2
echo "  Duration: $(head -n 1 "$input"), start: 0.000000, bitrate: 1 kb/s" >&2
echo "At least one output file must be specified" >&2
exit 1
"#;

/// Directory holding the fake `ffmpeg` and its frame image.
///
/// Created once per test binary, before any test spawns the script.
#[cfg(unix)]
pub fn fake_tool_directory() -> &'static Path {
    use std::os::unix::fs::PermissionsExt;

    static DIRECTORY: OnceLock<TempDir> = OnceLock::new();
    DIRECTORY
        .get_or_init(|| {
            let directory = tempfile::tempdir().expect("Failed to create tool directory");

            let frame = image::RgbImage::from_fn(FRAME_WIDTH, FRAME_HEIGHT, |x, y| {
                image::Rgb([(x * 4) as u8, (y * 7) as u8, 128])
            });
            frame
                .save(directory.path().join("frame.png"))
                .expect("Failed to write frame fixture");

            let script = directory.path().join("ffmpeg");
            fs::write(&script, FAKE_FFMPEG).expect("Failed to write fake ffmpeg");
            let mut permissions = fs::metadata(&script)
                .expect("Failed to stat fake ffmpeg")
                .permissions();
            permissions.set_mode(0o755);
            fs::set_permissions(&script, permissions).expect("Failed to mark fake ffmpeg executable");

            directory
        })
        .path()
}

/// Options pointing at the fake tool.
#[cfg(unix)]
pub fn fake_options(input: &Path, output: &Path) -> GeneratorOptions {
    GeneratorOptions::new(input, output).with_tool_directory(fake_tool_directory())
}

/// Create a fake video below `root` reporting `duration`.
pub fn write_video(root: &Path, relative: &str, duration: &str) -> PathBuf {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create video directory");
    }
    fs::write(&path, format!("{duration}\n")).expect("Failed to write video");
    path
}

/// Number of frame extractions the fake tool ran for `video`.
pub fn extraction_count(video: &Path) -> usize {
    let mut calls = video.as_os_str().to_owned();
    calls.push(".calls");
    fs::read_to_string(PathBuf::from(calls))
        .map(|contents| contents.lines().count())
        .unwrap_or(0)
}

/// Create an empty temporary directory.
pub fn temporary_directory() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}
