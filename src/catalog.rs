//! Video discovery and output naming.
//!
//! [`scan`] walks the input root recursively and returns every file whose
//! name ends with a recognized extension, in a deterministic order, each
//! paired with a collision-free sheet file name. Videos whose names are not
//! valid UTF-8 cannot be written to an index file; they are returned
//! separately so the run can count them.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ThumbsheetError;

/// Maximum number of `_<k>` suffixes tried for one base name.
pub const MAX_NAME_COLLISIONS: usize = 100;

/// Extension of every sheet image.
pub const SHEET_EXTENSION: &str = "jpg";

/// A discovered video file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    /// Absolute path to the video.
    pub path: PathBuf,
    /// File name without the matched extension.
    pub base_name: String,
    /// The matched extension, without the leading dot.
    pub extension: String,
}

/// A discovered video together with its unique sheet file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// The source video.
    pub video: VideoFile,
    /// Sheet file name (`name.jpg` or `name_<k>.jpg`), unique within the run.
    pub output_name: String,
}

/// Result of discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    /// Videos to process, in discovery order.
    pub entries: Vec<CatalogEntry>,
    /// Videos with a recognized extension whose name is not valid UTF-8.
    pub skipped: Vec<PathBuf>,
}

/// Discover all videos below `root` and assign output names.
///
/// Subdirectories are searched recursively; entries are visited in file
/// name order so repeated runs produce the same list. Matching is
/// case-sensitive on the `.<extension>` suffix.
///
/// # Errors
///
/// Returns [`ThumbsheetError::InputRoot`] if `root` is not a directory,
/// [`ThumbsheetError::NameCollisions`] if more than
/// [`MAX_NAME_COLLISIONS`] files share a base name, or a traversal error.
pub fn scan(root: &Path, extensions: &[String]) -> Result<Catalog, ThumbsheetError> {
    let root = std::path::absolute(root)?;
    if !root.is_dir() {
        return Err(ThumbsheetError::InputRoot {
            path: root,
            reason: "not a directory".to_string(),
        });
    }

    let mut videos = Vec::new();
    let mut skipped = Vec::new();
    for entry in WalkDir::new(&root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            let lossy = entry.file_name().to_string_lossy();
            if match_video(entry.path(), &lossy, extensions).is_some() {
                log::warn!("Skipping non UTF-8 file name {}", entry.path().display());
                skipped.push(entry.into_path());
            }
            continue;
        };
        if let Some(video) = match_video(entry.path(), file_name, extensions) {
            videos.push(video);
        }
    }

    log::debug!(
        "Found {} video files below {} ({} skipped)",
        videos.len(),
        root.display(),
        skipped.len()
    );
    Ok(Catalog {
        entries: assign_output_names(videos)?,
        skipped,
    })
}

fn match_video(path: &Path, file_name: &str, extensions: &[String]) -> Option<VideoFile> {
    extensions.iter().find_map(|extension| {
        let base_name = file_name.strip_suffix(extension.as_str())?.strip_suffix('.')?;
        Some(VideoFile {
            path: path.to_path_buf(),
            base_name: base_name.to_string(),
            extension: extension.clone(),
        })
    })
}

/// Pair each video with a sheet name that no earlier video has taken.
///
/// The first `clip.mp4` gets `clip.jpg`, the next `clip.avi` gets
/// `clip_1.jpg`, and so on.
///
/// # Errors
///
/// Returns [`ThumbsheetError::NameCollisions`] once a base name needs more
/// than [`MAX_NAME_COLLISIONS`] suffixes.
pub fn assign_output_names(videos: Vec<VideoFile>) -> Result<Vec<CatalogEntry>, ThumbsheetError> {
    let mut taken: HashSet<String> = HashSet::with_capacity(videos.len());
    let mut entries = Vec::with_capacity(videos.len());

    for video in videos {
        let mut candidate = format!("{}.{SHEET_EXTENSION}", video.base_name);
        let mut suffix = 0;
        while taken.contains(&candidate) {
            suffix += 1;
            if suffix > MAX_NAME_COLLISIONS {
                return Err(ThumbsheetError::NameCollisions {
                    base_name: video.base_name,
                    limit: MAX_NAME_COLLISIONS,
                });
            }
            candidate = format!("{}_{suffix}.{SHEET_EXTENSION}", video.base_name);
        }
        taken.insert(candidate.clone());
        entries.push(CatalogEntry {
            video,
            output_name: candidate,
        });
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video(base_name: &str) -> VideoFile {
        VideoFile {
            path: PathBuf::from(format!("/videos/{base_name}.mp4")),
            base_name: base_name.to_string(),
            extension: "mp4".to_string(),
        }
    }

    #[test]
    fn colliding_names_get_suffixes() {
        let entries =
            assign_output_names(vec![video("a"), video("a"), video("b"), video("a")]).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.output_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "a_1.jpg", "b.jpg", "a_2.jpg"]);
    }

    #[test]
    fn literal_suffix_names_do_not_collide() {
        let entries = assign_output_names(vec![video("a"), video("a_1"), video("a")]).unwrap();
        let names: Vec<_> = entries.iter().map(|e| e.output_name.as_str()).collect();
        assert_eq!(names, vec!["a.jpg", "a_1.jpg", "a_2.jpg"]);
    }

    #[test]
    fn too_many_collisions_fail() {
        let ok: Vec<_> = (0..=MAX_NAME_COLLISIONS).map(|_| video("same")).collect();
        assert_eq!(assign_output_names(ok).unwrap().len(), MAX_NAME_COLLISIONS + 1);

        let too_many: Vec<_> = (0..=MAX_NAME_COLLISIONS + 1).map(|_| video("same")).collect();
        let error = assign_output_names(too_many).unwrap_err();
        assert!(matches!(error, ThumbsheetError::NameCollisions { .. }));
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let extensions = vec!["mp4".to_string(), "mkv".to_string()];
        let path = Path::new("/v/x");
        assert!(match_video(path, "clip.mp4", &extensions).is_some());
        assert!(match_video(path, "clip.MP4", &extensions).is_none());
        assert!(match_video(path, "clipmp4", &extensions).is_none());
        assert_eq!(
            match_video(path, "my.movie.mkv", &extensions).unwrap().base_name,
            "my.movie"
        );
    }
}
