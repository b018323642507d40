//! Input discovery: which files in a directory become review items.
//!
//! A directory is searched with comma-separated glob patterns (non-recursive
//! unless a pattern says otherwise). Every pattern is tried both as given and
//! upper-cased, so `*.png` also picks up `SHOT.PNG` on case-sensitive
//! filesystems. Matches are deduplicated, filtered to a fixed extension
//! allow-list, and sorted.
//!
//! ```text
//! screens/
//! ├── 01-login.png        ✓ image
//! ├── 02-DASHBOARD.PNG    ✓ image (upper-cased pattern)
//! ├── 02-dashboard.txt    ✗ not an image (sidecar caption, see metadata)
//! ├── demo.mp4            ✓ video, only with videos enabled
//! └── notes.md            ✗ not matched
//! ```

use crate::imaging::IMAGE_EXTENSIONS;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::SystemTime;
use thiserror::Error;

/// Video container extensions recognized when videos are enabled.
pub const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "webm", "flv", "m4v", "wmv", "mpg", "mpeg",
];

pub const DEFAULT_PATTERN: &str = "*.png,*.jpg,*.jpeg";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] glob::PatternError),
    #[error("Directory not found: {0}")]
    NotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("Unknown sort key '{0}' (expected name, date or size)")]
    UnknownSortKey(String),
}

/// Ordering applied to discovered files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Case-insensitive filename, ties broken by exact filename.
    #[default]
    Name,
    /// Modification time, oldest first.
    Date,
    /// File size, smallest first.
    Size,
}

impl FromStr for SortBy {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(SortBy::Name),
            "date" => Ok(SortBy::Date),
            "size" => Ok(SortBy::Size),
            _ => Err(ScanError::UnknownSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortBy::Name => "name",
            SortBy::Date => "date",
            SortBy::Size => "size",
        })
    }
}

/// A discovered input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    Image(PathBuf),
    Video(PathBuf),
}

impl MediaItem {
    pub fn path(&self) -> &Path {
        match self {
            MediaItem::Image(p) | MediaItem::Video(p) => p,
        }
    }

    pub fn is_video(&self) -> bool {
        matches!(self, MediaItem::Video(_))
    }
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| allowed.contains(&ext.as_str()))
}

pub fn is_image_file(path: &Path) -> bool {
    has_extension(path, IMAGE_EXTENSIONS)
}

pub fn is_video_file(path: &Path) -> bool {
    has_extension(path, VIDEO_EXTENSIONS)
}

/// Check that `directory` exists and is a directory.
pub fn check_directory(directory: &Path) -> Result<(), ScanError> {
    if !directory.exists() {
        return Err(ScanError::NotFound(directory.to_path_buf()));
    }
    if !directory.is_dir() {
        return Err(ScanError::NotADirectory(directory.to_path_buf()));
    }
    Ok(())
}

/// Split a comma-separated pattern list, dropping empty entries.
pub fn split_patterns(patterns: &str) -> Vec<String> {
    patterns
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Every file in `directory` matching any pattern, as given or upper-cased.
fn glob_files(directory: &Path, patterns: &[String]) -> Result<Vec<PathBuf>, ScanError> {
    let base = glob::Pattern::escape(&directory.to_string_lossy());
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let mut variants = vec![pattern.clone()];
        let upper = pattern.to_uppercase();
        if upper != *pattern {
            variants.push(upper);
        }
        for variant in variants {
            let full = format!("{}/{}", base, variant);
            for entry in glob::glob(&full)? {
                // Unreadable entries are skipped, same as a directory listing would
                let Ok(path) = entry else { continue };
                if path.is_file() && seen.insert(path.clone()) {
                    files.push(path);
                }
            }
        }
    }
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Order `files` in place by the given key.
pub fn sort_files(files: &mut Vec<PathBuf>, sort_by: SortBy) -> Result<(), ScanError> {
    match sort_by {
        SortBy::Name => {
            files.sort_by_cached_key(|p| {
                let name = file_name(p);
                (name.to_lowercase(), name)
            });
        }
        SortBy::Date => {
            let mut keyed = files
                .drain(..)
                .map(|p| {
                    let modified = fs::metadata(&p)?.modified()?;
                    Ok((modified, file_name(&p), p))
                })
                .collect::<Result<Vec<(SystemTime, String, PathBuf)>, ScanError>>()?;
            keyed.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
            files.extend(keyed.into_iter().map(|(_, _, p)| p));
        }
        SortBy::Size => {
            let mut keyed = files
                .drain(..)
                .map(|p| Ok((fs::metadata(&p)?.len(), file_name(&p), p)))
                .collect::<Result<Vec<(u64, String, PathBuf)>, ScanError>>()?;
            keyed.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
            files.extend(keyed.into_iter().map(|(_, _, p)| p));
        }
    }
    Ok(())
}

/// Find the images in `directory` matching `patterns`.
pub fn find_images(
    directory: &Path,
    patterns: &str,
    sort_by: SortBy,
) -> Result<Vec<PathBuf>, ScanError> {
    check_directory(directory)?;
    let mut files: Vec<PathBuf> = glob_files(directory, &split_patterns(patterns))?
        .into_iter()
        .filter(|p| is_image_file(p))
        .collect();
    sort_files(&mut files, sort_by)?;
    debug!("found {} image(s) in {}", files.len(), directory.display());
    Ok(files)
}

/// Find images, plus videos when `include_videos` is set.
///
/// With videos enabled every video extension is searched in addition to
/// `patterns`, so the default image patterns do not hide them. Images and
/// videos are interleaved in one sorted sequence.
pub fn find_media(
    directory: &Path,
    patterns: &str,
    sort_by: SortBy,
    include_videos: bool,
) -> Result<Vec<MediaItem>, ScanError> {
    if !include_videos {
        return Ok(find_images(directory, patterns, sort_by)?
            .into_iter()
            .map(MediaItem::Image)
            .collect());
    }

    check_directory(directory)?;
    let mut all_patterns = split_patterns(patterns);
    all_patterns.extend(VIDEO_EXTENSIONS.iter().map(|ext| format!("*.{ext}")));

    let mut files: Vec<PathBuf> = glob_files(directory, &all_patterns)?
        .into_iter()
        .filter(|p| is_image_file(p) || is_video_file(p))
        .collect();
    sort_files(&mut files, sort_by)?;
    debug!("found {} media file(s) in {}", files.len(), directory.display());

    Ok(files
        .into_iter()
        .map(|p| {
            if is_video_file(&p) {
                MediaItem::Video(p)
            } else {
                MediaItem::Image(p)
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str, bytes: usize) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, vec![0u8; bytes]).unwrap();
        path
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        paths.iter().map(|p| file_name(p)).collect()
    }

    #[test]
    fn default_pattern_matches_upper_case_and_skips_others() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.PNG", 1);
        touch(tmp.path(), "b.jpg", 1);
        touch(tmp.path(), "c.txt", 1);

        let found = find_images(tmp.path(), DEFAULT_PATTERN, SortBy::Name).unwrap();
        assert_eq!(names(&found), vec!["a.PNG", "b.jpg"]);
    }

    #[test]
    fn overlapping_patterns_do_not_duplicate() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "shot.png", 1);

        let found = find_images(tmp.path(), "*.png, shot.*, *", SortBy::Name).unwrap();
        assert_eq!(names(&found), vec!["shot.png"]);
    }

    #[test]
    fn allow_list_filters_broad_patterns() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.gif", 1);
        touch(tmp.path(), "b.webp", 1);
        touch(tmp.path(), "c.pdf", 1);
        touch(tmp.path(), "d.mp4", 1);

        let found = find_images(tmp.path(), "*", SortBy::Name).unwrap();
        assert_eq!(names(&found), vec!["a.gif", "b.webp"]);
    }

    #[test]
    fn directories_are_never_matched() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join("folder.png")).unwrap();
        touch(tmp.path(), "real.png", 1);

        let found = find_images(tmp.path(), "*.png", SortBy::Name).unwrap();
        assert_eq!(names(&found), vec!["real.png"]);
    }

    #[test]
    fn name_sort_is_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Beta.png", 1);
        touch(tmp.path(), "alpha.png", 1);
        touch(tmp.path(), "gamma.png", 1);

        let found = find_images(tmp.path(), "*.png", SortBy::Name).unwrap();
        assert_eq!(names(&found), vec!["alpha.png", "Beta.png", "gamma.png"]);
    }

    #[test]
    fn date_sort_is_oldest_first() {
        let tmp = TempDir::new().unwrap();
        let now = SystemTime::now();
        for (name, age_secs) in [("new.png", 10), ("old.png", 300), ("mid.png", 100)] {
            let path = touch(tmp.path(), name, 1);
            File::options()
                .write(true)
                .open(&path)
                .unwrap()
                .set_modified(now - Duration::from_secs(age_secs))
                .unwrap();
        }

        let found = find_images(tmp.path(), "*.png", SortBy::Date).unwrap();
        assert_eq!(names(&found), vec!["old.png", "mid.png", "new.png"]);
    }

    #[test]
    fn size_sort_is_smallest_first() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "big.png", 300);
        touch(tmp.path(), "small.png", 10);
        touch(tmp.path(), "medium.png", 100);

        let found = find_images(tmp.path(), "*.png", SortBy::Size).unwrap();
        assert_eq!(names(&found), vec!["small.png", "medium.png", "big.png"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let tmp = TempDir::new().unwrap();
        let found = find_images(tmp.path(), DEFAULT_PATTERN, SortBy::Name).unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            find_images(&missing, DEFAULT_PATTERN, SortBy::Name),
            Err(ScanError::NotFound(_))
        ));

        let file = touch(tmp.path(), "file.png", 1);
        assert!(matches!(
            find_images(&file, DEFAULT_PATTERN, SortBy::Name),
            Err(ScanError::NotADirectory(_))
        ));
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("name".parse::<SortBy>().unwrap(), SortBy::Name);
        assert_eq!("DATE".parse::<SortBy>().unwrap(), SortBy::Date);
        assert_eq!(" size ".parse::<SortBy>().unwrap(), SortBy::Size);
        let err = "colour".parse::<SortBy>().unwrap_err();
        assert!(matches!(err, ScanError::UnknownSortKey(ref k) if k == "colour"));
        assert_eq!(SortBy::Date.to_string(), "date");
    }

    #[test]
    fn media_includes_videos_only_when_enabled() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.png", 1);
        touch(tmp.path(), "b.MP4", 1);
        touch(tmp.path(), "c.mov", 1);

        let without = find_media(tmp.path(), DEFAULT_PATTERN, SortBy::Name, false).unwrap();
        assert_eq!(without.len(), 1);
        assert!(!without[0].is_video());

        let with = find_media(tmp.path(), DEFAULT_PATTERN, SortBy::Name, true).unwrap();
        let kinds: Vec<(String, bool)> = with
            .iter()
            .map(|m| (file_name(m.path()), m.is_video()))
            .collect();
        assert_eq!(
            kinds,
            vec![
                ("a.png".to_string(), false),
                ("b.MP4".to_string(), true),
                ("c.mov".to_string(), true),
            ]
        );
    }

    #[test]
    fn video_extension_check_is_case_insensitive() {
        assert!(is_video_file(Path::new("clip.MKV")));
        assert!(is_video_file(Path::new("clip.mpeg")));
        assert!(!is_video_file(Path::new("clip.png")));
        assert!(!is_video_file(Path::new("clip")));
    }
}
