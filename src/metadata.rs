//! Per-item captions from sidecar text files.
//!
//! A caption is read from a plain text file with the same stem as the media
//! file: `login.txt` next to `login.png`, or `demo.txt` next to `demo.mp4`
//! for a video frame. No special format; the whole file, trimmed, is the
//! caption. Empty or missing files mean no caption.
//!
//! ```text
//! screens/
//! ├── 01-login.png
//! ├── 01-login.txt     → caption of 01-login.png
//! └── 02-home.png      → no caption
//! ```

use std::path::Path;

/// Read a sidecar `.txt` file for an image or video.
///
/// Given `screens/01-login.png`, looks for `screens/01-login.txt` and returns
/// its trimmed contents. Returns `None` if the file doesn't exist, is not
/// valid UTF-8, or is blank.
pub fn read_sidecar(media_path: &Path) -> Option<String> {
    let sidecar = media_path.with_extension("txt");
    if sidecar == media_path {
        return None;
    }
    std::fs::read_to_string(sidecar)
        .ok()
        .map(|s| normalize_caption(&s))
        .filter(|s| !s.is_empty())
}

/// Collapse a multi-line caption into one paragraph.
///
/// Captions are rendered as a single wrapped paragraph, so line breaks in
/// the sidecar become spaces and runs of blank space collapse.
pub fn normalize_caption(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Caption for a media file, when sidecar captions are enabled.
pub fn caption_for(media_path: &Path, sidecar_enabled: bool) -> Option<String> {
    if sidecar_enabled {
        read_sidecar(media_path)
    } else {
        None
    }
}
