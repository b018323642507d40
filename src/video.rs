//! Still frames from video files via an external `ffmpeg`.
//!
//! Frame extraction is best-effort: a missing binary, a failing run, a run
//! that exceeds the timeout, or an empty output file all yield `None`, and
//! the caller simply skips the video. Each frame lives in its own temporary
//! file owned by an [`ExtractedFrame`]; dropping the frame deletes the file.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempPath;

pub const DEFAULT_TIMESTAMP: &str = "00:00:01";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Image container for extracted frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameFormat {
    #[default]
    Png,
    Jpg,
}

impl FrameFormat {
    pub fn extension(self) -> &'static str {
        match self {
            FrameFormat::Png => "png",
            FrameFormat::Jpg => "jpg",
        }
    }
}

/// A frame written to a temporary file, removed on drop.
#[derive(Debug)]
pub struct ExtractedFrame {
    path: TempPath,
}

impl ExtractedFrame {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Runs `ffmpeg` to grab single frames.
#[derive(Debug)]
pub struct FrameExtractor {
    ffmpeg: PathBuf,
    timeout: Duration,
    available: OnceCell<bool>,
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FrameExtractor {
    pub fn new(ffmpeg: impl Into<PathBuf>) -> Self {
        Self {
            ffmpeg: ffmpeg.into(),
            timeout: DEFAULT_TIMEOUT,
            available: OnceCell::new(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether `ffmpeg -version` succeeds within the timeout. Checked once.
    pub fn is_available(&self) -> bool {
        *self.available.get_or_init(|| {
            let ok = Command::new(&self.ffmpeg)
                .arg("-version")
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn()
                .is_ok_and(|child| self.wait(child, "-version"));
            if !ok {
                warn!(
                    "{} not found; video frames will be skipped",
                    self.ffmpeg.display()
                );
            }
            ok
        })
    }

    /// Extract the frame at `timestamp` (`HH:MM:SS` or seconds).
    pub fn extract_frame(
        &self,
        video: &Path,
        timestamp: &str,
        format: FrameFormat,
    ) -> Option<ExtractedFrame> {
        if !self.is_available() {
            return None;
        }

        let path = match tempfile::Builder::new()
            .prefix("review-frame-")
            .suffix(&format!(".{}", format.extension()))
            .tempfile()
        {
            Ok(file) => file.into_temp_path(),
            Err(e) => {
                warn!("could not create a temp file for a video frame: {e}");
                return None;
            }
        };

        let child = Command::new(&self.ffmpeg)
            .args(["-loglevel", "error", "-ss", timestamp, "-i"])
            .arg(video)
            .args(["-vframes", "1", "-q:v", "2", "-y"])
            .arg(&*path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        let child = match child {
            Ok(child) => child,
            Err(e) => {
                warn!("failed to run {}: {e}", self.ffmpeg.display());
                return None;
            }
        };

        if !self.wait(child, &video.display().to_string()) {
            return None;
        }

        let written = std::fs::metadata(&path).is_ok_and(|m| m.len() > 0);
        if !written {
            debug!("no frame written for {}", video.display());
            return None;
        }
        debug!("extracted frame of {} at {}", video.display(), timestamp);
        Some(ExtractedFrame { path })
    }

    /// Wait for the child to exit successfully, killing it on timeout.
    fn wait(&self, mut child: Child, context: &str) -> bool {
        let deadline = Instant::now() + self.timeout;
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    if !status.success() {
                        debug!("ffmpeg exited with {status} for {context}");
                    }
                    return status.success();
                }
                Ok(None) if Instant::now() >= deadline => {
                    warn!("ffmpeg timed out after {:?} on {context}", self.timeout);
                    let _ = child.kill();
                    let _ = child.wait();
                    return false;
                }
                Ok(None) => std::thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    warn!("lost track of ffmpeg for {context}: {e}");
                    let _ = child.kill();
                    let _ = child.wait();
                    return false;
                }
            }
        }
    }
}

/// Label shown above a frame taken from `video` at `timestamp`.
pub fn frame_label(video: &Path, timestamp: &str) -> String {
    let name = video
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| video.display().to_string());
    format!("{name} @ {timestamp}")
}
