//! Review configuration module.
//!
//! Handles loading, validating, and merging `review.toml` files. Stock
//! defaults are overridden, key by key, by up to two config files and then by
//! command-line flags:
//!
//! ```text
//! stock defaults
//!   ← <input_dir>/review.toml     (if present)
//!     ← --config FILE             (if given; must exist)
//!       ← CLI flags               (--width, --per-page, --pattern, …)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [discovery]
//! pattern = "*.png,*.jpg,*.jpeg"  # Comma-separated globs
//! sort_by = "name"                # name | date | size
//! videos = false                  # Include video files as extracted frames
//!
//! [layout]
//! page_size = "letter"            # letter | a4 | legal
//! margin = 54.0                   # Points (0.75 in)
//! max_width_px = 500              # Image width cap, pixels at 96 DPI
//! items_per_page = 1
//! annotation_height = 150.0       # Points, up to the page frame; 0 disables the box
//! line_height = 20.0              # Points between ruled lines, at least 1
//! show_filenames = true
//!
//! [images]
//! format = "jpeg"                 # jpeg | png (lossless, keeps alpha)
//! quality = 85                    # JPEG quality (1-100)
//! dpi = 144                       # Embedded resolution
//!
//! [video]
//! ffmpeg = "ffmpeg"
//! timestamp = "00:00:01"
//! frame_format = "png"            # png | jpg
//! timeout_secs = 30
//!
//! [captions]
//! sidecar = true                  # Read <stem>.txt next to each file
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::discover::{DEFAULT_PATTERN, SortBy};
use crate::imaging::{Quality, TargetFormat};
use crate::layout::{PageSetup, PageSize};
use crate::video::{DEFAULT_TIMESTAMP, FrameFormat};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = "review.toml";

/// Smallest ruled row height accepted, in points.
pub const MIN_LINE_HEIGHT: f32 = 1.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Review configuration loaded from `review.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewConfig {
    /// Which files become review items.
    pub discovery: DiscoveryConfig,
    /// Page geometry and per-item layout.
    pub layout: LayoutConfig,
    /// How images are embedded.
    pub images: ImagesConfig,
    /// Frame extraction for video files.
    pub video: VideoConfig,
    /// Caption sources.
    pub captions: CaptionsConfig,
}

impl ReviewConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Validation(msg.into()));

        if !(1..=100).contains(&self.images.quality) {
            return invalid("images.quality must be 1-100");
        }
        if self.images.dpi == 0 {
            return invalid("images.dpi must be positive");
        }
        if self.layout.items_per_page == 0 {
            return invalid("layout.items_per_page must be at least 1");
        }
        if self.layout.max_width_px == 0 {
            return invalid("layout.max_width_px must be positive");
        }
        if !(self.layout.line_height >= MIN_LINE_HEIGHT) {
            return Err(ConfigError::Validation(format!(
                "layout.line_height must be at least {MIN_LINE_HEIGHT}"
            )));
        }
        if !(self.layout.annotation_height >= 0.0) {
            return invalid("layout.annotation_height must not be negative");
        }
        let Ok(frame) = self.layout.page_setup().frame() else {
            return Err(ConfigError::Validation(format!(
                "layout.margin {} does not fit a {:?} page",
                self.layout.margin, self.layout.page_size
            )));
        };
        if self.layout.annotation_height > frame.height {
            return Err(ConfigError::Validation(format!(
                "layout.annotation_height {} exceeds the {} pt page frame",
                self.layout.annotation_height, frame.height
            )));
        }
        if self.layout.line_height > frame.height {
            return Err(ConfigError::Validation(format!(
                "layout.line_height {} exceeds the {} pt page frame",
                self.layout.line_height, frame.height
            )));
        }
        if self.video.timeout_secs == 0 {
            return invalid("video.timeout_secs must be positive");
        }
        if self.video.ffmpeg.trim().is_empty() {
            return invalid("video.ffmpeg must not be empty");
        }
        Ok(())
    }

    /// Apply command-line overrides on top of file values, then re-validate.
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        if let Some(pattern) = &overrides.pattern {
            self.discovery.pattern = pattern.clone();
        }
        if let Some(sort_by) = overrides.sort_by {
            self.discovery.sort_by = sort_by;
        }
        if overrides.videos {
            self.discovery.videos = true;
        }
        if let Some(width) = overrides.max_width_px {
            self.layout.max_width_px = width;
        }
        if let Some(per_page) = overrides.items_per_page {
            self.layout.items_per_page = per_page;
        }
        if let Some(height) = overrides.annotation_height {
            self.layout.annotation_height = height;
        }
        self.validate()?;
        Ok(self)
    }
}

/// Values given on the command line. `None` keeps the config value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub pattern: Option<String>,
    pub sort_by: Option<SortBy>,
    /// Flags can only switch videos on.
    pub videos: bool,
    pub max_width_px: Option<u32>,
    pub items_per_page: Option<usize>,
    pub annotation_height: Option<f32>,
}

/// File discovery settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Comma-separated glob patterns, relative to the input directory.
    pub pattern: String,
    pub sort_by: SortBy,
    /// Include video files (one extracted frame each).
    pub videos: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.to_string(),
            sort_by: SortBy::Name,
            videos: false,
        }
    }
}

/// Page geometry and item layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    pub page_size: PageSize,
    /// Uniform page margin in points.
    pub margin: f32,
    /// Maximum image width in pixels, converted to points at 96 DPI.
    pub max_width_px: u32,
    pub items_per_page: usize,
    /// Annotation box height in points; `0` disables the box.
    pub annotation_height: f32,
    /// Distance between ruled lines in points.
    pub line_height: f32,
    pub show_filenames: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::Letter,
            margin: 54.0,
            max_width_px: 500,
            items_per_page: 1,
            annotation_height: 150.0,
            line_height: 20.0,
            show_filenames: true,
        }
    }
}

impl LayoutConfig {
    pub fn page_setup(&self) -> PageSetup {
        PageSetup {
            size: self.page_size,
            margin: self.margin,
        }
    }
}

/// Image embedding settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub format: TargetFormat,
    /// JPEG encoding quality (1 = worst, 100 = best).
    pub quality: u32,
    /// Pixels per inch of embedded bitmaps at their display size.
    pub dpi: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            format: TargetFormat::Jpeg,
            quality: Quality::default().value(),
            dpi: 144,
        }
    }
}

/// Video frame extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    /// Name or path of the ffmpeg binary.
    pub ffmpeg: String,
    /// Where in the video to take the frame (`HH:MM:SS` or seconds).
    pub timestamp: String,
    pub frame_format: FrameFormat,
    /// Seconds before a hung ffmpeg is killed.
    pub timeout_secs: u64,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            ffmpeg: "ffmpeg".to_string(),
            timestamp: DEFAULT_TIMESTAMP.to_string(),
            frame_format: FrameFormat::Png,
            timeout_secs: 30,
        }
    }
}

/// Caption settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptionsConfig {
    /// Use `<stem>.txt` next to a file as its caption.
    pub sidecar: bool,
}

impl Default for CaptionsConfig {
    fn default() -> Self {
        Self { sidecar: true }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ReviewConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Parse one config file as a raw TOML value.
pub fn load_raw_file(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load `review.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `review.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join(CONFIG_FILE_NAME);
    if !config_path.is_file() {
        return Ok(None);
    }
    load_raw_file(&config_path).map(Some)
}

/// Merge overlays, in order, onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<ReviewConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: ReviewConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective config for an input directory.
///
/// `<dir>/review.toml` is applied first when present, then `extra` (an
/// explicit `--config` file, which must exist).
pub fn load_config(dir: &Path, extra: Option<&Path>) -> Result<ReviewConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let mut overlays = Vec::new();
    if let Some(local) = load_raw_config(dir)? {
        log::debug!("using {}", dir.join(CONFIG_FILE_NAME).display());
        overlays.push(local);
    }
    if let Some(path) = extra {
        log::debug!("using {}", path.display());
        overlays.push(load_raw_file(path)?);
    }
    resolve_config(base, overlays)
}

/// Returns a fully-commented stock `review.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Image Review PDF Configuration
# ==============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file as review.toml in the input directory, or pass it with
# --config. Command-line flags override both. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# File discovery
# ---------------------------------------------------------------------------
[discovery]
# Comma-separated glob patterns. Each is also tried upper-cased.
pattern = "*.png,*.jpg,*.jpeg"

# Ordering: "name" (case-insensitive), "date" (oldest first), "size" (smallest first).
sort_by = "name"

# Include video files; one frame per video is extracted with ffmpeg.
videos = false

# ---------------------------------------------------------------------------
# Page layout
# ---------------------------------------------------------------------------
[layout]
# Paper size: "letter", "a4" or "legal".
page_size = "letter"

# Page margin in points (72 points = 1 inch).
margin = 54.0

# Maximum image width in pixels, converted to points at 96 DPI.
max_width_px = 500

# Items per page before a page break.
items_per_page = 1

# Height of the ruled annotation box in points, at most the page frame
# height. 0 disables it.
annotation_height = 150.0

# Distance between ruled lines in points, at least 1.
line_height = 20.0

# Show each file's name above its image.
show_filenames = true

# ---------------------------------------------------------------------------
# Image embedding
# ---------------------------------------------------------------------------
[images]
# "jpeg" (smaller) or "png" (lossless, keeps transparency).
format = "jpeg"

# JPEG quality (1 = worst, 100 = best).
quality = 85

# Resolution of embedded images at their printed size.
dpi = 144

# ---------------------------------------------------------------------------
# Video frames
# ---------------------------------------------------------------------------
[video]
# ffmpeg binary name or path.
ffmpeg = "ffmpeg"

# Where to take the frame: HH:MM:SS or seconds.
timestamp = "00:00:01"

# Frame image format: "png" or "jpg".
frame_format = "png"

# Kill ffmpeg after this many seconds.
timeout_secs = 30

# ---------------------------------------------------------------------------
# Captions
# ---------------------------------------------------------------------------
[captions]
# Use <name>.txt next to an image (or video) as its caption.
sidecar = true
"##
}
