//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the [`operations`](super::operations) module and the
//! [`backend`](super::backend), which allows swapping the backend for a mock
//! in tests without changing document assembly.
//!
//! ## Types
//!
//! - [`Quality`]: Lossy encoding quality (1–100, default 85). Clamped on construction.
//! - [`TargetFormat`]: How an image is embedded in the PDF (JPEG or lossless).
//! - [`PrepareParams`]: Full specification for preparing one image for embedding.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(85)
    }
}

/// Encoding used for the embedded image stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetFormat {
    /// DCT-compressed, no transparency. Alpha is flattened onto white.
    #[default]
    Jpeg,
    /// Flate-compressed RGB with an optional alpha soft mask.
    Png,
}

impl TargetFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetFormat::Jpeg => "jpeg",
            TargetFormat::Png => "png",
        }
    }
}

/// Parameters for preparing a source image for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct PrepareParams {
    pub source: PathBuf,
    /// Upper bound on the embedded bitmap width in pixels.
    pub max_width: Option<u32>,
    pub format: TargetFormat,
    pub quality: Quality,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_valid_range() {
        assert_eq!(Quality::new(0).value(), 1);
        assert_eq!(Quality::new(50).value(), 50);
        assert_eq!(Quality::new(150).value(), 100);
    }

    #[test]
    fn quality_default_is_85() {
        assert_eq!(Quality::default().value(), 85);
    }

    #[test]
    fn target_format_parses_lowercase() {
        let f: TargetFormat = serde_json::from_str("\"png\"").unwrap();
        assert_eq!(f, TargetFormat::Png);
        assert!(serde_json::from_str::<TargetFormat>("\"gif\"").is_err());
        assert_eq!(TargetFormat::default().as_str(), "jpeg");
    }
}
