//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the three operations the document
//! assembler needs: identify, describe, and prepare-for-embedding.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests swap in a recording mock so document assembly can be exercised
//! without decoding real files.

use super::params::PrepareParams;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Descriptive facts about an image file, as printed by `info`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Detected container format, e.g. `PNG`, `JPEG`.
    pub format: Option<String>,
    /// Decoder color type, e.g. `Rgba8`.
    pub color: String,
    pub size_bytes: u64,
    /// Width over height; `0.0` when the height is zero.
    pub aspect_ratio: f64,
}

/// Compressed pixel payload ready to be written as a PDF image stream.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStream {
    /// Baseline JPEG bytes, written with `DCTDecode`.
    Jpeg(Vec<u8>),
    /// Zlib-compressed 8-bit RGB samples, written with `FlateDecode`, plus an
    /// optional zlib-compressed 8-bit alpha plane used as a soft mask.
    Flate { rgb: Vec<u8>, alpha: Option<Vec<u8>> },
}

/// An image decoded, resampled and re-encoded for embedding.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedImage {
    /// Pixel size of the source file (drives the display size on the page).
    pub source: Dimensions,
    /// Pixel size of the embedded bitmap.
    pub width: u32,
    pub height: u32,
    pub stream: ImageStream,
}

/// Trait for image processing backends.
pub trait ImageBackend {
    /// Get image dimensions without a full decode.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Describe an image file (dimensions, format, color type, size).
    fn describe(&self, path: &Path) -> Result<ImageInfo, BackendError>;

    /// Decode, resample, normalize and encode an image for embedding.
    fn prepare(&self, params: &PrepareParams) -> Result<EncodedImage, BackendError>;
}
