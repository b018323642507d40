//! High-level image operations.
//!
//! Color normalization for the embed format lives here as a pure transform
//! ([`optimize_for_pdf`]); the remaining functions combine calculations with
//! backend execution.

use super::backend::{BackendError, EncodedImage, ImageBackend, ImageInfo};
use super::params::{PrepareParams, Quality, TargetFormat};
use image::{DynamicImage, Rgb, RgbImage};
use std::path::Path;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<(u32, u32)> {
    let dims = backend.identify(path)?;
    Ok((dims.width, dims.height))
}

/// Describe an image file using the backend.
pub fn get_image_info(backend: &impl ImageBackend, path: &Path) -> Result<ImageInfo> {
    backend.describe(path)
}

/// Settings shared by every image embedded in one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbedConfig {
    pub format: TargetFormat,
    pub quality: Quality,
}

/// Prepare one image for embedding with at most `max_width` pixels across.
pub fn prepare_for_embedding(
    backend: &impl ImageBackend,
    source: &Path,
    max_width: Option<u32>,
    config: &EmbedConfig,
) -> Result<EncodedImage> {
    backend.prepare(&PrepareParams {
        source: source.to_path_buf(),
        max_width,
        format: config.format,
        quality: config.quality,
    })
}

/// Normalize an image's color mode for the target format.
///
/// JPEG has no transparency: images carrying alpha are composited onto an
/// opaque white canvas, everything else that is not already RGB8 is converted
/// directly. Palette images arrive from the decoder already expanded to RGB or
/// RGBA, so they follow the same two paths. Lossless targets pass through
/// unchanged; alpha is kept for the soft mask.
///
/// `_quality` is only applied at encode time and is accepted here so callers
/// can pass one set of embed parameters around.
pub fn optimize_for_pdf(img: DynamicImage, format: TargetFormat, _quality: Quality) -> DynamicImage {
    match format {
        TargetFormat::Png => img,
        TargetFormat::Jpeg if img.color().has_alpha() => {
            DynamicImage::ImageRgb8(flatten_onto_white(&img))
        }
        TargetFormat::Jpeg => match img {
            DynamicImage::ImageRgb8(_) => img,
            other => DynamicImage::ImageRgb8(other.to_rgb8()),
        },
    }
}

/// Composite an image onto white using its alpha channel as the mask.
pub fn flatten_onto_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let [r, g, b, a] = px.0;
        let a = a as u32;
        let blend = |c: u8| ((c as u32 * a + 255 * (255 - a) + 127) / 255) as u8;
        out.put_pixel(x, y, Rgb([blend(r), blend(g), blend(b)]));
    }
    out
}
