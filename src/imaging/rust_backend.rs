//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (PNG, JPEG, GIF, BMP, TIFF, WebP) | `image` crate, format sniffed from content |
//! | Identify | `image::ImageReader::into_dimensions` |
//! | Resize | `image::DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Color normalization | [`optimize_for_pdf`](super::operations::optimize_for_pdf) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → Flate | `flate2::write::ZlibEncoder` over raw RGB / alpha planes |

use super::backend::{BackendError, Dimensions, EncodedImage, ImageBackend, ImageInfo, ImageStream};
use super::calculations::{aspect_ratio, resolve_dimensions};
use super::operations::optimize_for_pdf;
use super::params::{PrepareParams, TargetFormat};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Write;
use std::path::Path;

/// Image file extensions accepted by discovery (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "tiff", "webp"];

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn open_reader(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, BackendError> {
    ImageReader::open(path)
        .map_err(BackendError::Io)?
        .with_guessed_format()
        .map_err(BackendError::Io)
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    open_reader(path)?.decode().map_err(|e| {
        BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), e))
    })
}

/// Encode a normalized image into a PDF-ready stream.
fn encode_stream(
    img: &DynamicImage,
    format: TargetFormat,
    quality: u32,
) -> Result<ImageStream, BackendError> {
    match format {
        TargetFormat::Jpeg => {
            let mut buf = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut buf, quality as u8);
            DynamicImage::ImageRgb8(img.to_rgb8())
                .write_with_encoder(encoder)
                .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
            Ok(ImageStream::Jpeg(buf))
        }
        TargetFormat::Png => {
            let rgb = deflate(img.to_rgb8().as_raw())?;
            let alpha = if img.color().has_alpha() {
                let plane: Vec<u8> = img.to_rgba8().pixels().map(|p| p.0[3]).collect();
                Some(deflate(&plane)?)
            } else {
                None
            };
            Ok(ImageStream::Flate { rgb, alpha })
        }
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, BackendError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = open_reader(path)?.into_dimensions().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
        })?;
        Ok(Dimensions { width, height })
    }

    fn describe(&self, path: &Path) -> Result<ImageInfo, BackendError> {
        let size_bytes = std::fs::metadata(path)?.len();
        let reader = open_reader(path)?;
        let format = reader.format().map(|f| format!("{f:?}").to_uppercase());
        let decoder = reader.into_decoder().map_err(|e| {
            BackendError::ProcessingFailed(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let (width, height) = decoder.dimensions();
        Ok(ImageInfo {
            width,
            height,
            format,
            color: format!("{:?}", decoder.color_type()),
            size_bytes,
            aspect_ratio: aspect_ratio(width, height),
        })
    }

    fn prepare(&self, params: &PrepareParams) -> Result<EncodedImage, BackendError> {
        let img = load_image(&params.source)?;
        let source = Dimensions {
            width: img.width(),
            height: img.height(),
        };

        let (width, height) =
            resolve_dimensions((source.width, source.height), params.max_width, None, true);
        let img = if (width, height) != (source.width, source.height) {
            img.resize_exact(width, height, FilterType::Lanczos3)
        } else {
            img
        };

        let img = optimize_for_pdf(img, params.format, params.quality);
        let stream = encode_stream(&img, params.format, params.quality.value())?;

        Ok(EncodedImage {
            source,
            width,
            height,
            stream,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::{write_jpeg, write_png_rgba};
    use std::io::Read;

    #[test]
    fn every_listed_extension_has_a_decoder() {
        for ext in IMAGE_EXTENSIONS {
            assert!(
                image::ImageFormat::from_extension(ext).is_some_and(|f| f.reading_enabled()),
                "no decoder compiled in for {ext}"
            );
        }
    }

    #[test]
    fn identify_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        write_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let dims = backend.identify(&path).unwrap();
        assert_eq!(dims.width, 200);
        assert_eq!(dims.height, 150);
    }

    #[test]
    fn identify_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.identify(Path::new("/nonexistent/image.jpg"));
        assert!(result.is_err());
    }

    #[test]
    fn describe_reports_format_and_color() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("shot.png");
        write_png_rgba(&path, 40, 20);

        let info = RustBackend::new().describe(&path).unwrap();
        assert_eq!((info.width, info.height), (40, 20));
        assert_eq!(info.format.as_deref(), Some("PNG"));
        assert_eq!(info.color, "Rgba8");
        assert_eq!(info.aspect_ratio, 2.0);
        assert!(info.size_bytes > 0);
    }

    #[test]
    fn format_is_sniffed_not_taken_from_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("actually-a-jpeg.png");
        write_jpeg(&path, 16, 16);

        let info = RustBackend::new().describe(&path).unwrap();
        assert_eq!(info.format.as_deref(), Some("JPEG"));
    }

    #[test]
    fn prepare_garbage_file_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.png");
        std::fs::write(&path, b"definitely not a png").unwrap();

        let result = RustBackend::new().prepare(&PrepareParams {
            source: path,
            max_width: None,
            format: TargetFormat::Jpeg,
            quality: Quality::default(),
        });
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn prepare_downscales_and_encodes_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("big.jpg");
        write_jpeg(&path, 400, 300);

        let encoded = RustBackend::new()
            .prepare(&PrepareParams {
                source: path,
                max_width: Some(200),
                format: TargetFormat::Jpeg,
                quality: Quality::new(80),
            })
            .unwrap();

        assert_eq!(encoded.source, Dimensions { width: 400, height: 300 });
        assert_eq!((encoded.width, encoded.height), (200, 150));
        match encoded.stream {
            ImageStream::Jpeg(bytes) => assert_eq!(&bytes[..2], &[0xFF, 0xD8]),
            other => panic!("expected JPEG stream, got {other:?}"),
        }
    }

    #[test]
    fn prepare_never_upscales() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("small.jpg");
        write_jpeg(&path, 50, 40);

        let encoded = RustBackend::new()
            .prepare(&PrepareParams {
                source: path,
                max_width: Some(500),
                format: TargetFormat::Jpeg,
                quality: Quality::default(),
            })
            .unwrap();
        assert_eq!((encoded.width, encoded.height), (50, 40));
    }

    #[test]
    fn prepare_png_target_keeps_alpha_plane() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("overlay.png");
        write_png_rgba(&path, 8, 8);

        let encoded = RustBackend::new()
            .prepare(&PrepareParams {
                source: path,
                max_width: None,
                format: TargetFormat::Png,
                quality: Quality::default(),
            })
            .unwrap();
        match encoded.stream {
            ImageStream::Flate { rgb, alpha } => {
                let mut raw = Vec::new();
                flate2::read::ZlibDecoder::new(rgb.as_slice())
                    .read_to_end(&mut raw)
                    .unwrap();
                assert_eq!(raw.len(), 8 * 8 * 3);
                assert!(alpha.is_some());
            }
            other => panic!("expected Flate stream, got {other:?}"),
        }
    }
}
