//! Shared test utilities for the image-review-pdf test suite.
//!
//! Provides synthetic image writers (no binary fixtures are checked in),
//! directory fixture builders, and byte-level PDF inspection helpers that
//! rely on content streams being written uncompressed.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = image_dir(&[("a.png", 40, 30), ("b.jpg", 80, 60)]);
//! let pdf = std::fs::read(tmp.path().join("out.pdf")).unwrap();
//! assert_eq!(count_pdf_pages(&pdf), 2);
//! assert!(pdf_contains(&pdf, "(a.png) Tj"));
//! ```

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;
use tempfile::TempDir;

// =========================================================================
// Synthetic images
// =========================================================================

/// Write a gradient JPEG of the given size.
pub fn write_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    img.save_with_format(path, image::ImageFormat::Jpeg)
        .unwrap();
}

/// Write an opaque RGB PNG of the given size.
pub fn write_png(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_pixel(width, height, Rgb([30, 60, 90]));
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write an RGBA PNG whose right half is fully transparent.
pub fn write_png_rgba(path: &Path, width: u32, height: u32) {
    let img = RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([200, 20, 20, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    img.save_with_format(path, image::ImageFormat::Png).unwrap();
}

/// Write a file with an image extension whose content is not an image.
pub fn write_corrupt(path: &Path) {
    std::fs::write(path, b"this is not image data").unwrap();
}

// =========================================================================
// Fixture directories
// =========================================================================

/// Create a temp directory holding one synthetic image per `(name, w, h)`.
///
/// The format follows the extension: `.jpg`/`.jpeg` become JPEG, anything
/// else PNG.
pub fn image_dir(files: &[(&str, u32, u32)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (name, width, height) in files {
        let path = tmp.path().join(name);
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            write_jpeg(&path, *width, *height);
        } else {
            write_png(&path, *width, *height);
        }
    }
    tmp
}

// =========================================================================
// PDF inspection
// =========================================================================

/// Number of page objects (`/Type /Page`, not `/Pages`) in a PDF.
pub fn count_pdf_pages(pdf: &[u8]) -> usize {
    let needle = b"/Type /Page";
    pdf.windows(needle.len() + 1)
        .filter(|w| w.starts_with(needle) && w[needle.len()] != b's')
        .count()
}

/// Whether the raw PDF bytes contain `text`.
pub fn pdf_contains(pdf: &[u8], text: &str) -> bool {
    let needle = text.as_bytes();
    pdf.windows(needle.len()).any(|w| w == needle)
}

/// Number of non-overlapping occurrences of `text` in the raw PDF bytes.
pub fn pdf_count(pdf: &[u8], text: &str) -> usize {
    let needle = text.as_bytes();
    let mut count = 0;
    let mut i = 0;
    while i + needle.len() <= pdf.len() {
        if &pdf[i..i + needle.len()] == needle {
            count += 1;
            i += needle.len();
        } else {
            i += 1;
        }
    }
    count
}
