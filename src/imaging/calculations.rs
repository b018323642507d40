//! Pure calculation functions for image dimensions.
//!
//! All functions here are pure and testable without any I/O or images.

/// Reference screen density used to interpret pixel widths given on the CLI.
pub const REFERENCE_DPI: f32 = 96.0;

/// PDF user-space units per inch.
pub const POINTS_PER_INCH: f32 = 72.0;

/// Calculate target dimensions for an image under optional bounds.
///
/// With `maintain_aspect`, the smaller of the applicable scale factors is used
/// and clamped to 1.0, so images are only ever scaled down. Scaled dimensions
/// are floored (never below 1px). Without `maintain_aspect`, each dimension is
/// replaced by its bound independently, which may distort the image.
///
/// # Examples
/// ```
/// # use image_review_pdf::imaging::resolve_dimensions;
/// // 1000x500 bounded to 400 wide → 400x200
/// assert_eq!(resolve_dimensions((1000, 500), Some(400), None, true), (400, 200));
///
/// // Never upscale
/// assert_eq!(resolve_dimensions((300, 200), Some(800), None, true), (300, 200));
/// ```
pub fn resolve_dimensions(
    original: (u32, u32),
    max_width: Option<u32>,
    max_height: Option<u32>,
    maintain_aspect: bool,
) -> (u32, u32) {
    let (orig_w, orig_h) = original;

    if !maintain_aspect {
        return (max_width.unwrap_or(orig_w), max_height.unwrap_or(orig_h));
    }

    // A zero-sized source has no meaningful ratio to preserve
    if orig_w == 0 || orig_h == 0 {
        return original;
    }

    let width_scale = max_width.map(|w| w as f64 / orig_w as f64);
    let height_scale = max_height.map(|h| h as f64 / orig_h as f64);

    let scale = match (width_scale, height_scale) {
        (Some(w), Some(h)) => w.min(h),
        (Some(w), None) => w,
        (None, Some(h)) => h,
        (None, None) => 1.0,
    };

    if scale < 1.0 {
        let w = ((orig_w as f64 * scale).floor() as u32).max(1);
        let h = ((orig_h as f64 * scale).floor() as u32).max(1);
        (w, h)
    } else {
        original
    }
}

/// Width divided by height, or 0.0 for a zero height.
pub fn aspect_ratio(width: u32, height: u32) -> f64 {
    if height == 0 {
        0.0
    } else {
        width as f64 / height as f64
    }
}

/// Convert a pixel length to PDF points assuming a 96 DPI reference screen.
///
/// ```
/// # use image_review_pdf::imaging::px_to_points;
/// assert_eq!(px_to_points(96), 72.0);
/// assert_eq!(px_to_points(500), 375.0);
/// ```
pub fn px_to_points(px: u32) -> f32 {
    px as f32 * POINTS_PER_INCH / REFERENCE_DPI
}

/// Pixel budget for embedding an image displayed `display_width` points wide.
///
/// Images are resampled so the embedded bitmap carries at most `dpi` pixels
/// per inch of printed width.
pub fn embed_pixel_width(display_width: f32, dpi: u32) -> u32 {
    (display_width * dpi as f32 / POINTS_PER_INCH).ceil().max(1.0) as u32
}
