//! Image processing: decode, fit, normalize, encode.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Describe** | `image::ImageDecoder` (format, color type) |
//! | **Fit** | [`resolve_dimensions`] + Lanczos3 resampling |
//! | **Normalize** | [`optimize_for_pdf`]: alpha flattened onto white for JPEG |
//! | **Encode** | JPEG (`DCTDecode`) or zlib (`FlateDecode`) streams |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, EncodedImage, ImageBackend, ImageInfo, ImageStream};
pub use calculations::{
    POINTS_PER_INCH, REFERENCE_DPI, aspect_ratio, embed_pixel_width, px_to_points,
    resolve_dimensions,
};
pub use operations::{
    EmbedConfig, flatten_onto_white, get_dimensions, get_image_info, optimize_for_pdf,
    prepare_for_embedding,
};
pub use params::{PrepareParams, Quality, TargetFormat};
pub use rust_backend::{IMAGE_EXTENSIONS, RustBackend};
