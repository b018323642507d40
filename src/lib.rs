//! # Image Review PDF
//!
//! Turns a directory of images (screenshots, photos, video frames) into a
//! printable PDF where every image is paired with a ruled box for notes.
//!
//! # Architecture: One Linear Pipeline
//!
//! ```text
//! input dir ──discover──▶ MediaItem* ──video──▶ ReviewItem* ──document──▶ Story ──layout──▶ PDF
//!                                                     ▲
//!                                  imaging (decode, fit, encode)
//! ```
//!
//! Every stage is a plain function over owned values. Discovery never decodes,
//! the assembler never touches the clock or the shell, and the renderer knows
//! nothing about review items: it paginates a list of [`layout::Block`]s.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`discover`] | Globs the input directory, filters by extension, sorts by name/date/size |
//! | [`video`] | Extracts one still frame per video with `ffmpeg` into a self-deleting temp file |
//! | [`metadata`] | Sidecar `.txt` captions |
//! | [`imaging`] | Image decode, dimension math, color normalization, JPEG/Flate encoding |
//! | [`annotation`] | Ruled annotation boxes |
//! | [`document`] | Title page, section title and per-item blocks; page-break policy |
//! | [`layout`] | Styles, Helvetica metrics, wrapping, pagination and PDF serialization |
//! | [`config`] | `review.toml` loading, merging and validation |
//! | [`process`] | The end-to-end `process` command with progress events |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Failures Degrade Per Item
//!
//! A file that cannot be decoded becomes an italic `[Error loading image: …]`
//! line in its slot; a video without a frame is skipped. Only directory,
//! config and write failures stop a build, and the PDF is only written once it
//! has been fully rendered in memory.
//!
//! ## Base-14 Fonts Only
//!
//! Text uses the PDF standard Helvetica family with WinAnsi encoding. Nothing
//! is embedded, so the output stays small and the [`layout::metrics`] tables
//! are all that is needed to wrap text.
//!
//! ## Display Size Is Pixel Size
//!
//! An image is shown one point per source pixel, capped at the configured
//! width. The embedded bitmap is resampled separately to the configured DPI
//! at that display size, so a 4000 px photo does not bloat the file.

pub mod annotation;
pub mod config;
pub mod discover;
pub mod document;
pub mod imaging;
pub mod layout;
pub mod metadata;
pub mod output;
pub mod process;
pub mod video;

#[cfg(test)]
pub(crate) mod test_helpers;
