//! CLI output formatting.
//!
//! Output is **item-centric**: each review item is shown by its positional
//! index and label, with problems as indented context lines under it.
//!
//! # Output Format
//!
//! ## Process
//!
//! ```text
//! Found 3 image(s)
//! 001 login.png
//! 002 home.png
//!     Placeholder: Processing failed: cannot decode home.png
//! 003 demo.mp4 @ 00:00:01
//! ✓ Successfully created: images-review.pdf
//!   Images: 3
//!   Placeholders: 1
//!   File size: 182.4 KB
//! ```
//!
//! With `-v` the discovered files are listed under the `Found` line.
//!
//! ## Info
//!
//! One pretty-printed JSON object per file, path first.
//!
//! # Architecture
//!
//! Each output has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::document::BuildReport;
use crate::imaging::ImageInfo;
use crate::process::ProcessEvent;
use serde::Serialize;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Human file size in kilobytes with one decimal, e.g. `182.4 KB`.
pub fn format_file_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

// ============================================================================
// Process output
// ============================================================================

/// Format a single process progress event as display lines.
pub fn format_process_event(event: &ProcessEvent, verbose: bool) -> Vec<String> {
    match event {
        ProcessEvent::Found {
            images,
            videos,
            files,
        } => {
            let mut lines = vec![if *videos > 0 {
                format!("Found {} image(s) and {} video(s)", images, videos)
            } else {
                format!("Found {} image(s)", images)
            }];
            if verbose {
                lines.extend(files.iter().map(|f| format!("  - {}", file_name(f))));
            }
            lines
        }
        ProcessEvent::FrameExtracted { label, .. } => {
            if verbose {
                vec![format!("Extracted frame: {}", label)]
            } else {
                Vec::new()
            }
        }
        ProcessEvent::VideoSkipped { video } => {
            vec![format!("Skipped video (no frame): {}", file_name(video))]
        }
        ProcessEvent::ItemAdded {
            index,
            label,
            error,
            ..
        } => {
            let mut lines = vec![format!("{} {}", format_index(*index), label)];
            if let Some(err) = error {
                lines.push(format!("{}Placeholder: {}", indent(1), err));
            }
            lines
        }
        // The summary is printed from the returned report.
        ProcessEvent::Written { .. } => Vec::new(),
    }
}

/// Format the success summary.
pub fn format_summary(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        format!("✓ Successfully created: {}", report.output.display()),
        format!("  Images: {}", report.items),
    ];
    if report.placeholders > 0 {
        lines.push(format!("  Placeholders: {}", report.placeholders));
    }
    lines.push(format!("  Pages: {}", report.pages));
    lines.push(format!("  File size: {}", format_file_size(report.bytes)));
    lines
}

pub fn print_summary(report: &BuildReport) {
    for line in format_summary(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Info output
// ============================================================================

#[derive(Serialize)]
struct InfoRecord<'a> {
    path: String,
    #[serde(flatten)]
    info: &'a ImageInfo,
}

/// Pretty JSON for one image, with its path as the first key.
pub fn format_image_info(path: &Path, info: &ImageInfo) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&InfoRecord {
        path: path.display().to_string(),
        info,
    })
}

pub fn print_image_info(path: &Path, info: &ImageInfo) -> Result<(), serde_json::Error> {
    println!("{}", format_image_info(path, info)?);
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
