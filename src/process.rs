//! The `process` pipeline: input directory in, review PDF out.
//!
//! ```text
//! check input dir → load review.toml (+ --config, + flags)
//!   → discover media → resolve videos to frames → read captions
//!   → assemble story → render → write
//! ```
//!
//! Progress is reported as [`ProcessEvent`]s over an optional channel so the
//! CLI can print while the library stays free of stdout writes. Extracted
//! video frames are held until the PDF is written, then deleted.

use crate::config::{ConfigError, ConfigOverrides, ReviewConfig, load_config};
use crate::discover::{MediaItem, ScanError, check_directory, find_media};
use crate::document::{self, BuildReport, DocumentError, DocumentSpec, ReviewItem};
use crate::imaging::{EmbedConfig, ImageBackend, Quality, RustBackend, px_to_points};
use crate::metadata;
use crate::video::{ExtractedFrame, FrameExtractor, frame_label};
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::time::Duration;
use thiserror::Error;

/// Default output file name.
pub const DEFAULT_OUTPUT: &str = "images-review.pdf";

/// Producer string written to the PDF info dictionary.
pub const CREATOR: &str = concat!("image-review-pdf ", env!("CARGO_PKG_VERSION"));

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("Directory not found: {0}")]
    InputNotFound(PathBuf),
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
    #[error("No images found in {dir}\nPattern: {pattern}")]
    NoImagesMatched { dir: PathBuf, pattern: String },
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Error generating PDF: {0}")]
    Build(#[from] DocumentError),
}

/// Everything the `process` command was asked to do.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    pub input_dir: PathBuf,
    pub output: PathBuf,
    /// Extra config file applied after `<input_dir>/review.toml`.
    pub config_file: Option<PathBuf>,
    pub overrides: ConfigOverrides,
    /// A title page is produced only when a title is given.
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    /// Date shown on the title page, already resolved by the caller.
    pub date: String,
    pub section_title: Option<String>,
}

/// Progress reported while a build runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    /// Discovery finished.
    Found {
        images: usize,
        videos: usize,
        files: Vec<PathBuf>,
    },
    /// A frame was taken from a video.
    FrameExtracted { video: PathBuf, label: String },
    /// No frame could be taken; the video is left out.
    VideoSkipped { video: PathBuf },
    /// One item was laid out. `error` is set when a placeholder was used.
    ItemAdded {
        index: usize,
        total: usize,
        label: String,
        error: Option<String>,
    },
    /// The PDF was written.
    Written { report: BuildReport },
}

fn emit(events: &Option<Sender<ProcessEvent>>, event: ProcessEvent) {
    if let Some(tx) = events {
        tx.send(event).ok();
    }
}

/// Run the pipeline with the `image` crate backend.
pub fn process(
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BuildReport, ProcessError> {
    process_with_backend(&RustBackend::new(), options, events)
}

/// Run the pipeline with any [`ImageBackend`].
pub fn process_with_backend(
    backend: &impl ImageBackend,
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> Result<BuildReport, ProcessError> {
    check_input(&options.input_dir)?;

    let config = load_config(&options.input_dir, options.config_file.as_deref())?
        .with_overrides(&options.overrides)?;
    debug!("effective config: {config:?}");

    let media = find_media(
        &options.input_dir,
        &config.discovery.pattern,
        config.discovery.sort_by,
        config.discovery.videos,
    )?;
    let videos = media.iter().filter(|m| m.is_video()).count();
    emit(
        &events,
        ProcessEvent::Found {
            images: media.len() - videos,
            videos,
            files: media.iter().map(|m| m.path().to_path_buf()).collect(),
        },
    );

    // Frames must outlive the render that reads them.
    let (items, _frames) = resolve_items(&media, &config, &events);
    if items.is_empty() {
        return Err(ProcessError::NoImagesMatched {
            dir: options.input_dir.clone(),
            pattern: config.discovery.pattern.clone(),
        });
    }

    let spec = document_spec(options, &config, items.len());
    let assembled = document::assemble(&items, &spec, backend)?;
    let total = assembled.outcomes.len();
    for (index, outcome) in assembled.outcomes.iter().enumerate() {
        emit(
            &events,
            ProcessEvent::ItemAdded {
                index: index + 1,
                total,
                label: outcome.label.clone(),
                error: outcome.error.clone(),
            },
        );
    }

    let report = document::write(&assembled, &spec)?;
    info!(
        "wrote {} ({} pages, {} items)",
        report.output.display(),
        report.pages,
        report.items
    );
    emit(
        &events,
        ProcessEvent::Written {
            report: report.clone(),
        },
    );
    Ok(report)
}

fn check_input(dir: &Path) -> Result<(), ProcessError> {
    match check_directory(dir) {
        Ok(()) => Ok(()),
        Err(ScanError::NotFound(p)) => Err(ProcessError::InputNotFound(p)),
        Err(ScanError::NotADirectory(p)) => Err(ProcessError::NotADirectory(p)),
        Err(e) => Err(e.into()),
    }
}

/// Turn discovered media into review items, extracting one frame per video.
///
/// Returns the items with the frame guards backing any video items.
pub fn resolve_items(
    media: &[MediaItem],
    config: &ReviewConfig,
    events: &Option<Sender<ProcessEvent>>,
) -> (Vec<ReviewItem>, Vec<ExtractedFrame>) {
    let extractor = FrameExtractor::new(&config.video.ffmpeg)
        .with_timeout(Duration::from_secs(config.video.timeout_secs));
    let sidecar = config.captions.sidecar;

    let mut items = Vec::with_capacity(media.len());
    let mut frames = Vec::new();
    for entry in media {
        match entry {
            MediaItem::Image(path) => {
                items.push(
                    ReviewItem::new(path.clone())
                        .with_caption(metadata::caption_for(path, sidecar)),
                );
            }
            MediaItem::Video(path) => {
                let timestamp = &config.video.timestamp;
                match extractor.extract_frame(path, timestamp, config.video.frame_format) {
                    Some(frame) => {
                        let label = frame_label(path, timestamp);
                        emit(
                            events,
                            ProcessEvent::FrameExtracted {
                                video: path.clone(),
                                label: label.clone(),
                            },
                        );
                        items.push(
                            ReviewItem::new(frame.path().to_path_buf())
                                .with_label(label)
                                .with_caption(metadata::caption_for(path, sidecar)),
                        );
                        frames.push(frame);
                    }
                    None => emit(
                        events,
                        ProcessEvent::VideoSkipped {
                            video: path.clone(),
                        },
                    ),
                }
            }
        }
    }
    (items, frames)
}

/// Fix every document setting for one build.
pub fn document_spec(options: &ProcessOptions, config: &ReviewConfig, count: usize) -> DocumentSpec {
    let output = if options.output.as_os_str().is_empty() {
        PathBuf::from(DEFAULT_OUTPUT)
    } else {
        options.output.clone()
    };
    DocumentSpec {
        output,
        page: config.layout.page_setup(),
        title: non_blank(&options.title),
        subtitle: non_blank(&options.subtitle),
        author: non_blank(&options.author),
        date: options.date.clone(),
        metadata: vec![("Images".to_string(), count.to_string())],
        section_title: non_blank(&options.section_title),
        max_width: px_to_points(config.layout.max_width_px),
        annotation_height: config.layout.annotation_height,
        line_height: config.layout.line_height,
        items_per_page: config.layout.items_per_page,
        show_filenames: config.layout.show_filenames,
        embed: EmbedConfig {
            format: config.images.format,
            quality: Quality::new(config.images.quality),
        },
        dpi: config.images.dpi,
        creator: CREATOR.to_string(),
    }
}

/// Blank strings count as not given.
fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}
