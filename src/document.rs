//! Document assembly: review items in, story and PDF out.
//!
//! The document is a linear sequence:
//!
//! ```text
//! [title page] → [section title] → item block → … → item block
//! ```
//!
//! Each item block is kept together on one page when it fits:
//!
//! ```text
//! ┌────────────────────────────────────┐
//! │ login.png                          │  filename (bold, optional)
//! │ ┌────────────────────────────────┐ │
//! │ │             image              │ │  or "[Error loading image: …]"
//! │ └────────────────────────────────┘ │
//! │       caption (optional)           │
//! │ ┌────────────────────────────────┐ │
//! │ ├────────────────────────────────┤ │  annotation box (optional)
//! │ └────────────────────────────────┘ │
//! └────────────────────────────────────┘
//! ```
//!
//! Between items comes either a page break (every `items_per_page` items,
//! never after the last) or a 0.3 in spacer. The assembler only sees image
//! paths; videos are resolved to frames before they get here.

use crate::annotation;
use crate::imaging::{
    BackendError, EmbedConfig, ImageBackend, POINTS_PER_INCH, embed_pixel_width, get_dimensions,
    prepare_for_embedding,
};
use crate::layout::{
    Block, DocumentInfo, ImageBlock, PageSetup, Paragraph, RenderError, Span, StyleName,
    StyleSet, Story, render_to_file,
};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Title used in the PDF info dictionary when none is given.
pub const DEFAULT_DOCUMENT_TITLE: &str = "Image Review";

const TITLE_TOP_SPACE: f32 = 1.5 * POINTS_PER_INCH;
const SECTION_SPACE: f32 = 12.0;
const CAPTION_SPACE: f32 = 6.0;
const ANNOTATION_SPACE: f32 = 10.0;
const ITEM_SPACE: f32 = 0.3 * POINTS_PER_INCH;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Render error: {0}")]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("No images to process")]
    NoItems,
}

/// One image entry of the document.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub path: PathBuf,
    /// Text shown above the image, normally the filename.
    pub label: String,
    pub caption: Option<String>,
}

impl ReviewItem {
    /// An item labelled with its own filename.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = display_name(&path);
        Self {
            path,
            label,
            caption: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn with_caption(mut self, caption: Option<String>) -> Self {
        self.caption = caption;
        self
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// Everything a build needs, fixed before the first block is produced.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSpec {
    pub output: PathBuf,
    pub page: PageSetup,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    /// Already resolved; the assembler never reads the clock.
    pub date: String,
    /// Extra title-page pairs, in display order.
    pub metadata: Vec<(String, String)>,
    pub section_title: Option<String>,
    /// Maximum image display width in points.
    pub max_width: f32,
    /// Annotation box height in points; `0` disables the box.
    pub annotation_height: f32,
    pub line_height: f32,
    pub items_per_page: usize,
    pub show_filenames: bool,
    pub embed: EmbedConfig,
    /// Resolution of embedded bitmaps relative to their display size.
    pub dpi: u32,
    pub creator: String,
}

/// The per-item subset of [`DocumentSpec`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemOptions {
    pub max_width: f32,
    pub annotation_height: f32,
    pub line_height: f32,
    pub show_filename: bool,
    pub embed: EmbedConfig,
    pub dpi: u32,
}

impl DocumentSpec {
    pub fn item_options(&self) -> ItemOptions {
        ItemOptions {
            max_width: self.max_width,
            annotation_height: self.annotation_height,
            line_height: self.line_height,
            show_filename: self.show_filenames,
            embed: self.embed,
            dpi: self.dpi,
        }
    }

    pub fn title_page(&self) -> Option<TitlePage> {
        self.title.as_ref().map(|title| TitlePage {
            title: title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
            date: self.date.clone(),
            metadata: self.metadata.clone(),
        })
    }

    pub fn document_info(&self) -> DocumentInfo {
        DocumentInfo {
            title: self
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_DOCUMENT_TITLE.to_string()),
            author: self.author.clone(),
            creator: self.creator.clone(),
        }
    }
}

/// Contents of the optional first page.
#[derive(Debug, Clone, PartialEq)]
pub struct TitlePage {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: Option<String>,
    pub date: String,
    pub metadata: Vec<(String, String)>,
}

/// Title, optional subtitle, then one `Key: value | …` metadata line.
///
/// The caller appends the page break.
pub fn create_title_page(page: &TitlePage, styles: &StyleSet) -> Vec<Block> {
    let mut blocks = vec![
        Block::Spacer(TITLE_TOP_SPACE),
        Block::Paragraph(Paragraph::plain(
            page.title.clone(),
            styles.get(StyleName::Title).clone(),
        )),
    ];

    if let Some(subtitle) = &page.subtitle {
        blocks.push(Block::Paragraph(Paragraph::plain(
            subtitle.clone(),
            styles.get(StyleName::Metadata).clone(),
        )));
    }

    let mut pairs: Vec<(&str, &str)> = Vec::new();
    if let Some(author) = &page.author {
        pairs.push(("Author", author));
    }
    pairs.push(("Date", &page.date));
    pairs.extend(page.metadata.iter().map(|(k, v)| (k.as_str(), v.as_str())));

    let mut spans = Vec::new();
    for (i, (key, value)) in pairs.into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::plain(" | "));
        }
        spans.push(Span::bold(format!("{key}:")));
        spans.push(Span::plain(format!(" {value}")));
    }
    blocks.push(Block::Paragraph(Paragraph::new(
        spans,
        styles.get(StyleName::Metadata).clone(),
    )));

    blocks
}

/// Append a section heading.
pub fn add_section_title(story: &mut Story, title: &str, styles: &StyleSet) {
    story.push(Block::Paragraph(Paragraph::plain(
        title,
        styles.get(StyleName::Subtitle).clone(),
    )));
    story.push(Block::Spacer(SECTION_SPACE));
}

/// Display size in points: 1 image pixel is 1 point, capped at `max_width`.
pub fn display_size(width_px: u32, height_px: u32, max_width: f32) -> (f32, f32) {
    let (w, h) = (width_px as f32, height_px as f32);
    if w > max_width && w > 0.0 {
        (max_width, h * max_width / w)
    } else {
        (w, h)
    }
}

fn load_image_block(
    backend: &impl ImageBackend,
    path: &Path,
    options: &ItemOptions,
) -> Result<ImageBlock, BackendError> {
    let (width_px, height_px) = get_dimensions(backend, path)?;
    let (width, height) = display_size(width_px, height_px, options.max_width);
    let embed_width = embed_pixel_width(width, options.dpi);
    let image = prepare_for_embedding(backend, path, Some(embed_width), &options.embed)?;
    Ok(ImageBlock {
        image,
        width,
        height,
    })
}

/// What happened to one item during assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemOutcome {
    pub label: String,
    /// Set when the image could not be loaded and a marker was used instead.
    pub error: Option<String>,
}

/// Build the kept-together block for one item.
pub fn create_image_block(
    item: &ReviewItem,
    options: &ItemOptions,
    backend: &impl ImageBackend,
    styles: &StyleSet,
) -> (Block, ItemOutcome) {
    let mut blocks = Vec::new();

    if options.show_filename {
        blocks.push(Block::Paragraph(Paragraph::new(
            vec![Span::bold(item.label.clone())],
            styles.get(StyleName::Filename).clone(),
        )));
    }

    let error = match load_image_block(backend, &item.path, options) {
        Ok(image) => {
            debug!(
                "embedding {} at {:.0}x{:.0}pt ({}x{}px)",
                item.label, image.width, image.height, image.image.width, image.image.height
            );
            blocks.push(Block::Image(image));
            None
        }
        Err(e) => {
            warn!("could not load {}: {}", item.path.display(), e);
            blocks.push(Block::Paragraph(Paragraph::new(
                vec![Span::italic(format!(
                    "[Error loading image: {}]",
                    item.label
                ))],
                styles.get(StyleName::Caption).clone(),
            )));
            Some(e.to_string())
        }
    };

    if let Some(caption) = item.caption.as_deref().filter(|c| !c.is_empty()) {
        blocks.push(Block::Spacer(CAPTION_SPACE));
        blocks.push(Block::Paragraph(Paragraph::plain(
            caption,
            styles.get(StyleName::Caption).clone(),
        )));
    }

    if options.annotation_height > 0.0 {
        blocks.push(Block::Spacer(ANNOTATION_SPACE));
        blocks.push(annotation::make_box(
            options.max_width,
            options.annotation_height,
            options.line_height,
        ));
    }

    let outcome = ItemOutcome {
        label: item.label.clone(),
        error,
    };
    (Block::KeepTogether(blocks), outcome)
}

/// Append one block per item with page breaks every `items_per_page`.
pub fn add_image_section(
    story: &mut Story,
    items: &[ReviewItem],
    options: &ItemOptions,
    items_per_page: usize,
    backend: &impl ImageBackend,
    styles: &StyleSet,
) -> Vec<ItemOutcome> {
    let per_page = items_per_page.max(1);
    let mut outcomes = Vec::with_capacity(items.len());

    for (idx, item) in items.iter().enumerate() {
        let (block, outcome) = create_image_block(item, options, backend, styles);
        story.push(block);
        outcomes.push(outcome);

        if (idx + 1) % per_page == 0 && idx + 1 < items.len() {
            story.push(Block::PageBreak);
        } else {
            story.push(Block::Spacer(ITEM_SPACE));
        }
    }
    outcomes
}

/// A story ready to render, with what happened to each item.
#[derive(Debug)]
pub struct Assembled {
    pub story: Story,
    pub outcomes: Vec<ItemOutcome>,
}

impl Assembled {
    pub fn placeholders(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_some()).count()
    }
}

/// Produce the full story for `items` without rendering it.
pub fn assemble(
    items: &[ReviewItem],
    spec: &DocumentSpec,
    backend: &impl ImageBackend,
) -> Result<Assembled, DocumentError> {
    if items.is_empty() {
        return Err(DocumentError::NoItems);
    }
    let styles = StyleSet::default_styles();
    let mut story = Story::new();

    if let Some(page) = spec.title_page() {
        story.extend(create_title_page(&page, &styles));
        story.push(Block::PageBreak);
    }

    if let Some(section) = &spec.section_title {
        add_section_title(&mut story, section, &styles);
    }

    let outcomes = add_image_section(
        &mut story,
        items,
        &spec.item_options(),
        spec.items_per_page,
        backend,
        &styles,
    );
    Ok(Assembled { story, outcomes })
}

/// Summary of a finished build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub output: PathBuf,
    pub pages: usize,
    pub items: usize,
    pub placeholders: usize,
    pub bytes: u64,
}

/// Render an assembled story to `spec.output`.
pub fn write(assembled: &Assembled, spec: &DocumentSpec) -> Result<BuildReport, DocumentError> {
    if let Some(parent) = spec.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let rendered = render_to_file(
        &assembled.story,
        &spec.page,
        &spec.document_info(),
        &spec.output,
    )?;
    debug!(
        "wrote {} page(s) to {}",
        rendered.pages,
        spec.output.display()
    );
    Ok(BuildReport {
        output: spec.output.clone(),
        pages: rendered.pages,
        items: assembled.outcomes.len(),
        placeholders: assembled.placeholders(),
        bytes: rendered.bytes.len() as u64,
    })
}

/// Assemble and render in one pass, overwriting `spec.output`.
pub fn build(
    items: &[ReviewItem],
    spec: &DocumentSpec,
    backend: &impl ImageBackend,
) -> Result<BuildReport, DocumentError> {
    let assembled = assemble(items, spec, backend)?;
    write(&assembled, spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{Quality, RustBackend, TargetFormat};
    use crate::layout::Font;
    use crate::test_helpers::{count_pdf_pages, image_dir, pdf_contains, write_corrupt};

    fn spec(output: PathBuf) -> DocumentSpec {
        DocumentSpec {
            output,
            page: PageSetup::default(),
            title: None,
            subtitle: None,
            author: None,
            date: "2024-05-01".into(),
            metadata: vec![],
            section_title: None,
            max_width: 375.0,
            annotation_height: 150.0,
            line_height: 20.0,
            items_per_page: 1,
            show_filenames: true,
            embed: EmbedConfig {
                format: TargetFormat::Jpeg,
                quality: Quality::default(),
            },
            dpi: 144,
            creator: "test".into(),
        }
    }

    fn options() -> ItemOptions {
        spec(PathBuf::from("unused.pdf")).item_options()
    }

    fn paragraph_text(block: &Block) -> String {
        match block {
            Block::Paragraph(p) => p.text(),
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn title_page_metadata_line() {
        let page = TitlePage {
            title: "Sprint 12".into(),
            subtitle: Some("UI pass".into()),
            author: Some("Kim".into()),
            date: "2024-05-01".into(),
            metadata: vec![("Images".into(), "3".into())],
        };
        let blocks = create_title_page(&page, &StyleSet::default());

        assert_eq!(blocks[0], Block::Spacer(108.0));
        assert_eq!(paragraph_text(&blocks[1]), "Sprint 12");
        assert_eq!(paragraph_text(&blocks[2]), "UI pass");
        assert_eq!(
            paragraph_text(&blocks[3]),
            "Author: Kim | Date: 2024-05-01 | Images: 3"
        );
        match &blocks[3] {
            Block::Paragraph(p) => {
                assert!(p.spans[0].bold);
                assert_eq!(p.spans[0].text, "Author:");
                assert!(!p.spans[1].bold);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
        assert_eq!(blocks.len(), 4);
    }

    #[test]
    fn title_page_without_author_starts_with_date() {
        let page = TitlePage {
            title: "T".into(),
            subtitle: None,
            author: None,
            date: "today".into(),
            metadata: vec![],
        };
        let blocks = create_title_page(&page, &StyleSet::default());
        assert_eq!(blocks.len(), 3);
        assert_eq!(paragraph_text(&blocks[2]), "Date: today");
    }

    #[test]
    fn section_title_uses_subtitle_style() {
        let mut story = Story::new();
        let styles = StyleSet::default();
        add_section_title(&mut story, "Inbox", &styles);
        match &story.blocks()[0] {
            Block::Paragraph(p) => {
                assert_eq!(p.text(), "Inbox");
                assert_eq!(p.style.font_size, 16.0);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
        assert_eq!(story.blocks()[1], Block::Spacer(12.0));
    }

    #[test]
    fn display_size_caps_width_and_keeps_ratio() {
        assert_eq!(display_size(1000, 500, 375.0), (375.0, 187.5));
        assert_eq!(display_size(200, 100, 375.0), (200.0, 100.0));
        assert_eq!(display_size(0, 0, 375.0), (0.0, 0.0));
    }

    #[test]
    fn item_block_order() {
        let backend = MockBackend::new().with_image("/shots/a.png", 750, 500);
        let item = ReviewItem::new("/shots/a.png").with_caption(Some("Looks off".into()));
        let (block, outcome) =
            create_image_block(&item, &options(), &backend, &StyleSet::default());

        assert_eq!(outcome.error, None);
        let children = match block {
            Block::KeepTogether(children) => children,
            other => panic!("expected keep-together, got {other:?}"),
        };
        assert_eq!(children.len(), 6);
        assert_eq!(paragraph_text(&children[0]), "a.png");
        match &children[1] {
            Block::Image(img) => {
                assert_eq!((img.width, img.height), (375.0, 250.0));
                // 375pt at 144 dpi
                assert_eq!(img.image.width, 750);
            }
            other => panic!("expected image, got {other:?}"),
        }
        assert_eq!(children[2], Block::Spacer(6.0));
        assert_eq!(paragraph_text(&children[3]), "Looks off");
        assert_eq!(children[4], Block::Spacer(10.0));
        match &children[5] {
            Block::RuledBox(b) => {
                assert_eq!(b.lines, 7);
                assert_eq!(b.width, 375.0);
            }
            other => panic!("expected ruled box, got {other:?}"),
        }
    }

    #[test]
    fn embed_width_follows_dpi() {
        let backend = MockBackend::new().with_image("/big.png", 3000, 1000);
        let item = ReviewItem::new("/big.png");
        let mut opts = options();
        opts.dpi = 72;
        create_image_block(&item, &opts, &backend, &StyleSet::default());
        let prepare = backend
            .get_operations()
            .into_iter()
            .find(|op| matches!(op, RecordedOp::Prepare { .. }));
        assert_eq!(
            prepare,
            Some(RecordedOp::Prepare {
                source: "/big.png".into(),
                max_width: Some(375),
                quality: 85,
            })
        );
    }

    #[test]
    fn unreadable_image_becomes_italic_marker() {
        let backend = MockBackend::new();
        let item = ReviewItem::new("/shots/broken.png");
        let mut opts = options();
        opts.show_filename = false;
        opts.annotation_height = 0.0;
        let (block, outcome) = create_image_block(&item, &opts, &backend, &StyleSet::default());

        assert!(outcome.error.is_some());
        let children = match block {
            Block::KeepTogether(children) => children,
            other => panic!("expected keep-together, got {other:?}"),
        };
        assert_eq!(children.len(), 1);
        match &children[0] {
            Block::Paragraph(p) => {
                assert_eq!(p.text(), "[Error loading image: broken.png]");
                assert!(p.spans[0].italic);
                assert_eq!(p.wrap(500.0)[0].runs[0].font, Font::HelveticaOblique);
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn marker_names_the_item_label() {
        let backend = MockBackend::new();
        let item = ReviewItem::new("/tmp/review-frame-x1.png").with_label("clip.mp4 @ 00:00:01");
        let mut opts = options();
        opts.show_filename = false;
        opts.annotation_height = 0.0;
        let (block, _) = create_image_block(&item, &opts, &backend, &StyleSet::default());

        match block {
            Block::KeepTogether(children) => match &children[0] {
                Block::Paragraph(p) => {
                    assert_eq!(p.text(), "[Error loading image: clip.mp4 @ 00:00:01]")
                }
                other => panic!("expected paragraph, got {other:?}"),
            },
            other => panic!("expected keep-together, got {other:?}"),
        }
    }

    #[test]
    fn zero_annotation_height_omits_box() {
        let backend = MockBackend::new().with_image("/a.png", 100, 100);
        let mut opts = options();
        opts.annotation_height = 0.0;
        let (block, _) = create_image_block(
            &ReviewItem::new("/a.png"),
            &opts,
            &backend,
            &StyleSet::default(),
        );
        match block {
            Block::KeepTogether(children) => {
                assert!(!children.iter().any(|b| matches!(b, Block::RuledBox(_))));
            }
            other => panic!("expected keep-together, got {other:?}"),
        }
    }

    #[test]
    fn page_breaks_every_n_items_but_not_after_last() {
        let backend = MockBackend::new()
            .with_image("/1.png", 10, 10)
            .with_image("/2.png", 10, 10)
            .with_image("/3.png", 10, 10)
            .with_image("/4.png", 10, 10);
        let items: Vec<ReviewItem> = (1..=4)
            .map(|i| ReviewItem::new(format!("/{i}.png")))
            .collect();

        let mut story = Story::new();
        add_image_section(&mut story, &items, &options(), 2, &backend, &StyleSet::default());

        let separators: Vec<&Block> = story
            .blocks()
            .iter()
            .filter(|b| !matches!(b, Block::KeepTogether(_)))
            .collect();
        assert_eq!(
            separators,
            vec![
                &Block::Spacer(ITEM_SPACE),
                &Block::PageBreak,
                &Block::Spacer(ITEM_SPACE),
                &Block::Spacer(ITEM_SPACE),
            ]
        );
    }

    #[test]
    fn assemble_prepends_title_page_and_section() {
        let backend = MockBackend::new().with_image("/a.png", 10, 10);
        let mut s = spec(PathBuf::from("out.pdf"));
        s.title = Some("Review".into());
        s.section_title = Some("Inbox".into());
        let assembled = assemble(&[ReviewItem::new("/a.png")], &s, &backend).unwrap();
        let blocks = assembled.story.blocks();

        assert_eq!(blocks[0], Block::Spacer(108.0));
        assert!(blocks.contains(&Block::PageBreak));
        let break_at = blocks.iter().position(|b| *b == Block::PageBreak).unwrap();
        assert_eq!(paragraph_text(&blocks[break_at + 1]), "Inbox");
        assert_eq!(assembled.placeholders(), 0);
    }

    #[test]
    fn no_title_means_no_title_page() {
        let backend = MockBackend::new().with_image("/a.png", 10, 10);
        let assembled =
            assemble(&[ReviewItem::new("/a.png")], &spec("o.pdf".into()), &backend).unwrap();
        assert!(matches!(assembled.story.blocks()[0], Block::KeepTogether(_)));
    }

    #[test]
    fn empty_item_list_is_rejected_without_output() {
        let tmp = tempfile::TempDir::new().unwrap();
        let out = tmp.path().join("empty.pdf");
        let result = build(&[], &spec(out.clone()), &MockBackend::new());
        assert!(matches!(result, Err(DocumentError::NoItems)));
        assert!(!out.exists());
    }

    #[test]
    fn info_title_defaults() {
        let s = spec("o.pdf".into());
        assert_eq!(s.document_info().title, DEFAULT_DOCUMENT_TITLE);
    }

    #[test]
    fn build_real_images_with_one_corrupt() {
        let tmp = image_dir(&[("a.png", 120, 80), ("c.jpg", 64, 64)]);
        write_corrupt(&tmp.path().join("b.png"));
        let items: Vec<ReviewItem> = ["a.png", "b.png", "c.jpg"]
            .iter()
            .map(|n| ReviewItem::new(tmp.path().join(n)))
            .collect();
        let out = tmp.path().join("review.pdf");
        let mut s = spec(out.clone());
        s.title = Some("Screens".into());
        s.author = Some("Kim".into());
        s.metadata = vec![("Images".into(), "3".into())];

        let report = build(&items, &s, &RustBackend::new()).unwrap();
        assert_eq!(report.items, 3);
        assert_eq!(report.placeholders, 1);
        // Title page plus one page per item
        assert_eq!(report.pages, 4);

        let pdf = std::fs::read(&out).unwrap();
        assert_eq!(report.bytes, pdf.len() as u64);
        assert_eq!(count_pdf_pages(&pdf), 4);
        assert!(pdf_contains(&pdf, "(Screens) Tj"));
        assert!(pdf_contains(&pdf, "(a.png) Tj"));
        assert!(pdf_contains(&pdf, "([Error loading image: b.png]) Tj"));
        assert!(pdf_contains(&pdf, "/DCTDecode"));
    }

    #[test]
    fn build_overwrites_existing_output() {
        let tmp = image_dir(&[("a.png", 20, 20)]);
        let out = tmp.path().join("nested/dir/review.pdf");
        let items = [ReviewItem::new(tmp.path().join("a.png"))];
        let backend = RustBackend::new();

        build(&items, &spec(out.clone()), &backend).unwrap();
        std::fs::write(&out, b"stale").unwrap();
        build(&items, &spec(out.clone()), &backend).unwrap();
        assert!(std::fs::read(&out).unwrap().starts_with(b"%PDF-"));
    }
}
