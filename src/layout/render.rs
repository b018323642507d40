//! Pagination and PDF serialization.
//!
//! Rendering happens in two passes. [`paginate`] walks the story top to
//! bottom inside the page frame and produces positioned drawing operations
//! per page; [`render_to_bytes`] then writes those pages with `pdf-writer`.
//! Coordinates in [`Op`] are PDF user space: origin bottom-left, y up.
//!
//! Pagination rules:
//! - paragraphs break between lines, ruled boxes between rows;
//! - an image that does not fit the remaining space starts a new page and
//!   is shrunk (aspect kept) when larger than the frame itself;
//! - a spacer that does not fit starts a new page and is dropped;
//! - a page break only takes effect when the current page is not empty;
//! - a keep-together group that does not fit moves to a new page; a group
//!   taller than a whole frame then flows across pages like loose blocks.

use super::metrics::encode_win_ansi;
use super::style::{Alignment, Color, Font};
use super::text::Paragraph;
use super::{Block, ImageBlock, RuledBox, Story};
use crate::imaging::{EncodedImage, ImageStream};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref, Str, TextStr};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Margin of {margin}pt leaves no room on a {width}x{height}pt page")]
    InvalidMargins { margin: f32, width: f32, height: f32 },
}

/// Supported paper sizes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Letter,
    A4,
    Legal,
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::A4 => (595.28, 841.89),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

/// Paper size plus a uniform margin, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSetup {
    pub size: PageSize,
    pub margin: f32,
}

impl Default for PageSetup {
    fn default() -> Self {
        Self {
            size: PageSize::Letter,
            margin: 54.0,
        }
    }
}

impl PageSetup {
    /// The printable area inside the margins.
    pub fn frame(&self) -> Result<Frame, RenderError> {
        let (width, height) = self.size.dimensions();
        let m = self.margin;
        if m.is_nan() || m < 0.0 || 2.0 * m >= width || 2.0 * m >= height {
            return Err(RenderError::InvalidMargins {
                margin: m,
                width,
                height,
            });
        }
        Ok(Frame {
            left: m,
            top: height - m,
            width: width - 2.0 * m,
            height: height - 2.0 * m,
        })
    }
}

/// Printable rectangle: `top` is the y of its upper edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Metadata written to the PDF info dictionary.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: Option<String>,
    pub creator: String,
}

/// One positioned drawing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Text with its baseline at `y`.
    Text {
        font: Font,
        size: f32,
        color: Color,
        x: f32,
        y: f32,
        text: String,
    },
    /// Image `index` into [`Layout::images`], lower-left corner at `(x, y)`.
    Image {
        index: usize,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    },
    Rect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
        stroke: Color,
        stroke_width: f32,
    },
}

/// The paginated story.
#[derive(Debug)]
pub struct Layout<'a> {
    pub pages: Vec<Vec<Op>>,
    pub images: Vec<&'a EncodedImage>,
}

/// A finished PDF held in memory.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

/// Display size of an image block once shrunk to fit the frame.
fn fitted_size(image: &ImageBlock, frame: &Frame) -> (f32, f32) {
    let (w, h) = (image.width, image.height);
    if w <= 0.0 || h <= 0.0 {
        return (0.0, 0.0);
    }
    let scale = (frame.width / w).min(frame.height / h).min(1.0);
    (w * scale, h * scale)
}

/// Height a block takes when placed without a page break.
fn measure(block: &Block, frame: &Frame) -> f32 {
    match block {
        Block::Paragraph(p) => {
            let lines = p.wrap(frame.width).len();
            if lines == 0 {
                0.0
            } else {
                lines as f32 * p.style.leading + p.style.space_after
            }
        }
        Block::Image(img) => fitted_size(img, frame).1,
        Block::Spacer(h) => *h,
        Block::RuledBox(b) => b.lines as f32 * b.line_height,
        Block::PageBreak => 0.0,
        Block::KeepTogether(children) => children.iter().map(|c| measure(c, frame)).sum(),
    }
}

struct Paginator<'a> {
    frame: Frame,
    pages: Vec<Vec<Op>>,
    current: Vec<Op>,
    /// Distance already used from the top of the frame.
    cursor: f32,
    images: Vec<&'a EncodedImage>,
}

impl<'a> Paginator<'a> {
    fn new(frame: Frame) -> Self {
        Self {
            frame,
            pages: Vec::new(),
            current: Vec::new(),
            cursor: 0.0,
            images: Vec::new(),
        }
    }

    fn at_top(&self) -> bool {
        self.cursor <= 0.0
    }

    fn fits(&self, height: f32) -> bool {
        self.cursor + height <= self.frame.height + 1e-3
    }

    fn new_page(&mut self) {
        self.pages.push(std::mem::take(&mut self.current));
        self.cursor = 0.0;
    }

    /// Start a new page unless `height` still fits or we are at the top.
    fn ensure_room(&mut self, height: f32) {
        if !self.fits(height) && !self.at_top() {
            self.new_page();
        }
    }

    fn place(&mut self, block: &'a Block) {
        match block {
            Block::Paragraph(p) => self.place_paragraph(p),
            Block::Image(img) => self.place_image(img),
            Block::Spacer(h) => {
                if self.fits(*h) {
                    self.cursor += h;
                } else if !self.at_top() {
                    self.new_page();
                }
            }
            Block::RuledBox(b) => self.place_ruled_box(b),
            Block::PageBreak => {
                if !self.at_top() {
                    self.new_page();
                }
            }
            Block::KeepTogether(children) => {
                let height: f32 = children.iter().map(|c| measure(c, &self.frame)).sum();
                if !self.fits(height) && !self.at_top() {
                    self.new_page();
                }
                for child in children {
                    self.place(child);
                }
            }
        }
    }

    fn place_paragraph(&mut self, p: &Paragraph) {
        let lines = p.wrap(self.frame.width);
        if lines.is_empty() {
            return;
        }
        let style = &p.style;
        for line in lines {
            self.ensure_room(style.leading);
            let offset = match style.alignment {
                Alignment::Left => 0.0,
                Alignment::Center => ((self.frame.width - line.width) / 2.0).max(0.0),
            };
            let baseline = self.frame.top - self.cursor - style.font_size;
            for run in line.runs {
                self.current.push(Op::Text {
                    font: run.font,
                    size: style.font_size,
                    color: style.color,
                    x: self.frame.left + offset + run.x,
                    y: baseline,
                    text: run.text,
                });
            }
            self.cursor += style.leading;
        }
        self.cursor = (self.cursor + style.space_after).min(self.frame.height);
    }

    fn place_image(&mut self, img: &'a ImageBlock) {
        let (width, height) = fitted_size(img, &self.frame);
        if height <= 0.0 {
            return;
        }
        self.ensure_room(height);
        let index = self.images.len();
        self.images.push(&img.image);
        self.current.push(Op::Image {
            index,
            x: self.frame.left + (self.frame.width - width) / 2.0,
            y: self.frame.top - self.cursor - height,
            width,
            height,
        });
        self.cursor += height;
    }

    fn place_ruled_box(&mut self, b: &RuledBox) {
        let width = b.width.min(self.frame.width);
        let x = self.frame.left + (self.frame.width - width) / 2.0;
        for _ in 0..b.lines {
            self.ensure_room(b.line_height);
            self.current.push(Op::Rect {
                x,
                y: self.frame.top - self.cursor - b.line_height,
                width,
                height: b.line_height,
                fill: b.fill,
                stroke: b.stroke,
                stroke_width: b.stroke_width,
            });
            self.cursor += b.line_height;
        }
    }

    fn finish(mut self) -> Layout<'a> {
        if !self.current.is_empty() || self.pages.is_empty() {
            self.pages.push(self.current);
        }
        Layout {
            pages: self.pages,
            images: self.images,
        }
    }
}

/// Flow a story into pages.
pub fn paginate<'a>(story: &'a Story, setup: &PageSetup) -> Result<Layout<'a>, RenderError> {
    let mut paginator = Paginator::new(setup.frame()?);
    for block in story.blocks() {
        paginator.place(block);
    }
    Ok(paginator.finish())
}

fn image_name(index: usize) -> String {
    format!("Im{}", index + 1)
}

fn write_content(ops: &[Op]) -> Vec<u8> {
    let mut content = Content::new();
    for op in ops {
        match op {
            Op::Text {
                font,
                size,
                color,
                x,
                y,
                text,
            } => {
                content.set_fill_rgb(color.r, color.g, color.b);
                content.begin_text();
                content.set_font(Name(font.resource_name().as_bytes()), *size);
                content.set_text_matrix([1.0, 0.0, 0.0, 1.0, *x, *y]);
                content.show(Str(&encode_win_ansi(text)));
                content.end_text();
            }
            Op::Image {
                index,
                x,
                y,
                width,
                height,
            } => {
                let name = image_name(*index);
                content.save_state();
                content.transform([*width, 0.0, 0.0, *height, *x, *y]);
                content.x_object(Name(name.as_bytes()));
                content.restore_state();
            }
            Op::Rect {
                x,
                y,
                width,
                height,
                fill,
                stroke,
                stroke_width,
            } => {
                content.save_state();
                content.set_fill_rgb(fill.r, fill.g, fill.b);
                content.set_stroke_rgb(stroke.r, stroke.g, stroke.b);
                content.set_line_width(*stroke_width);
                content.rect(*x, *y, *width, *height);
                content.fill_nonzero_and_stroke();
                content.restore_state();
            }
        }
    }
    content.finish()
}

fn write_image(pdf: &mut Pdf, id: Ref, mask_id: Option<Ref>, image: &EncodedImage) {
    let (width, height) = (image.width as i32, image.height as i32);
    match &image.stream {
        ImageStream::Jpeg(data) => {
            let mut xobject = pdf.image_xobject(id, data);
            xobject.filter(Filter::DctDecode);
            xobject.width(width);
            xobject.height(height);
            xobject.color_space().device_rgb();
            xobject.bits_per_component(8);
        }
        ImageStream::Flate { rgb, alpha } => {
            {
                let mut xobject = pdf.image_xobject(id, rgb);
                xobject.filter(Filter::FlateDecode);
                xobject.width(width);
                xobject.height(height);
                xobject.color_space().device_rgb();
                xobject.bits_per_component(8);
                if let Some(mask_id) = mask_id {
                    xobject.s_mask(mask_id);
                }
            }
            if let (Some(mask_id), Some(alpha)) = (mask_id, alpha) {
                let mut mask = pdf.image_xobject(mask_id, alpha);
                mask.filter(Filter::FlateDecode);
                mask.width(width);
                mask.height(height);
                mask.color_space().device_gray();
                mask.bits_per_component(8);
            }
        }
    }
}

/// Paginate and serialize a story into PDF bytes.
pub fn render_to_bytes(
    story: &Story,
    setup: &PageSetup,
    info: &DocumentInfo,
) -> Result<Rendered, RenderError> {
    let layout = paginate(story, setup)?;
    let (page_width, page_height) = setup.size.dimensions();

    let mut alloc = Ref::new(1);
    let catalog_id = alloc.bump();
    let tree_id = alloc.bump();
    let info_id = alloc.bump();
    let font_ids: Vec<(Font, Ref)> = Font::ALL.iter().map(|f| (*f, alloc.bump())).collect();
    let image_ids: Vec<(Ref, Option<Ref>)> = layout
        .images
        .iter()
        .map(|img| {
            let id = alloc.bump();
            let mask = match &img.stream {
                ImageStream::Flate { alpha: Some(_), .. } => Some(alloc.bump()),
                _ => None,
            };
            (id, mask)
        })
        .collect();
    let page_ids: Vec<(Ref, Ref)> = layout
        .pages
        .iter()
        .map(|_| (alloc.bump(), alloc.bump()))
        .collect();

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(tree_id);
    pdf.pages(tree_id)
        .kids(page_ids.iter().map(|(page, _)| *page))
        .count(page_ids.len() as i32);

    for (ops, (page_id, content_id)) in layout.pages.iter().zip(&page_ids) {
        let mut page = pdf.page(*page_id);
        page.media_box(Rect::new(0.0, 0.0, page_width, page_height));
        page.parent(tree_id);
        page.contents(*content_id);

        let mut resources = page.resources();
        {
            let mut fonts = resources.fonts();
            for (font, id) in &font_ids {
                fonts.pair(Name(font.resource_name().as_bytes()), *id);
            }
        }
        let used: Vec<usize> = ops
            .iter()
            .filter_map(|op| match op {
                Op::Image { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        if !used.is_empty() {
            let mut x_objects = resources.x_objects();
            for index in used {
                let name = image_name(index);
                x_objects.pair(Name(name.as_bytes()), image_ids[index].0);
            }
        }
        resources.finish();
        page.finish();

        pdf.stream(*content_id, &write_content(ops));
    }

    for (font, id) in &font_ids {
        pdf.type1_font(*id)
            .base_font(Name(font.base_name().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    for (image, (id, mask)) in layout.images.iter().zip(&image_ids) {
        write_image(&mut pdf, *id, *mask, image);
    }

    {
        let mut doc_info = pdf.document_info(info_id);
        doc_info.title(TextStr(&info.title));
        if let Some(author) = &info.author {
            doc_info.author(TextStr(author));
        }
        doc_info.creator(TextStr(&info.creator));
    }

    let pages = page_ids.len();
    Ok(Rendered {
        bytes: pdf.finish(),
        pages,
    })
}

/// Render a story and write it to `path`, replacing any existing file.
///
/// Nothing is written unless rendering succeeded.
pub fn render_to_file(
    story: &Story,
    setup: &PageSetup,
    info: &DocumentInfo,
    path: &Path,
) -> Result<Rendered, RenderError> {
    let rendered = render_to_bytes(story, setup, info)?;
    std::fs::write(path, &rendered.bytes)?;
    Ok(rendered)
}
