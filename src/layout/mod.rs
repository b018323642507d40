//! Story renderer: blocks, pagination, PDF output.
//!
//! A [`Story`] is an ordered list of [`Block`]s. The renderer flows it into
//! the page frame, breaking pages automatically, and serializes the result
//! with `pdf-writer` using the base-14 Helvetica family (never embedded).
//!
//! | Block | Behavior |
//! |---|---|
//! | [`Block::Paragraph`] | Greedy word wrap, breaks between lines |
//! | [`Block::Image`] | Centered, shrunk to the frame when too large |
//! | [`Block::Spacer`] | Vertical gap, dropped at a page break |
//! | [`Block::RuledBox`] | Grid of empty rows, breaks between rows |
//! | [`Block::PageBreak`] | New page unless the current one is empty |
//! | [`Block::KeepTogether`] | Children moved as a unit when they fit a page |

pub mod metrics;
mod render;
pub mod style;
pub mod text;

pub use render::{
    DocumentInfo, Frame, Layout, Op, PageSetup, PageSize, RenderError, Rendered, paginate,
    render_to_bytes, render_to_file,
};
pub use style::{Alignment, Color, Font, StyleName, StyleSet, TextStyle};
pub use text::{Paragraph, Span};

use crate::imaging::EncodedImage;

/// A unit of content placed by the paginator.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Image(ImageBlock),
    /// Vertical space in points.
    Spacer(f32),
    RuledBox(RuledBox),
    PageBreak,
    KeepTogether(Vec<Block>),
}

/// An embedded image and its display size in points.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlock {
    pub image: EncodedImage,
    pub width: f32,
    pub height: f32,
}

/// A box of `lines` empty rows drawn as a light grid.
#[derive(Debug, Clone, PartialEq)]
pub struct RuledBox {
    pub width: f32,
    pub line_height: f32,
    pub lines: usize,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f32,
}

impl RuledBox {
    pub fn new(width: f32, line_height: f32, lines: usize) -> Self {
        Self {
            width,
            line_height,
            lines,
            fill: Color::ANNOTATION_FILL,
            stroke: Color::LIGHT_GREY,
            stroke_width: 0.5,
        }
    }

    pub fn height(&self) -> f32 {
        self.lines as f32 * self.line_height
    }
}

/// The ordered blocks of one document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Story {
    blocks: Vec<Block>,
}

impl Story {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        self.blocks.push(block);
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
