//! Text styles and the per-document style set.

use std::collections::HashMap;

/// RGB color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::gray(0.0);
    pub const WHITE: Color = Color::gray(1.0);
    /// Light grey used for annotation grid lines.
    pub const LIGHT_GREY: Color = Color::gray(0.827);
    /// Near-white used as the annotation box fill.
    pub const ANNOTATION_FILL: Color = Color::gray(0.98);
    pub const GREY: Color = Color::gray(0.502);

    pub const fn gray(level: f32) -> Self {
        Self {
            r: level,
            g: level,
            b: level,
        }
    }

    /// Build a color from a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#')?;
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| {
            u8::from_str_radix(hex.get(i..i + 2)?, 16)
                .ok()
                .map(|v| v as f32 / 255.0)
        };
        Some(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

/// One of the four Helvetica faces from the PDF base-14 set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Font {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
}

impl Font {
    pub const ALL: [Font; 4] = [
        Font::Helvetica,
        Font::HelveticaBold,
        Font::HelveticaOblique,
        Font::HelveticaBoldOblique,
    ];

    /// PostScript name of the base font.
    pub fn base_name(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
            Font::HelveticaOblique => "Helvetica-Oblique",
            Font::HelveticaBoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Resource name used inside page content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
            Font::HelveticaOblique => "F3",
            Font::HelveticaBoldOblique => "F4",
        }
    }

    pub fn is_bold(self) -> bool {
        matches!(self, Font::HelveticaBold | Font::HelveticaBoldOblique)
    }

    /// Same family with bold and/or italic switched on.
    pub fn with_emphasis(self, bold: bool, italic: bool) -> Font {
        let bold = bold || self.is_bold();
        let italic =
            italic || matches!(self, Font::HelveticaOblique | Font::HelveticaBoldOblique);
        match (bold, italic) {
            (false, false) => Font::Helvetica,
            (true, false) => Font::HelveticaBold,
            (false, true) => Font::HelveticaOblique,
            (true, true) => Font::HelveticaBoldOblique,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
}

/// Text-rendering attributes of a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub font: Font,
    pub font_size: f32,
    /// Baseline-to-baseline distance.
    pub leading: f32,
    pub color: Color,
    pub alignment: Alignment,
    pub space_after: f32,
}

impl TextStyle {
    pub fn new(font: Font, font_size: f32) -> Self {
        Self {
            font,
            font_size,
            leading: font_size * 1.2,
            color: Color::BLACK,
            alignment: Alignment::Left,
            space_after: 0.0,
        }
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn space_after(mut self, space: f32) -> Self {
        self.space_after = space;
        self
    }
}

/// The fixed set of paragraph roles a review document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleName {
    Title,
    Subtitle,
    Metadata,
    Filename,
    Caption,
}

/// Style lookup shared by every block producer of one document build.
#[derive(Debug, Clone)]
pub struct StyleSet {
    styles: HashMap<StyleName, TextStyle>,
}

impl StyleSet {
    /// The stock look: large centered title, grey metadata, small labels.
    pub fn default_styles() -> Self {
        let dark = Color::from_hex("#1a1a1a").unwrap_or(Color::BLACK);
        let mid = Color::from_hex("#333333").unwrap_or(Color::BLACK);
        let muted = Color::from_hex("#666666").unwrap_or(Color::GREY);

        let styles = HashMap::from([
            (
                StyleName::Title,
                TextStyle::new(Font::HelveticaBold, 24.0)
                    .color(dark)
                    .align(Alignment::Center)
                    .space_after(20.0),
            ),
            (
                StyleName::Subtitle,
                TextStyle::new(Font::HelveticaBold, 16.0)
                    .color(mid)
                    .space_after(12.0),
            ),
            (
                StyleName::Metadata,
                TextStyle::new(Font::Helvetica, 10.0)
                    .color(Color::GREY)
                    .align(Alignment::Center)
                    .space_after(20.0),
            ),
            (
                StyleName::Filename,
                TextStyle::new(Font::Helvetica, 9.0)
                    .color(muted)
                    .space_after(6.0),
            ),
            (
                StyleName::Caption,
                TextStyle::new(Font::HelveticaOblique, 9.0)
                    .color(muted)
                    .align(Alignment::Center)
                    .space_after(6.0),
            ),
        ]);
        Self { styles }
    }

    pub fn get(&self, name: StyleName) -> &TextStyle {
        // Every StyleName is inserted by construction
        &self.styles[&name]
    }

    /// Replace one style, e.g. to enlarge captions for a custom document.
    pub fn set(&mut self, name: StyleName, style: TextStyle) {
        self.styles.insert(name, style);
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        Self::default_styles()
    }
}
