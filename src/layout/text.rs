//! Paragraphs made of styled spans, and greedy line breaking.

use super::metrics::text_width;
use super::style::{Font, TextStyle};

/// A run of text with optional emphasis on top of the paragraph style.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: false,
        }
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: true,
            italic: false,
        }
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            bold: false,
            italic: true,
        }
    }
}

/// A block of wrapped text.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub spans: Vec<Span>,
    pub style: TextStyle,
}

impl Paragraph {
    pub fn new(spans: Vec<Span>, style: TextStyle) -> Self {
        Self { spans, style }
    }

    pub fn plain(text: impl Into<String>, style: TextStyle) -> Self {
        Self::new(vec![Span::plain(text)], style)
    }

    /// All span text concatenated, without styling.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    /// Break the paragraph into lines no wider than `max_width`.
    pub fn wrap(&self, max_width: f32) -> Vec<Line> {
        let size = self.style.font_size;
        let mut lines = Vec::new();
        let mut current = Line::default();

        for token in tokenize(&self.spans, self.style.font) {
            for piece in split_oversized(&token, size, max_width) {
                let gap = if piece.space_before && !current.runs.is_empty() {
                    text_width(piece.font, size, " ")
                } else {
                    0.0
                };
                let width = text_width(piece.font, size, &piece.text);

                if !current.runs.is_empty() && current.width + gap + width > max_width {
                    lines.push(std::mem::take(&mut current));
                    current.push(piece.font, &piece.text, 0.0, width, false);
                } else {
                    current.push(piece.font, &piece.text, gap, width, gap > 0.0);
                }
            }
        }

        if !current.runs.is_empty() {
            lines.push(current);
        }
        lines
    }
}

/// A single wrapped line: runs of same-font text and the total advance.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Line {
    pub runs: Vec<Run>,
    pub width: f32,
}

/// Text set in one font, starting `x` points from the line start.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub font: Font,
    pub text: String,
    pub x: f32,
}

impl Line {
    fn push(&mut self, font: Font, text: &str, gap: f32, width: f32, spaced: bool) {
        match self.runs.last_mut() {
            Some(last) if last.font == font => {
                if spaced {
                    last.text.push(' ');
                }
                last.text.push_str(text);
            }
            _ => self.runs.push(Run {
                font,
                text: text.to_string(),
                x: self.width + gap,
            }),
        }
        self.width += gap + width;
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect::<Vec<_>>().join(" ")
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    text: String,
    font: Font,
    space_before: bool,
}

/// Split spans into words, remembering whether whitespace preceded each.
fn tokenize(spans: &[Span], base: Font) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut pending_space = false;

    for span in spans {
        let font = base.with_emphasis(span.bold, span.italic);
        let mut word = String::new();
        for ch in span.text.chars() {
            if ch.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token {
                        text: std::mem::take(&mut word),
                        font,
                        space_before: pending_space,
                    });
                }
                pending_space = true;
            } else {
                word.push(ch);
            }
        }
        if !word.is_empty() {
            tokens.push(Token {
                text: word,
                font,
                space_before: pending_space,
            });
            pending_space = false;
        }
    }
    tokens
}

/// Break a word wider than the line into character chunks that fit.
fn split_oversized(token: &Token, size: f32, max_width: f32) -> Vec<Token> {
    if text_width(token.font, size, &token.text) <= max_width {
        return vec![token.clone()];
    }

    let mut pieces = Vec::new();
    let mut chunk = String::new();
    for ch in token.text.chars() {
        let mut candidate = chunk.clone();
        candidate.push(ch);
        if !chunk.is_empty() && text_width(token.font, size, &candidate) > max_width {
            pieces.push(std::mem::take(&mut chunk));
        }
        chunk.push(ch);
    }
    if !chunk.is_empty() {
        pieces.push(chunk);
    }

    pieces
        .into_iter()
        .enumerate()
        .map(|(i, text)| Token {
            text,
            font: token.font,
            space_before: i == 0 && token.space_before,
        })
        .collect()
}
