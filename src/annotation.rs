//! Ruled annotation boxes placed under each image.

use crate::layout::{Block, RuledBox};

/// Row height used when none is configured.
pub const DEFAULT_LINE_HEIGHT: f32 = 20.0;

/// Upper bound on rows in one box.
pub const MAX_LINES: usize = 1000;

/// Number of ruled rows that fit in `height`, clamped to `1..=MAX_LINES`.
pub fn line_count(height: f32, line_height: f32) -> usize {
    if !(line_height > 0.0) || !height.is_finite() {
        return 1;
    }
    ((height / line_height).floor() as usize).clamp(1, MAX_LINES)
}

/// An empty grid of `line_count(height, line_height)` full-width rows.
pub fn make_box(width: f32, height: f32, line_height: f32) -> Block {
    Block::RuledBox(RuledBox::new(
        width,
        line_height,
        line_count(height, line_height),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Color;

    #[test]
    fn rows_are_floored() {
        assert_eq!(line_count(150.0, 20.0), 7);
        assert_eq!(line_count(200.0, 20.0), 10);
        assert_eq!(line_count(39.9, 20.0), 1);
    }

    #[test]
    fn at_least_one_row() {
        assert_eq!(line_count(10.0, 20.0), 1);
        assert_eq!(line_count(0.0, 20.0), 1);
        assert_eq!(line_count(100.0, 0.0), 1);
    }

    #[test]
    fn rows_are_capped() {
        assert_eq!(line_count(1e12, 20.0), MAX_LINES);
        assert_eq!(line_count(150.0, 1e-9), MAX_LINES);
        assert_eq!(line_count(150.0, f32::NAN), 1);
    }

    #[test]
    fn box_spans_requested_width() {
        match make_box(375.0, 150.0, DEFAULT_LINE_HEIGHT) {
            Block::RuledBox(b) => {
                assert_eq!(b.width, 375.0);
                assert_eq!(b.lines, 7);
                assert_eq!(b.line_height, 20.0);
                assert_eq!(b.stroke, Color::LIGHT_GREY);
                assert_eq!(b.stroke_width, 0.5);
            }
            other => panic!("expected ruled box, got {other:?}"),
        }
    }
}
