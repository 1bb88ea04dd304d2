// src/pipeline/op.rs

//! Drawing operations.
//!
//! An `Operation` is an atomic, replayable unit of canvas mutation. Applying
//! one never fails; it reports whether the back buffer is ready to be shown.

use crate::canvas::{Canvas, FillMode, Rect};
use crate::color::NamedColor;
use crate::config::{ColorScheme, Config};
use log::trace;

/// Full-canvas background fills the language can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackgroundColor {
    White,
    Green,
}

impl BackgroundColor {
    pub fn named(self) -> NamedColor {
        match self {
            BackgroundColor::White => NamedColor::White,
            BackgroundColor::Green => NamedColor::Green,
        }
    }
}

/// A single drawing action.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Fill the whole canvas with a background color.
    BackgroundColor(BackgroundColor),
    /// Opaque black rectangle in normalized `[0, 1]` coordinates.
    BackgroundRect { x1: f64, y1: f64, x2: f64, y2: f64 },
    /// Figure centered at a normalized coordinate.
    Figure { x: f64, y: f64 },
    /// Translation of tracked figures. Already folded into `Figure`
    /// positions by the parser, so applying it draws nothing.
    Move { dx: f64, dy: f64 },
    /// Paint the canvas black.
    Reset,
    /// The back buffer should become visible.
    FrameReady,
    /// Ordered composite; ready if any member is.
    Sequence(Vec<Operation>),
}

/// Pixel geometry and palette used when applying operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawStyle {
    /// Edge of the figure's bounding square, in pixels.
    pub figure_size: f64,
    /// Thickness of each figure bar, in pixels.
    pub bar_width: f64,
    pub colors: ColorScheme,
}

impl Default for DrawStyle {
    fn default() -> Self {
        DrawStyle::from(&Config::default())
    }
}

impl From<&Config> for DrawStyle {
    fn from(config: &Config) -> Self {
        let size = config.figure.size as f64;
        DrawStyle {
            figure_size: size,
            bar_width: size / config.figure.bar_divisor.max(1) as f64,
            colors: config.colors,
        }
    }
}

impl Operation {
    /// Applies the operation to `canvas`. Returns true if a frame is ready.
    pub fn apply(&self, canvas: &mut dyn Canvas, style: &DrawStyle) -> bool {
        match self {
            Operation::BackgroundColor(color) => {
                let rgba = style.colors.resolve(color.named());
                let bounds = canvas.bounds_rect();
                canvas.fill(bounds, rgba, FillMode::Src);
                false
            }
            Operation::BackgroundRect { x1, y1, x2, y2 } => {
                let (w, h) = canvas.bounds();
                let rect = px_rect(to_px(*x1, w), to_px(*y1, h), to_px(*x2, w), to_px(*y2, h));
                canvas.fill(rect, style.colors.black, FillMode::Src);
                false
            }
            Operation::Figure { x, y } => {
                let (w, h) = canvas.bounds();
                let (vertical, horizontal) = figure_bars(to_px(*x, w), to_px(*y, h), style);
                canvas.fill(vertical, style.colors.yellow, FillMode::Src);
                canvas.fill(horizontal, style.colors.yellow, FillMode::Src);
                false
            }
            Operation::Move { dx, dy } => {
                trace!("Move by ({}, {}) has no direct visual effect", dx, dy);
                false
            }
            Operation::Reset => {
                let bounds = canvas.bounds_rect();
                canvas.fill(bounds, style.colors.black, FillMode::Src);
                false
            }
            Operation::FrameReady => true,
            Operation::Sequence(ops) => {
                let mut ready = false;
                for op in ops {
                    ready |= op.apply(canvas, style);
                }
                ready
            }
        }
    }

    /// True if applying this operation would signal a frame, without drawing.
    pub fn signals_frame(&self) -> bool {
        match self {
            Operation::FrameReady => true,
            Operation::Sequence(ops) => ops.iter().any(Operation::signals_frame),
            _ => false,
        }
    }
}

/// Normalized coordinate to absolute pixels, truncating toward zero.
fn to_px(v: f64, extent: u32) -> f64 {
    (v * extent as f64).trunc()
}

/// Pixel rectangle from float corners. Corners beyond the `i32` range
/// saturate, so far off-canvas shapes collapse to an empty rectangle.
fn px_rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Rect {
    Rect::new(x0 as i32, y0 as i32, x1 as i32, y1 as i32)
}

/// The two yellow bars of a figure centered at pixel `(cx, cy)`.
///
/// The vertical bar hugs the left edge of the bounding square; the
/// horizontal bar spans its full width through the center.
pub fn figure_bars(cx: f64, cy: f64, style: &DrawStyle) -> (Rect, Rect) {
    let half = (style.figure_size / 2.0).trunc();
    let bar = style.bar_width.trunc();
    let half_bar = (style.bar_width / 2.0).trunc();

    let vertical = px_rect(cx - half, cy - half, cx - half + bar, cy + half);
    let horizontal = px_rect(cx - half, cy - half_bar, cx + half, cy + half_bar);
    (vertical, horizontal)
}
