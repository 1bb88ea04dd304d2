// src/canvas.rs

//! The drawing surface capability and its in-memory implementation.
//!
//! The pipeline only ever needs two things from a surface: fill a pixel
//! rectangle with a color, and report its size. Anything that can do that
//! (a window texture, a test mock, the `Framebuffer` below) can sit behind
//! the event loop.

use crate::color::Rgba;
use log::trace;

/// Rectangle in absolute pixel coordinates. `min` is inclusive, `max` exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Rect {
    /// Builds a rectangle from two corners, normalizing them so `x0 <= x1` and `y0 <= y1`.
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// The rectangle `[0, width) x [0, height)`.
    pub fn from_size(width: u32, height: u32) -> Self {
        let clamp = |v: u32| v.min(i32::MAX as u32) as i32;
        Self::new(0, 0, clamp(width), clamp(height))
    }

    pub fn width(&self) -> i32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> i32 {
        self.y1 - self.y0
    }

    pub fn is_empty(&self) -> bool {
        self.x0 >= self.x1 || self.y0 >= self.y1
    }

    /// Intersection of two rectangles; may be empty.
    pub fn intersect(&self, other: &Rect) -> Rect {
        Rect {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }
}

/// How a fill combines with the pixels already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillMode {
    /// Replace destination pixels.
    #[default]
    Src,
    /// Source-over alpha blend.
    Over,
}

/// A mutable rectangular pixel surface.
///
/// Fills outside `bounds()` are clipped, never an error.
pub trait Canvas {
    fn fill(&mut self, rect: Rect, color: Rgba, mode: FillMode);

    /// Size of the surface as `(width, height)` in pixels.
    fn bounds(&self) -> (u32, u32);

    fn bounds_rect(&self) -> Rect {
        let (w, h) = self.bounds();
        Rect::from_size(w, h)
    }
}

/// Source of fresh canvases of a given size.
///
/// The event loop asks for exactly two at startup.
pub trait CanvasFactory {
    type Canvas: Canvas + Send + 'static;

    fn new_canvas(&mut self, width: u32, height: u32) -> anyhow::Result<Self::Canvas>;
}

/// RGBA8 pixel buffer, row-major, 4 bytes per pixel.
#[derive(Clone, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Box<[u8]>,
}

impl std::fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Framebuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Framebuffer {
    /// Allocates a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize * 4;
        Self {
            width,
            height,
            pixels: vec![0u8; len].into_boxed_slice(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.offset(x, y);
        let px = &self.pixels[idx..idx + 4];
        Some(Rgba::from_bytes([px[0], px[1], px[2], px[3]]))
    }

    /// True if every pixel equals `color`.
    pub fn is_uniform(&self, color: Rgba) -> bool {
        let bytes = color.to_bytes();
        self.pixels.chunks_exact(4).all(|px| px == bytes)
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }
}

impl Canvas for Framebuffer {
    fn fill(&mut self, rect: Rect, color: Rgba, mode: FillMode) {
        let clipped = rect.intersect(&self.bounds_rect());
        if clipped.is_empty() {
            trace!("Framebuffer: fill {:?} clipped away", rect);
            return;
        }

        let stride = self.width as usize * 4;
        let row_start = clipped.x0 as usize * 4;
        let row_end = clipped.x1 as usize * 4;
        let src = color.to_bytes();

        for y in clipped.y0 as usize..clipped.y1 as usize {
            let row = &mut self.pixels[y * stride + row_start..y * stride + row_end];
            match mode {
                FillMode::Src => {
                    for px in row.chunks_exact_mut(4) {
                        px.copy_from_slice(&src);
                    }
                }
                FillMode::Over => {
                    for px in row.chunks_exact_mut(4) {
                        let dst = Rgba::from_bytes([px[0], px[1], px[2], px[3]]);
                        px.copy_from_slice(&color.over(dst).to_bytes());
                    }
                }
            }
        }
    }

    fn bounds(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Hands out in-memory framebuffers.
#[derive(Debug, Clone, Copy, Default)]
pub struct FramebufferFactory;

impl CanvasFactory for FramebufferFactory {
    type Canvas = Framebuffer;

    fn new_canvas(&mut self, width: u32, height: u32) -> anyhow::Result<Framebuffer> {
        if width == 0 || height == 0 {
            anyhow::bail!("canvas size must be non-zero, got {}x{}", width, height);
        }
        Ok(Framebuffer::new(width, height))
    }
}
