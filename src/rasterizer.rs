// src/rasterizer.rs

//! Clipped fill primitives over a [`Framebuffer`].
//!
//! Everything the editor draws is an axis-aligned, opaque rectangle: the
//! background, the canvas frame, every canvas cell and the palette swatches.
//! Each primitive clips against the framebuffer (and optionally against a
//! caller-supplied bounding box) before touching memory, so callers may pass
//! rectangles that are partially or entirely off-surface. An empty clip result
//! is a no-op, never an error.
//!
//! Every fill returns the number of pixels it wrote, which the render pass
//! reports in its frame statistics.

use crate::color::Color;
use crate::framebuffer::{Framebuffer, BYTES_PER_PIXEL};
use log::trace;

/// Packed word written on the bottom row and right column of a bounded fill.
pub const GRID_LINE_COLOR: u32 = 0xff66_6666;

/// A rectangle in framebuffer pixel coordinates. May extend off-surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl PixelRect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn span(self) -> Span {
        Span {
            min_x: self.x as i64,
            max_x: self.x as i64 + self.width as i64,
            min_y: self.y as i64,
            max_y: self.y as i64 + self.height as i64,
        }
    }
}

/// Half-open clip bounds `[x0, x1) x [y0, y1)` in framebuffer pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClipBounds {
    pub x0: i32,
    pub x1: i32,
    pub y0: i32,
    pub y1: i32,
}

impl ClipBounds {
    pub const fn new(x0: i32, x1: i32, y0: i32, y1: i32) -> Self {
        Self { x0, x1, y0, y1 }
    }

    fn span(self) -> Span {
        Span {
            min_x: self.x0 as i64,
            max_x: self.x1 as i64,
            min_y: self.y0 as i64,
            max_y: self.y1 as i64,
        }
    }
}

// Widened to i64 so `x + width` cannot overflow for any i32 input.
#[derive(Debug, Clone, Copy)]
struct Span {
    min_x: i64,
    max_x: i64,
    min_y: i64,
    max_y: i64,
}

impl Span {
    fn surface(fb: &Framebuffer) -> Self {
        Span {
            min_x: 0,
            max_x: fb.width() as i64,
            min_y: 0,
            max_y: fb.height() as i64,
        }
    }

    fn intersect(self, other: Span) -> Span {
        let min_x = self.min_x.max(other.min_x);
        let min_y = self.min_y.max(other.min_y);
        Span {
            min_x,
            min_y,
            // A span that ends before it starts collapses to zero length.
            max_x: self.max_x.min(other.max_x).max(min_x),
            max_y: self.max_y.min(other.max_y).max(min_y),
        }
    }

    fn is_empty(self) -> bool {
        self.max_x <= self.min_x || self.max_y <= self.min_y
    }
}

/// Fills the whole surface with `color`.
pub fn clear(fb: &mut Framebuffer, color: Color) -> usize {
    let word = color.encode().to_le_bytes();
    for y in 0..fb.height() {
        for pixel in fb.row_mut(y).chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&word);
        }
    }
    fb.width() * fb.height()
}

/// Fills `rect`, clipped to the framebuffer, with `color`.
pub fn fill_rect(fb: &mut Framebuffer, rect: PixelRect, color: Color) -> usize {
    let clipped = rect.span().intersect(Span::surface(fb));
    fill_span(fb, clipped, color.encode(), None)
}

/// Fills `rect` clipped to both `bounds` and the framebuffer.
///
/// The bottom row and right column of the clipped rectangle are written with
/// [`GRID_LINE_COLOR`] instead of `color`; drawing adjacent cells this way
/// leaves a one pixel grid line between them.
pub fn fill_rect_bounded(
    fb: &mut Framebuffer,
    bounds: ClipBounds,
    rect: PixelRect,
    color: Color,
) -> usize {
    let bounds = bounds.span().intersect(Span::surface(fb));
    let clipped = rect.span().intersect(bounds);
    fill_span(fb, clipped, color.encode(), Some(GRID_LINE_COLOR))
}

fn fill_span(fb: &mut Framebuffer, span: Span, word: u32, border: Option<u32>) -> usize {
    if span.is_empty() {
        trace!("rasterizer: fill clipped to nothing");
        return 0;
    }

    // Non-empty and intersected with the surface, so all four are in range.
    let (min_x, max_x) = (span.min_x as usize, span.max_x as usize);
    let (min_y, max_y) = (span.min_y as usize, span.max_y as usize);
    let fill = word.to_le_bytes();

    for y in min_y..max_y {
        let row = &mut fb.row_mut(y)[min_x * BYTES_PER_PIXEL..max_x * BYTES_PER_PIXEL];
        match border {
            Some(border) if y == max_y - 1 => {
                let border = border.to_le_bytes();
                for pixel in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                    pixel.copy_from_slice(&border);
                }
            }
            Some(border) => {
                let (body, last) = row.split_at_mut(row.len() - BYTES_PER_PIXEL);
                for pixel in body.chunks_exact_mut(BYTES_PER_PIXEL) {
                    pixel.copy_from_slice(&fill);
                }
                last.copy_from_slice(&border.to_le_bytes());
            }
            None => {
                for pixel in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                    pixel.copy_from_slice(&fill);
                }
            }
        }
    }

    (max_x - min_x) * (max_y - min_y)
}
