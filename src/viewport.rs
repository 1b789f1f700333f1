// src/viewport.rs

//! The screen-space window onto the canvas.
//!
//! A `Viewport` owns the transform between screen pixels and canvas cells:
//! a fixed screen rectangle, a zoom factor (screen pixels per cell side) and
//! a pan offset measured in cells. The pan offset is kept inside
//! `[-(canvas_cells - viewport_extent / zoom), 0]` on both axes after every
//! mutation, which keeps the canvas pinned against the viewport edges. When
//! the whole canvas fits, that range collapses to exactly zero.

use crate::config::LayoutConfig;
use crate::geometry::{ScreenRect, Vec2};
use crate::rasterizer::{ClipBounds, PixelRect};
use log::debug;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    rect: ScreenRect,
    zoom: f32,
    min_zoom: f32,
    zoom_floor: f32,
    zoom_step: f32,
    pan: Vec2,
    canvas_width: usize,
    canvas_height: usize,
}

impl Viewport {
    /// Creates a viewport fitted to a `canvas_width` x `canvas_height` grid.
    pub fn new(layout: &LayoutConfig, canvas_width: usize, canvas_height: usize) -> Self {
        let mut viewport = Self {
            rect: ScreenRect::new(layout.viewport_offset, layout.viewport_size),
            zoom: layout.zoom_floor,
            min_zoom: layout.zoom_floor,
            zoom_floor: layout.zoom_floor,
            zoom_step: layout.zoom_step,
            pan: Vec2::ZERO,
            canvas_width,
            canvas_height,
        };
        viewport.resize_canvas(canvas_width, canvas_height);
        viewport
    }

    pub fn rect(&self) -> ScreenRect {
        self.rect
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    /// Pan offset in cells; both components are always `<= 0`.
    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    pub fn canvas_dimensions(&self) -> (usize, usize) {
        (self.canvas_width, self.canvas_height)
    }

    /// Inclusive hit test against the viewport rectangle.
    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    /// Maps a pointer position to the cell drawn under it, or `None` when the
    /// pointer is not over the canvas.
    ///
    /// The pointer is first truncated to its pixel, then located between the
    /// same rounded-up edges [`Viewport::cell_rect`] draws, so every pixel of
    /// a cell, grid line included, maps back to that cell.
    pub fn screen_to_grid(&self, point: Vec2) -> Option<(usize, usize)> {
        let gx = self.locate(point.x, self.rect.position.x, self.pan.x, self.canvas_width)?;
        let gy = self.locate(point.y, self.rect.position.y, self.pan.y, self.canvas_height)?;
        Some((gx, gy))
    }

    /// Screen position of the top-left corner of cell `(gx, gy)`.
    pub fn grid_to_screen(&self, gx: usize, gy: usize) -> Vec2 {
        Vec2::new(
            edge(self.rect.position.x, self.pan.x, self.zoom, gx as f32),
            edge(self.rect.position.y, self.pan.y, self.zoom, gy as f32),
        )
    }

    /// The pixel rectangle cell `(gx, gy)` covers. Edges are rounded up so
    /// adjacent cells tile without gaps or overlap at fractional zoom levels.
    pub fn cell_rect(&self, gx: usize, gy: usize) -> PixelRect {
        let top_left = self.grid_to_screen(gx, gy);
        let bottom_right = self.grid_to_screen(gx + 1, gy + 1);
        let (x0, y0) = (top_left.x.ceil() as i32, top_left.y.ceil() as i32);
        let (x1, y1) = (bottom_right.x.ceil() as i32, bottom_right.y.ceil() as i32);
        PixelRect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }

    /// One axis of `screen_to_grid`. The division gives an estimate that
    /// float rounding can leave one cell off; stepping against the drawn
    /// pixel edges settles it.
    fn locate(&self, coordinate: f32, origin: f32, pan: f32, cells: usize) -> Option<usize> {
        let pixel = coordinate.floor();
        if !pixel.is_finite() {
            return None;
        }
        let estimate = ((pixel - origin) / self.zoom - pan).floor();
        if estimate < -1.0 || estimate > cells as f32 {
            return None;
        }

        let pixel = pixel as i64;
        let cells = cells as i64;
        let pixel_edge = |g: i64| edge(origin, pan, self.zoom, g as f32).ceil() as i64;
        let mut g = estimate as i64;
        while g >= 0 && pixel_edge(g) > pixel {
            g -= 1;
        }
        while g < cells && pixel_edge(g + 1) <= pixel {
            g += 1;
        }
        (0..cells).contains(&g).then_some(g as usize)
    }

    /// The viewport rectangle as half-open pixel bounds for clipped fills.
    pub fn clip_bounds(&self) -> ClipBounds {
        let origin = self.rect.position;
        let end = self.rect.position + self.rect.size;
        ClipBounds::new(origin.x as i32, end.x as i32, origin.y as i32, end.y as i32)
    }

    /// Cell index ranges that can intersect the viewport rectangle.
    pub fn visible_cells(&self) -> (Range<usize>, Range<usize>) {
        let columns = visible_range(self.pan.x, self.rect.size.x / self.zoom, self.canvas_width);
        let rows = visible_range(self.pan.y, self.rect.size.y / self.zoom, self.canvas_height);
        (columns, rows)
    }

    /// Moves the canvas by a screen-space delta, then re-clamps.
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan.x += delta.x / self.zoom;
        self.pan.y += delta.y / self.zoom;
        self.clamp_pan();
    }

    /// Pulls the pan offset back into its valid range. Idempotent.
    pub fn clamp_pan(&mut self) {
        self.pan.x = clamp_axis(self.pan.x, self.canvas_width, self.rect.size.x, self.zoom);
        self.pan.y = clamp_axis(self.pan.y, self.canvas_height, self.rect.size.y, self.zoom);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom + self.zoom_step).trunc();
        self.clamp_pan();
        debug!("Viewport: zoom in to {}", self.zoom);
    }

    /// Zooms out one step. Reaching the minimum zoom recenters the canvas.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom - self.zoom_step).trunc();
        if self.zoom <= self.min_zoom {
            self.zoom = self.min_zoom;
            self.pan = Vec2::ZERO;
        }
        self.clamp_pan();
        debug!("Viewport: zoom out to {}", self.zoom);
    }

    /// Fits the zoom to a new canvas size: the canvas width fills the
    /// viewport width unless that would put the zoom below the floor.
    pub fn resize_canvas(&mut self, canvas_width: usize, canvas_height: usize) {
        self.canvas_width = canvas_width;
        self.canvas_height = canvas_height;
        self.zoom = (self.rect.size.x / canvas_width as f32).max(self.zoom_floor);
        self.min_zoom = self.zoom;
        self.pan = Vec2::ZERO;
        self.clamp_pan();
        debug!(
            "Viewport: canvas {}x{}, zoom {} (min {})",
            canvas_width, canvas_height, self.zoom, self.min_zoom
        );
    }
}

/// Screen coordinate of the leading edge of cell `g` on one axis.
fn edge(origin: f32, pan: f32, zoom: f32, g: f32) -> f32 {
    origin + (g + pan) * zoom
}

fn clamp_axis(pan: f32, canvas_cells: usize, viewport_extent: f32, zoom: f32) -> f32 {
    let lower = (-(canvas_cells as f32 - viewport_extent / zoom)).min(0.0);
    pan.max(lower).min(0.0)
}

fn visible_range(pan: f32, visible_cells: f32, canvas_cells: usize) -> Range<usize> {
    let first = (-pan).floor().max(0.0) as usize;
    let last = ((visible_cells - pan).ceil().max(0.0) as usize).saturating_add(1);
    first.min(canvas_cells)..last.min(canvas_cells)
}
