// src/renderer.rs

//! This module defines the `Renderer`.
//!
//! The `Renderer` translates the editor's state (canvas, viewport and palette)
//! into rasterizer fills on a borrowed [`Framebuffer`]. It redraws the whole
//! frame every time: the framebuffer may have been replaced or resized since
//! the last frame, so nothing from a previous frame is trusted.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::ColorScheme;
use crate::framebuffer::Framebuffer;
use crate::geometry::ScreenRect;
use crate::palette::Palette;
use crate::rasterizer::{self, PixelRect};
use crate::viewport::Viewport;

use log::trace;

/// Counts from one render pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Canvas cells submitted to the rasterizer after culling.
    pub cells_drawn: usize,
    /// Pixels written, chrome included.
    pub pixels_written: usize,
}

/// Draws one editor frame. Holds only the chrome colors.
#[derive(Debug, Clone)]
pub struct Renderer {
    colors: ColorScheme,
}

impl Renderer {
    pub fn new(colors: ColorScheme) -> Self {
        Self { colors }
    }

    /// Draws the full frame, back to front:
    /// 1. background clear,
    /// 2. one pixel frame around the editing area and the black editing area,
    /// 3. every visible canvas cell, clipped to the editing area, with grid lines,
    /// 4. the quick-switch swatch, the picker (in `active_color`) and the custom swatches.
    pub fn draw(
        &self,
        fb: &mut Framebuffer,
        canvas: &Canvas,
        viewport: &Viewport,
        palette: &Palette,
        active_color: Color,
    ) -> RenderStats {
        let mut stats = RenderStats {
            pixels_written: rasterizer::clear(fb, self.colors.background),
            ..RenderStats::default()
        };

        let area = viewport.rect();
        stats.pixels_written += fill_screen_rect(fb, area.inflate(1.0), self.colors.frame);
        stats.pixels_written += fill_screen_rect(fb, area, self.colors.viewport);

        self.draw_cells(fb, canvas, viewport, &mut stats);

        stats.pixels_written += fill_screen_rect(fb, palette.quick_switch.rect, palette.quick_switch.color);
        stats.pixels_written += fill_screen_rect(fb, palette.picker.rect, active_color);
        for swatch in &palette.custom {
            stats.pixels_written += fill_screen_rect(fb, swatch.rect, swatch.color);
        }

        trace!(
            "Renderer: {} cells, {} pixels at zoom {}",
            stats.cells_drawn,
            stats.pixels_written,
            viewport.zoom()
        );
        stats
    }

    fn draw_cells(&self, fb: &mut Framebuffer, canvas: &Canvas, viewport: &Viewport, stats: &mut RenderStats) {
        let bounds = viewport.clip_bounds();
        let (columns, rows) = viewport.visible_cells();
        for gy in rows {
            for gx in columns.clone() {
                let Some(color) = canvas.get(gx, gy) else {
                    continue;
                };
                let rect: PixelRect = viewport.cell_rect(gx, gy);
                stats.pixels_written += rasterizer::fill_rect_bounded(fb, bounds, rect, color);
                stats.cells_drawn += 1;
            }
        }
    }
}

fn fill_screen_rect(fb: &mut Framebuffer, rect: ScreenRect, color: Color) -> usize {
    rasterizer::fill_rect(fb, rect.to_pixels(), color)
}
