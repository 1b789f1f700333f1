// src/palette.rs

//! Color controls drawn under the editing area: the picker button, the
//! quick-switch swatch peeking out behind it, and the custom swatches.

use crate::color::Color;
use crate::config::{LayoutConfig, PaletteConfig};
use crate::geometry::{ScreenRect, Vec2};

pub const CUSTOM_SWATCH_COUNT: usize = 16;

/// A screen rectangle with a color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swatch {
    pub rect: ScreenRect,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    /// Opens the color dialog. Drawn with the active color, so its own
    /// `color` is only the initial active color.
    pub picker: Swatch,
    pub quick_switch: Swatch,
    pub custom: [Swatch; CUSTOM_SWATCH_COUNT],
}

impl Palette {
    pub fn layout(layout: &LayoutConfig, config: &PaletteConfig) -> Self {
        let picker_position = Vec2::new(
            layout.viewport_offset.x,
            layout.viewport_offset.y + layout.viewport_size.y + config.picker_gap,
        );
        let picker = Swatch {
            rect: ScreenRect::new(picker_position, config.picker_size),
            color: config.picker_color,
        };
        let inset = Vec2::new(config.quick_switch_inset, config.quick_switch_inset);
        let quick_switch = Swatch {
            rect: ScreenRect::new(picker_position - inset, config.picker_size),
            color: config.quick_switch_color,
        };

        let per_row = config.swatches_per_row.max(1);
        let first_column = picker_position.x + config.picker_size.x + config.swatch_gap;
        let custom = std::array::from_fn(|i| {
            let column = (i % per_row) as f32;
            let row = (i / per_row) as f32;
            let position = Vec2::new(
                first_column + (config.swatch_size.x + config.swatch_spacing) * column,
                picker_position.y + (config.swatch_size.y + config.swatch_spacing) * row,
            );
            Swatch {
                rect: ScreenRect::new(position, config.swatch_size),
                color: config.swatch_color,
            }
        });

        Self {
            picker,
            quick_switch,
            custom,
        }
    }

    pub fn custom_colors(&self) -> [Color; CUSTOM_SWATCH_COUNT] {
        self.custom.map(|swatch| swatch.color)
    }

    pub fn set_custom_colors(&mut self, colors: [Color; CUSTOM_SWATCH_COUNT]) {
        for (swatch, color) in self.custom.iter_mut().zip(colors) {
            swatch.color = color;
        }
    }

    /// Color of the custom swatch under `point`. Swatch rects are inclusive,
    /// so on a shared edge the later swatch answers.
    pub fn custom_swatch_at(&self, point: Vec2) -> Option<Color> {
        self.custom
            .iter()
            .rev()
            .find(|swatch| swatch.rect.contains(point))
            .map(|swatch| swatch.color)
    }
}
