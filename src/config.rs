// src/config.rs

//! Defines the configuration structures for the pixel editor.
//!
//! Every section derives `Deserialize` with `#[serde(default)]`, so a config
//! file only needs to name the values it changes. The defaults reproduce the
//! editor's stock layout: a 700x700 editing area at (80, 10), a 64x64 picker
//! button under it and two rows of custom swatches to its right.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::canvas::CanvasSize;
use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::geometry::Vec2;
use log::info;
use once_cell::sync::Lazy;

/// Default configuration, used wherever no file was loaded.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::default);

// --- Top-Level Configuration Structure ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Editing area placement and zoom behavior.
    pub layout: LayoutConfig,
    /// Color picker, quick-switch and custom swatch placement.
    pub palette: PaletteConfig,
    /// Colors of the editor chrome.
    pub colors: ColorScheme,
    /// Export settings.
    pub export: ExportConfig,
}

impl Config {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = serde_json::from_str(&text).map_err(|source| EditorError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }
}

// --- Layout Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Top-left corner of the editing area, in screen pixels.
    pub viewport_offset: Vec2,
    /// Size of the editing area, in screen pixels.
    pub viewport_size: Vec2,
    /// Smallest zoom a freshly sized canvas may get.
    pub zoom_floor: f32,
    /// Zoom change per scroll notch.
    pub zoom_step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            viewport_offset: Vec2::new(80.0, 10.0),
            viewport_size: Vec2::new(700.0, 700.0),
            zoom_floor: 5.0,
            zoom_step: 5.0,
        }
    }
}

// --- Palette Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaletteConfig {
    /// Vertical gap between the editing area and the picker button.
    pub picker_gap: f32,
    pub picker_size: Vec2,
    /// The quick-switch swatch sits this far up and left of the picker.
    pub quick_switch_inset: f32,
    pub swatch_size: Vec2,
    /// Space between neighbouring swatches.
    pub swatch_spacing: f32,
    /// Horizontal gap between the picker and the first swatch column.
    pub swatch_gap: f32,
    pub swatches_per_row: usize,
    /// Initial active color.
    pub picker_color: Color,
    pub quick_switch_color: Color,
    pub swatch_color: Color,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        PaletteConfig {
            picker_gap: 10.0,
            picker_size: Vec2::new(64.0, 64.0),
            quick_switch_inset: 4.0,
            swatch_size: Vec2::new(30.0, 30.0),
            swatch_spacing: 4.0,
            swatch_gap: 10.0,
            swatches_per_row: 8,
            picker_color: Color::RED,
            quick_switch_color: Color::WHITE,
            swatch_color: Color::BLACK,
        }
    }
}

// --- Color Scheme ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorScheme {
    /// Fill behind everything.
    pub background: Color,
    /// One pixel frame around the editing area.
    pub frame: Color,
    /// Editing area fill, visible where the canvas does not reach.
    pub viewport: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        ColorScheme {
            background: Color::opaque(17.0, 17.0, 17.0),
            frame: Color::rgba(221.0, 221.0, 221.0, 221.0),
            viewport: Color::BLACK,
        }
    }
}

// --- Export Configuration ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// File name handed to the platform on save.
    pub filename: String,
    /// Canvas size allocated on the first frame.
    pub default_canvas_size: CanvasSize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        ExportConfig {
            filename: "Bitmap.bmp".to_string(),
            default_canvas_size: CanvasSize::S64,
        }
    }
}
