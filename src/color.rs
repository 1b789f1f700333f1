// src/color.rs

//! Defines the editor's `Color` value and its packed 32-bit pixel encoding.
//!
//! Channels are kept as `f32` scalars in the nominal 0-255 range so that values
//! coming from the color dialog or the configuration file can be carried around
//! without conversion. Packing into a framebuffer word truncates each channel to
//! its low 8 bits.

use serde::{Deserialize, Serialize};

/// An RGBA color with channels in the nominal range 0-255.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::opaque(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::opaque(255.0, 255.0, 255.0);
    pub const RED: Color = Color::opaque(255.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 255.0 }
    }

    /// Returns the same color with its alpha channel replaced.
    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Packs the color as `a << 24 | r << 16 | g << 8 | b`.
    ///
    /// Each channel is cast to an integer and truncated to its low 8 bits, so
    /// out-of-range channels wrap around (256.0 packs as 0, -1.0 as 255) rather
    /// than saturating.
    pub fn encode(self) -> u32 {
        (channel_bits(self.a) << 24)
            | (channel_bits(self.r) << 16)
            | (channel_bits(self.g) << 8)
            | channel_bits(self.b)
    }

    /// Unpacks a word produced by [`Color::encode`].
    pub fn decode(word: u32) -> Self {
        Self {
            a: ((word >> 24) & 0xff) as f32,
            r: ((word >> 16) & 0xff) as f32,
            g: ((word >> 8) & 0xff) as f32,
            b: (word & 0xff) as f32,
        }
    }
}

#[inline]
fn channel_bits(channel: f32) -> u32 {
    (channel as i32 as u32) & 0xff
}

impl From<[f32; 4]> for Color {
    fn from([r, g, b, a]: [f32; 4]) -> Self {
        Color::rgba(r, g, b, a)
    }
}

impl From<Color> for [f32; 4] {
    fn from(color: Color) -> Self {
        [color.r, color.g, color.b, color.a]
    }
}
