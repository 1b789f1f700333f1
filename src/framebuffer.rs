// src/framebuffer.rs

//! The pixel surface the render pass writes into.
//!
//! A `Framebuffer` is owned by the presentation layer (the window, or the
//! headless driver) and lent to the editor for the duration of a frame. Pixels
//! are 32-bit words stored little-endian, so each pixel reads as B, G, R, A in
//! memory, the layout a top-down 32-bpp DIB expects.

/// Bytes per framebuffer pixel.
pub const BYTES_PER_PIXEL: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    pixels: Box<[u8]>,
    width: usize,
    height: usize,
    pitch: usize,
}

impl Framebuffer {
    /// Creates a zeroed, tightly packed framebuffer.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: vec![0u8; width * height * BYTES_PER_PIXEL].into_boxed_slice(),
            width,
            height,
            pitch: width * BYTES_PER_PIXEL,
        }
    }

    /// Creates a zeroed framebuffer whose rows are `pitch` bytes apart.
    ///
    /// Returns `None` if `pitch` cannot hold a full row of pixels.
    pub fn with_pitch(width: usize, height: usize, pitch: usize) -> Option<Self> {
        if pitch < width * BYTES_PER_PIXEL {
            return None;
        }
        Some(Self {
            pixels: vec![0u8; height * pitch].into_boxed_slice(),
            width,
            height,
            pitch,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pitch(&self) -> usize {
        self.pitch
    }

    pub fn bytes_per_pixel(&self) -> usize {
        BYTES_PER_PIXEL
    }

    /// Raw surface bytes, `height * pitch` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }

    /// Reads back the packed word at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = y * self.pitch + x * BYTES_PER_PIXEL;
        let bytes = &self.pixels[start..start + BYTES_PER_PIXEL];
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    /// The visible pixels of row `y`, without pitch padding.
    ///
    /// # Panics
    /// Panics if `y >= height`.
    pub(crate) fn row_mut(&mut self, y: usize) -> &mut [u8] {
        assert!(y < self.height, "row {} out of range (height {})", y, self.height);
        let start = y * self.pitch;
        &mut self.pixels[start..start + self.width * BYTES_PER_PIXEL]
    }

    pub(crate) fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.height, "row {} out of range (height {})", y, self.height);
        let start = y * self.pitch;
        &self.pixels[start..start + self.width * BYTES_PER_PIXEL]
    }
}
