// src/bitmap.rs

//! Uncompressed 32-bpp BMP encoding.
//!
//! The layout is a 14-byte file header followed by a 40-byte
//! `BITMAPINFOHEADER`, then one little-endian packed word per pixel. Height is
//! stored negative so rows run top to bottom in the same order as the canvas.
//! Alpha is always written as 255.

use crate::canvas::Canvas;
use crate::color::Color;
use crate::framebuffer::{Framebuffer, BYTES_PER_PIXEL};

/// Size of the file header plus the info header.
pub const HEADER_LEN: usize = 54;

const FILE_TYPE: u16 = 0x4D42;
const INFO_HEADER_LEN: u32 = 40;
const BI_RGB: u32 = 0;
const ALPHA_MASK: u32 = 0xff00_0000;

/// The fields of a 32-bpp BMP header that this codec reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitmapHeader {
    pub file_size: u32,
    pub pixel_offset: u32,
    pub width: i32,
    /// Negative for top-down images.
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: u32,
    pub image_size: u32,
}

impl BitmapHeader {
    /// Header for a top-down `width` x `height` image.
    pub fn top_down(width: usize, height: usize) -> Self {
        let image_size = width * height * BYTES_PER_PIXEL;
        Self {
            file_size: (HEADER_LEN + image_size) as u32,
            pixel_offset: HEADER_LEN as u32,
            width: width as i32,
            height: -(height as i32),
            planes: 1,
            bits_per_pixel: 32,
            compression: BI_RGB,
            image_size: image_size as u32,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut out = [0u8; HEADER_LEN];
        out[0..2].copy_from_slice(&FILE_TYPE.to_le_bytes());
        out[2..6].copy_from_slice(&self.file_size.to_le_bytes());
        // 6..10: two reserved u16, zero.
        out[10..14].copy_from_slice(&self.pixel_offset.to_le_bytes());
        out[14..18].copy_from_slice(&INFO_HEADER_LEN.to_le_bytes());
        out[18..22].copy_from_slice(&self.width.to_le_bytes());
        out[22..26].copy_from_slice(&self.height.to_le_bytes());
        out[26..28].copy_from_slice(&self.planes.to_le_bytes());
        out[28..30].copy_from_slice(&self.bits_per_pixel.to_le_bytes());
        out[30..34].copy_from_slice(&self.compression.to_le_bytes());
        out[34..38].copy_from_slice(&self.image_size.to_le_bytes());
        // 38..54: resolution and palette counts, zero.
        out
    }

    /// Reads the header at the start of `bytes`.
    ///
    /// Returns `None` if the stream is shorter than a header or does not start
    /// with the `BM` signature.
    pub fn parse(bytes: &[u8]) -> Option<Self> {
        let header = bytes.get(..HEADER_LEN)?;
        let u16_at = |at: usize| u16::from_le_bytes([header[at], header[at + 1]]);
        let u32_at = |at: usize| {
            u32::from_le_bytes([header[at], header[at + 1], header[at + 2], header[at + 3]])
        };

        if u16_at(0) != FILE_TYPE {
            return None;
        }
        Some(Self {
            file_size: u32_at(2),
            pixel_offset: u32_at(10),
            width: u32_at(18) as i32,
            height: u32_at(22) as i32,
            planes: u16_at(26),
            bits_per_pixel: u16_at(28),
            compression: u32_at(30),
            image_size: u32_at(34),
        })
    }
}

/// Byte length of an encoded `width` x `height` image.
pub fn encoded_len(width: usize, height: usize) -> usize {
    HEADER_LEN + width * height * BYTES_PER_PIXEL
}

/// Encodes `canvas` into the front of `out` and returns the bytes written.
///
/// # Panics
/// Panics if `out` is shorter than [`encoded_len`] for the canvas.
pub fn encode_canvas_into(canvas: &Canvas, out: &mut [u8]) -> usize {
    let len = encoded_len(canvas.width(), canvas.height());
    assert!(out.len() >= len, "bitmap buffer too small: {} < {}", out.len(), len);

    let header = BitmapHeader::top_down(canvas.width(), canvas.height());
    out[..HEADER_LEN].copy_from_slice(&header.to_bytes());
    for (dest, color) in out[HEADER_LEN..len]
        .chunks_exact_mut(BYTES_PER_PIXEL)
        .zip(canvas.cells())
    {
        dest.copy_from_slice(&pixel_word(*color).to_le_bytes());
    }
    len
}

pub fn encode_canvas(canvas: &Canvas) -> Vec<u8> {
    let mut out = vec![0u8; encoded_len(canvas.width(), canvas.height())];
    encode_canvas_into(canvas, &mut out);
    out
}

/// Encodes the visible pixels of `fb`, dropping any pitch padding.
pub fn encode_framebuffer(fb: &Framebuffer) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoded_len(fb.width(), fb.height()));
    out.extend_from_slice(&BitmapHeader::top_down(fb.width(), fb.height()).to_bytes());
    for y in 0..fb.height() {
        for pixel in fb.row(y).chunks_exact(BYTES_PER_PIXEL) {
            let word = u32::from_le_bytes([pixel[0], pixel[1], pixel[2], pixel[3]]);
            out.extend_from_slice(&(word | ALPHA_MASK).to_le_bytes());
        }
    }
    out
}

fn pixel_word(color: Color) -> u32 {
    color.encode() | ALPHA_MASK
}
