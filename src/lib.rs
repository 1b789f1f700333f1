// src/lib.rs

//! Core of a pixel-grid editor: a fixed-resolution canvas viewed through a
//! zoomable, pannable viewport, rendered into a caller-owned framebuffer and
//! exported as an uncompressed 32-bpp BMP.
//!
//! The host drives an [`session::EditorSession`] once per frame with an
//! [`input::InputSnapshot`]. Memory and file output go through the
//! [`platform::Platform`] trait.

pub mod bitmap;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod framebuffer;
pub mod geometry;
pub mod input;
pub mod palette;
pub mod platform;
pub mod rasterizer;
pub mod renderer;
pub mod replay;
pub mod session;
pub mod viewport;

pub use error::{EditorError, Result};
