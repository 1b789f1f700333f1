// src/canvas.rs

//! The authoritative pixel grid being edited.
//!
//! A `Canvas` knows nothing about zoom, pan or screen coordinates; it is a
//! row-major grid of [`Color`] cells with checked accessors. Its storage comes
//! from the session's [`Platform`] so that allocation failure surfaces as an
//! [`EditorError::FatalAllocation`] instead of an abort.

use crate::color::Color;
use crate::error::{EditorError, Result};
use crate::platform::Platform;
use serde::{Deserialize, Serialize};

/// The grid resolutions the editor supports. Canvases are always square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub enum CanvasSize {
    S32,
    #[default]
    S64,
    S128,
    S256,
    S512,
    S1024,
}

impl CanvasSize {
    /// Every size, smallest first.
    pub const ALL: [CanvasSize; 6] = [
        CanvasSize::S32,
        CanvasSize::S64,
        CanvasSize::S128,
        CanvasSize::S256,
        CanvasSize::S512,
        CanvasSize::S1024,
    ];

    /// Cells per side.
    pub const fn side(self) -> usize {
        match self {
            CanvasSize::S32 => 32,
            CanvasSize::S64 => 64,
            CanvasSize::S128 => 128,
            CanvasSize::S256 => 256,
            CanvasSize::S512 => 512,
            CanvasSize::S1024 => 1024,
        }
    }

    pub fn from_side(side: usize) -> Option<Self> {
        Self::ALL.into_iter().find(|size| size.side() == side)
    }
}

impl TryFrom<usize> for CanvasSize {
    type Error = EditorError;

    fn try_from(side: usize) -> Result<Self> {
        CanvasSize::from_side(side).ok_or(EditorError::UnsupportedCanvasSize(side))
    }
}

impl From<CanvasSize> for usize {
    fn from(size: CanvasSize) -> usize {
        size.side()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    width: usize,
    height: usize,
    cells: Vec<Color>,
}

impl Canvas {
    /// Allocates a canvas through `platform`, every cell opaque black.
    pub fn allocate<P: Platform>(platform: &mut P, size: CanvasSize) -> Result<Self> {
        let side = size.side();
        let cells = platform.allocate("canvas", side * side, Color::BLACK)?;
        if cells.len() != side * side {
            let bytes = side * side * std::mem::size_of::<Color>();
            platform.free(cells);
            return Err(EditorError::FatalAllocation { what: "canvas", bytes });
        }
        Ok(Self {
            width: side,
            height: side,
            cells,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Writes `color` at `(x, y)`; returns `false` (and writes nothing) when
    /// the cell is outside the grid.
    pub fn set(&mut self, x: usize, y: usize, color: Color) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.cells[i] = color;
                true
            }
            None => false,
        }
    }

    /// Overwrites every cell with `color`.
    pub fn fill(&mut self, color: Color) {
        self.cells.fill(color);
    }

    /// All cells, row-major.
    pub fn cells(&self) -> &[Color] {
        &self.cells
    }

    /// Gives the backing storage back, for returning it to the allocator.
    pub fn into_cells(self) -> Vec<Color> {
        self.cells
    }

    fn index(&self, x: usize, y: usize) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }
}
