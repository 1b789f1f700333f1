// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    /// A buffer the editor cannot run without could not be obtained.
    #[error("failed to allocate {bytes} bytes for {what}")]
    FatalAllocation { what: &'static str, bytes: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration in {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unsupported canvas size {0} (expected 32, 64, 128, 256, 512 or 1024)")]
    UnsupportedCanvasSize(usize),
    #[error("invalid replay script: {0}")]
    Replay(String),
}

pub type Result<T, E = EditorError> = std::result::Result<T, E>;
