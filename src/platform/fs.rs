// src/platform/fs.rs

use crate::platform::Platform;
use log::{debug, info};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Platform that writes files under a root directory on the local filesystem
/// and allocates from the process heap.
#[derive(Debug, Clone)]
pub struct FsPlatform {
    root: PathBuf,
}

impl FsPlatform {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Platform for FsPlatform {
    fn write_file(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        let path = self.root.join(name);
        debug!("FsPlatform: writing {} bytes to {}", data.len(), path.display());
        fs::create_dir_all(&self.root)?;
        fs::write(&path, data)?;
        info!("Wrote {}", path.display());
        Ok(())
    }
}
