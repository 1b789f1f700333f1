// src/platform/mod.rs
//
// The capability set the editor core needs from its host: memory for the
// canvas and export buffers, and a way to write files.

use crate::error::{EditorError, Result};
use log::debug;
use std::mem::size_of;

pub mod fs;
pub mod mock;

pub use fs::FsPlatform;
pub use mock::MockPlatform;

/// Host services consumed by the editor session.
///
/// The session is generic over its platform and holds it for its whole
/// lifetime. `allocate` and `write_file` are fallible; `free` always
/// succeeds. The provided `allocate` reserves exactly `count` elements from
/// the heap and reports a failed reservation instead of aborting.
pub trait Platform {
    /// Returns a buffer of `count` copies of `fill`. `what` names the buffer
    /// in error messages.
    fn allocate<T: Clone>(&mut self, what: &'static str, count: usize, fill: T) -> Result<Vec<T>> {
        heap_allocate(what, count, fill)
    }

    /// Releases a buffer obtained from `allocate`.
    fn free<T>(&mut self, buffer: Vec<T>) {
        drop(buffer);
    }

    /// Writes `data` to the file `name`, replacing any previous contents.
    fn write_file(&mut self, name: &str, data: &[u8]) -> std::io::Result<()>;
}

/// Fallible heap allocation backing the default [`Platform::allocate`].
pub fn heap_allocate<T: Clone>(what: &'static str, count: usize, fill: T) -> Result<Vec<T>> {
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(count)
        .map_err(|_| EditorError::FatalAllocation {
            what,
            bytes: count.saturating_mul(size_of::<T>()),
        })?;
    buffer.resize(count, fill);
    debug!("Platform: allocated {} x {} bytes for {}", count, size_of::<T>(), what);
    Ok(buffer)
}
