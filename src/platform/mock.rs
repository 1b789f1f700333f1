// src/platform/mock.rs

use crate::error::{EditorError, Result};
use crate::platform::{heap_allocate, Platform};
use std::collections::BTreeMap;
use std::io;
use std::mem::size_of;

/// In-memory platform for tests: records written files, can refuse
/// allocations above a byte budget and can fail every write.
#[derive(Debug, Default)]
pub struct MockPlatform {
    files: BTreeMap<String, Vec<u8>>,
    allocation_limit: Option<usize>,
    fail_writes: bool,
    allocations: usize,
    frees: usize,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses any single allocation larger than `bytes`.
    pub fn with_allocation_limit(mut self, bytes: usize) -> Self {
        self.allocation_limit = Some(bytes);
        self
    }

    pub fn set_allocation_limit(&mut self, bytes: Option<usize>) {
        self.allocation_limit = bytes;
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    pub fn file(&self, name: &str) -> Option<&[u8]> {
        self.files.get(name).map(Vec::as_slice)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    pub fn allocations(&self) -> usize {
        self.allocations
    }

    pub fn frees(&self) -> usize {
        self.frees
    }
}

impl Platform for MockPlatform {
    fn allocate<T: Clone>(&mut self, what: &'static str, count: usize, fill: T) -> Result<Vec<T>> {
        let bytes = count.saturating_mul(size_of::<T>());
        if self.allocation_limit.is_some_and(|limit| bytes > limit) {
            return Err(EditorError::FatalAllocation { what, bytes });
        }
        self.allocations += 1;
        heap_allocate(what, count, fill)
    }

    fn free<T>(&mut self, buffer: Vec<T>) {
        self.frees += 1;
        drop(buffer);
    }

    fn write_file(&mut self, name: &str, data: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::other("mock write failure"));
        }
        self.files.insert(name.to_string(), data.to_vec());
        Ok(())
    }
}
