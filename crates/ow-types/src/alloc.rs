//! Allocation seam for identifier buffers.
//!
//! Every identifier, chain copy, and transfer package is allocated through an
//! [`IdAllocator`] handed to the component that builds it. Production code
//! uses [`HeapAllocator`]; tests substitute allocators that fail on demand to
//! exercise out-of-memory paths.

use std::fmt;

use crate::error::{ShellError, ShellResult};

/// Allocates zero-filled byte buffers for identifiers.
pub trait IdAllocator: fmt::Debug + Send + Sync {
    /// Return a zero-filled buffer of exactly `len` bytes.
    fn allocate(&self, len: usize) -> ShellResult<Vec<u8>>;
}

/// Process heap allocator that reports exhaustion instead of aborting.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeapAllocator;

impl IdAllocator for HeapAllocator {
    fn allocate(&self, len: usize) -> ShellResult<Vec<u8>> {
        let mut buf = Vec::new();
        buf.try_reserve_exact(len)
            .map_err(|_| ShellError::OutOfMemory { requested: len })?;
        buf.resize(len, 0);
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heap_allocates_exact_zeroed() {
        let buf = HeapAllocator.allocate(16).unwrap();
        assert_eq!(buf.len(), 16);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn heap_reports_exhaustion() {
        let err = HeapAllocator.allocate(usize::MAX).unwrap_err();
        assert_eq!(
            err,
            ShellError::OutOfMemory {
                requested: usize::MAX
            }
        );
    }
}
