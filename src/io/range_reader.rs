use bytes::Bytes;

use crate::error::IoError;

/// Trait for reading byte ranges from a raw file.
///
/// Every TIFF structure in a raw file is addressed by an absolute offset, so
/// the decoder only ever needs positioned, exact-length reads. Implementations
/// must reject a read that would run past the end of the resource before
/// allocating the buffer for it.
pub trait RangeReader: Send + Sync {
    /// Read exactly `len` bytes starting at `offset`.
    ///
    /// Returns `IoError::ShortRead` if fewer than `len` bytes are available.
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError>;

    /// Get the total size of the resource in bytes.
    fn size(&self) -> u64;

    /// Get an identifier for this resource (for logging).
    fn identifier(&self) -> &str;
}

/// Check that `len` bytes at `offset` fit inside a resource of `size` bytes.
#[inline]
pub fn check_range(offset: u64, len: usize, size: u64) -> Result<(), IoError> {
    let fits = offset
        .checked_add(len as u64)
        .map(|end| end <= size)
        .unwrap_or(false);

    if fits {
        Ok(())
    } else {
        Err(IoError::ShortRead {
            offset,
            requested: len as u64,
            size,
        })
    }
}

// =============================================================================
// In-memory reader
// =============================================================================

/// RangeReader over bytes already held in memory.
///
/// Useful when the caller has read the whole file up front, and in tests.
#[derive(Debug, Clone)]
pub struct MemoryReader {
    data: Bytes,
    identifier: String,
}

impl MemoryReader {
    /// Wrap `data` under the given identifier.
    pub fn new(data: impl Into<Bytes>, identifier: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            identifier: identifier.into(),
        }
    }
}

impl RangeReader for MemoryReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        check_range(offset, len, self.data.len() as u64)?;
        let start = offset as usize;
        Ok(self.data.slice(start..start + len))
    }

    fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
