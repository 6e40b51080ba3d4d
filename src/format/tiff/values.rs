//! TIFF tag value reading.
//!
//! Raw formats only ever dereference three kinds of out-of-line values: a
//! RATIONAL (two LONGs), an ASCII string of `count` bytes, and a single LONG
//! used as a pointer to a nested directory. [`ValueReader`] reads each of
//! them at an absolute offset, respecting the file's byte order.

use crate::error::TiffError;
use crate::io::RangeReader;

use super::ifd::Ifd;
use super::parser::{array, to_ascii, to_uint, ByteOrder};

// =============================================================================
// Rational
// =============================================================================

/// How a rational's ratio is computed from its numerator and denominator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RatioMode {
    /// Integer division, truncated, then widened (`300/7` gives `42.0`)
    #[default]
    Truncating,

    /// Floating-point division (`300/7` gives `42.857...`)
    Exact,
}

/// A TIFF RATIONAL value with its computed ratio.
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct Rational {
    pub numerator: u32,
    pub denominator: u32,

    /// `numerator / denominator` per the [`RatioMode`]; `0.0` when the
    /// denominator is zero
    pub ratio: f64,
}

impl Rational {
    pub fn new(numerator: u32, denominator: u32, mode: RatioMode) -> Self {
        let ratio = if denominator == 0 {
            0.0
        } else {
            match mode {
                RatioMode::Truncating => (numerator / denominator) as f64,
                RatioMode::Exact => numerator as f64 / denominator as f64,
            }
        };

        Rational {
            numerator,
            denominator,
            ratio,
        }
    }
}

// =============================================================================
// ValueReader
// =============================================================================

/// Reads tag values from a raw file.
///
/// Combines a RangeReader with the host and file byte orders so that callers
/// only deal in absolute offsets.
pub struct ValueReader<'a, R: RangeReader + ?Sized> {
    reader: &'a R,
    host: ByteOrder,
    file: ByteOrder,
}

impl<'a, R: RangeReader + ?Sized> ValueReader<'a, R> {
    /// Create a new ValueReader.
    pub fn new(reader: &'a R, host: ByteOrder, file: ByteOrder) -> Self {
        Self { reader, host, file }
    }

    /// Identifier of the underlying reader, for logging.
    pub fn identifier(&self) -> &str {
        self.reader.identifier()
    }

    /// Decode the IFD at `offset`.
    pub fn read_ifd(&self, offset: u64) -> Result<Ifd, TiffError> {
        Ifd::read(self.reader, self.host, self.file, offset)
    }

    /// Read a single LONG at `offset`.
    pub fn read_u32_at(&self, offset: u64) -> Result<u32, TiffError> {
        let bytes = self.reader.read_exact_at(offset, 4)?;
        Ok(to_uint(self.host, self.file, array(&bytes)))
    }

    /// Read a RATIONAL (numerator LONG, then denominator LONG) at `offset`.
    pub fn read_rational(&self, offset: u64, mode: RatioMode) -> Result<Rational, TiffError> {
        let bytes = self.reader.read_exact_at(offset, 8)?;
        let numerator = to_uint(self.host, self.file, array(&bytes[0..4]));
        let denominator = to_uint(self.host, self.file, array(&bytes[4..8]));
        Ok(Rational::new(numerator, denominator, mode))
    }

    /// Read `count` bytes at `offset` as an ASCII string.
    ///
    /// The terminating NUL, when present, is kept.
    pub fn read_ascii(&self, offset: u64, count: u32) -> Result<String, TiffError> {
        let bytes = self.reader.read_exact_at(offset, count as usize)?;
        Ok(to_ascii(&bytes))
    }
}
