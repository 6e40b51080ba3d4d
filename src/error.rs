use thiserror::Error;

/// I/O errors that can occur when reading a raw file or writing its preview
#[derive(Debug, Clone, Error)]
pub enum IoError {
    /// Fewer bytes are available than were requested at an offset
    #[error("Short read: requested {requested} bytes at offset {offset}, size is {size}")]
    ShortRead {
        offset: u64,
        requested: u64,
        size: u64,
    },

    /// The source file could not be opened
    #[error("Unable to open '{path}': {message}")]
    Open { path: String, message: String },

    /// The underlying read failed
    #[error("Read error: {0}")]
    Read(String),

    /// The output file could not be written
    #[error("Unable to write '{path}': {message}")]
    Write { path: String, message: String },
}

/// Errors that can occur when decoding TIFF headers and directories
#[derive(Debug, Clone, Error)]
pub enum TiffError {
    /// I/O error while reading the file
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// TIFF magic is not 42 (only raised in strict mode)
    #[error("Invalid TIFF magic: expected 42, got {0}")]
    InvalidMagic(u16),
}

/// Errors produced while parsing an EXIF date/time string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateTimeError {
    /// The string does not split into the expected date and time tokens
    #[error("Invalid date/time string: '{0}'")]
    InvalidFormat(String),

    /// The month token is not one of "01" through "12"
    #[error("Invalid month: '{0}'")]
    InvalidMonth(String),

    /// The reassembled timestamp failed to parse
    #[error("Unable to parse timestamp '{0}'")]
    Parse(String),
}

/// Errors that abort processing of a single raw file
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// I/O error while reading or writing
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// Header or directory decoding failed
    #[error("TIFF error: {0}")]
    Tiff(#[from] TiffError),

    /// Tag interpretation did not produce a usable JPEG length
    #[error("No embedded JPEG: byte length is {length}")]
    MissingJpeg { length: u64 },

    /// The codec failed to decode or re-encode the JPEG
    #[error("Codec error: {message}")]
    Codec { message: String },

    /// An earlier input in the same batch already writes this output
    #[error("Output '{output}' is already claimed by '{first}'")]
    OutputCollision { output: String, first: String },

    /// No parser is registered for the file
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A batch worker terminated abnormally
    #[error("Worker failed: {0}")]
    Worker(String),
}
