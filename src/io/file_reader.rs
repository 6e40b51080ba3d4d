use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use std::sync::Mutex;

use bytes::Bytes;

use super::range_reader::{check_range, RangeReader};
use crate::error::IoError;

/// Local-file implementation of RangeReader.
///
/// The file size is taken once on open; the file is assumed static for the
/// duration of a parse. Reads are serialized through a mutex because each one
/// is a seek followed by a read on the shared handle.
#[derive(Debug)]
pub struct FileReader {
    file: Mutex<File>,
    size: u64,
    identifier: String,
}

impl FileReader {
    /// Open `path` for positioned reads.
    ///
    /// Returns `IoError::Open` if the file cannot be opened or stat'ed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let path = path.as_ref();
        let open_error = |e: std::io::Error| IoError::Open {
            path: path.display().to_string(),
            message: e.to_string(),
        };

        let file = File::open(path).map_err(open_error)?;
        let size = file.metadata().map_err(open_error)?.len();

        Ok(Self {
            file: Mutex::new(file),
            size,
            identifier: path.display().to_string(),
        })
    }
}

impl RangeReader for FileReader {
    fn read_exact_at(&self, offset: u64, len: usize) -> Result<Bytes, IoError> {
        check_range(offset, len, self.size)?;

        if len == 0 {
            return Ok(Bytes::new());
        }

        let mut file = self
            .file
            .lock()
            .map_err(|_| IoError::Read(format!("{}: reader lock poisoned", self.identifier)))?;

        file.seek(SeekFrom::Start(offset))
            .map_err(|e| IoError::Read(e.to_string()))?;

        let mut buf = vec![0u8; len];
        file.read_exact(&mut buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => IoError::ShortRead {
                offset,
                requested: len as u64,
                size: self.size,
            },
            _ => IoError::Read(e.to_string()),
        })?;

        Ok(Bytes::from(buf))
    }

    fn size(&self) -> u64 {
        self.size
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
