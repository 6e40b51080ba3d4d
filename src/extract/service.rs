//! Extraction service for processing many raw files concurrently.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      ExtractionService                        │
//! │  process_all(files)                                           │
//! │    for each file, in order:                                   │
//! │      1. acquire a permit        (Semaphore, `jobs` permits)   │
//! │      2. spawn_blocking:                                       │
//! │           resolve parser ─► parser.process_file(codec, opts)  │
//! │    await handles in input order                               │
//! │           │                     │                             │
//! │           ▼                     ▼                             │
//! │    ┌────────────────┐    ┌───────────┐                        │
//! │    │ ParserRegistry │    │ JpegCodec │                        │
//! │    └────────────────┘    └───────────┘                        │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each worker opens its own reader and receives its own copy of the
//! options; nothing mutable is shared between files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::ExtractError;
use crate::format::ParseOptions;
use crate::raw::{ParsedRawFile, ParserRegistry, RawFileInfo};

use super::codec::{is_valid_quality, JpegCodec, DEFAULT_JPEG_QUALITY};
use super::jpeg::{derive_output_path, DEFAULT_OUTPUT_SUFFIX};

/// Per-file result of a batch run.
pub type ExtractionResult = Result<ParsedRawFile, ExtractError>;

/// JSON report entry for one input: `{"source", "result"}` on success,
/// `{"source", "error"}` on failure.
pub fn result_to_json(source: &Path, result: &ExtractionResult) -> serde_json::Value {
    match result {
        Ok(parsed) => serde_json::json!({
            "source": source,
            "result": parsed,
        }),
        Err(e) => serde_json::json!({
            "source": source,
            "error": e.to_string(),
        }),
    }
}

/// Service that extracts embedded JPEGs from many files at once.
#[derive(Clone)]
pub struct ExtractionService {
    registry: Arc<ParserRegistry>,
    codec: Arc<dyn JpegCodec>,
    options: ParseOptions,
    jobs: usize,
}

impl ExtractionService {
    /// Create a service running up to `jobs` files at once.
    ///
    /// A `jobs` of zero is treated as one.
    pub fn new(
        registry: Arc<ParserRegistry>,
        codec: Arc<dyn JpegCodec>,
        options: ParseOptions,
        jobs: usize,
    ) -> Self {
        Self {
            registry,
            codec,
            options,
            jobs: jobs.max(1),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    pub fn registry(&self) -> &ParserRegistry {
        &self.registry
    }

    /// Process a single file on the current thread.
    ///
    /// # Errors
    /// - `UnsupportedFormat` if no registered parser handles the file
    /// - anything [`RawParser::process_file`](crate::raw::RawParser::process_file)
    ///   returns
    pub fn process_one(&self, info: &RawFileInfo) -> ExtractionResult {
        let parser = self.registry.resolve(&info.file)?;
        debug!(path = %info.file.display(), format = parser.key(), "Processing file");
        parser.process_file(info, self.codec.as_ref(), &self.options)
    }

    /// Process every file, returning one result per input in input order.
    ///
    /// A failing file does not stop the others. Quality outside 1-100 falls
    /// back to the default. When two inputs share a file name, only the first
    /// is extracted; the later ones fail with `OutputCollision`.
    pub async fn process_all(
        &self,
        files: Vec<PathBuf>,
        dest_dir: &Path,
        quality: u8,
    ) -> Vec<ExtractionResult> {
        let quality = if is_valid_quality(quality) {
            quality
        } else {
            warn!(quality, "Invalid JPEG quality, using default");
            DEFAULT_JPEG_QUALITY
        };

        let semaphore = Arc::new(Semaphore::new(self.jobs));
        let mut handles = Vec::with_capacity(files.len());
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::with_capacity(files.len());

        for file in files {
            let output = derive_output_path(&file, dest_dir, DEFAULT_OUTPUT_SUFFIX);
            if let Some(first) = claimed.get(&output) {
                handles.push(Err(ExtractError::OutputCollision {
                    output: output.display().to_string(),
                    first: first.display().to_string(),
                }));
                continue;
            }
            claimed.insert(output, file.clone());

            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    handles.push(Err(ExtractError::Worker(e.to_string())));
                    continue;
                }
            };

            let service = self.clone();
            let info = RawFileInfo::new(file, dest_dir, quality);

            handles.push(Ok(tokio::task::spawn_blocking(move || {
                let _permit = permit;
                service.process_one(&info)
            })));
        }

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            let result = match handle {
                Ok(join) => match join.await {
                    Ok(result) => result,
                    Err(e) => Err(ExtractError::Worker(e.to_string())),
                },
                Err(e) => Err(e),
            };

            if let Err(e) = &result {
                warn!(error = %e, "File failed");
            }
            results.push(result);
        }

        results
    }
}
