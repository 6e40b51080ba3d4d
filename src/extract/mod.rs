//! Extraction of embedded JPEGs.
//!
//! This module handles:
//! - Copying the JPEG byte range out of a raw file ([`extract_jpeg`])
//! - Naming the output ([`derive_output_path`])
//! - Writing it through a [`JpegCodec`]
//! - Running many files concurrently ([`ExtractionService`])

mod codec;
mod jpeg;
mod service;

pub use codec::{
    clamp_quality, is_valid_quality, ImageCodec, JpegCodec, PassthroughCodec,
    DEFAULT_JPEG_QUALITY, MAX_JPEG_QUALITY, MIN_JPEG_QUALITY,
};
pub use jpeg::{derive_output_path, extract_jpeg, DEFAULT_OUTPUT_SUFFIX};
pub use service::{result_to_json, ExtractionResult, ExtractionService};
