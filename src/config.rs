//! Configuration management for raw-preview.
//!
//! This module provides the command-line interface:
//! - Command-line arguments via clap
//! - Environment variables with `RAW_PREVIEW_` prefix
//! - Sensible defaults for all optional settings
//!
//! # Example
//!
//! ```ignore
//! use raw_preview::config::{Cli, Command};
//!
//! let cli = Cli::parse();
//! match cli.into_command() {
//!     Command::Extract(config) => println!("Writing to {}", config.dest.display()),
//!     Command::Inspect(config) => println!("Inspecting {}", config.file.display()),
//! }
//! ```
//!
//! # Environment Variables
//!
//! - `RAW_PREVIEW_DEST` - Output directory for extracted JPEGs
//! - `RAW_PREVIEW_QUALITY` - JPEG quality (default: 75)
//! - `RAW_PREVIEW_JOBS` - Files processed concurrently (default: CPU count)
//! - `RAW_PREVIEW_CODEC` - `image` or `passthrough` (default: image)
//! - `RAW_PREVIEW_STRICT_MAGIC` - Reject headers whose TIFF magic is not 42
//! - `RAW_PREVIEW_EXACT_RATIO` - Compute resolution ratios without truncation

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::extract::{ImageCodec, JpegCodec, PassthroughCodec, DEFAULT_JPEG_QUALITY};
use crate::format::tiff::RatioMode;
use crate::format::ParseOptions;

// =============================================================================
// CLI Arguments
// =============================================================================

/// raw-preview - Extract embedded JPEG previews from camera raw files.
///
/// Reads Canon CR2 and Nikon NEF files, writes the embedded JPEG next to a
/// destination directory and reports capture date and orientation.
#[derive(Parser, Debug, Clone)]
#[command(name = "raw-preview")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Extract embedded JPEGs from raw files or directories of raw files.
    Extract(ExtractConfig),

    /// Print the header and JPEG descriptor of one raw file.
    Inspect(InspectConfig),
}

/// Output format for command results.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One human-readable line per file
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
}

/// JPEG writing strategy.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecKind {
    /// Decode and re-encode at the requested quality
    #[default]
    Image,
    /// Write the embedded bytes unchanged
    Passthrough,
}

impl CodecKind {
    pub fn build(self) -> Arc<dyn JpegCodec> {
        match self {
            CodecKind::Image => Arc::new(ImageCodec::new()),
            CodecKind::Passthrough => Arc::new(PassthroughCodec),
        }
    }
}

/// Parse options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ParseArgs {
    /// Reject files whose TIFF magic is not 42.
    #[arg(long, default_value_t = false, env = "RAW_PREVIEW_STRICT_MAGIC")]
    pub strict_magic: bool,

    /// Compute resolution ratios with floating-point division.
    #[arg(long, default_value_t = false, env = "RAW_PREVIEW_EXACT_RATIO")]
    pub exact_ratio: bool,
}

impl ParseArgs {
    pub fn parse_options(&self) -> ParseOptions {
        let ratio_mode = if self.exact_ratio {
            RatioMode::Exact
        } else {
            RatioMode::Truncating
        };

        ParseOptions::default()
            .with_strict_magic(self.strict_magic)
            .with_ratio_mode(ratio_mode)
    }
}

// =============================================================================
// Extract Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct ExtractConfig {
    /// Raw files, or directories scanned for .cr2 / .nef files.
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Directory the extracted JPEGs are written to.
    #[arg(short, long, env = "RAW_PREVIEW_DEST")]
    pub dest: PathBuf,

    /// JPEG quality for re-encoding (1-100).
    #[arg(short, long, default_value_t = DEFAULT_JPEG_QUALITY, env = "RAW_PREVIEW_QUALITY")]
    pub quality: u8,

    /// Number of files processed concurrently.
    ///
    /// Defaults to the available parallelism.
    #[arg(short, long, env = "RAW_PREVIEW_JOBS")]
    pub jobs: Option<usize>,

    /// How the extracted JPEG is written.
    #[arg(long, value_enum, default_value_t = CodecKind::Image, env = "RAW_PREVIEW_CODEC")]
    pub codec: CodecKind,

    #[command(flatten)]
    pub parse: ParseArgs,

    /// Output format for results.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl ExtractConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.paths.is_empty() {
            return Err("At least one input path is required".to_string());
        }

        if self.dest.as_os_str().is_empty() {
            return Err(
                "Destination directory is required. Set --dest or RAW_PREVIEW_DEST".to_string(),
            );
        }

        if self.quality == 0 || self.quality > 100 {
            return Err("quality must be between 1 and 100".to_string());
        }

        if self.jobs == Some(0) {
            return Err("jobs must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Concurrency to use, falling back to the available parallelism.
    pub fn effective_jobs(&self) -> usize {
        self.jobs.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
        })
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

#[derive(Args, Debug, Clone)]
pub struct InspectConfig {
    /// Raw file to inspect.
    pub file: PathBuf,

    #[command(flatten)]
    pub parse: ParseArgs,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
