//! raw-preview - Extract embedded JPEG previews from camera raw files.
//!
//! This binary parses the command line, configures logging and runs either
//! the batch extractor or the single-file inspector.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use raw_preview::{
    config::{Cli, Command, ExtractConfig, InspectConfig, OutputFormat},
    extract::{result_to_json, ExtractionResult, ExtractionService},
    format::RawFormat,
    io::FileReader,
    raw::{ParserRegistry, RawInspection},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Extract(config) => run_extract(config).await,
        Command::Inspect(config) => run_inspect(config),
    }
}

// =============================================================================
// Extract Command
// =============================================================================

async fn run_extract(config: ExtractConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    if let Err(e) = fs::create_dir_all(&config.dest) {
        error!(
            "Unable to create destination '{}': {}",
            config.dest.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let files = collect_files(&config.paths);
    if files.is_empty() {
        warn!("No raw files found in the given paths");
        return ExitCode::FAILURE;
    }

    let codec = config.codec.build();
    let service = ExtractionService::new(
        Arc::new(ParserRegistry::with_defaults()),
        codec.clone(),
        config.parse.parse_options(),
        config.effective_jobs(),
    );

    info!(
        "Processing {} file(s) with {} worker(s), codec '{}', quality {}",
        files.len(),
        service.jobs(),
        codec.name(),
        config.quality
    );

    let results = service
        .process_all(files.clone(), &config.dest, config.quality)
        .await;

    let failed = results.iter().filter(|r| r.is_err()).count();
    print_results(&files, &results, config.format);

    info!(
        "Done: {} succeeded, {} failed",
        results.len() - failed,
        failed
    );

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Expand directories into the raw files they contain, keeping files as-is.
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Unable to read directory '{}': {}", path.display(), e);
                continue;
            }
        };

        let mut found: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && RawFormat::from_extension(p).is_some())
            .collect();
        found.sort();
        files.extend(found);
    }

    files
}

fn print_results(files: &[PathBuf], results: &[ExtractionResult], format: OutputFormat) {
    match format {
        OutputFormat::Text => {
            for (file, result) in files.iter().zip(results) {
                match result {
                    Ok(parsed) => {
                        let created = parsed
                            .created
                            .map(|c| c.format("%Y-%m-%d %H:%M").to_string())
                            .unwrap_or_else(|| "-".to_string());
                        println!(
                            "{} -> {} (created {}, rotation {:.4} rad)",
                            file.display(),
                            parsed.jpeg_path.display(),
                            created,
                            parsed.orientation_radians
                        );
                    }
                    Err(e) => println!("{} FAILED: {}", file.display(), e),
                }
            }
        }
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = files
                .iter()
                .zip(results)
                .map(|(file, result)| result_to_json(file, result))
                .collect();
            print_json(&entries);
        }
    }
}

// =============================================================================
// Inspect Command
// =============================================================================

fn run_inspect(config: InspectConfig) -> ExitCode {
    init_logging(config.verbose);

    let registry = ParserRegistry::with_defaults();
    let parser = match registry.resolve(&config.file) {
        Ok(parser) => parser,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let reader = match FileReader::open(&config.file) {
        Ok(reader) => reader,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let inspection = match parser.inspect(&reader, &config.parse.parse_options()) {
        Ok(inspection) => inspection,
        Err(e) => {
            error!("{}: {}", config.file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    match config.format {
        OutputFormat::Text => print_inspection(&config.file, &inspection),
        OutputFormat::Json => print_json(&inspection),
    }

    ExitCode::SUCCESS
}

fn print_inspection(file: &Path, inspection: &RawInspection) {
    let header = &inspection.header;
    let descriptor = &inspection.descriptor;

    println!("File:          {}", file.display());
    println!("Format:        {}", inspection.format);
    println!("Byte order:    {:?}", header.byte_order);
    println!("TIFF magic:    {}", header.tiff_magic);
    println!("Root IFD:      {}", header.root_ifd_offset);
    if let Some(container) = &inspection.container {
        println!(
            "Container:     {:?} v{}.{}",
            container.magic, container.major_version, container.minor_version
        );
    }
    println!(
        "JPEG:          offset {} length {}",
        descriptor.byte_offset, descriptor.byte_length
    );
    println!("Orientation:   {:.4} rad", descriptor.orientation_radians);
    println!(
        "Resolution:    {} x {}",
        descriptor.x_resolution.ratio, descriptor.y_resolution.ratio
    );
    match inspection.created {
        Some(created) => println!("Created:       {}", created.format("%Y-%m-%d %H:%M")),
        None => println!("Created:       -"),
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Unable to serialize output: {}", e),
    }
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "raw_preview=debug"
    } else {
        "raw_preview=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
