//! Format-agnostic raw file abstractions.
//!
//! - [`RawParser`]: the interface every format parser implements
//! - [`ParserRegistry`]: key-to-parser lookup and per-file resolution

mod parser;
mod registry;

pub use parser::{ContainerInfo, ParsedRawFile, RawFileInfo, RawInspection, RawParser};
pub use registry::ParserRegistry;
