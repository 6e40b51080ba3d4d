//! Parser registry.
//!
//! Maps registry keys (`"CR2"`, `"NEF"`) to shared parser instances, and
//! resolves the parser for a file on disk. Keys are case-insensitive.
//!
//! # Example
//!
//! ```ignore
//! use raw_preview::raw::ParserRegistry;
//!
//! let registry = ParserRegistry::with_defaults();
//! let parser = registry.get("cr2").expect("CR2 is registered by default");
//! assert_eq!(parser.key(), "CR2");
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tracing::debug;

use crate::error::ExtractError;
use crate::format::{detect_format, Cr2Parser, NefParser};
use crate::io::FileReader;

use super::parser::RawParser;

/// Registry of raw parsers keyed by format.
#[derive(Clone, Default)]
pub struct ParserRegistry {
    parsers: HashMap<String, Arc<dyn RawParser>>,
}

impl std::fmt::Debug for ParserRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut keys: Vec<&String> = self.parsers.keys().collect();
        keys.sort();
        f.debug_struct("ParserRegistry").field("keys", &keys).finish()
    }
}

impl ParserRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the CR2 and NEF parsers.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register_parser(Arc::new(Cr2Parser::new()));
        registry.register_parser(Arc::new(NefParser::new()));
        registry
    }

    fn normalize(key: &str) -> String {
        key.to_ascii_uppercase()
    }

    /// Register `parser` under `key`, returning the parser it replaced.
    pub fn register(
        &mut self,
        key: &str,
        parser: Arc<dyn RawParser>,
    ) -> Option<Arc<dyn RawParser>> {
        self.parsers.insert(Self::normalize(key), parser)
    }

    /// Register `parser` under its own key.
    pub fn register_parser(&mut self, parser: Arc<dyn RawParser>) -> Option<Arc<dyn RawParser>> {
        let key = parser.key();
        self.register(key, parser)
    }

    /// Look up the parser registered under `key`.
    pub fn get(&self, key: &str) -> Option<Arc<dyn RawParser>> {
        self.parsers.get(&Self::normalize(key)).cloned()
    }

    /// Remove the parser registered under `key`.
    pub fn unregister(&mut self, key: &str) -> Option<Arc<dyn RawParser>> {
        self.parsers.remove(&Self::normalize(key))
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.parsers.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    /// Find a parser that claims the file's extension.
    ///
    /// If several parsers claim it, the one registered under the lowest key
    /// wins.
    pub fn parser_for_path(&self, path: &Path) -> Option<Arc<dyn RawParser>> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.keys()
            .iter()
            .filter_map(|key| self.parsers.get(key))
            .find(|parser| parser.extensions().contains(&ext.as_str()))
            .cloned()
    }

    /// Resolve the parser for a file, by extension and then by header.
    ///
    /// # Errors
    /// - `Io(Open)` if the header has to be read and the file cannot be opened
    /// - `UnsupportedFormat` if no registered parser handles the file
    pub fn resolve(&self, path: &Path) -> Result<Arc<dyn RawParser>, ExtractError> {
        if let Some(parser) = self.parser_for_path(path) {
            return Ok(parser);
        }

        let reader = FileReader::open(path)?;
        let format = detect_format(&reader)?;
        debug!(path = %path.display(), format = format.name(), "Detected format from header");

        self.get(format.key()).ok_or_else(|| {
            ExtractError::UnsupportedFormat(format!(
                "{}: no parser registered for {}",
                path.display(),
                format.key()
            ))
        })
    }
}
