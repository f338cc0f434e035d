// nifheads-parsers/src/traits.rs
//! Core traits defining the decoder interface for scene files.
//!
//! Turning scene bytes into a typed graph is the decoder's job; everything
//! downstream consumes the resulting [`SceneFile`] only. Decoders are
//! object-safe so they can be stored in the registry and shared across
//! worker threads.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::scene::SceneFile;

/// Errors that can occur during decoding
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed {format} document: {message}")]
    Syntax { format: &'static str, message: String },

    #[error("Invalid structure: {0}")]
    InvalidStructure(String),

    #[error("Nested error in {context}: {source}")]
    Nested {
        context: String,
        #[source]
        source: Box<ParseError>,
    },
}

impl ParseError {
    /// Wrap this error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ParseError::Nested {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<ParseError> for nifheads_core::Error {
    fn from(error: ParseError) -> Self {
        nifheads_core::Error::Decode {
            path: std::path::PathBuf::new(),
            message: error.to_string(),
        }
    }
}

/// Result type alias for decoding operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Core trait for all scene decoders
///
/// Implementors turn one scene file into its typed object graph.
pub trait SceneDecoder: Send + Sync {
    /// Returns a human-readable name for this decoder
    fn name(&self) -> &str;

    /// Returns the file extensions this decoder handles (e.g., ["yaml"])
    fn extensions(&self) -> &[&str];

    /// Decode from a reader.
    ///
    /// `hint` is the file extension when known; decoders that handle more
    /// than one syntax use it to pick one.
    fn decode(&self, reader: &mut dyn Read, hint: Option<&str>) -> ParseResult<SceneFile>;

    /// Decode from a file path
    fn decode_file(&self, path: &Path) -> ParseResult<SceneFile> {
        let file = std::fs::File::open(path)?;
        let mut reader = std::io::BufReader::new(file);
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase());
        self.decode(&mut reader, ext.as_deref())
            .map_err(|e| e.with_context(path.display().to_string()))
    }

    /// Check if this decoder can handle the given file
    fn can_decode(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext_str = ext.to_string_lossy().to_lowercase();
                self.extensions().iter().any(|e| e.to_lowercase() == ext_str)
            }
            None => false,
        }
    }
}

/// Thread-safe reference-counted decoder
pub type SharedDecoder = Arc<dyn SceneDecoder>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct EmptyDecoder;

    impl SceneDecoder for EmptyDecoder {
        fn name(&self) -> &str {
            "Empty"
        }

        fn extensions(&self) -> &[&str] {
            &["nif", "KF"]
        }

        fn decode(&self, _reader: &mut dyn Read, _hint: Option<&str>) -> ParseResult<SceneFile> {
            Ok(SceneFile::default())
        }
    }

    #[test]
    fn test_can_decode_ignores_case() {
        let decoder = EmptyDecoder;
        assert!(decoder.can_decode(&PathBuf::from("meshes/HairMale.NIF")));
        assert!(decoder.can_decode(&PathBuf::from("idle.kf")));
        assert!(!decoder.can_decode(&PathBuf::from("hair.dds")));
        assert!(!decoder.can_decode(&PathBuf::from("README")));
    }

    #[test]
    fn test_parse_error_context() {
        let error = ParseError::InvalidStructure("bad index".into());
        let contextualized = error.with_context("head.yaml");

        match contextualized {
            ParseError::Nested { context, .. } => {
                assert_eq!(context, "head.yaml");
            }
            _ => panic!("Expected Nested error"),
        }
    }

    #[test]
    fn test_into_core_error() {
        let err: nifheads_core::Error = ParseError::InvalidStructure("x".into()).into();
        assert!(matches!(err, nifheads_core::Error::Decode { .. }));
        assert!(!err.is_recoverable());
    }
}
