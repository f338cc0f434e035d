//! Unified error handling for nifheads
//!
//! Every failure the export pipeline can surface maps onto one of these
//! variants. Texture-level failures are recoverable; directory and decode
//! failures abort the run.

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for all nifheads operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A scene or texture directory could not be enumerated
    #[error("Directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ==================== Asset Errors ====================

    /// Referenced texture matched neither its DDS variant nor its own name
    #[error("Missing texture asset: {name}")]
    MissingAsset {
        name: String,
    },

    /// Source image could not be decoded or re-encoded as PNG
    #[error("Unsupported image format: {path}: {message}")]
    UnsupportedImageFormat {
        path: PathBuf,
        message: String,
    },

    /// Two different source textures convert to the same output file
    #[error("Texture {} collides with {} on output name {name}", dropped.display(), kept.display())]
    OutputCollision {
        name: String,
        kept: PathBuf,
        dropped: PathBuf,
    },

    // ==================== Decode Errors ====================

    /// Scene file could not be decoded into a scene graph
    #[error("Failed to decode {path}: {message}")]
    Decode {
        path: PathBuf,
        message: String,
    },

    // ==================== Export Errors ====================

    /// JSON document could not be written
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // ==================== General Errors ====================

    /// Custom error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a missing asset error
    pub fn missing_asset(name: impl Into<String>) -> Self {
        Error::MissingAsset { name: name.into() }
    }

    /// Create a decode error for a scene file
    pub fn decode(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Error::Decode {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Check if the run can continue past this error.
    ///
    /// Only texture work is recoverable: the shape keeps its original
    /// texture reference and the failure is reported at the end.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::MissingAsset { .. }
            | Error::UnsupportedImageFormat { .. }
            | Error::OutputCollision { .. }
            | Error::Io(_) => true,
            Error::WithContext { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }

    /// Check if this is a "not found" type error
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::MissingAsset { .. } => true,
            Error::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            Error::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
