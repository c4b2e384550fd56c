//! Error types for loading schema sources.

use std::path::PathBuf;

use shape_schema_core::SchemaError;
use thiserror::Error;

/// Errors that can occur while reading schema, defaults or config files.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The decoded document is not a valid schema.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// File extension is neither JSON nor YAML.
    #[error("unsupported file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// No schema file was configured.
    #[error("no schema sources available")]
    NoSourcesAvailable,
}

/// Convenience alias for results with [`LoaderError`].
pub type Result<T> = std::result::Result<T, LoaderError>;
