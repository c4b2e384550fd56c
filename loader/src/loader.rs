//! Reading schema documents from disk and assembling a [`Schema`] from
//! several of them.
//!
//! # Loading patterns
//!
//! ```no_run
//! use shape_schema_loader::{SchemaLoader, load_schema};
//!
//! // A single bare or wrapped schema file
//! let schema = load_schema("schemas/user.json").unwrap();
//!
//! // Several fragments merged in order, plus a defaults file
//! let schema = SchemaLoader::new()
//!     .with_schema("schemas/user.json")
//!     .with_schema("schemas/user-extra.yaml")
//!     .with_defaults("schemas/user-defaults.json")
//!     .build()
//!     .unwrap();
//!
//! // Sources listed in a project config file
//! let schema = SchemaLoader::from_config(".shape-schema.yml")
//!     .unwrap()
//!     .build()
//!     .unwrap();
//! ```

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use shape_schema_core::{Mapping, Schema, SchemaDocument, SchemaError, Value};
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::error::{LoaderError, Result};

/// Encoding of a document, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl SourceFormat {
    /// Picks the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(LoaderError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Decodes a JSON or YAML document into a [`Value`], keeping key order.
pub fn parse_value(reader: impl Read, format: SourceFormat) -> Result<Value> {
    let decoded: serde_json::Value = match format {
        SourceFormat::Json => serde_json::from_reader(reader)?,
        SourceFormat::Yaml => serde_yaml::from_reader(reader)?,
    };
    Ok(Value::from(decoded))
}

/// Reads and decodes the document at `path`.
pub fn read_value(path: impl AsRef<Path>) -> Result<Value> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path)?;
    debug!(path = %path.display(), ?format, "reading document");
    let file = File::open(path)?;
    parse_value(BufReader::new(file), format)
}

/// Reads a bare or `{schema, default}`-wrapped schema document.
pub fn read_document(path: impl AsRef<Path>) -> Result<SchemaDocument> {
    Ok(SchemaDocument::try_from(read_value(path)?)?)
}

/// Reads a file holding a bare defaults mapping.
pub fn read_defaults(path: impl AsRef<Path>) -> Result<Mapping> {
    let path = path.as_ref();
    match read_value(path)? {
        Value::Mapping(defaults) => Ok(defaults),
        other => Err(SchemaError::InvalidSchema(format!(
            "defaults in {} must be a mapping, got {}",
            path.display(),
            other.type_name()
        ))
        .into()),
    }
}

/// Builds a [`Schema`] from a single schema file.
pub fn load_schema(path: impl AsRef<Path>) -> Result<Schema> {
    read_document(path).map(Schema::from_document)
}

/// One file feeding a [`SchemaLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaSource {
    /// A bare or wrapped schema document.
    Fragment(PathBuf),
    /// A bare defaults mapping.
    Defaults(PathBuf),
}

/// Builder merging several schema fragments and defaults files, in the
/// order they were added, into one [`Schema`].
///
/// Unlike a fallback chain every source must load; the first failure is
/// returned.
#[derive(Debug, Default)]
pub struct SchemaLoader {
    sources: Vec<SchemaSource>,
}

impl SchemaLoader {
    /// Creates a loader with no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema fragment file.
    pub fn with_schema(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(SchemaSource::Fragment(path.into()));
        self
    }

    /// Adds a defaults file.
    pub fn with_defaults(mut self, path: impl Into<PathBuf>) -> Self {
        self.sources.push(SchemaSource::Defaults(path.into()));
        self
    }

    /// Creates a loader from the project config file at `path`.
    ///
    /// Relative paths in the config resolve against its directory.
    pub fn from_config(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config = ProjectConfig::load(path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(Self::from_project(&config, base))
    }

    /// Creates a loader from an already parsed config.
    pub fn from_project(config: &ProjectConfig, base: &Path) -> Self {
        let loader = config
            .schema_paths(base)
            .into_iter()
            .fold(Self::new(), |loader, path| loader.with_schema(path));
        match config.defaults_path(base) {
            Some(defaults) => loader.with_defaults(defaults),
            None => loader,
        }
    }

    pub fn sources(&self) -> &[SchemaSource] {
        &self.sources
    }

    /// Reads every source and merges it into a fresh [`Schema`].
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::NoSourcesAvailable`] if no schema fragment was
    /// added, or the first error from reading a source.
    pub fn build(self) -> Result<Schema> {
        let has_fragment = self
            .sources
            .iter()
            .any(|source| matches!(source, SchemaSource::Fragment(_)));
        if !has_fragment {
            return Err(LoaderError::NoSourcesAvailable);
        }

        let mut schema = Schema::default();
        for source in &self.sources {
            match source {
                SchemaSource::Fragment(path) => {
                    let document = read_document(path)?;
                    debug!(path = %path.display(), fields = document.field_count(), "merging fragment");
                    schema.add_schema(document);
                }
                SchemaSource::Defaults(path) => {
                    let defaults = read_defaults(path)?;
                    debug!(path = %path.display(), "merging defaults");
                    schema.add_schema(SchemaDocument::defaults_only(defaults));
                }
            }
        }

        info!(
            sources = self.sources.len(),
            fields = schema.schema().len(),
            "schema loaded"
        );
        Ok(schema)
    }
}
