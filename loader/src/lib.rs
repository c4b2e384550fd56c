//! Loading schema documents from JSON and YAML files.
//!
//! This crate reads schema fragments and defaults from disk and assembles
//! them into a [`Schema`](shape_schema_core::Schema). A schema file is either
//! a bare schema mapping or a wrapper holding `schema` and `default`
//! sections.
//!
//! # Quick start
//!
//! ```no_run
//! use shape_schema_loader::{ProjectConfig, SchemaLoader, read_value};
//!
//! let schema = SchemaLoader::new()
//!     .with_schema("schemas/user.json")
//!     .with_defaults("schemas/user-defaults.yaml")
//!     .build()
//!     .unwrap();
//!
//! let input = read_value("input.json").unwrap();
//! if schema.valid(&input).unwrap() {
//!     println!("{}", serde_json::to_string(&schema.resolve(&input).unwrap()).unwrap());
//! }
//!
//! // Record the sources for later runs
//! ProjectConfig::new(vec!["schemas/user.json".into()])
//!     .with_defaults("schemas/user-defaults.yaml")
//!     .save(".shape-schema.yml")
//!     .unwrap();
//! ```

mod config;
mod error;
mod loader;

pub use config::{CONFIG_FILE_NAME, ProjectConfig};
pub use error::{LoaderError, Result};
pub use loader::{
    SchemaLoader, SchemaSource, SourceFormat, load_schema, parse_value, read_defaults,
    read_document, read_value,
};
