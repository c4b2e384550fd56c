//! Recursive schema validation and default resolution.
//!
//! This crate validates nested key/value data against a declarative schema
//! tree and fills absent or empty fields from a parallel tree of defaults:
//!
//! - [`Value`]: scalars, ordered sequences, ordered
//!   [`Mapping`]s and opaque [`HostObject`]s.
//! - [`SchemaNode`]: a [`TypeSpec`] such as
//!   `"integer?"` or `"type:Person"`, an inline [`Predicate`], a nested
//!   mapping, or a sequence of one element schema.
//! - [`TypeRegistry`]: named predicates, pre-populated with the built-in
//!   types.
//! - [`Schema`]: merged schema fragments plus defaults, with
//!   [`valid`](Schema::valid), [`resolve`](Schema::resolve) and
//!   [`explain`](Schema::explain).
//!
//! Structural problems (unknown keys, missing required values, unknown
//! types) are reported as [`SchemaError`]s. Data that fails a type check
//! makes [`Schema::valid`] return `Ok(false)`.
//!
//! # Example
//!
//! ```
//! use shape_schema_core::*;
//! use serde_json::json;
//!
//! let mut schema = Schema::from_value(Value::from(json!({
//!     "schema": {
//!         "name": "string",
//!         "age": "integer?",
//!         "tags": ["string"]
//!     },
//!     "default": {"name": "anonymous"}
//! })))
//! .unwrap();
//!
//! assert!(schema.valid(&Value::from(json!({"tags": ["a", "b"]}))).unwrap());
//! assert!(!schema.valid(&Value::from(json!({"tags": ["a", 2]}))).unwrap());
//! assert!(schema.valid(&Value::from(json!({"extra": 1}))).is_err());
//!
//! schema.add_schema_value(Value::from(json!({"email": "string?"}))).unwrap();
//! let resolved = schema.resolve(&Value::from(json!({"age": 3}))).unwrap();
//! assert_eq!(resolved, Value::from(json!({"name": "anonymous", "age": 3})));
//! ```

mod document;
mod error;
mod map;
mod merge;
mod node;
mod registry;
mod schema;
mod types;
mod validate;

pub use document::SchemaDocument;
pub use error::{Mismatch, Result, SchemaError};
pub use map::{Iter, Map};
pub use merge::{fill_defaults, merge_defaults, merge_schema};
pub use node::{Predicate, SchemaNode, TypeSpec};
pub use registry::TypeRegistry;
pub use schema::Schema;
pub use types::{HostKind, HostObject, Mapping, Value};
pub use validate::Validator;
