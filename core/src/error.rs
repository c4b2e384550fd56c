//! Error types for schema construction, validation and resolution.
//!
//! Structural problems (a malformed schema, input that is not array-like, an
//! unregistered type name) are errors. Data that merely fails a type check is
//! not: [`Schema::valid`](crate::Schema::valid) returns `Ok(false)` for it and
//! only [`Schema::resolve`](crate::Schema::resolve) turns it into
//! [`SchemaError::SchemaMismatch`].

use std::fmt;

use thiserror::Error;

/// First failing leaf of a data-validity failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    /// Dotted field path (e.g., `"objs.0.age"`).
    pub path: String,
    /// Type specifier or node kind the value was checked against.
    pub expected: String,
    /// Type name of the offending value.
    pub actual: String,
}

impl Mismatch {
    pub fn new(
        path: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field '{}': expected {}, got {}",
            self.path, self.expected, self.actual
        )
    }
}

/// Errors raised by the schema engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Schema source is not a mapping, or holds a node that is neither a type
    /// specifier, a mapping nor a single-element sequence.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// Input is neither a mapping nor an introspected host object.
    #[error("input value is not array-like, got {0}")]
    NotArrayLike(String),
    /// Input holds a key the schema does not declare.
    #[error("missing schema type for {0}")]
    MissingSchemaType(String),
    /// A required field is absent and has no default.
    #[error("missing value for {0}")]
    MissingValue(String),
    /// A type specifier names a type that was never registered.
    #[error("missing type validation function for {0}")]
    UnknownType(String),
    /// Input failed validation during resolve.
    #[error("schema and input value don't match: {0}")]
    SchemaMismatch(Mismatch),
}

/// Convenience alias for results with [`SchemaError`].
pub type Result<T> = std::result::Result<T, SchemaError>;
