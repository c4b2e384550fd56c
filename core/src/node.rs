//! Schema nodes and type specifiers.
//!
//! A schema is a tree of [`SchemaNode`]s. Leaves are either named types
//! ([`TypeSpec`], looked up in the [`TypeRegistry`](crate::TypeRegistry)) or
//! inline predicates; inner nodes are mappings of field name to node, or a
//! sequence node holding the schema every element must satisfy.

use std::fmt;
use std::sync::Arc;

use crate::{Map, Value};

/// Type check invoked with the value and the static arguments of the type
/// specifier (`type:Person` passes `["Person"]`).
pub type Predicate = Arc<dyn Fn(&Value, &[&str]) -> bool + Send + Sync>;

/// Parsed `name[:arg1,arg2,...][?]` type specifier.
///
/// # Examples
///
/// ```
/// use shape_schema_core::TypeSpec;
///
/// let spec = TypeSpec::parse("implements:Stringable?");
/// assert_eq!(spec.name(), "implements");
/// assert_eq!(spec.args(), ["Stringable"]);
/// assert!(spec.is_optional());
///
/// let spec = TypeSpec::parse("between:1,10:strict");
/// assert_eq!(spec.args(), ["1", "10", "strict"]);
/// assert!(!spec.is_optional());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    name: String,
    args: Vec<String>,
    optional: bool,
}

impl TypeSpec {
    /// Parses a specifier. Parsing never fails; an unknown name surfaces as
    /// [`SchemaError::UnknownType`](crate::SchemaError::UnknownType) when the
    /// specifier is first used.
    pub fn parse(spec: &str) -> Self {
        let (body, optional) = match spec.strip_suffix('?') {
            Some(body) => (body, true),
            None => (spec, false),
        };

        let mut segments = body.split(':');
        let name = segments.next().unwrap_or_default().to_string();
        let args = segments
            .flat_map(|segment| segment.split(','))
            .map(str::to_string)
            .collect();

        Self {
            name,
            args,
            optional,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl fmt::Display for TypeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            write!(f, ":{}", self.args.join(","))?;
        }
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl From<&str> for TypeSpec {
    fn from(spec: &str) -> Self {
        TypeSpec::parse(spec)
    }
}

/// One node of a schema tree.
#[derive(Clone)]
pub enum SchemaNode {
    /// Named registry type with static arguments.
    Type(TypeSpec),
    /// Anonymous inline type check.
    Predicate(Predicate),
    /// Keyed mapping; every field is validated against its node.
    Mapping(Map<SchemaNode>),
    /// Every element of a sequence is validated against the inner node.
    Sequence(Box<SchemaNode>),
}

impl SchemaNode {
    /// Wraps a closure as an inline predicate node.
    ///
    /// ```
    /// use shape_schema_core::SchemaNode;
    ///
    /// let even = SchemaNode::predicate(|value, _| {
    ///     value.as_i64().is_some_and(|n| n % 2 == 0)
    /// });
    /// assert_eq!(even.describe(), "<predicate>");
    /// ```
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&Value, &[&str]) -> bool + Send + Sync + 'static,
    {
        SchemaNode::Predicate(Arc::new(predicate))
    }

    /// Sequence node whose elements must satisfy `element`.
    pub fn sequence(element: impl Into<SchemaNode>) -> Self {
        SchemaNode::Sequence(Box::new(element.into()))
    }

    /// Only type specifiers carry the optional marker.
    pub fn is_optional(&self) -> bool {
        matches!(self, SchemaNode::Type(spec) if spec.is_optional())
    }

    pub fn as_mapping(&self) -> Option<&Map<SchemaNode>> {
        match self {
            SchemaNode::Mapping(fields) => Some(fields),
            _ => None,
        }
    }

    /// Short description used in mismatch reports.
    pub fn describe(&self) -> String {
        match self {
            SchemaNode::Type(spec) => spec.to_string(),
            SchemaNode::Predicate(_) => "<predicate>".to_string(),
            SchemaNode::Mapping(_) => "mapping".to_string(),
            SchemaNode::Sequence(element) => format!("[{}]", element.describe()),
        }
    }
}

impl fmt::Debug for SchemaNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaNode::Type(spec) => write!(f, "Type({spec})"),
            SchemaNode::Predicate(_) => f.write_str("Predicate(..)"),
            SchemaNode::Mapping(fields) => f.debug_tuple("Mapping").field(fields).finish(),
            SchemaNode::Sequence(element) => f.debug_tuple("Sequence").field(element).finish(),
        }
    }
}

impl From<TypeSpec> for SchemaNode {
    fn from(spec: TypeSpec) -> Self {
        SchemaNode::Type(spec)
    }
}

impl From<&str> for SchemaNode {
    fn from(spec: &str) -> Self {
        SchemaNode::Type(TypeSpec::parse(spec))
    }
}

impl From<String> for SchemaNode {
    fn from(spec: String) -> Self {
        SchemaNode::Type(TypeSpec::parse(&spec))
    }
}

impl From<Map<SchemaNode>> for SchemaNode {
    fn from(fields: Map<SchemaNode>) -> Self {
        SchemaNode::Mapping(fields)
    }
}
