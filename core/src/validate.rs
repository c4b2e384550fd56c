//! Recursive validation of a mapping against a schema tree.
//!
//! The validator walks schema, defaults and input in lockstep. At each
//! mapping level it visits the schema's keys followed by any keys only the
//! input has:
//!
//! 1. an input key without a schema entry is a
//!    [`MissingSchemaType`](SchemaError::MissingSchemaType) error;
//! 2. an absent or empty input value is replaced by the default, when there
//!    is one;
//! 3. a still-absent value is skipped if its type specifier is optional and
//!    is a [`MissingValue`](SchemaError::MissingValue) error otherwise;
//! 4. containers recurse: a keyed mapping is walked against a mapping node,
//!    or against the single key `0` of a sequence node; each list element is
//!    checked against a sequence node's element schema, or as a one-key
//!    level of a mapping node. Leaves are checked by their predicate.
//!
//! A predicate returning `false` is not an error: the walk stops and the
//! failing leaf is reported as a [`Mismatch`].

use tracing::{debug, trace};

use crate::error::{Mismatch, Result, SchemaError};
use crate::{Map, Mapping, SchemaNode, TypeRegistry, Value};

/// Why a walk stopped early.
enum Failure {
    Schema(SchemaError),
    Mismatch(Mismatch),
}

impl From<SchemaError> for Failure {
    fn from(err: SchemaError) -> Self {
        Failure::Schema(err)
    }
}

type Outcome = std::result::Result<(), Failure>;

/// Validates input mappings using the types of a [`TypeRegistry`].
///
/// Validation never mutates the schema, the defaults or the input.
///
/// # Examples
///
/// ```
/// use shape_schema_core::*;
/// use serde_json::json;
///
/// let schema = SchemaDocument::try_from(Value::from(json!({
///     "name": "string",
///     "age": "integer?"
/// })))
/// .unwrap();
/// let types = TypeRegistry::with_builtins();
/// let validator = Validator::new(&types);
///
/// let input = Value::from(json!({"name": "a"}));
/// let input = input.as_mapping().unwrap();
/// assert!(validator.validate(&schema.schema, &schema.defaults, input).unwrap());
/// ```
pub struct Validator<'a> {
    types: &'a TypeRegistry,
}

impl<'a> Validator<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Returns whether `input` conforms to `schema`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::MissingSchemaType`], [`SchemaError::MissingValue`]
    /// or [`SchemaError::UnknownType`] for structural problems.
    pub fn validate(
        &self,
        schema: &Map<SchemaNode>,
        defaults: &Mapping,
        input: &Mapping,
    ) -> Result<bool> {
        Ok(self.explain(schema, defaults, input)?.is_none())
    }

    /// Like [`validate`](Self::validate), but returns the first failing leaf.
    pub fn explain(
        &self,
        schema: &Map<SchemaNode>,
        defaults: &Mapping,
        input: &Mapping,
    ) -> Result<Option<Mismatch>> {
        match self.check_mapping(schema, Some(defaults), input, "") {
            Ok(()) => Ok(None),
            Err(Failure::Mismatch(mismatch)) => Ok(Some(mismatch)),
            Err(Failure::Schema(err)) => Err(err),
        }
    }

    fn check_mapping(
        &self,
        schema: &Map<SchemaNode>,
        defaults: Option<&Mapping>,
        input: &Mapping,
        path: &str,
    ) -> Outcome {
        let novel = input.keys().filter(|key| !schema.contains_key(key));

        for key in schema.keys().chain(novel) {
            let child_path = join_path(path, key);
            let node = schema
                .get(key)
                .ok_or_else(|| SchemaError::MissingSchemaType(child_path.clone()))?;
            let default = defaults.and_then(|defaults| defaults.get(key));
            self.check_entry(node, default, input.get(key), &child_path)?;
        }

        Ok(())
    }

    fn check_entry(
        &self,
        node: &SchemaNode,
        default: Option<&Value>,
        value: Option<&Value>,
        path: &str,
    ) -> Outcome {
        let default = default.filter(|default| !default.is_null());
        let value = match (value.filter(|value| !value.is_null()), default) {
            (Some(value), Some(default)) if value.is_empty() => Some(default),
            (None, default) => default,
            (value, _) => value,
        };

        let Some(value) = value else {
            if node.is_optional() {
                return Ok(());
            }
            return Err(SchemaError::MissingValue(path.to_string()).into());
        };

        match (node, value) {
            (SchemaNode::Mapping(fields), Value::Mapping(map)) if map.is_associative() => {
                trace!(path, "validating nested mapping");
                self.check_mapping(fields, default.and_then(Value::as_mapping), map, path)
            }
            (SchemaNode::Sequence(element), Value::Mapping(map)) if map.is_associative() => {
                trace!(path, "validating keyed mapping against element schema");
                let fields: Map<SchemaNode> =
                    [("0", element.as_ref().clone())].into_iter().collect();
                self.check_mapping(&fields, default.and_then(Value::as_mapping), map, path)
            }
            (SchemaNode::Sequence(element), _) if is_list(value) => {
                trace!(path, "validating sequence elements");
                for (index, item) in list_items(value) {
                    let item_default = default.and_then(|default| default.child(&index));
                    self.check_entry(element, item_default, Some(item), &join_path(path, &index))?;
                }
                Ok(())
            }
            // each element is one level of the mapping, keyed by its index
            (SchemaNode::Mapping(fields), _) if is_list(value) => {
                trace!(path, "validating list elements against mapping schema");
                for (index, item) in list_items(value) {
                    let item_default = default
                        .and_then(|default| default.child(&index))
                        .and_then(Value::as_mapping);
                    let level: Mapping = [(index, item.clone())].into_iter().collect();
                    self.check_mapping(fields, item_default, &level, path)?;
                }
                Ok(())
            }
            _ => self.check_leaf(node, value, path),
        }
    }

    fn check_leaf(&self, node: &SchemaNode, value: &Value, path: &str) -> Outcome {
        let accepted = match node {
            SchemaNode::Type(spec) => self.types.check(spec, value)?,
            SchemaNode::Predicate(predicate) => predicate(value, &[]),
            SchemaNode::Mapping(_) | SchemaNode::Sequence(_) => false,
        };

        if accepted {
            return Ok(());
        }

        let mismatch = Mismatch::new(path, node.describe(), value.type_name());
        debug!(%mismatch, "value rejected");
        Err(Failure::Mismatch(mismatch))
    }
}

/// Sequences and mappings keyed only by integer literals.
fn is_list(value: &Value) -> bool {
    match value {
        Value::Sequence(_) => true,
        Value::Mapping(map) => !map.is_associative(),
        _ => false,
    }
}

fn list_items(value: &Value) -> Vec<(String, &Value)> {
    match value {
        Value::Sequence(items) => items
            .iter()
            .enumerate()
            .map(|(index, item)| (index.to_string(), item))
            .collect(),
        Value::Mapping(map) => map.iter().map(|(key, item)| (key.to_string(), item)).collect(),
        _ => Vec::new(),
    }
}

/// Joins a dotted field path.
pub(crate) fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}
