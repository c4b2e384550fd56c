use crate::error::{Result, SchemaError};
use crate::validate::join_path;
use crate::{Map, Mapping, SchemaNode, TypeSpec, Value};

/// A schema tree together with its defaults.
///
/// This is the unit that schema sources produce and that
/// [`Schema::add_schema`](crate::Schema::add_schema) merges. A decoded
/// document is either a bare schema mapping or a wrapper of the form
/// `{"schema": {...}, "default": {...}}`.
///
/// # Examples
///
/// ```
/// use shape_schema_core::*;
/// use serde_json::json;
///
/// let bare = SchemaDocument::try_from(Value::from(json!({"name": "string"}))).unwrap();
/// assert_eq!(bare.field_count(), 1);
/// assert!(bare.defaults.is_empty());
///
/// let wrapped = SchemaDocument::try_from(Value::from(json!({
///     "schema": {"name": "string", "tags": ["string"]},
///     "default": {"name": "jimmy"}
/// })))
/// .unwrap();
/// assert_eq!(wrapped.field_count(), 2);
/// assert_eq!(wrapped.defaults.get("name"), Some(&Value::from("jimmy")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    /// Field schemas.
    pub schema: Map<SchemaNode>,
    /// Default values, shaped like `schema`.
    pub defaults: Mapping,
}

impl SchemaDocument {
    pub fn new(schema: Map<SchemaNode>, defaults: Mapping) -> Self {
        Self { schema, defaults }
    }

    /// A document carrying defaults only.
    pub fn defaults_only(defaults: Mapping) -> Self {
        Self::new(Map::new(), defaults)
    }

    /// Returns the number of top-level fields.
    pub fn field_count(&self) -> usize {
        self.schema.len()
    }
}

impl From<Map<SchemaNode>> for SchemaDocument {
    fn from(schema: Map<SchemaNode>) -> Self {
        Self::new(schema, Mapping::new())
    }
}

impl TryFrom<Value> for SchemaDocument {
    type Error = SchemaError;

    /// Converts a decoded value tree into a document.
    ///
    /// A top-level `schema` key holding a mapping marks the wrapped form; its
    /// sibling `default` (if any) must be a mapping too.
    fn try_from(value: Value) -> Result<Self> {
        let Value::Mapping(mut root) = value else {
            return Err(SchemaError::InvalidSchema(format!(
                "expected a mapping, got {}",
                value.type_name()
            )));
        };

        if !matches!(root.get("schema"), Some(Value::Mapping(_))) {
            return Ok(Self::from(schema_fields(root, "")?));
        }

        let schema = match root.remove("schema") {
            Some(Value::Mapping(fields)) => schema_fields(fields, "")?,
            _ => Map::new(),
        };
        let defaults = match root.remove("default") {
            None | Some(Value::Null) => Mapping::new(),
            Some(Value::Mapping(defaults)) => defaults,
            Some(other) => {
                return Err(SchemaError::InvalidSchema(format!(
                    "default section must be a mapping, got {}",
                    other.type_name()
                )));
            }
        };

        Ok(Self::new(schema, defaults))
    }
}

fn schema_fields(fields: Mapping, path: &str) -> Result<Map<SchemaNode>> {
    fields
        .into_iter()
        .map(|(key, value)| {
            let node = schema_node(value, &join_path(path, &key))?;
            Ok((key, node))
        })
        .collect()
}

fn schema_node(value: Value, path: &str) -> Result<SchemaNode> {
    match value {
        Value::String(spec) => Ok(SchemaNode::Type(TypeSpec::parse(&spec))),
        Value::Mapping(fields) => Ok(SchemaNode::Mapping(schema_fields(fields, path)?)),
        Value::Sequence(items) => match <[Value; 1]>::try_from(items) {
            Ok([element]) => Ok(SchemaNode::sequence(schema_node(
                element,
                &join_path(path, "0"),
            )?)),
            Err(items) => Err(SchemaError::InvalidSchema(format!(
                "{path}: a sequence schema holds exactly one element schema, found {}",
                items.len()
            ))),
        },
        other => Err(SchemaError::InvalidSchema(format!(
            "{path}: expected a type specifier, mapping or sequence, got {}",
            other.type_name()
        ))),
    }
}
