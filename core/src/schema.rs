//! The schema store: merged schema fragments, their defaults and the type
//! registry, with validation and resolution entry points.

use tracing::{debug, trace};

use crate::error::{Mismatch, Result, SchemaError};
use crate::merge::{fill_defaults, merge_defaults, merge_schema};
use crate::{Map, Mapping, SchemaDocument, SchemaNode, TypeRegistry, Validator, Value};

/// A schema with defaults and its own type registry.
///
/// Each instance starts with the built-in types; types added through
/// [`add_type`](Self::add_type) are visible to this instance only. After
/// setup a `Schema` is only read, so it can be shared across threads.
///
/// # Examples
///
/// ```
/// use shape_schema_core::*;
/// use serde_json::json;
///
/// let schema = Schema::from_value(Value::from(json!({
///     "schema": {"name": "string", "age": "integer?"},
///     "default": {"name": "default"}
/// })))
/// .unwrap();
///
/// assert!(schema.valid(&Value::from(json!({"age": 5}))).unwrap());
///
/// let resolved = schema.resolve(&Value::from(json!({"age": 5}))).unwrap();
/// assert_eq!(resolved, Value::from(json!({"name": "default", "age": 5})));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Schema {
    schema: Map<SchemaNode>,
    defaults: Mapping,
    types: TypeRegistry,
}

impl Schema {
    /// Creates a schema from an already structured tree.
    pub fn new(schema: Map<SchemaNode>, defaults: Mapping) -> Self {
        Self {
            schema,
            defaults,
            types: TypeRegistry::with_builtins(),
        }
    }

    pub fn from_document(document: SchemaDocument) -> Self {
        Self::new(document.schema, document.defaults)
    }

    /// Creates a schema from a decoded document, bare or wrapped.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidSchema`] if `value` is not a valid
    /// schema document.
    pub fn from_value(value: Value) -> Result<Self> {
        SchemaDocument::try_from(value).map(Self::from_document)
    }

    /// Merges a schema fragment, and its defaults, into this schema.
    ///
    /// Mappings are unioned recursively; any other node is replaced by the
    /// fragment's.
    pub fn add_schema(&mut self, fragment: impl Into<SchemaDocument>) {
        let fragment = fragment.into();
        debug!(
            fields = fragment.schema.len(),
            defaults = fragment.defaults.len(),
            "merging schema fragment"
        );
        merge_schema(&mut self.schema, fragment.schema);
        merge_defaults(&mut self.defaults, fragment.defaults);
    }

    /// Decodes `value` as a schema document and merges it.
    pub fn add_schema_value(&mut self, value: Value) -> Result<()> {
        self.add_schema(SchemaDocument::try_from(value)?);
        Ok(())
    }

    /// Registers a type under `name`.
    ///
    /// An inline predicate is registered as is. A type specifier naming a
    /// registered type becomes an alias with the specifier's arguments bound
    /// in front of the caller's. Anything else is ignored.
    ///
    /// ```
    /// use shape_schema_core::*;
    /// use serde_json::json;
    ///
    /// let mut schema = Schema::from_value(Value::from(json!({"owner": "person"}))).unwrap();
    /// schema.add_type("person", "type:Person");
    ///
    /// let owner = HostObject::object("Person");
    /// let input: Mapping = [("owner", Value::from(owner))].into_iter().collect();
    /// assert!(schema.valid(&Value::Mapping(input)).unwrap());
    /// ```
    pub fn add_type(&mut self, name: impl Into<String>, node: impl Into<SchemaNode>) {
        let name = name.into();
        match node.into() {
            SchemaNode::Predicate(predicate) => {
                trace!(%name, "registering predicate type");
                self.types.register_predicate(name, predicate);
            }
            SchemaNode::Type(spec) => {
                let Some(target) = self.types.resolve(spec.name()).ok().cloned() else {
                    debug!(%name, %spec, "ignoring alias of unregistered type");
                    return;
                };
                trace!(%name, %spec, "registering type alias");
                let bound = spec.args().to_vec();
                self.types.register(name, move |value, args| {
                    let args: Vec<&str> = bound
                        .iter()
                        .map(String::as_str)
                        .chain(args.iter().copied())
                        .collect();
                    target(value, &args)
                });
            }
            other => {
                debug!(%name, node = %other.describe(), "ignoring non-invocable type");
            }
        }
    }

    /// Returns whether `input` conforms to the schema.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::NotArrayLike`] if `input` is neither a mapping nor a
    ///   host object with properties.
    /// - [`SchemaError::MissingSchemaType`], [`SchemaError::MissingValue`] or
    ///   [`SchemaError::UnknownType`] for structural problems.
    pub fn valid(&self, input: &Value) -> Result<bool> {
        Ok(self.explain(input)?.is_none())
    }

    /// Returns the first failing leaf, or `None` when `input` is valid.
    pub fn explain(&self, input: &Value) -> Result<Option<Mismatch>> {
        let input = input_mapping(input)?;
        Validator::new(&self.types).explain(&self.schema, &self.defaults, input)
    }

    /// Validates `input` and returns it with defaults filled in.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::SchemaMismatch`] if `input` does not conform,
    /// plus every error [`valid`](Self::valid) returns.
    pub fn resolve(&self, input: &Value) -> Result<Value> {
        let input = input_mapping(input)?;
        let validator = Validator::new(&self.types);
        if let Some(mismatch) = validator.explain(&self.schema, &self.defaults, input)? {
            return Err(SchemaError::SchemaMismatch(mismatch));
        }
        Ok(Value::Mapping(fill_defaults(&self.defaults, input)))
    }

    pub fn schema(&self) -> &Map<SchemaNode> {
        &self.schema
    }

    pub fn defaults(&self) -> &Mapping {
        &self.defaults
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.types
    }

    pub fn registry_mut(&mut self) -> &mut TypeRegistry {
        &mut self.types
    }

    /// Every type name the schema tree refers to, in document order and
    /// without duplicates.
    pub fn referenced_types(&self) -> Vec<&str> {
        let mut names = Vec::new();
        collect_types(&self.schema, &mut names);
        names
    }

    /// Referenced type names that are not registered.
    pub fn unknown_types(&self) -> Vec<&str> {
        self.referenced_types()
            .into_iter()
            .filter(|name| !self.types.contains(name))
            .collect()
    }
}

impl From<SchemaDocument> for Schema {
    fn from(document: SchemaDocument) -> Self {
        Self::from_document(document)
    }
}

fn input_mapping(input: &Value) -> Result<&Mapping> {
    match input {
        Value::Mapping(map) => Ok(map),
        Value::Opaque(host) => host
            .properties
            .as_ref()
            .ok_or_else(|| SchemaError::NotArrayLike(format!("opaque {}", host.class))),
        other => Err(SchemaError::NotArrayLike(other.type_name().to_string())),
    }
}

fn collect_types<'a>(fields: &'a Map<SchemaNode>, names: &mut Vec<&'a str>) {
    for node in fields.values() {
        collect_node_types(node, names);
    }
}

fn collect_node_types<'a>(node: &'a SchemaNode, names: &mut Vec<&'a str>) {
    match node {
        SchemaNode::Type(spec) => {
            if !names.contains(&spec.name()) {
                names.push(spec.name());
            }
        }
        SchemaNode::Predicate(_) => {}
        SchemaNode::Mapping(fields) => collect_types(fields, names),
        SchemaNode::Sequence(element) => collect_node_types(element, names),
    }
}
