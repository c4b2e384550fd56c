//! Value model shared by schemas, defaults and validated input.
//!
//! A [`Value`] is a scalar, an ordered sequence, an ordered keyed mapping, or
//! an opaque host object. Decoded documents (via [`From<serde_json::Value>`])
//! and hand-built trees are indistinguishable to the validator.

use serde::{Serialize, Serializer};

use crate::Map;

/// Keyed mapping of values.
pub type Mapping = Map<Value>;

/// Any data value the engine can validate.
///
/// # Examples
///
/// ```
/// use shape_schema_core::Value;
/// use serde_json::json;
///
/// let value = Value::from(json!({"name": "jimmy", "tags": ["a", "b"]}));
/// let mapping = value.as_mapping().unwrap();
/// assert_eq!(mapping.get("name").and_then(Value::as_str), Some("jimmy"));
/// assert_eq!(mapping.get("tags").unwrap().type_name(), "sequence");
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Sequence(Vec<Value>),
    Mapping(Mapping),
    /// Reference to a host object that is checked by identity or capability
    /// rather than by structure.
    Opaque(HostObject),
}

impl Value {
    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Sequence(_) => "sequence",
            Value::Mapping(_) => "mapping",
            Value::Opaque(_) => "opaque",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns `true` for sequences and mappings.
    pub fn is_array_like(&self) -> bool {
        matches!(self, Value::Sequence(_) | Value::Mapping(_))
    }

    /// Returns `true` if the value is falsy.
    ///
    /// Null, `false`, zero, `""`, `"0"` and empty containers are empty.
    /// Opaque host objects never are. An empty value present in the input is
    /// replaced by its default when one exists.
    ///
    /// ```
    /// use shape_schema_core::Value;
    ///
    /// assert!(Value::Int(0).is_empty());
    /// assert!(Value::from("0").is_empty());
    /// assert!(Value::Sequence(vec![]).is_empty());
    /// assert!(!Value::from("jimmy").is_empty());
    /// assert!(!Value::Float(0.5).is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Int(n) => *n == 0,
            Value::Float(f) => *f == 0.0,
            Value::String(s) => s.is_empty() || s == "0",
            Value::Sequence(items) => items.is_empty(),
            Value::Mapping(map) => map.is_empty(),
            Value::Opaque(_) => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_host(&self) -> Option<&HostObject> {
        match self {
            Value::Opaque(host) => Some(host),
            _ => None,
        }
    }

    /// Looks up a positional or keyed child: sequences are indexed by integer
    /// keys, mappings by key.
    pub fn child(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Sequence(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            Value::Mapping(map) => map.get(key),
            _ => None,
        }
    }
}

/// What kind of host entity an opaque value stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostKind {
    /// A plain object instance (the default).
    #[default]
    Object,
    /// An anonymous invocable.
    Closure,
    /// A named invocable.
    Function,
    /// A handle to an external resource (file, socket, ...).
    Resource,
}

/// Capability descriptor for a host object.
///
/// Whoever builds the value tree describes foreign objects with one of
/// these so that `type:<class>`, `implements:<iface>`, `callable` and
/// friends can be checked without reflection.
///
/// # Examples
///
/// ```
/// use shape_schema_core::{HostObject, HostKind, Value};
///
/// let person = HostObject::object("Person")
///     .implementing("Stringable")
///     .with_properties([("name", Value::from("Fredrik"))].into_iter().collect());
///
/// assert_eq!(person.kind, HostKind::Object);
/// assert!(person.implements("Stringable"));
/// assert!(!person.is_invocable());
/// assert!(HostObject::closure().is_invocable());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostObject {
    /// Concrete class (type) name.
    pub class: String,
    pub kind: HostKind,
    /// Interfaces the class declares.
    pub interfaces: Vec<String>,
    /// Whether the object can be iterated.
    pub iterable: bool,
    /// Public properties, when the object was introspected into key/value
    /// pairs. Such an object is accepted wherever a mapping input is.
    pub properties: Option<Mapping>,
}

impl HostObject {
    /// An object instance of `class`.
    pub fn object(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            ..Self::default()
        }
    }

    /// An anonymous closure.
    pub fn closure() -> Self {
        Self {
            class: "Closure".to_string(),
            kind: HostKind::Closure,
            ..Self::default()
        }
    }

    /// A named function reference.
    pub fn function(name: impl Into<String>) -> Self {
        Self {
            class: name.into(),
            kind: HostKind::Function,
            ..Self::default()
        }
    }

    /// A resource handle, e.g. `"stream"`.
    pub fn resource(kind: impl Into<String>) -> Self {
        Self {
            class: kind.into(),
            kind: HostKind::Resource,
            ..Self::default()
        }
    }

    /// Declares an implemented interface.
    pub fn implementing(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Marks the object as iterable.
    pub fn iterable(mut self) -> Self {
        self.iterable = true;
        self
    }

    /// Attaches introspected properties.
    pub fn with_properties(mut self, properties: Mapping) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn is_invocable(&self) -> bool {
        matches!(self.kind, HostKind::Closure | HostKind::Function)
    }

    pub fn implements(&self, interface: &str) -> bool {
        self.interfaces.iter().any(|i| i == interface)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Mapping(map)
    }
}

impl From<HostObject> for Value {
    fn from(host: HostObject) -> Self {
        Value::Opaque(host)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                // u64 beyond i64::MAX and real floats
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => serializer.collect_seq(items),
            Value::Mapping(map) => serializer.collect_map(map.iter()),
            Value::Opaque(host) => match &host.properties {
                Some(properties) => serializer.collect_map(properties.iter()),
                None => serializer.serialize_str(&format!("<{}>", host.class)),
            },
        }
    }
}
