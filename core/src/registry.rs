//! Registry of named type predicates.
//!
//! Every [`Schema`](crate::Schema) owns its own registry, pre-populated with
//! the built-in types below and extensible at runtime.
//!
//! | name | accepts |
//! |------|---------|
//! | `array` | sequences and mappings |
//! | `bool`, `boolean` | booleans |
//! | `callable`, `function` | invocable host objects |
//! | `closure` | anonymous invocable host objects |
//! | `int`, `integer` | integers |
//! | `iterable` | sequences, mappings, iterable host objects |
//! | `float` | floats |
//! | `string` | strings |
//! | `object` | mappings and host objects |
//! | `resource` | host resource handles |
//! | `type:<class>` | host objects whose class is `<class>` |
//! | `implements:<iface>` | host objects declaring `<iface>` |

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Result, SchemaError};
use crate::{HostKind, Predicate, TypeSpec, Value};

type Builtin = fn(&Value, &[&str]) -> bool;

const BUILTINS: &[(&str, Builtin)] = &[
    ("array", is_array),
    ("bool", is_bool),
    ("boolean", is_bool),
    ("callable", is_callable),
    ("closure", is_closure),
    ("function", is_callable),
    ("implements", implements),
    ("int", is_int),
    ("integer", is_int),
    ("iterable", is_iterable),
    ("float", is_float),
    ("string", is_string),
    ("object", is_object),
    ("resource", is_resource),
    ("type", is_type),
];

/// Mapping from type names to predicates.
///
/// # Examples
///
/// ```
/// use shape_schema_core::{TypeRegistry, TypeSpec, Value};
///
/// let mut types = TypeRegistry::with_builtins();
/// types.register("exact", |value, args| {
///     args.first().is_some_and(|expected| value.as_str() == Some(*expected))
/// });
///
/// let spec = TypeSpec::parse("exact:test");
/// assert!(types.check(&spec, &Value::from("test")).unwrap());
/// assert!(!types.check(&spec, &Value::from("other")).unwrap());
/// assert!(types.resolve("uuid").is_err());
/// ```
#[derive(Clone)]
pub struct TypeRegistry {
    types: HashMap<String, Predicate>,
}

impl TypeRegistry {
    /// Creates a registry without any types.
    pub fn empty() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Creates a registry holding the built-in types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        for (name, builtin) in BUILTINS {
            registry.register(*name, *builtin);
        }
        registry
    }

    /// Registers `predicate` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
    where
        F: Fn(&Value, &[&str]) -> bool + Send + Sync + 'static,
    {
        self.types.insert(name.into(), Arc::new(predicate));
    }

    /// Registers an already shared predicate under `name`.
    pub fn register_predicate(&mut self, name: impl Into<String>, predicate: Predicate) {
        self.types.insert(name.into(), predicate);
    }

    /// Looks up the predicate registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::UnknownType`] if nothing is registered.
    pub fn resolve(&self, name: &str) -> Result<&Predicate> {
        self.types
            .get(name)
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolves `spec` and applies it to `value` with the specifier's static
    /// arguments.
    pub fn check(&self, spec: &TypeSpec, value: &Value) -> Result<bool> {
        let predicate = self.resolve(spec.name())?;
        let args: Vec<&str> = spec.args().iter().map(String::as_str).collect();
        Ok(predicate(value, &args))
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("types", &self.names())
            .finish()
    }
}

fn is_array(value: &Value, _: &[&str]) -> bool {
    value.is_array_like()
}

fn is_bool(value: &Value, _: &[&str]) -> bool {
    matches!(value, Value::Bool(_))
}

fn is_callable(value: &Value, _: &[&str]) -> bool {
    value.as_host().is_some_and(|host| host.is_invocable())
}

fn is_closure(value: &Value, _: &[&str]) -> bool {
    value
        .as_host()
        .is_some_and(|host| host.kind == HostKind::Closure)
}

fn is_int(value: &Value, _: &[&str]) -> bool {
    matches!(value, Value::Int(_))
}

fn is_iterable(value: &Value, _: &[&str]) -> bool {
    match value {
        Value::Sequence(_) | Value::Mapping(_) => true,
        Value::Opaque(host) => host.iterable,
        _ => false,
    }
}

fn is_float(value: &Value, _: &[&str]) -> bool {
    matches!(value, Value::Float(_))
}

fn is_string(value: &Value, _: &[&str]) -> bool {
    matches!(value, Value::String(_))
}

fn is_object(value: &Value, _: &[&str]) -> bool {
    matches!(value, Value::Mapping(_) | Value::Opaque(_))
}

fn is_resource(value: &Value, _: &[&str]) -> bool {
    value
        .as_host()
        .is_some_and(|host| host.kind == HostKind::Resource)
}

fn is_type(value: &Value, args: &[&str]) -> bool {
    match (value.as_host(), args.first()) {
        (Some(host), Some(class)) => host.class == *class,
        _ => false,
    }
}

fn implements(value: &Value, args: &[&str]) -> bool {
    match (value.as_host(), args.first()) {
        (Some(host), Some(interface)) => host.implements(interface),
        _ => false,
    }
}
