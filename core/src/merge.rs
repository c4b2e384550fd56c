//! Deep merging of schema fragments, defaults, and resolved input.
//!
//! Two policies live here:
//!
//! - **Fragment merge** ([`merge_schema`], [`merge_defaults`]): mappings are
//!   unioned key by key, recursing where both sides hold a mapping; any other
//!   node is replaced by the overlay. Earlier leaves survive unless the
//!   overlay defines the exact same path.
//! - **Default fill** ([`fill_defaults`]): used by resolve. Input values win,
//!   except that an absent or empty input value takes the default. Mappings
//!   recurse by key and sequences by position.
//!
//! # Example
//!
//! ```
//! use shape_schema_core::*;
//! use serde_json::json;
//!
//! let defaults = Value::from(json!({"name": "default", "age": 27}));
//! let input = Value::from(json!({"name": "jimmy", "age": 0}));
//!
//! let merged = fill_defaults(defaults.as_mapping().unwrap(), input.as_mapping().unwrap());
//! assert_eq!(Value::Mapping(merged), Value::from(json!({"name": "jimmy", "age": 27})));
//! ```

use crate::{Map, Mapping, SchemaNode, Value};

/// Merges `overlay` schema fields into `base`.
pub fn merge_schema(base: &mut Map<SchemaNode>, overlay: Map<SchemaNode>) {
    for (key, node) in overlay {
        match node {
            SchemaNode::Mapping(fields) => match base.get_mut(&key) {
                Some(SchemaNode::Mapping(existing)) => merge_schema(existing, fields),
                _ => {
                    base.insert(key, SchemaNode::Mapping(fields));
                }
            },
            node => {
                base.insert(key, node);
            }
        }
    }
}

/// Merges `overlay` defaults into `base`.
pub fn merge_defaults(base: &mut Mapping, overlay: Mapping) {
    for (key, value) in overlay {
        match value {
            Value::Mapping(fields) => match base.get_mut(&key) {
                Some(Value::Mapping(existing)) => merge_defaults(existing, fields),
                _ => {
                    base.insert(key, Value::Mapping(fields));
                }
            },
            value => {
                base.insert(key, value);
            }
        }
    }
}

/// Fills absent or empty `input` fields from `defaults`, recursively.
///
/// Keys keep the defaults' order, followed by keys only the input has.
pub fn fill_defaults(defaults: &Mapping, input: &Mapping) -> Mapping {
    let novel = input.keys().filter(|key| !defaults.contains_key(key));
    defaults
        .keys()
        .chain(novel)
        .filter_map(|key| {
            fill_value(defaults.get(key), input.get(key)).map(|value| (key, value))
        })
        .collect()
}

fn fill_value(default: Option<&Value>, input: Option<&Value>) -> Option<Value> {
    let default = default.filter(|value| !value.is_null());
    match (default, input) {
        (Some(default), None) => Some(default.clone()),
        (Some(default), Some(input)) if input.is_empty() => Some(default.clone()),
        (Some(Value::Mapping(default)), Some(Value::Mapping(input))) => {
            Some(Value::Mapping(fill_defaults(default, input)))
        }
        (Some(Value::Sequence(default)), Some(Value::Sequence(input))) => {
            Some(Value::Sequence(fill_sequence(default, input)))
        }
        (_, input) => input.cloned(),
    }
}

fn fill_sequence(defaults: &[Value], input: &[Value]) -> Vec<Value> {
    (0..defaults.len().max(input.len()))
        .filter_map(|i| fill_value(defaults.get(i), input.get(i)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mapping(json: serde_json::Value) -> Mapping {
        match Value::from(json) {
            Value::Mapping(map) => map,
            other => panic!("expected mapping, got {other:?}"),
        }
    }

    #[test]
    fn test_merge_defaults_recurses_and_replaces_leaves() {
        let mut base = mapping(json!({
            "name": "a",
            "nested": {"keep": 1, "replace": 2},
            "list": [1, 2, 3]
        }));
        merge_defaults(
            &mut base,
            mapping(json!({
                "nested": {"replace": 20, "added": 30},
                "list": [9],
                "extra": true
            })),
        );

        assert_eq!(
            Value::Mapping(base),
            Value::from(json!({
                "name": "a",
                "nested": {"keep": 1, "replace": 20, "added": 30},
                "list": [9],
                "extra": true
            }))
        );
    }

    #[test]
    fn test_merge_schema_unions_nested_fields() {
        let mut base: Map<SchemaNode> = [
            ("name", SchemaNode::from("string")),
            (
                "item",
                SchemaNode::Mapping([("id", SchemaNode::from("int"))].into_iter().collect()),
            ),
        ]
        .into_iter()
        .collect();

        let overlay: Map<SchemaNode> = [
            (
                "item",
                SchemaNode::Mapping([("exact", SchemaNode::from("exact:test"))].into_iter().collect()),
            ),
            ("name", SchemaNode::from("string?")),
        ]
        .into_iter()
        .collect();

        merge_schema(&mut base, overlay);

        assert!(base.get("name").unwrap().is_optional());
        let item = base.get("item").and_then(SchemaNode::as_mapping).unwrap();
        assert_eq!(item.keys().collect::<Vec<_>>(), vec!["id", "exact"]);
    }

    #[test]
    fn test_merge_schema_replaces_leaf_with_mapping() {
        let mut base: Map<SchemaNode> = [("item", SchemaNode::from("array"))].into_iter().collect();
        let overlay: Map<SchemaNode> = [(
            "item",
            SchemaNode::Mapping([("id", SchemaNode::from("int"))].into_iter().collect()),
        )]
        .into_iter()
        .collect();

        merge_schema(&mut base, overlay);
        assert!(base.get("item").and_then(SchemaNode::as_mapping).is_some());
    }

    #[test]
    fn test_fill_defaults_replaces_falsy_input() {
        let defaults = mapping(json!({"name": "default", "age": 27, "admin": true}));
        let input = mapping(json!({"name": "", "age": 0, "admin": false, "extra": "x"}));

        assert_eq!(
            Value::Mapping(fill_defaults(&defaults, &input)),
            Value::from(json!({"name": "default", "age": 27, "admin": true, "extra": "x"}))
        );
    }

    #[test]
    fn test_fill_defaults_nested_and_positional() {
        let defaults = mapping(json!({
            "item": {"id": 1, "name": "unnamed"},
            "objs": [{"name": "first", "age": 1}, {"name": "second", "age": 2}]
        }));
        let input = mapping(json!({
            "item": {"name": "Test"},
            "objs": [{"name": "jimmy", "age": 0}]
        }));

        assert_eq!(
            Value::Mapping(fill_defaults(&defaults, &input)),
            Value::from(json!({
                "item": {"id": 1, "name": "Test"},
                "objs": [{"name": "jimmy", "age": 1}, {"name": "second", "age": 2}]
            }))
        );
    }

    #[test]
    fn test_fill_defaults_ignores_null_defaults() {
        let defaults = mapping(json!({"nickname": null}));
        let input = mapping(json!({}));
        assert!(fill_defaults(&defaults, &input).is_empty());
    }

    #[test]
    fn test_fill_defaults_is_idempotent() {
        let defaults = mapping(json!({"name": "default", "tags": ["a"]}));
        let input = mapping(json!({"tags": ["b", "c"]}));

        let once = fill_defaults(&defaults, &input);
        let twice = fill_defaults(&defaults, &once);
        assert_eq!(once, twice);
    }
}
