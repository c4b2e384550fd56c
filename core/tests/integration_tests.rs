use serde_json::json;
use shape_schema_core::{
    HostObject, Mapping, Mismatch, Schema, SchemaDocument, SchemaError, SchemaNode, Value,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

fn mapping(json: serde_json::Value) -> Mapping {
    match Value::from(json) {
        Value::Mapping(map) => map,
        other => panic!("expected mapping, got {other:?}"),
    }
}

fn person(name: &str) -> HostObject {
    HostObject::object("Person")
        .implementing("Stringable")
        .with_properties([("name", Value::from(name))].into_iter().collect())
}

fn is_md5(value: &Value, _: &[&str]) -> bool {
    value.as_str().is_some_and(|s| {
        s.len() == 32 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    })
}

fn full_schema() -> Schema {
    let mut document = SchemaDocument::try_from(value(json!({
        "name": "string",
        "age": "integer",
        "item": {
            "id": "int",
            "name": "is_string"
        },
        "is_admin": "boolean?",
        "names": ["string"],
        "objs": [{"name": "string", "age": "int"}],
        "func": "function",
        "closure": "closure",
        "person": "type:Person",
        "implements": "implements:Stringable",
        "defaults": {"name": "string", "age": "integer"}
    })))
    .unwrap();
    document.schema.insert("md5", SchemaNode::predicate(is_md5));
    document.defaults = mapping(json!({"defaults": {"name": "default", "age": 27}}));

    let mut schema = Schema::from_document(document);
    schema.add_type("is_string", "string");
    schema.add_type(
        "exact",
        SchemaNode::predicate(|value, args| {
            args.first().is_some_and(|expected| value.as_str() == Some(*expected))
        }),
    );
    schema
        .add_schema_value(value(json!({"item": {"exact": "exact:test"}})))
        .unwrap();
    schema
}

fn full_input() -> Mapping {
    let mut input = mapping(json!({
        "name": "jimmy",
        "age": 24,
        "item": {"id": 2, "name": "Test", "exact": "test"},
        "md5": "5d41402abc4b2a76b9719d911017c592",
        "names": ["foo", "bar", "baz"],
        "objs": [{"name": "jimmy", "age": 24}]
    }));
    input.insert("func", Value::from(HostObject::function("is_string")));
    input.insert("closure", Value::from(HostObject::closure()));
    input.insert("person", Value::from(person("Fredrik")));
    input.insert("implements", Value::from(person("Fredrik")));
    input
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

#[test]
fn test_full_schema() {
    let schema = full_schema();
    assert!(schema.valid(&Value::Mapping(full_input())).unwrap());
}

#[test]
fn test_full_schema_reports_first_failure() {
    let schema = full_schema();

    let mut input = full_input();
    input.insert("md5", Value::from("not-a-hash"));
    assert_eq!(
        schema.explain(&Value::Mapping(input)).unwrap(),
        Some(Mismatch::new("md5", "<predicate>", "string"))
    );

    let mut input = full_input();
    input.insert("person", Value::from(HostObject::object("Animal")));
    assert!(!schema.valid(&Value::Mapping(input)).unwrap());

    let mut input = full_input();
    input.insert("closure", Value::from(HostObject::function("strlen")));
    assert!(!schema.valid(&Value::Mapping(input)).unwrap());

    let mut input = full_input();
    input.insert(
        "item",
        value(json!({"id": 2, "name": "Test", "exact": "other"})),
    );
    assert_eq!(
        schema.explain(&Value::Mapping(input)).unwrap(),
        Some(Mismatch::new("item.exact", "exact:test", "string"))
    );
}

#[test]
fn test_full_schema_structural_errors() {
    let schema = full_schema();

    let mut input = full_input();
    input.remove("name");
    assert_eq!(
        schema.valid(&Value::Mapping(input)),
        Err(SchemaError::MissingValue("name".into()))
    );

    let mut input = full_input();
    input.insert("nickname", Value::from("jim"));
    assert_eq!(
        schema.valid(&Value::Mapping(input)),
        Err(SchemaError::MissingSchemaType("nickname".into()))
    );

    let mut input = full_input();
    input.insert("objs", value(json!([{"name": "jimmy"}])));
    assert_eq!(
        schema.valid(&Value::Mapping(input)),
        Err(SchemaError::MissingValue("objs.0.age".into()))
    );
}

#[test]
fn test_default_schema() {
    let expected = json!({"name": "jimmy", "age": 24});
    let document = SchemaDocument::new(
        SchemaDocument::try_from(value(json!({"name": "string", "age": "integer"})))
            .unwrap()
            .schema,
        mapping(expected.clone()),
    );
    let schema = Schema::from_document(document);

    assert_eq!(
        schema.resolve(&value(json!({"name": "jimmy"}))).unwrap(),
        value(expected)
    );
}

#[test]
fn test_empty_schema() {
    let schema = Schema::default();
    assert!(schema.valid(&Value::Mapping(Mapping::new())).unwrap());
    assert_eq!(
        schema.valid(&value(json!({"name": "a"}))),
        Err(SchemaError::MissingSchemaType("name".into()))
    );
}

#[test]
fn test_class_schema() {
    let schema = Schema::from_value(value(json!({"name": "string"}))).unwrap();
    assert!(schema.valid(&Value::from(person("Fredrik"))).unwrap());
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn test_sequence_validation_matches_per_element_validation() {
    let list = Schema::from_value(value(json!({"k": ["int"]}))).unwrap();
    let single = Schema::from_value(value(json!({"0": "int"}))).unwrap();

    let cases = [json!([1, 2, 3]), json!([1, "2", 3]), json!([true])];
    for elements in cases {
        let per_element = elements
            .as_array()
            .unwrap()
            .iter()
            .all(|element| single.valid(&value(json!({"0": element}))).unwrap());
        let whole = list.valid(&value(json!({"k": elements}))).unwrap();
        assert_eq!(whole, per_element, "elements: {elements}");
    }
}

#[test]
fn test_resolve_is_idempotent() {
    let schema = Schema::from_value(value(json!({
        "schema": {
            "name": "string",
            "item": {"id": "int", "label": "string"},
            "tags": ["string"]
        },
        "default": {"name": "default", "item": {"id": 1, "label": "none"}}
    })))
    .unwrap();

    let input = value(json!({"item": {"label": "x"}, "tags": ["a"]}));
    let once = schema.resolve(&input).unwrap();
    let twice = schema.resolve(&once).unwrap();

    assert_eq!(
        once,
        value(json!({"name": "default", "item": {"id": 1, "label": "x"}, "tags": ["a"]}))
    );
    assert_eq!(once, twice);
}

#[test]
fn test_falsy_values_take_the_default() {
    let schema = Schema::from_value(value(json!({
        "schema": {"age": "int", "admin": "bool", "name": "string"},
        "default": {"age": 27, "admin": true, "name": "default"}
    })))
    .unwrap();

    let resolved = schema
        .resolve(&value(json!({"age": 0, "admin": false, "name": "0"})))
        .unwrap();
    assert_eq!(
        resolved,
        value(json!({"age": 27, "admin": true, "name": "default"}))
    );
}

#[test]
fn test_resolve_rejects_invalid_input() {
    let schema = Schema::from_value(value(json!({"names": ["string"]}))).unwrap();

    let err = schema
        .resolve(&value(json!({"names": ["a", 2]})))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "schema and input value don't match: field 'names.1': expected string, got int"
    );
}
