use std::path::{Path, PathBuf};

use serde_json::json;
use shape_schema_core::{SchemaError, Value};
use shape_schema_loader::{
    LoaderError, ProjectConfig, SchemaLoader, SchemaSource, load_schema, read_value,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn testdata(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("testdata")
        .join(name)
}

fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

// ---------------------------------------------------------------------------
// Single file
// ---------------------------------------------------------------------------

#[test]
fn test_json_schema() {
    let schema = load_schema(testdata("user.json")).unwrap();
    assert!(schema.valid(&value(json!({"name": "jimmy", "age": 24}))).unwrap());
}

#[test]
fn test_json_schema_resolve() {
    let schema = load_schema(testdata("user.json")).unwrap();
    let resolved = schema
        .resolve(&value(json!({"name": "jimmy", "age": 24, "tags": []})))
        .unwrap();

    assert_eq!(
        resolved,
        value(json!({
            "address": {"street": "Main Street", "city": "Stockholm"},
            "tags": ["member"],
            "name": "jimmy",
            "age": 24
        }))
    );
}

#[test]
fn test_yaml_fragment_alone_is_a_bare_schema() {
    let schema = load_schema(testdata("user-extra.yaml")).unwrap();
    assert_eq!(schema.schema().len(), 2);
    assert!(schema.defaults().is_empty());
    assert!(schema.valid(&value(json!({"address": {}}))).unwrap());
    assert_eq!(
        schema.valid(&value(json!({}))),
        Err(SchemaError::MissingValue("address".into()))
    );
}

// ---------------------------------------------------------------------------
// Project config
// ---------------------------------------------------------------------------

#[test]
fn test_project_config_sources() {
    let loader = SchemaLoader::from_config(testdata("project.yml")).unwrap();
    assert_eq!(
        loader.sources(),
        [
            SchemaSource::Fragment(testdata("user.json")),
            SchemaSource::Fragment(testdata("user-extra.yaml")),
            SchemaSource::Defaults(testdata("user-defaults.yaml")),
        ]
    );
}

#[test]
fn test_project_config_merges_fragments_and_defaults() {
    let schema = SchemaLoader::from_config(testdata("project.yml"))
        .unwrap()
        .build()
        .unwrap();

    let address = schema
        .schema()
        .get("address")
        .and_then(|node| node.as_mapping())
        .unwrap();
    assert_eq!(address.keys().collect::<Vec<_>>(), vec!["street", "city", "zip"]);

    assert_eq!(
        schema.resolve(&value(json!({"name": "jimmy"}))).unwrap(),
        value(json!({
            "address": {"street": "Main Street", "city": "Gothenburg"},
            "tags": ["member"],
            "age": 18,
            "name": "jimmy"
        }))
    );
}

#[test]
fn test_project_config_rejects_invalid_input() {
    let schema = SchemaLoader::from_config(testdata("project.yml"))
        .unwrap()
        .build()
        .unwrap();

    let err = schema
        .resolve(&value(json!({"name": "jimmy", "address": {"street": 5}})))
        .unwrap_err();
    assert!(matches!(err, SchemaError::SchemaMismatch(mismatch) if mismatch.path == "address.street"));

    let err = schema
        .valid(&value(json!({"name": "jimmy", "phone": "123"})))
        .unwrap_err();
    assert_eq!(err, SchemaError::MissingSchemaType("phone".into()));
}

#[test]
fn test_project_config_written_to_scratch_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::copy(testdata("user.json"), dir.path().join("user.json")).unwrap();
    std::fs::write(dir.path().join("lint.json"), r#"{"id": "uuid", "tags": ["label"]}"#).unwrap();

    let config_path = dir.path().join("project.yml");
    ProjectConfig::new(vec!["user.json".into(), "lint.json".into()])
        .save(&config_path)
        .unwrap();

    let schema = SchemaLoader::from_config(&config_path)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(schema.unknown_types(), vec!["uuid", "label"]);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn test_unsupported_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.toml");
    std::fs::write(&path, "name = 'string'").unwrap();

    assert!(matches!(
        read_value(&path),
        Err(LoaderError::UnsupportedFormat(p)) if p == path
    ));
}

#[test]
fn test_malformed_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    std::fs::write(&path, "{\"name\": ").unwrap();

    assert!(matches!(load_schema(&path), Err(LoaderError::Json(_))));
}

#[test]
fn test_missing_config() {
    assert!(matches!(
        SchemaLoader::from_config("/nonexistent/.shape-schema.yml"),
        Err(LoaderError::Io(_))
    ));
}
