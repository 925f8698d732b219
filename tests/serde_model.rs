//! Serialization of the schema model and diagnostics.

#![cfg(feature = "serde")]

use serde_json::json;
use sqlite_schema_rs::SchemaParser;

#[test]
fn test_schema_serializes_with_indices() {
    let parsed = SchemaParser::new(
        "schema.sql",
        "CREATE TEMP TABLE b (aid REFERENCES a(id));\nCREATE TABLE a (id);",
    )
    .parse()
    .unwrap();
    let value = serde_json::to_value(&parsed.schema).unwrap();

    let tables = value["tables"].as_array().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0]["name"], "b");
    assert_eq!(tables[0]["id"], json!(0));
    assert_eq!(tables[0]["flags"], "TEMPORARY");

    let aid = &tables[0]["columns"][0];
    assert_eq!(aid["name"], "aid");
    assert_eq!(aid["foreign_key"], json!({ "table": 1, "column": 0 }));
    assert_eq!(value["sorted"], json!([1, 0]));
}

#[test]
fn test_diagnostics_serialize() {
    let parsed = SchemaParser::new("schema.sql", "CREATE INDEX i ON t(c);")
        .parse()
        .unwrap();
    let value = serde_json::to_value(&parsed.diagnostics).unwrap();
    assert_eq!(
        value,
        json!([{
            "position": { "offset": 7, "line": 1, "column": 8 },
            "kind": "IgnoredCreation",
        }])
    );
}
