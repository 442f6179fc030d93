//! Tests against the inverter schema shipped with the repository

use serde_json::{json, Value};
use solmaint_domain::FieldMap;
use solmaint_gatekeeper::{GatekeeperError, SchemaValidator};
use std::fs;
use std::path::Path;

const INVERTER_SCHEMA: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../schemas/inverter_schema.json");

fn map(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn inverter_data() -> FieldMap {
    map(json!({
        "supplier_name": "SolarTech Inc",
        "product_code": "INV-5000",
        "description": "5000W Inverter",
        "startup_voltage": "150V",
        "firmware_version": "v2.1.4",
        "valid_from": "2024-01-01T00:00:00Z",
        "valid_to": "2024-12-31T23:59:59Z"
    }))
}

#[test]
fn test_inverter_schema_accepts_complete_record() {
    let validator = SchemaValidator::load(Path::new(INVERTER_SCHEMA)).unwrap();

    let mut data = inverter_data();
    data.insert("unit_price".into(), json!(1299.99));
    data.insert("currency".into(), json!(" USD "));
    data.insert("effective_date".into(), json!("2024-01-01"));

    let cleaned = validator.validate(&data).unwrap();
    assert_eq!(cleaned["startup_voltage"], json!("150V"));
    assert_eq!(cleaned["currency"], json!("USD"));
    assert_eq!(cleaned.len(), 10);
}

#[test]
fn test_inverter_schema_lists_missing_fields() {
    let validator = SchemaValidator::load(Path::new(INVERTER_SCHEMA)).unwrap();
    let data = map(json!({"supplier_name": "SolarTech Inc", "product_code": "INV-5000"}));

    let missing = validator.missing_fields(&data);
    assert_eq!(
        missing,
        ["description", "startup_voltage", "firmware_version", "valid_from", "valid_to"]
    );
    assert!(!validator.is_valid(&data));
    assert!(matches!(
        validator.validate(&data),
        Err(GatekeeperError::SchemaViolation { .. })
    ));
}

#[test]
fn test_inverter_schema_rejects_bad_dates() {
    let validator = SchemaValidator::load(Path::new(INVERTER_SCHEMA)).unwrap();
    let mut data = inverter_data();
    data.insert("valid_to".into(), json!("end of year"));

    match validator.validate(&data) {
        Err(GatekeeperError::SchemaViolation { missing, invalid }) => {
            assert!(missing.is_empty());
            assert_eq!(invalid.len(), 1);
            assert_eq!(invalid[0].field, "valid_to");
        }
        other => panic!("Expected SchemaViolation, got {:?}", other),
    }
}

#[test]
fn test_missing_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = SchemaValidator::load(&dir.path().join("missing.json"));
    assert!(matches!(result, Err(GatekeeperError::SchemaNotFound(_))));
}

#[test]
fn test_malformed_schema_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("schema.json");
    fs::write(&path, "{ \"type\": ").unwrap();

    let result = SchemaValidator::load(&path);
    assert!(matches!(result, Err(GatekeeperError::InvalidSchema(_))));
}
