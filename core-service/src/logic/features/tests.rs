//! Request validation tests for the feature schema

use serde_json::{json, Value};

use super::layout::{layout_hash, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
use super::vector::{build_feature_vector, FeatureVector, FeatureVectorBuilder, RawInputs};
use crate::logic::error::SchemaError;

fn inputs(value: Value) -> RawInputs {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

fn complete() -> RawInputs {
    inputs(json!({
        "temperature": 20,
        "humidity": 60,
        "precipitation": 10,
        "trees_replanted": 200,
        "trees_infected": 150
    }))
}

#[test]
fn test_complete_input_builds_in_layout_order() {
    let vector = build_feature_vector(&complete()).unwrap();
    assert_eq!(vector.as_array(), &[20.0, 60.0, 10.0, 200.0, 150.0]);
    assert_eq!(vector.version, FEATURE_VERSION);
    assert_eq!(vector.layout_hash, layout_hash());
    assert!(vector.validate().is_ok());
}

#[test]
fn test_key_order_does_not_matter() {
    let shuffled = inputs(json!({
        "trees_infected": 150,
        "precipitation": 10,
        "temperature": 20,
        "trees_replanted": 200,
        "humidity": 60
    }));

    assert_eq!(
        build_feature_vector(&shuffled).unwrap(),
        build_feature_vector(&complete()).unwrap()
    );
}

#[test]
fn test_each_missing_key_is_reported() {
    for &name in FEATURE_LAYOUT {
        let mut raw = complete();
        raw.remove(name);
        assert_eq!(build_feature_vector(&raw), Err(SchemaError::MissingField(name)));
    }
}

#[test]
fn test_null_and_blank_are_missing() {
    let mut raw = complete();
    raw.insert("humidity".into(), Value::Null);
    assert_eq!(build_feature_vector(&raw), Err(SchemaError::MissingField("humidity")));

    let mut raw = complete();
    raw.insert("precipitation".into(), json!("   "));
    assert_eq!(
        build_feature_vector(&raw),
        Err(SchemaError::MissingField("precipitation"))
    );
}

#[test]
fn test_legacy_field_name_is_not_accepted() {
    // Old form ids ("umid") must surface as a missing field, not be guessed
    let mut raw = complete();
    let value = raw.remove("humidity").unwrap();
    raw.insert("umid".into(), value);
    assert_eq!(build_feature_vector(&raw), Err(SchemaError::MissingField("humidity")));
}

#[test]
fn test_numeric_strings_are_coerced() {
    let mut raw = complete();
    raw.insert("temperature".into(), json!(" 21.5 "));
    let vector = build_feature_vector(&raw).unwrap();
    assert_eq!(vector.get_by_name("temperature"), Some(21.5));
}

#[test]
fn test_invalid_types_are_rejected() {
    let bad_values = [json!("warm"), json!(true), json!([1, 2]), json!({"v": 1}), json!("NaN"), json!("inf")];

    for bad in bad_values {
        let mut raw = complete();
        raw.insert("trees_infected".into(), bad.clone());
        match build_feature_vector(&raw) {
            Err(SchemaError::InvalidType { field, .. }) => assert_eq!(field, "trees_infected"),
            other => panic!("expected InvalidType for {}, got {:?}", bad, other),
        }
    }
}

#[test]
fn test_first_failure_in_layout_order_wins() {
    let mut raw = complete();
    raw.remove("trees_infected");
    raw.insert("temperature".into(), json!("hot"));
    assert!(matches!(
        build_feature_vector(&raw),
        Err(SchemaError::InvalidType { field: "temperature", .. })
    ));
}

#[test]
fn test_unknown_keys_are_ignored() {
    let mut raw = complete();
    raw.insert("n_clicks".into(), json!(3));
    assert!(build_feature_vector(&raw).is_ok());
}

#[test]
fn test_wrong_count_slice_is_rejected() {
    let four = [1.0, 2.0, 3.0, 4.0];
    assert_eq!(
        FeatureVector::try_from(&four[..]),
        Err(SchemaError::FeatureCount { expected: FEATURE_COUNT, actual: 4 })
    );

    let five = [1.0, 2.0, 3.0, 4.0, 5.0];
    assert!(FeatureVector::try_from(&five[..]).is_ok());
}

#[test]
fn test_builder_matches_request_path() {
    let built = FeatureVectorBuilder::new()
        .trees_infected(150.0)
        .temperature(20.0)
        .humidity(60.0)
        .trees_replanted(200.0)
        .precipitation(10.0)
        .build();

    assert_eq!(built, build_feature_vector(&complete()).unwrap());
}

#[test]
fn test_to_log_entry() {
    let vector = build_feature_vector(&complete()).unwrap();
    let entry = vector.to_log_entry();
    assert_eq!(entry["feature_version"], FEATURE_VERSION);
    assert_eq!(entry["named_values"]["humidity"], 60.0);
}
