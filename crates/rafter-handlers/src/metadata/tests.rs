//! Unit tests for metadata lookup policy.

use serde_json::json;

use super::*;

#[test]
fn new_store_is_empty() {
    let store = MetaStore::new();
    assert!(store.is_empty());
    assert_eq!(store.len(), 0);
}

#[test]
fn lookup_returns_inserted_value() {
    let mut store = MetaStore::new();
    store.insert("instrument", json!("TOMCAT"));
    assert_eq!(store.lookup("instrument").expect("set above"), json!("TOMCAT"));
}

#[test]
fn lookup_miss_is_an_error_not_a_sentinel() {
    let store = MetaStore::new();
    let err = store.lookup("wavelength").expect_err("key is absent");
    assert!(matches!(
        err,
        HandlerError::KeyNotFound { key } if key == "wavelength"
    ));
}

#[test]
fn explicit_null_is_present() {
    let mut store = MetaStore::new();
    store.insert("comment", Value::Null);
    assert!(store.contains("comment"));
    assert_eq!(store.lookup("comment").expect("set to null"), Value::Null);
}

#[test]
fn explicit_empty_string_is_distinguishable_from_absent() {
    let mut store = MetaStore::new();
    store.insert("operator", json!(""));
    assert_eq!(store.lookup("operator").expect("set to empty"), json!(""));
    assert!(store.lookup("beamline").is_err());
}

#[test]
fn insert_replaces_previous_value() {
    let mut store = MetaStore::new();
    store.insert("exposure_time", json!(0.25));
    store.insert("exposure_time", json!(0.5));
    assert_eq!(store.lookup("exposure_time").expect("set above"), json!(0.5));
    assert_eq!(store.len(), 1);
}

#[test]
fn chained_lookup_prefers_own_store() {
    let mut own = MetaStore::new();
    own.insert("instrument", json!("local"));
    let mut fallback = MetaStore::new();
    fallback.insert("instrument", json!("base"));
    fallback.insert("facility", json!("SLS"));

    let instrument = own
        .lookup("instrument")
        .or_else(|_| fallback.lookup("instrument"))
        .expect("own store defines the key");
    assert_eq!(instrument, json!("local"));

    let facility = own
        .lookup("facility")
        .or_else(|_| fallback.lookup("facility"))
        .expect("fallback defines the key");
    assert_eq!(facility, json!("SLS"));
}

#[test]
fn serialises_transparently() {
    let store: MetaStore = [(String::from("frames"), json!(128))].into_iter().collect();
    let encoded = serde_json::to_string(&store).expect("serialises");
    assert_eq!(encoded, r#"{"frames":128}"#);
    let decoded: MetaStore = serde_json::from_str(&encoded).expect("deserialises");
    assert_eq!(decoded, store);
}
