//! Exercises the JS-facing surface. Run with `wasm-pack test --headless --firefox`.
#![cfg(target_arch = "wasm32")]

use serde::Serialize;
use serde_json::json;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

use tracker_engine::TrackerSession;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn test_default_config_from_undefined() {
    let mut s = TrackerSession::new(JsValue::UNDEFINED).unwrap();
    s.init(0.0);
    assert!(s.is_running());
    assert!(!s.api_connected());
    assert!(!s.frame(0.0).is_null());
}

#[wasm_bindgen_test]
fn test_blocked_submit_throws() {
    let mut s = TrackerSession::new(JsValue::UNDEFINED).unwrap();
    s.init(0.0);
    assert!(s.submit("check this domain").is_err());
    assert!(s.submit("   ").unwrap().is_null());
}

#[wasm_bindgen_test]
fn test_chart_data_null_until_result() {
    let s = TrackerSession::new(JsValue::UNDEFINED).unwrap();
    assert!(s.get_chart_data().is_null());
    assert!(s.get_selected().is_null());
}

#[wasm_bindgen_test]
fn test_camel_case_config_object() {
    let config = json!({ "apiKey": "k", "pulseSpawnIntervalMs": 500 })
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .unwrap();
    let mut s = TrackerSession::new(config).unwrap();
    assert!(s.api_connected());
    s.init(0.0);
    s.frame(500.0);
    assert!(!s.get_pulses().is_null());
}
