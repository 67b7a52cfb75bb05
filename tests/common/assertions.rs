//! Assertion helpers for tests.

use axum::http::StatusCode;
use field_engine::{Color, PixelField};
use pretty_assertions::assert_eq;

use super::app::TestResponse;

/// Assert response has expected status code
pub fn assert_status(response: &TestResponse, expected: StatusCode) {
    assert_eq!(
        response.status, expected,
        "Expected status {}, got {}. Body: {}",
        expected,
        response.status,
        response.text()
    );
}

/// Assert response is OK (200)
pub fn assert_ok(response: &TestResponse) {
    assert_status(response, StatusCode::OK);
}

/// Assert an error response carries the `{status, error}` body
pub fn assert_error(response: &TestResponse, expected: StatusCode) {
    assert_status(response, expected);
    let json: serde_json::Value = response.json();
    assert_eq!(
        json["status"].as_u64(),
        Some(expected.as_u16() as u64),
        "Expected JSON status {}. Full response: {}",
        expected.as_u16(),
        serde_json::to_string_pretty(&json).unwrap()
    );
    assert!(json["error"].is_string(), "Expected error message");
}

/// Decode a base64 PNG field from a JSON response
pub fn decode_field(json: &serde_json::Value, key: &str) -> PixelField {
    let data = json[key]
        .as_str()
        .unwrap_or_else(|| panic!("Expected base64 string in `{key}`"));
    sparsefield::services::decode_base64_png(data).expect("Failed to decode PNG")
}

/// Assert every pixel of a field has the given color
pub fn assert_uniform(field: &PixelField, color: Color) {
    let odd = field.pixels().iter().position(|&c| c != color);
    assert_eq!(odd, None, "Expected every pixel to be {color}");
}
