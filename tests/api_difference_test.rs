//! Tests for /api/difference endpoint.

mod common;

use axum::http::StatusCode;
use common::fixtures::{b64, halves, noise};
use common::TestApp;
use field_engine::{Color, PixelField};
use serde_json::json;

#[tokio::test]
async fn test_identical_black_fields() {
    let app = TestApp::new();
    let black = PixelField::filled(2, 2, Color::BLACK);

    let response = app
        .post_json(
            "/api/difference",
            &json!({ "first": b64(&black), "second": b64(&black), "threshold": 0 }),
        )
        .await;

    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["matching"], 4);
    assert_eq!(json["total"], 4);
    assert_eq!(json["percentage"], 100.0);
    assert_eq!(json["rounded_percentage"], 100);
    common::assert_uniform(&common::decode_field(&json, "image"), Color::WHITE);
}

#[tokio::test]
async fn test_single_pixel_change_at_zero_threshold() {
    let app = TestApp::new();
    let a = noise(10, 10, 1);
    let mut b = a.clone();
    let c = b.get(5, 5).unwrap();
    b.set(5, 5, Color::new(c.0[0] ^ 1, c.0[1], c.0[2]));

    let response = app
        .post_json("/api/difference", &json!({ "first": b64(&a), "second": b64(&b) }))
        .await;

    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["matching"], 99);
    assert_eq!(json["rounded_percentage"], 99);
    let vis = common::decode_field(&json, "image");
    assert_eq!(vis.get(5, 5), Some(Color::new(255, 0, 0)));
    assert_eq!(vis.get(0, 0), Some(Color::WHITE));
}

#[tokio::test]
async fn test_threshold_tolerates_small_differences() {
    let app = TestApp::new();
    let a = PixelField::filled(4, 4, Color::new(100, 100, 100));
    let b = PixelField::filled(4, 4, Color::new(110, 95, 100));

    let strict = app
        .post_json(
            "/api/difference",
            &json!({ "first": b64(&a), "second": b64(&b), "threshold": 1 }),
        )
        .await;
    common::assert_ok(&strict);
    assert_eq!(strict.json::<serde_json::Value>()["matching"], 0);

    // 10 / 255 is just under 4 %
    let lenient = app
        .post_json(
            "/api/difference",
            &json!({ "first": b64(&a), "second": b64(&b), "threshold": 4 }),
        )
        .await;
    common::assert_ok(&lenient);
    assert_eq!(lenient.json::<serde_json::Value>()["matching"], 16);
}

#[tokio::test]
async fn test_dimension_mismatch() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/difference",
            &json!({ "first": b64(&halves(4, 4)), "second": b64(&halves(4, 5)) }),
        )
        .await;

    common::assert_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_threshold_out_of_range() {
    let app = TestApp::new();
    let image = halves(2, 2);
    let response = app
        .post_json(
            "/api/difference",
            &json!({ "first": b64(&image), "second": b64(&image), "threshold": -5 }),
        )
        .await;

    common::assert_error(&response, StatusCode::BAD_REQUEST);
}
