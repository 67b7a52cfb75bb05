//! Tests for /api/reconstruct and /api/nearest endpoints.

mod common;

use axum::http::StatusCode;
use common::fixtures::{b64, halves, positions, BLUE, RED};
use common::TestApp;
use field_engine::{Color, PixelField};
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_reconstruct_one_point_per_half() {
    let app = TestApp::new();
    let image = halves(10, 6);

    let response = app
        .post_json(
            "/api/reconstruct",
            &json!({
                "image": b64(&image),
                "positions": positions(&[(3, 1), (3, 8)]),
                "mask": "00011",
            }),
        )
        .await;

    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(common::decode_field(&json, "image"), image);
    assert_eq!(json["points"][0]["color"], RED.to_hex());
    assert_eq!(json["points"][1]["color"], BLUE.to_hex());
}

#[tokio::test]
async fn test_reconstruct_single_point_fills_canvas() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/reconstruct",
            &json!({ "image": b64(&halves(6, 4)), "positions": positions(&[(0, 5)]) }),
        )
        .await;

    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    common::assert_uniform(&common::decode_field(&json, "image"), BLUE);
}

#[tokio::test]
async fn test_reconstruct_without_points_conflicts() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/reconstruct",
            &json!({ "image": b64(&halves(4, 4)), "positions": [] }),
        )
        .await;

    common::assert_error(&response, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_reconstruct_position_outside_image() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/reconstruct",
            &json!({ "image": b64(&halves(4, 4)), "positions": positions(&[(4, 0)]) }),
        )
        .await;

    common::assert_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_reconstruct_bad_mask() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/reconstruct",
            &json!({
                "image": b64(&halves(4, 4)),
                "positions": positions(&[(0, 0)]),
                "mask": "1x111",
            }),
        )
        .await;

    common::assert_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nearest_three_corners() {
    let app = TestApp::new();
    let image = PixelField::filled(10, 10, Color::WHITE);
    let corners = positions(&[(0, 0), (0, 9), (9, 0)]);

    for ((row, col), expected) in [((1, 1), 0), ((8, 1), 2), ((1, 8), 1)] {
        let response = app
            .post_json(
                "/api/nearest",
                &json!({
                    "image": b64(&image),
                    "positions": corners,
                    "query": { "row": row, "col": col },
                    "mask": "00011",
                }),
            )
            .await;

        common::assert_ok(&response);
        let json: serde_json::Value = response.json();
        assert_eq!(json["index"], expected, "query ({row}, {col})");
    }
}

#[tokio::test]
async fn test_nearest_reports_point_details() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/nearest",
            &json!({
                "image": b64(&halves(10, 4)),
                "positions": positions(&[(0, 0), (2, 9)]),
                "query": { "row": 3, "col": 7 },
            }),
        )
        .await;

    common::assert_ok(&response);
    let json: serde_json::Value = response.json();
    assert_eq!(json["index"], 1);
    assert_eq!(json["position"], json!({ "row": 2, "col": 9 }));
    assert_eq!(json["color"], BLUE.to_hex());
}

#[tokio::test]
async fn test_nearest_query_out_of_bounds() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/nearest",
            &json!({
                "image": b64(&halves(4, 4)),
                "positions": positions(&[(0, 0)]),
                "query": { "row": 0, "col": 40 },
            }),
        )
        .await;

    common::assert_error(&response, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_nearest_without_points_conflicts() {
    let app = TestApp::new();
    let response = app
        .post_json(
            "/api/nearest",
            &json!({
                "image": b64(&halves(4, 4)),
                "positions": [],
                "query": { "row": 0, "col": 0 },
            }),
        )
        .await;

    common::assert_error(&response, StatusCode::CONFLICT);
}
