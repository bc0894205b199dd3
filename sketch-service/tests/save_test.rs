mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{pipeline_for, png_data_url, test_config, TestApp, TEST_LABELS};
use image::{Rgb, Rgba, RgbaImage};
use serde_json::{json, Value};
use sketch_service::startup::{build_router, AppState};
use tower::util::ServiceExt;

/// Opaque pixels from a xorshift stream. PNG cannot compress them, so the
/// encoded drawing stays close to its raw size.
fn noisy_drawing(width: u32, height: u32) -> RgbaImage {
    let mut state: u32 = 0x9E37_79B9;
    RgbaImage::from_fn(width, height, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let [r, g, b, _] = state.to_le_bytes();
        Rgba([r, g, b, 255])
    })
}

#[tokio::test]
async fn save_returns_labels_in_envelope() {
    let app = TestApp::spawn().await;
    let drawing = png_data_url(RgbaImage::from_pixel(480, 480, Rgba([0, 0, 0, 255])));

    let response = app.post_save(&json!({ "dataURL": drawing })).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(
        body,
        json!({
            "kwargs": { "labels": TEST_LABELS, "message": "Image saved" },
            "status": 200,
            "mimetype": "application/json"
        })
    );

    app.cleanup().await;
}

#[tokio::test]
async fn opaque_black_drawing_writes_black_grid() {
    let app = TestApp::spawn().await;
    let drawing = png_data_url(RgbaImage::from_pixel(12 * 5, 12 * 3, Rgba([0, 0, 0, 255])));

    let response = app.post_save(&json!({ "dataURL": drawing })).await;
    assert!(response.status().is_success());

    let grid = image::open(&app.artifact_path)
        .expect("Grid artifact missing")
        .to_rgb8();
    assert_eq!((grid.width(), grid.height()), (5, 3));
    assert!(grid.pixels().all(|p| *p == Rgb([0, 0, 0])));

    app.cleanup().await;
}

#[tokio::test]
async fn transparent_drawing_writes_white_grid_and_overwrites() {
    let app = TestApp::spawn().await;

    let black = png_data_url(RgbaImage::from_pixel(24, 24, Rgba([0, 0, 0, 255])));
    assert!(app
        .post_save(&json!({ "dataURL": black }))
        .await
        .status()
        .is_success());

    let transparent = png_data_url(RgbaImage::from_pixel(50, 40, Rgba([0, 0, 0, 0])));
    assert!(app
        .post_save(&json!({ "dataURL": transparent }))
        .await
        .status()
        .is_success());

    let grid = image::open(&app.artifact_path)
        .expect("Grid artifact missing")
        .to_rgb8();
    // 50x40 with 12px cells: 4x3, trailing pixels dropped.
    assert_eq!((grid.width(), grid.height()), (4, 3));
    assert!(grid.pixels().all(|p| *p == Rgb([255, 255, 255])));

    app.cleanup().await;
}

#[tokio::test]
async fn malformed_base64_fails_without_envelope() {
    let app = TestApp::spawn().await;

    let response = app
        .post_save(&json!({ "dataURL": "data:image/png;base64,@@not base64@@" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert!(body.get("kwargs").is_none());
    assert!(body.get("error").is_some());
    assert!(!app.artifact_path.exists());

    app.cleanup().await;
}

#[tokio::test]
async fn non_image_payload_fails() {
    let app = TestApp::spawn().await;

    // "hello world" in base64
    let response = app
        .post_save(&json!({ "dataURL": "data:image/png;base64,aGVsbG8gd29ybGQ=" }))
        .await;

    assert_eq!(response.status().as_u16(), 400);

    app.cleanup().await;
}

#[tokio::test]
async fn missing_data_url_field_is_rejected() {
    let app = TestApp::spawn().await;

    let response = app.post_save(&json!({ "image": "whatever" })).await;

    assert!(response.status().is_client_error());

    app.cleanup().await;
}

#[tokio::test]
async fn empty_data_url_fails_validation() {
    let app = TestApp::spawn().await;

    let response = app.post_save(&json!({ "dataURL": "" })).await;

    assert_eq!(response.status().as_u16(), 422);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Validation error");

    app.cleanup().await;
}

#[tokio::test]
async fn save_allows_cross_origin_requests() {
    let app = TestApp::spawn().await;

    let preflight = app
        .client
        .request(reqwest::Method::OPTIONS, format!("{}/save", app.address))
        .header("origin", "http://localhost:3000")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .expect("Failed to send request");

    assert!(preflight.status().is_success());
    assert_eq!(preflight.headers()["access-control-allow-origin"], "*");

    let drawing = png_data_url(RgbaImage::from_pixel(12, 12, Rgba([0, 0, 0, 255])));
    let response = app
        .client
        .post(format!("{}/save", app.address))
        .header("origin", "http://localhost:3000")
        .json(&json!({ "dataURL": drawing }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.headers()["access-control-allow-origin"], "*");

    app.cleanup().await;
}

#[tokio::test]
async fn drawings_over_two_megabytes_are_accepted() {
    let app = TestApp::spawn().await;
    let drawing = png_data_url(noisy_drawing(960, 960));
    assert!(drawing.len() > 2 * 1024 * 1024);

    let response = app.post_save(&json!({ "dataURL": drawing })).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["kwargs"]["labels"], json!(TEST_LABELS));

    let grid = image::open(&app.artifact_path)
        .expect("Grid artifact missing")
        .to_rgb8();
    assert_eq!((grid.width(), grid.height()), (80, 80));

    app.cleanup().await;
}

#[tokio::test]
async fn configured_body_limit_rejects_larger_drawings() {
    let (config, artifact_dir) = test_config();
    let state = AppState::new(pipeline_for(&config)).with_max_body_bytes(Some(1024));
    let app = build_router(state);

    let drawing = png_data_url(noisy_drawing(64, 64));
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/save")
                .header("content-type", "application/json")
                .body(Body::from(json!({ "dataURL": drawing }).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert!(!config.artifact.path.exists());

    let _ = tokio::fs::remove_dir_all(artifact_dir).await;
}
