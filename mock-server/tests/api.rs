use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, FetchRecord, PIXEL_PNG};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- fetch ---

#[tokio::test]
async fn fetch_returns_png() {
    let app = app();
    let resp = app
        .oneshot(get("/imaginary/images/fetch/w_100/https://example.com/logo.jpg"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "image/png");
    assert!(resp.headers().contains_key("x-request-id"));
    assert_eq!(body_bytes(resp).await.as_ref(), PIXEL_PNG);
}

#[tokio::test]
async fn fetch_without_source_returns_404() {
    let app = app();
    let resp = app
        .oneshot(get("/imaginary/images/fetch/w_100/"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_resource_returns_404() {
    let app = app();
    let resp = app
        .oneshot(get("/imaginary/videos/fetch/https://example.com/clip.mp4"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- requests log ---

#[tokio::test]
async fn requests_empty() {
    let app = app();
    let resp = app.oneshot(get("/requests")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let records: Vec<FetchRecord> = body_json(resp).await;
    assert!(records.is_empty());
}

#[tokio::test]
async fn fetches_are_recorded_in_order() {
    let app = app();

    let resp = app
        .clone()
        .oneshot(get("/imaginary/images/fetch/w_100,c_fit,g_top/https://example.com/logo.jpg"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let id = resp.headers()["x-request-id"].to_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(get("/tenant/images/fetch/https://example.com/other.png"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.oneshot(get("/requests")).await.unwrap();
    let records: Vec<FetchRecord> = body_json(resp).await;
    assert_eq!(records.len(), 2);

    assert_eq!(records[0].id.to_string(), id);
    assert_eq!(records[0].client, "imaginary");
    assert_eq!(
        records[0].manipulations,
        vec![
            ("w".to_string(), "100".to_string()),
            ("c".to_string(), "fit".to_string()),
            ("g".to_string(), "top".to_string()),
        ]
    );
    assert_eq!(records[0].source, "https://example.com/logo.jpg");

    assert_eq!(records[1].client, "tenant");
    assert!(records[1].manipulations.is_empty());
    assert_eq!(records[1].source, "https://example.com/other.png");
}
