use std::collections::HashMap;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::Query,
    http::{StatusCode, header},
    response::{IntoResponse, Redirect},
    routing::get,
};
use serde_json::json;
use tokio::net::TcpListener;

use photomania::domain::entities::PhotoId;
use photomania::domain::errors::FeedError;
use photomania::domain::ports::{ImageFetchPort, PhotoFeedPort};
use photomania::infrastructure::{FiveHundredPxClient, FiveHundredPxConfig, HttpImageFetcher};

async fn photos(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    assert_eq!(params.get("feature").map(String::as_str), Some("popular"));
    assert_eq!(params.get("consumer_key").map(String::as_str), Some("key"));

    match params.get("page").map(String::as_str) {
        Some("1") => Json(json!({
            "current_page": 1,
            "total_pages": 2,
            "photos": [
                {"id": 10, "image_url": "https://img/10.jpg", "nsfw": false},
                {"id": 11, "image_url": "https://img/11.jpg", "nsfw": true},
                {"id": 12, "image_url": "https://img/12.jpg", "nsfw": false}
            ]
        }))
        .into_response(),
        Some("2") => (StatusCode::SERVICE_UNAVAILABLE, "busy").into_response(),
        Some("4") => Json(json!({
            "photos": [
                {"id": 13, "image_url": "https://img/13.jpg", "nsfw": false},
                {"id": 14, "image_url": "https://img/14.jpg"}
            ]
        }))
        .into_response(),
        _ => (StatusCode::OK, "{not json").into_response(),
    }
}

async fn comments(Query(params): Query<HashMap<String, String>>) -> impl IntoResponse {
    assert_eq!(params.get("photo_id").map(String::as_str), Some("10"));
    assert_eq!(params.get("page").map(String::as_str), Some("1"));

    Json(json!({
        "comments": [
            {"user_fullname": "Ann", "comment_body": "Lovely <b>light</b>", "user_picture_url": "https://img/ann.png"}
        ]
    }))
}

fn png_bytes() -> Vec<u8> {
    let mut buf = std::io::Cursor::new(Vec::new());
    image::DynamicImage::new_rgb8(3, 2)
        .write_to(&mut buf, image::ImageFormat::Png)
        .unwrap();
    buf.into_inner()
}

async fn real_image() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "image/png")], png_bytes())
}

async fn html_page() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/html; charset=utf-8")], "<html></html>")
}

async fn serve() -> String {
    let app = Router::new()
        .route("/v1/photos", get(photos))
        .route("/v1/comments", get(comments))
        .route("/img/real.png", get(real_image))
        .route("/img/moved.png", get(|| async { Redirect::temporary("/img/real.png") }))
        .route("/img/page.html", get(html_page));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
    format!("http://{addr}")
}

fn feed_client(base: &str) -> FiveHundredPxClient {
    FiveHundredPxClient::new(FiveHundredPxConfig {
        base_url: format!("{base}/v1/"),
        consumer_key: "key".to_string(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

#[tokio::test]
async fn fetch_page_returns_records_in_service_order() {
    let base = serve().await;
    let client = feed_client(&base);

    let records = client.fetch_page(1).await.unwrap();

    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![10, 11, 12]);
    assert!(records[1].nsfw);
    assert!(!records[2].nsfw);
}

#[tokio::test]
async fn fetch_page_maps_error_status() {
    let base = serve().await;
    let client = feed_client(&base);

    match client.fetch_page(2).await {
        Err(FeedError::Status { status: 503 }) => {}
        other => panic!("unexpected result: {other:?}"),
    }
}

#[tokio::test]
async fn fetch_page_rejects_malformed_body() {
    let base = serve().await;
    let client = feed_client(&base);

    assert!(matches!(
        client.fetch_page(3).await,
        Err(FeedError::Parse { .. })
    ));
}

#[tokio::test]
async fn fetch_page_rejects_record_without_nsfw_flag() {
    let base = serve().await;
    let client = feed_client(&base);

    assert!(matches!(
        client.fetch_page(4).await,
        Err(FeedError::Parse { .. })
    ));
}

#[tokio::test]
async fn fetch_comments_accepts_wrapped_shape() {
    let base = serve().await;
    let client = feed_client(&base);

    let comments = client.fetch_comments(PhotoId(10), 1).await.unwrap();

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].user_fullname(), "Ann");
    assert_eq!(comments[0].plain_body(), "Lovely light");
}

#[tokio::test]
async fn image_fetch_reports_resolved_url_after_redirect() {
    let base = serve().await;
    let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();

    let fetched = fetcher.fetch(&format!("{base}/img/moved.png")).await.unwrap();

    assert_eq!(fetched.resolved_url, format!("{base}/img/real.png"));
    assert_eq!(fetched.content_type.as_deref(), Some("image/png"));
    assert_eq!(fetched.bytes.as_ref(), png_bytes().as_slice());
}

#[tokio::test]
async fn image_fetch_passes_through_declared_content_type() {
    let base = serve().await;
    let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();

    let fetched = fetcher.fetch(&format!("{base}/img/page.html")).await.unwrap();

    assert_eq!(
        fetched.content_type.as_deref(),
        Some("text/html; charset=utf-8")
    );
}

#[tokio::test]
async fn image_fetch_maps_missing_image_to_status() {
    let base = serve().await;
    let fetcher = HttpImageFetcher::new(Duration::from_secs(5)).unwrap();

    assert!(matches!(
        fetcher.fetch(&format!("{base}/img/missing.png")).await,
        Err(FeedError::Status { status: 404 })
    ));
}
