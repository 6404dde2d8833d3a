//! Thumbnail rendering endpoint

mod common;

use axum::http::{HeaderValue, StatusCode, header};
use serde_json::Value;

use common::{TestCatalog, catalog, write_image, write_png_as, write_transparent_png};

async fn first_fingerprint(catalog: &TestCatalog) -> String {
    let body: Value = catalog.server.get("/api").await.json();
    body["data"][0]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_thumbnail_headers_and_size() {
    let catalog = catalog();
    write_image(&catalog.root, "Nature/sunset.jpg", 800, 600);
    let fingerprint = first_fingerprint(&catalog).await;

    let response = catalog
        .server
        .get(&format!("/thumbnails/{fingerprint}.jpg"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header(header::CONTENT_TYPE), "image/jpeg");
    assert_eq!(
        response.header(header::CACHE_CONTROL),
        "public, max-age=31536000"
    );
    assert_eq!(
        response.header(header::ETAG),
        format!("\"{fingerprint}\"").as_str()
    );

    let thumbnail = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!((thumbnail.width(), thumbnail.height()), (300, 225));
}

#[tokio::test]
async fn test_thumbnail_is_stable_across_requests() {
    let catalog = catalog();
    write_transparent_png(&catalog.root, "Icons/logo.png", 640, 320);
    let fingerprint = first_fingerprint(&catalog).await;
    let path = format!("/thumbnails/{fingerprint}.jpg");

    let first = catalog.server.get(&path).await;
    let second = catalog.server.get(&path).await;
    assert_eq!(first.as_bytes(), second.as_bytes());
    assert_eq!(first.header(header::ETAG), second.header(header::ETAG));

    let thumbnail = image::load_from_memory(first.as_bytes()).unwrap();
    assert_eq!((thumbnail.width(), thumbnail.height()), (300, 150));
}

#[tokio::test]
async fn test_small_images_are_not_enlarged() {
    let catalog = catalog();
    write_image(&catalog.root, "tiny.png", 50, 20);
    let fingerprint = first_fingerprint(&catalog).await;

    let response = catalog
        .server
        .get(&format!("/thumbnails/{fingerprint}.jpg"))
        .await;
    let thumbnail = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!((thumbnail.width(), thumbnail.height()), (50, 20));
}

#[tokio::test]
async fn test_png_saved_as_jpg_still_renders() {
    let catalog = catalog();
    write_png_as(&catalog.root, "Nature/sunset.jpg", 400, 200);

    let body: Value = catalog.server.get("/api").await.json();
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["width"], 400);
    let fingerprint = body["data"][0]["id"].as_str().unwrap();

    let response = catalog
        .server
        .get(&format!("/thumbnails/{fingerprint}.jpg"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let thumbnail = image::load_from_memory(response.as_bytes()).unwrap();
    assert_eq!((thumbnail.width(), thumbnail.height()), (300, 150));
}

#[tokio::test]
async fn test_matching_etag_is_not_modified() {
    let catalog = catalog();
    write_image(&catalog.root, "a.png", 400, 400);
    let fingerprint = first_fingerprint(&catalog).await;

    let response = catalog
        .server
        .get(&format!("/thumbnails/{fingerprint}.jpg"))
        .add_header(
            header::IF_NONE_MATCH,
            HeaderValue::from_str(&format!("\"{fingerprint}\"")).unwrap(),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_MODIFIED);
    assert!(response.as_bytes().is_empty());
}

#[tokio::test]
async fn test_unknown_fingerprint_is_not_found() {
    let catalog = catalog();
    write_image(&catalog.root, "a.png", 8, 8);
    catalog.server.get("/api").await;

    let response = catalog.server.get("/thumbnails/deadbeef.jpg").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["code"], 404);
    assert!(body["message"].as_str().unwrap().contains("not found"));
}

#[tokio::test]
async fn test_unknown_fingerprint_with_etag_is_still_not_found() {
    let catalog = catalog();

    let response = catalog
        .server
        .get("/thumbnails/deadbeef.jpg")
        .add_header(header::IF_NONE_MATCH, HeaderValue::from_static("*"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_deleted_source_is_not_found() {
    let catalog = catalog();
    let source = write_image(&catalog.root, "a.png", 8, 8);
    let fingerprint = first_fingerprint(&catalog).await;
    std::fs::remove_file(source).unwrap();

    let response = catalog
        .server
        .get(&format!("/thumbnails/{fingerprint}.jpg"))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_jpg_name_is_bad_request() {
    let catalog = catalog();

    for path in ["/thumbnails/deadbeef.png", "/thumbnails/deadbeef", "/thumbnails/.jpg"] {
        let response = catalog.server.get(path).await;
        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(response.json::<Value>()["code"], 400);
    }
}
