mod support;

use axum::http::{HeaderValue, StatusCode, header::AUTHORIZATION};
use reanalyzer_core::CacheStore;
use reanalyzer_model::RecordField;
use serde_json::{Value, json};
use support::{SECRET, build_test_app};

fn secret() -> HeaderValue {
    HeaderValue::from_static(SECRET)
}

#[tokio::test]
async fn health_needs_no_credentials() {
    let app = build_test_app(Some(SECRET));

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn protected_routes_reject_missing_or_wrong_secret() {
    let app = build_test_app(Some(SECRET));

    app.server
        .get("/")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .post("/load_ratingkeys")
        .add_header(AUTHORIZATION, HeaderValue::from_static("nope"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "Unauthorized");
    assert!(app.store.is_empty().await);

    app.server
        .get("/")
        .add_header(AUTHORIZATION, secret())
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn routes_are_open_when_no_secret_is_configured() {
    let app = build_test_app(None);

    app.server.get("/").await.assert_status_ok();
    app.server.put("/sync_db").await.assert_status_ok();
}

#[tokio::test]
async fn load_ratingkeys_fills_the_cache() {
    let app = build_test_app(Some(SECRET));

    let response = app
        .server
        .post("/load_ratingkeys")
        .add_header(AUTHORIZATION, secret())
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "success");
    assert_eq!(body["message"], "Rating keys loaded from Plex!");
    assert_eq!(body["data"]["added"], 2);
    assert_eq!(app.store.len().await, 2);
}

#[tokio::test]
async fn sync_db_reports_removals() {
    let app = build_test_app(None);
    app.server.post("/load_ratingkeys").await.assert_status_ok();
    app.catalog.items.lock().unwrap().retain(|item| item.title != "Heat");

    let response = app.server.put("/sync_db").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Database synchronized with Plex!");
    assert_eq!(body["data"]["removed"], 1);
    assert!(
        app.store
            .search(RecordField::Title, "Heat")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn upstream_failure_is_a_bad_gateway() {
    let app = build_test_app(None);
    *app.catalog.offline.lock().unwrap() = true;

    let response = app.server.post("/load_ratingkeys").await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: Value = response.json();
    assert_eq!(body["status"], "error");
}

#[tokio::test]
async fn analyze_rejects_requests_without_a_lookup_field() {
    let app = build_test_app(None);

    app.server
        .post("/analyze_media")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .post("/analyze_media")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    app.server
        .post("/analyze_media")
        .json(&json!({"title": "Alien", "filename": "Alien.1979.mkv"}))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    assert!(app.catalog.analyzed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn analyze_resolves_through_a_refresh_and_reports_outcomes() {
    let app = build_test_app(None);

    let response = app
        .server
        .post("/analyze_media")
        .json(&json!({"filename": "Heat.1995.mkv"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"][0]["status"], "analyzed");
    assert_eq!(body["data"][0]["rating_key"], "102");
    assert_eq!(
        body["message"],
        "Media 'Heat.1995.mkv' successfully sent for analysis!"
    );
    assert_eq!(app.catalog.analyzed.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn analyze_unknown_media_is_not_an_error() {
    let app = build_test_app(None);

    let response = app
        .server
        .post("/analyze_media")
        .json(&json!({"title": "Nonexistent"}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["data"][0]["status"], "not_found");
    assert_eq!(body["message"], "No media found with title 'Nonexistent'");
}

#[tokio::test]
async fn analyze_wraps_upstream_failures() {
    let app = build_test_app(None);
    *app.catalog.offline.lock().unwrap() = true;

    let response = app
        .server
        .post("/analyze_media")
        .json(&json!({"title": "Alien"}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .starts_with("Error analyzing media:")
    );
}
