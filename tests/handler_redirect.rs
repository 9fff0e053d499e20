mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum_test::TestServer;
use expiring_shortener::domain::repositories::MappingStore;
use expiring_shortener::routes::{app_router, build_router};
use sqlx::SqlitePool;
use tower::ServiceExt;

#[sqlx::test]
async fn test_redirect_success(pool: SqlitePool) {
    common::insert_mapping(&pool, "abc123", "https://example.com/a", common::START + 100).await;
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header(header::LOCATION), "https://example.com/a");
}

#[sqlx::test]
async fn test_redirect_keeps_stored_url_verbatim(pool: SqlitePool) {
    common::insert_mapping(&pool, "abc123", "https://Example.com", common::START + 100).await;
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/abc123").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.header(header::LOCATION), "https://Example.com");
}

#[sqlx::test]
async fn test_redirect_not_found(pool: SqlitePool) {
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/nope12").await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "-2");
    assert_eq!(json["msg"], "404 Not Found.");
}

#[sqlx::test]
async fn test_redirect_invalid_stored_url(pool: SqlitePool) {
    common::insert_mapping(&pool, "bad123", "javascript:alert(1)", common::START + 100).await;
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server.get("/bad123").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "-9");
    assert_eq!(json["msg"], "Invalid long URL.");
}

#[sqlx::test]
async fn test_redirect_after_purge(pool: SqlitePool) {
    common::insert_mapping(&pool, "abc123", "https://example.com/a", common::START).await;
    let (state, _clock) = common::create_test_state(pool);
    let store = state.store.clone();
    let server = TestServer::new(build_router(state)).unwrap();

    server.get("/abc123").await.assert_status(StatusCode::FOUND);

    store.purge_expired(common::START).await.unwrap();

    let json = server.get("/abc123").await.json::<serde_json::Value>();
    assert_eq!(json["code"], "-2");
}

#[sqlx::test]
async fn test_redirect_trailing_slash_is_trimmed(pool: SqlitePool) {
    common::insert_mapping(&pool, "abc123", "https://example.com/a", common::START + 100).await;
    let (state, _clock) = common::create_test_state(pool);

    let response = app_router(state)
        .oneshot(
            Request::builder()
                .uri("/abc123/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://example.com/a"
    );
}
