mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use expiring_shortener::routes::build_router;
use serde_json::json;
use sqlx::SqlitePool;

#[sqlx::test]
async fn test_decode_round_trip(pool: SqlitePool) {
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    let long_url = "https://example.com/a?b=1&c=2";
    let shortened = server
        .post("/short")
        .json(&json!({ "url": long_url }))
        .await
        .json::<serde_json::Value>();
    let short_url = shortened["data"]["url"].as_str().unwrap();

    let response = server.post("/decode").json(&json!({ "url": short_url })).await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "200");
    assert_eq!(json["data"]["url"], long_url);
}

#[sqlx::test]
async fn test_decode_ignores_trailing_slash_query_and_fragment(pool: SqlitePool) {
    common::insert_mapping(&pool, "abc123", "https://example.com/a", common::START + 100).await;
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    for input in [
        "abc123",
        "http://s.test/abc123/",
        "http://s.test/abc123?utm=x",
        "http://s.test/abc123#top",
    ] {
        let json = server
            .post("/decode")
            .json(&json!({ "url": input }))
            .await
            .json::<serde_json::Value>();

        assert_eq!(json["data"]["url"], "https://example.com/a", "input {input}");
    }
}

#[sqlx::test]
async fn test_decode_not_found(pool: SqlitePool) {
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    let response = server
        .post("/decode")
        .json(&json!({ "url": "http://s.test/nope12" }))
        .await;

    response.assert_status_ok();
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "-2");
    assert_eq!(json["msg"], "404 Not Found.");
}

#[sqlx::test]
async fn test_decode_expired_mapping_until_purged(pool: SqlitePool) {
    common::insert_mapping(&pool, "old123", "https://example.com/old", common::START - 1).await;
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    let json = server
        .post("/decode")
        .json(&json!({ "url": "old123" }))
        .await
        .json::<serde_json::Value>();

    assert_eq!(json["code"], "200");
    assert_eq!(json["data"]["url"], "https://example.com/old");
}

#[sqlx::test]
async fn test_decode_without_identifier(pool: SqlitePool) {
    let (state, _clock) = common::create_test_state(pool);
    let server = TestServer::new(build_router(state)).unwrap();

    for input in ["", "///"] {
        let response = server.post("/decode").json(&json!({ "url": input })).await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<serde_json::Value>()["code"], "-3");
    }
}
