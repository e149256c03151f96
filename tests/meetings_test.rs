mod common;

use axum_test::TestServer;
use http::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn health_reports_service() {
    let (app, _state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let resp = server.get("/health").await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "huddle");
}

#[tokio::test]
async fn create_meeting_requires_auth() {
    let (app, _state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let resp = server
        .post("/api/meetings")
        .json(&json!({ "id": "m1", "title": "Standup" }))
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_meeting_with_session_token() {
    let (app, state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::mint_session_token("host-1", Some("host@example.com"));

    let resp = server
        .post("/api/meetings")
        .authorization_bearer(&token)
        .json(&json!({ "id": "m1", "title": "Standup" }))
        .await;
    resp.assert_status(StatusCode::CREATED);

    let body: Value = resp.json();
    assert_eq!(body["meeting"]["id"], "m1");
    assert_eq!(body["meeting"]["title"], "Standup");
    assert_eq!(body["meeting"]["hostId"], "host-1");
    assert_eq!(body["meeting"]["participants"], json!(["host-1"]));
    assert!(body["meeting"]["createdAt"].as_i64().unwrap() > 0);

    let stored = state.store.get_meeting("m1").await.unwrap().unwrap();
    assert_eq!(stored.host_id, "host-1");
}

#[tokio::test]
async fn create_meeting_with_identity_token() {
    let (app, _state, keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token =
        common::mint_identity_token(&keys, "ext-user", Some("ext@example.com"), Some("Ext"));

    let resp = server
        .post("/api/meetings")
        .authorization_bearer(&token)
        .json(&json!({ "id": "m2" }))
        .await;
    resp.assert_status(StatusCode::CREATED);

    let body: Value = resp.json();
    assert_eq!(body["meeting"]["hostId"], "ext-user");
    // Missing title falls back to the default.
    assert_eq!(body["meeting"]["title"], "Meeting");
}

#[tokio::test]
async fn create_meeting_without_id_is_rejected() {
    let (app, _state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::mint_session_token("host-1", None);

    for body in [json!({}), json!({ "id": "" }), json!({ "id": "   " })] {
        let resp = server
            .post("/api/meetings")
            .authorization_bearer(&token)
            .json(&body)
            .await;
        resp.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn duplicate_meeting_id_is_rejected() {
    let (app, _state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::mint_session_token("host-1", None);

    let resp = server
        .post("/api/meetings")
        .authorization_bearer(&token)
        .json(&json!({ "id": "dup" }))
        .await;
    resp.assert_status(StatusCode::CREATED);

    let resp = server
        .post("/api/meetings")
        .authorization_bearer(&token)
        .json(&json!({ "id": "dup" }))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn join_unknown_meeting_is_404() {
    let (app, _state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::mint_session_token("joiner", None);

    let resp = server
        .post("/api/meetings/nope/join")
        .authorization_bearer(&token)
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn join_records_participant_idempotently() {
    let (app, state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let host = common::mint_session_token("host-1", None);
    let joiner = common::mint_session_token("joiner", None);

    server
        .post("/api/meetings")
        .authorization_bearer(&host)
        .json(&json!({ "id": "m1" }))
        .await
        .assert_status(StatusCode::CREATED);

    for _ in 0..2 {
        let resp = server
            .post("/api/meetings/m1/join")
            .authorization_bearer(&joiner)
            .await;
        resp.assert_status_ok();
    }

    let meeting = state.store.get_meeting("m1").await.unwrap().unwrap();
    assert_eq!(meeting.participants, vec!["host-1", "joiner"]);
}
