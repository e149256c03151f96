mod common;

use axum_test::TestServer;
use http::StatusCode;
use huddle::models::ChatMessage;
use serde_json::Value;

#[tokio::test]
async fn history_requires_auth() {
    let (app, _state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let resp = server.get("/api/chat/m1/messages").await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn unknown_meeting_yields_empty_history() {
    let (app, _state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::mint_session_token("reader", None);

    let resp = server
        .get("/api/chat/never-existed/messages")
        .authorization_bearer(&token)
        .await;
    resp.assert_status_ok();
    let body: Value = resp.json();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn history_is_returned_in_timestamp_order() {
    let (app, state, _keys) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::mint_session_token("reader", None);

    // Seed out of order; history must come back sorted.
    for (user, text, ts) in [
        ("bob", "second", 200),
        ("alice", "first", 100),
        ("carol", "third", 300),
    ] {
        state
            .store
            .add_message(
                "m1",
                ChatMessage {
                    user_id: user.to_string(),
                    text: text.to_string(),
                    timestamp: ts,
                },
            )
            .await
            .unwrap();
    }

    let resp = server
        .get("/api/chat/m1/messages")
        .authorization_bearer(&token)
        .await;
    resp.assert_status_ok();

    let body: Value = resp.json();
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
    assert_eq!(body[0]["userId"], "alice");
    assert_eq!(body[0]["timestamp"], 100);
}
