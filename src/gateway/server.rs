//! WebSocket upgrade handler and per-connection event loop.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;
use ulid::Ulid;

use crate::auth::Principal;
use crate::error::ApiError;
use crate::AppState;

use super::events::{ClientEvent, ServerEvent};
use super::session::Session;

#[derive(Debug, Deserialize)]
struct GatewayParams {
    token: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/gateway", get(ws_upgrade))
}

/// Credentials are resolved before the upgrade so a bad token gets a plain
/// HTTP 401 instead of an accepted-then-closed socket.
async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<GatewayParams>,
    State(state): State<AppState>,
) -> Result<Response, ApiError> {
    let principal = state
        .resolver
        .resolve(params.token.as_deref())
        .await
        .map_err(|e| ApiError::unauthorized(e.to_string()))?;

    Ok(ws.on_upgrade(move |socket| handle_connection(socket, state, principal)))
}

async fn handle_connection(socket: WebSocket, state: AppState, principal: Principal) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let connection_id = format!("conn_{}", Ulid::new());
    let (tx, mut rx) = mpsc::unbounded_channel();
    state
        .rooms
        .register(connection_id.clone(), principal.uid.clone(), tx);

    let mut session = Session::new(connection_id.clone(), principal);

    tracing::info!(
        connection_id = %session.connection_id,
        uid = %session.principal.uid,
        "gateway session established"
    );

    if send_event(
        &mut ws_tx,
        &ServerEvent::connected(&session.connection_id, &session.principal.uid),
    )
    .await
    .is_err()
    {
        state.coordinator.handle_disconnect(&session);
        return;
    }

    loop {
        tokio::select! {
            // Client sends us a frame.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let event: ClientEvent = match serde_json::from_str(&text) {
                            Ok(e) => e,
                            Err(err) => {
                                // Unknown or malformed frames are dropped, not fatal.
                                tracing::debug!(
                                    connection_id = %session.connection_id,
                                    %err,
                                    "ignoring unparseable frame"
                                );
                                continue;
                            }
                        };
                        state.coordinator.handle_event(&mut session, event).await;
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(err)) => {
                        tracing::debug!(
                            connection_id = %session.connection_id,
                            %err,
                            "ws read error"
                        );
                        break;
                    }
                    _ => continue,
                }
            }

            // Outbound event queued by the coordinator.
            event = rx.recv() => {
                match event {
                    Some(event) => {
                        if send_event(&mut ws_tx, &event).await.is_err() {
                            break;
                        }
                    }
                    // Registry dropped our sender; treat as shutdown.
                    None => break,
                }
            }
        }
    }

    state.coordinator.handle_disconnect(&session);

    tracing::info!(
        connection_id = %session.connection_id,
        uid = %session.principal.uid,
        "gateway session ended"
    );
}

async fn send_event(
    ws_tx: &mut SplitSink<WebSocket, Message>,
    event: &ServerEvent,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(event).map_err(axum::Error::new)?;
    ws_tx.send(Message::Text(json.into())).await
}
