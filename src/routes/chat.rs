//! Chat history endpoint.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::auth::middleware::AuthUser;
use crate::error::ApiError;
use crate::models::ChatMessage;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/chat/{meeting_id}/messages", get(list_messages))
}

/// History is served even for meetings with no record; an unknown id yields
/// an empty list, matching how the relay persists messages.
#[utoipa::path(
    get,
    path = "/api/chat/{meeting_id}/messages",
    tag = "Chat",
    params(("meeting_id" = String, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Messages in timestamp order", body = [ChatMessage]),
        (status = 401, description = "Unauthenticated", body = crate::error::ApiErrorBody),
    ),
    security(("bearer" = []))
)]
pub async fn list_messages(
    AuthUser { principal: _ }: AuthUser,
    State(state): State<AppState>,
    Path(meeting_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    let messages = state.store.get_messages(&meeting_id).await?;
    Ok(Json(messages))
}
