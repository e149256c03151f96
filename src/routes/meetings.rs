//! Meeting creation and REST join endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::middleware::AuthUser;
use crate::error::ApiError;
use crate::models::Meeting;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/meetings", post(create_meeting))
        .route("/api/meetings/{id}/join", post(join_meeting))
}

// ---------------------------------------------------------------------------
// POST /api/meetings
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateMeetingRequest {
    pub id: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateMeetingResponse {
    pub message: String,
    pub meeting: Meeting,
}

#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = CreateMeetingResponse),
        (status = 400, description = "Missing or duplicate id", body = crate::error::ApiErrorBody),
        (status = 401, description = "Unauthenticated", body = crate::error::ApiErrorBody),
    ),
    security(("bearer" = []))
)]
pub async fn create_meeting(
    AuthUser { principal }: AuthUser,
    State(state): State<AppState>,
    Json(body): Json<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<CreateMeetingResponse>), ApiError> {
    let id = match body.id.as_deref().map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ApiError::bad_request("Meeting id is required")),
    };

    if state.store.get_meeting(&id).await?.is_some() {
        return Err(ApiError::bad_request(
            "A meeting with that id already exists",
        ));
    }

    let meeting = Meeting {
        id,
        title: body
            .title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "Meeting".to_string()),
        host_id: principal.uid.clone(),
        // The creator is a recorded participant from the start, even before
        // any live connection joins.
        participants: vec![principal.uid],
        created_at: Utc::now().timestamp_millis(),
    };
    state.store.create_meeting(meeting.clone()).await?;

    tracing::info!(meeting_id = %meeting.id, host_id = %meeting.host_id, "meeting created");

    Ok((
        StatusCode::CREATED,
        Json(CreateMeetingResponse {
            message: "Meeting created".to_string(),
            meeting,
        }),
    ))
}

// ---------------------------------------------------------------------------
// POST /api/meetings/{id}/join
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, ToSchema)]
pub struct JoinMeetingResponse {
    pub message: String,
}

/// REST join records participation only. Unlike the gateway join it never
/// auto-creates the meeting and does not count against live room capacity.
#[utoipa::path(
    post,
    path = "/api/meetings/{id}/join",
    tag = "Meetings",
    params(("id" = String, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Participant recorded", body = JoinMeetingResponse),
        (status = 404, description = "Meeting not found", body = crate::error::ApiErrorBody),
        (status = 401, description = "Unauthenticated", body = crate::error::ApiErrorBody),
    ),
    security(("bearer" = []))
)]
pub async fn join_meeting(
    AuthUser { principal }: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JoinMeetingResponse>, ApiError> {
    state
        .store
        .get_meeting(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Meeting not found"))?;

    state.store.add_participant(&id, &principal.uid).await?;

    Ok(Json(JoinMeetingResponse {
        message: "Joined meeting".to_string(),
    }))
}
