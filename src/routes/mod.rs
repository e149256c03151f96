pub mod chat;
pub mod health;
pub mod meetings;

use axum::Router;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(crate::gateway::server::router())
        .merge(meetings::router())
        .merge(chat::router())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        meetings::create_meeting,
        meetings::join_meeting,
        chat::list_messages,
    ),
    components(
        schemas(
            crate::error::ApiErrorBody,
            crate::error::ApiErrorDetail,
            crate::models::Meeting,
            crate::models::ChatMessage,
            health::HealthResponse,
            meetings::CreateMeetingRequest,
            meetings::CreateMeetingResponse,
            meetings::JoinMeetingResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check"),
        (name = "Meetings", description = "Meeting creation and join"),
        (name = "Chat", description = "Chat history"),
    )
)]
pub struct ApiDoc;
