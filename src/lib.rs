pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use auth::IdentityResolver;
use config::Config;
use gateway::coordinator::Coordinator;
use gateway::rooms::RoomRegistry;
use store::MeetingStore;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn MeetingStore>,
    pub rooms: Arc<RoomRegistry>,
    pub resolver: Arc<IdentityResolver>,
    pub coordinator: Arc<Coordinator>,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn MeetingStore>, resolver: IdentityResolver) -> Self {
        let rooms = Arc::new(RoomRegistry::new());
        let coordinator = Arc::new(Coordinator::new(rooms.clone(), store.clone()));
        Self {
            config: Arc::new(config),
            store,
            rooms,
            resolver: Arc::new(resolver),
            coordinator,
        }
    }
}
