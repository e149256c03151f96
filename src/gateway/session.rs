//! Per-connection session state.

use crate::auth::Principal;

use super::rooms::ConnectionId;

/// State for a single gateway connection, owned by its event loop and
/// mutated only by coordinator handlers.
pub struct Session {
    /// Transport-assigned connection identifier (`conn_` prefixed ULID).
    pub connection_id: ConnectionId,
    /// Authenticated principal, resolved once at handshake time.
    pub principal: Principal,
    /// Display name chosen at join time.
    pub display_name: Option<String>,
    /// Most recently joined meeting, used for disconnect cleanup. A
    /// connection that joins a second meeting without leaving the first stays
    /// in both rooms; only the last one is remembered here.
    pub meeting_id: Option<String>,
}

impl Session {
    pub fn new(connection_id: ConnectionId, principal: Principal) -> Self {
        Self {
            connection_id,
            principal,
            display_name: None,
            meeting_id: None,
        }
    }

    /// The label attached to chat messages: chosen display name, else uid.
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .unwrap_or(&self.principal.uid)
    }
}
