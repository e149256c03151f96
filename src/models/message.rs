use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted chat message. Immutable once appended.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    /// Display label of the sender at send time, not the authenticated uid.
    pub user_id: String,
    pub text: String,
    /// Send time, epoch milliseconds. Retrieval is ordered by this field.
    pub timestamp: i64,
}
