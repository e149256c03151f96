use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A persisted meeting record.
///
/// `participants` is a durable historical record of everyone who ever joined;
/// it only grows and is never pruned when a participant leaves or
/// disconnects. Live room membership is tracked separately, in memory, by the
/// gateway and is reconstructed from connected sessions.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub title: String,
    /// Uid of the creator. The first joiner of an unknown meeting id becomes
    /// its host; no host-only privileges exist anywhere in the service.
    pub host_id: String,
    pub participants: Vec<String>,
    /// Creation time, epoch milliseconds.
    pub created_at: i64,
}
