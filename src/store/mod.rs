//! Contract over the external document store holding meetings and chat.

pub mod memory;

use async_trait::async_trait;

use crate::models::{ChatMessage, Meeting};

pub use memory::MemoryMeetingStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("meeting not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Abstraction over the meeting/chat document store.
///
/// The store is an external collaborator; everything the service needs from
/// it is expressed here. Backed by an in-memory map in this process (and in
/// tests), the same way the production document store would plug in.
#[async_trait]
pub trait MeetingStore: Send + Sync {
    /// Fetch a meeting record, `None` if the id is unknown.
    async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, StoreError>;

    /// Persist a new meeting record. Chat already appended under the same id
    /// is unaffected.
    async fn create_meeting(&self, meeting: Meeting) -> Result<Meeting, StoreError>;

    /// Add a uid to the meeting's participant set. Idempotent: an
    /// already-present uid is silently ignored. Fails `NotFound` when the
    /// meeting does not exist.
    async fn add_participant(&self, id: &str, uid: &str) -> Result<(), StoreError>;

    /// Append a chat message under the meeting id. The message collection is
    /// independent of the meeting record, so this never fails `NotFound`.
    async fn add_message(&self, id: &str, message: ChatMessage) -> Result<(), StoreError>;

    /// All chat messages for a meeting, ordered by timestamp ascending.
    async fn get_messages(&self, id: &str) -> Result<Vec<ChatMessage>, StoreError>;
}
