use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{ChatMessage, Meeting};

use super::{MeetingStore, StoreError};

/// In-memory meeting store.
///
/// Meetings and their chat live in separate maps, mirroring a document store
/// where chat is a sub-collection under the meeting id: messages can be
/// appended and listed whether or not the meeting record exists.
pub struct MemoryMeetingStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    meetings: HashMap<String, Meeting>,
    messages: HashMap<String, Vec<ChatMessage>>,
}

impl MemoryMeetingStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }
}

impl Default for MemoryMeetingStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MeetingStore for MemoryMeetingStore {
    async fn get_meeting(&self, id: &str) -> Result<Option<Meeting>, StoreError> {
        Ok(self.inner.lock().unwrap().meetings.get(id).cloned())
    }

    async fn create_meeting(&self, meeting: Meeting) -> Result<Meeting, StoreError> {
        self.inner
            .lock()
            .unwrap()
            .meetings
            .insert(meeting.id.clone(), meeting.clone());
        Ok(meeting)
    }

    async fn add_participant(&self, id: &str, uid: &str) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let meeting = inner.meetings.get_mut(id).ok_or(StoreError::NotFound)?;
        if !meeting.participants.iter().any(|p| p == uid) {
            meeting.participants.push(uid.to_string());
        }
        Ok(())
    }

    async fn add_message(&self, id: &str, message: ChatMessage) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .messages
            .entry(id.to_string())
            .or_default()
            .push(message);
        Ok(())
    }

    async fn get_messages(&self, id: &str) -> Result<Vec<ChatMessage>, StoreError> {
        let mut messages = self
            .inner
            .lock()
            .unwrap()
            .messages
            .get(id)
            .cloned()
            .unwrap_or_default();
        // Stable sort: equal timestamps keep append order.
        messages.sort_by_key(|m| m.timestamp);
        Ok(messages)
    }
}
