//! Gateway wire format: JSON frames of the shape `{ "event": ..., "data": ... }`.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::models::ChatMessage;

use super::rooms::MemberInfo;

// ---------------------------------------------------------------------------
// Client → Server events
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    JoinMeeting {
        meeting_id: String,
        #[serde(default)]
        user_name: Option<String>,
    },
    LeaveMeeting {
        meeting_id: String,
    },
    SendMessage {
        meeting_id: String,
        text: String,
    },
    /// Raw audio frames; payload relayed untouched.
    #[serde(rename = "audio:stream")]
    AudioStream {
        meeting_id: String,
        audio_data: Value,
    },
    /// Point-to-point signaling addressed by connection id.
    Signal {
        to: String,
        from: String,
        data: Value,
    },
    // Legacy room-broadcast signaling, superseded by `Signal`.
    #[serde(rename = "webrtc:offer")]
    Offer {
        meeting_id: String,
        offer: Value,
    },
    #[serde(rename = "webrtc:answer")]
    Answer {
        meeting_id: String,
        answer: Value,
    },
    #[serde(rename = "webrtc:ice-candidate")]
    IceCandidate {
        meeting_id: String,
        candidate: Value,
    },
    StartScreenShare {
        meeting_id: String,
        user_id: String,
    },
    StopScreenShare {
        meeting_id: String,
        user_id: String,
    },
}

// ---------------------------------------------------------------------------
// Server → Client events
// ---------------------------------------------------------------------------

/// An outbound frame. Cloned per receiver on multicast.
#[derive(Debug, Clone, Serialize)]
pub struct ServerEvent {
    pub event: String,
    pub data: Value,
}

impl ServerEvent {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    /// Greeting sent right after the handshake, carrying the
    /// transport-assigned connection id peers use as a signaling target.
    pub fn connected(connection_id: &str, uid: &str) -> Self {
        Self::new(
            "connected",
            json!({ "connectionId": connection_id, "userId": uid }),
        )
    }

    /// Current member list, sent to a joiner (includes the joiner itself).
    pub fn participants(members: &[MemberInfo]) -> Self {
        let list: Vec<Value> = members
            .iter()
            .map(|m| {
                json!({
                    "connectionId": m.connection_id,
                    "uid": m.uid,
                    "name": m.name,
                })
            })
            .collect();
        Self::new("meeting:participants", Value::Array(list))
    }

    pub fn user_joined(uid: &str, user_name: &str, connection_id: &str) -> Self {
        Self::new(
            "userJoined",
            json!({
                "userId": uid,
                "userName": user_name,
                "connectionId": connection_id,
            }),
        )
    }

    pub fn user_left(uid: &str, connection_id: &str) -> Self {
        Self::new(
            "userLeft",
            json!({ "userId": uid, "connectionId": connection_id }),
        )
    }

    pub fn receive_message(message: &ChatMessage) -> Self {
        Self::new(
            "receiveMessage",
            serde_json::to_value(message).unwrap_or(Value::Null),
        )
    }

    pub fn meeting_error(message: impl Into<String>) -> Self {
        Self::new("meeting:error", json!({ "message": message.into() }))
    }

    pub fn audio_stream(uid: &str, audio_data: Value) -> Self {
        Self::new(
            "audio:stream",
            json!({ "userId": uid, "audioData": audio_data }),
        )
    }

    /// Forwarded point-to-point signal. `to` is preserved verbatim even when
    /// the lookup stripped a sub-stream suffix.
    pub fn signal(to: &str, from: &str, data: Value) -> Self {
        Self::new("signal", json!({ "to": to, "from": from, "data": data }))
    }
}
