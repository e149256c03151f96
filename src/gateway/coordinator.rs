//! Room session coordination: admission control, chat relay, and the
//! stateless signaling/media relays.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::models::{ChatMessage, Meeting};
use crate::store::{MeetingStore, StoreError};

use super::events::{ClientEvent, ServerEvent};
use super::rooms::RoomRegistry;
use super::session::Session;

/// Maximum number of live participants per meeting room. Enforced at join
/// time only; membership is not re-checked after admission.
pub const MAX_USERS_PER_MEETING: usize = 10;

/// Suffix convention for auxiliary sub-streams: `conn_x-screen` addresses
/// the same underlying connection as `conn_x`.
const SCREEN_SUFFIX: &str = "-screen";

pub struct Coordinator {
    rooms: Arc<RoomRegistry>,
    store: Arc<dyn MeetingStore>,
}

impl Coordinator {
    pub fn new(rooms: Arc<RoomRegistry>, store: Arc<dyn MeetingStore>) -> Self {
        Self { rooms, store }
    }

    pub async fn handle_event(&self, session: &mut Session, event: ClientEvent) {
        match event {
            ClientEvent::JoinMeeting {
                meeting_id,
                user_name,
            } => self.join(session, meeting_id, user_name).await,
            ClientEvent::LeaveMeeting { meeting_id } => self.leave(session, &meeting_id),
            ClientEvent::SendMessage { meeting_id, text } => {
                self.send_message(session, &meeting_id, text).await
            }
            ClientEvent::AudioStream {
                meeting_id,
                audio_data,
            } => self.relay_audio(session, &meeting_id, audio_data),
            ClientEvent::Signal { to, from, data } => self.relay_signal(&to, &from, data),
            ClientEvent::Offer { meeting_id, offer } => {
                self.relay_to_room(session, &meeting_id, "webrtc:offer", "offer", offer)
            }
            ClientEvent::Answer { meeting_id, answer } => {
                self.relay_to_room(session, &meeting_id, "webrtc:answer", "answer", answer)
            }
            ClientEvent::IceCandidate {
                meeting_id,
                candidate,
            } => self.relay_to_room(
                session,
                &meeting_id,
                "webrtc:ice-candidate",
                "candidate",
                candidate,
            ),
            ClientEvent::StartScreenShare {
                meeting_id,
                user_id,
            } => self.notify_screen_share(session, &meeting_id, "startScreenShare", user_id),
            ClientEvent::StopScreenShare {
                meeting_id,
                user_id,
            } => self.notify_screen_share(session, &meeting_id, "stopScreenShare", user_id),
        }
    }

    // -----------------------------------------------------------------------
    // Admission
    // -----------------------------------------------------------------------

    async fn join(&self, session: &mut Session, meeting_id: String, user_name: Option<String>) {
        let connection_id = session.connection_id.clone();

        // Fast-path reject. The authoritative check is the capacity-guarded
        // registration below.
        if self.rooms.member_count(&meeting_id) >= MAX_USERS_PER_MEETING {
            self.rooms.send_to(
                &connection_id,
                ServerEvent::meeting_error(format!(
                    "Meeting is full ({MAX_USERS_PER_MEETING} participants max)"
                )),
            );
            return;
        }

        let uid = session.principal.uid.clone();
        if let Err(err) = self.provision_meeting(&meeting_id, &uid).await {
            tracing::warn!(%meeting_id, %uid, %err, "join failed at the store");
            self.rooms.send_to(
                &connection_id,
                ServerEvent::meeting_error(format!("Failed to join meeting: {err}")),
            );
            return;
        }

        // Display name: explicit argument, else principal email, else uid.
        let name = user_name
            .filter(|n| !n.is_empty())
            .or_else(|| session.principal.email.clone())
            .unwrap_or_else(|| uid.clone());
        session.display_name = Some(name.clone());
        self.rooms.set_display_name(&connection_id, &name);

        if !self
            .rooms
            .try_join(&meeting_id, &connection_id, MAX_USERS_PER_MEETING)
        {
            self.rooms.send_to(
                &connection_id,
                ServerEvent::meeting_error(format!(
                    "Meeting is full ({MAX_USERS_PER_MEETING} participants max)"
                )),
            );
            return;
        }
        session.meeting_id = Some(meeting_id.clone());

        tracing::info!(%meeting_id, %uid, connection_id = %connection_id, "joined meeting");

        let members = self.rooms.members(&meeting_id);
        self.rooms
            .send_to(&connection_id, ServerEvent::participants(&members));
        self.rooms.broadcast(
            &meeting_id,
            ServerEvent::user_joined(&uid, &name, &connection_id),
            Some(&connection_id),
        );
    }

    /// Auto-create the meeting record on first join, then record the
    /// participant. The first joiner of an unknown id becomes its host;
    /// nothing grants the host extra privileges.
    async fn provision_meeting(&self, meeting_id: &str, uid: &str) -> Result<(), StoreError> {
        if self.store.get_meeting(meeting_id).await?.is_none() {
            tracing::info!(%meeting_id, "auto-creating meeting on first join");
            let meeting = Meeting {
                id: meeting_id.to_string(),
                title: format!("Meeting {meeting_id}"),
                host_id: uid.to_string(),
                participants: Vec::new(),
                created_at: Utc::now().timestamp_millis(),
            };
            self.store.create_meeting(meeting).await?;
        }

        self.store.add_participant(meeting_id, uid).await
    }

    // -----------------------------------------------------------------------
    // Leave / disconnect
    // -----------------------------------------------------------------------

    /// Best-effort cleanup; never errors back to the caller.
    fn leave(&self, session: &mut Session, meeting_id: &str) {
        self.rooms.leave(meeting_id, &session.connection_id);
        self.rooms.broadcast(
            meeting_id,
            ServerEvent::user_left(&session.principal.uid, &session.connection_id),
            Some(&session.connection_id),
        );
        if session.meeting_id.as_deref() == Some(meeting_id) {
            session.meeting_id = None;
        }
    }

    /// Run when the transport reports the connection gone, for any reason.
    /// Same notification as an explicit leave, using the last-known meeting.
    pub fn handle_disconnect(&self, session: &Session) {
        if let Some(meeting_id) = session.meeting_id.as_deref() {
            self.rooms.leave(meeting_id, &session.connection_id);
            self.rooms.broadcast(
                meeting_id,
                ServerEvent::user_left(&session.principal.uid, &session.connection_id),
                Some(&session.connection_id),
            );
        }
        self.rooms.remove_connection(&session.connection_id);
    }

    // -----------------------------------------------------------------------
    // Chat
    // -----------------------------------------------------------------------

    async fn send_message(&self, session: &Session, meeting_id: &str, text: String) {
        let message = ChatMessage {
            user_id: session.label().to_string(),
            text,
            timestamp: Utc::now().timestamp_millis(),
        };

        match self.store.add_message(meeting_id, message.clone()).await {
            Ok(()) => {
                // Everyone in the room gets the echo, sender included.
                self.rooms
                    .broadcast(meeting_id, ServerEvent::receive_message(&message), None);
            }
            Err(err) => {
                tracing::warn!(%meeting_id, %err, "failed to persist chat message");
                self.rooms.send_to(
                    &session.connection_id,
                    ServerEvent::meeting_error(format!("Failed to send message: {err}")),
                );
            }
        }
    }

    // -----------------------------------------------------------------------
    // Signaling & media relays (stateless pass-through)
    // -----------------------------------------------------------------------

    /// Audio frames to everyone else in the room. Never blocks, never
    /// surfaces errors; a dropped frame is cheaper than a stalled stream.
    fn relay_audio(&self, session: &Session, meeting_id: &str, audio_data: Value) {
        self.rooms.broadcast(
            meeting_id,
            ServerEvent::audio_stream(&session.principal.uid, audio_data),
            Some(&session.connection_id),
        );
    }

    /// Directed signaling. A `-screen` suffix on the target addresses an
    /// auxiliary sub-stream of the same connection: stripped for lookup,
    /// preserved in the forwarded frame. Unknown targets are dropped.
    fn relay_signal(&self, to: &str, from: &str, data: Value) {
        let target = to.strip_suffix(SCREEN_SUFFIX).unwrap_or(to);
        tracing::trace!(%to, %target, %from, "forwarding signal");
        self.rooms.send_to(target, ServerEvent::signal(to, from, data));
    }

    /// Legacy room-broadcast signaling with the sender's uid attached.
    fn relay_to_room(
        &self,
        session: &Session,
        meeting_id: &str,
        event: &str,
        key: &str,
        payload: Value,
    ) {
        self.rooms.broadcast(
            meeting_id,
            ServerEvent::new(
                event,
                serde_json::json!({
                    "meetingId": meeting_id,
                    "userId": session.principal.uid,
                    key: payload,
                }),
            ),
            Some(&session.connection_id),
        );
    }

    /// Screen-share start/stop notices. No sharing state is kept; multiple
    /// simultaneous sharers are not prevented.
    fn notify_screen_share(
        &self,
        session: &Session,
        meeting_id: &str,
        event: &str,
        user_id: String,
    ) {
        self.rooms.broadcast(
            meeting_id,
            ServerEvent::new(
                event,
                serde_json::json!({
                    "meetingId": meeting_id,
                    "userId": user_id,
                    "connectionId": session.connection_id,
                }),
            ),
            Some(&session.connection_id),
        );
    }
}
