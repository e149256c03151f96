//! Live connection and room-membership registry.
//!
//! Rooms are transport-level groupings: membership is exactly the set of
//! currently connected sessions that joined, reconstructed from live
//! connections and never persisted.

use std::collections::HashSet;

use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc::UnboundedSender;

use super::events::ServerEvent;

pub type ConnectionId = String;

/// A live room member as reported to joiners.
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub connection_id: ConnectionId,
    pub uid: String,
    pub name: Option<String>,
}

/// Outbound side of one live connection.
struct ConnectionHandle {
    uid: String,
    display_name: Mutex<Option<String>>,
    sender: UnboundedSender<ServerEvent>,
}

/// Shared registry of all live connections and their room membership.
///
/// Uses `DashMap` for shard-level concurrency; per-connection outbound
/// channels are unbounded FIFOs, so every send is non-blocking and
/// per-sender order is preserved per receiver.
pub struct RoomRegistry {
    connections: DashMap<ConnectionId, ConnectionHandle>,
    rooms: DashMap<String, HashSet<ConnectionId>>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self {
            connections: DashMap::new(),
            rooms: DashMap::new(),
        }
    }

    /// Register a connection after a successful handshake.
    pub fn register(
        &self,
        connection_id: ConnectionId,
        uid: String,
        sender: UnboundedSender<ServerEvent>,
    ) {
        self.connections.insert(
            connection_id,
            ConnectionHandle {
                uid,
                display_name: Mutex::new(None),
                sender,
            },
        );
    }

    /// Record the display name chosen at join time.
    pub fn set_display_name(&self, connection_id: &str, name: &str) {
        if let Some(handle) = self.connections.get(connection_id) {
            *handle.display_name.lock() = Some(name.to_string());
        }
    }

    pub fn member_count(&self, meeting_id: &str) -> usize {
        self.rooms.get(meeting_id).map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_member(&self, meeting_id: &str, connection_id: &str) -> bool {
        self.rooms
            .get(meeting_id)
            .map(|m| m.contains(connection_id))
            .unwrap_or(false)
    }

    /// Capacity-guarded registration: the check and the insert happen under
    /// the room entry's lock, so interleaved joins cannot admit past `max`.
    /// Re-joining a room the connection is already in always succeeds.
    pub fn try_join(&self, meeting_id: &str, connection_id: &str, max: usize) -> bool {
        let mut members = self.rooms.entry(meeting_id.to_string()).or_default();
        if members.contains(connection_id) {
            return true;
        }
        if members.len() >= max {
            return false;
        }
        members.insert(connection_id.to_string());
        true
    }

    /// Remove the connection from a room. Returns whether it was a member.
    /// Empty rooms are dropped.
    pub fn leave(&self, meeting_id: &str, connection_id: &str) -> bool {
        let removed = if let Some(mut members) = self.rooms.get_mut(meeting_id) {
            members.remove(connection_id)
        } else {
            false
        };
        self.rooms.remove_if(meeting_id, |_, members| members.is_empty());
        removed
    }

    /// Drop the connection handle and sweep it from every room.
    pub fn remove_connection(&self, connection_id: &str) {
        self.connections.remove(connection_id);
        for mut entry in self.rooms.iter_mut() {
            entry.value_mut().remove(connection_id);
        }
        self.rooms.retain(|_, members| !members.is_empty());
    }

    /// Snapshot of a room's live members with their display names.
    pub fn members(&self, meeting_id: &str) -> Vec<MemberInfo> {
        let ids: Vec<ConnectionId> = match self.rooms.get(meeting_id) {
            Some(members) => members.iter().cloned().collect(),
            None => return Vec::new(),
        };

        ids.into_iter()
            .filter_map(|id| {
                self.connections.get(&id).map(|handle| MemberInfo {
                    connection_id: id.clone(),
                    uid: handle.uid.clone(),
                    name: handle.display_name.lock().clone(),
                })
            })
            .collect()
    }

    /// Directed send. Unknown targets and closed channels are ignored.
    pub fn send_to(&self, connection_id: &str, event: ServerEvent) {
        if let Some(handle) = self.connections.get(connection_id) {
            let _ = handle.sender.send(event);
        }
    }

    /// Multicast to a room, optionally excluding one connection. Send
    /// failures are ignored; a member that disconnected mid-broadcast simply
    /// misses the event.
    pub fn broadcast(&self, meeting_id: &str, event: ServerEvent, except: Option<&str>) {
        let ids: Vec<ConnectionId> = match self.rooms.get(meeting_id) {
            Some(members) => members.iter().cloned().collect(),
            None => return,
        };

        for id in ids {
            if Some(id.as_str()) == except {
                continue;
            }
            if let Some(handle) = self.connections.get(&id) {
                let _ = handle.sender.send(event.clone());
            }
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
