//! Identifier types for connections, rooms and broadcast topics

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifies one live push-channel session. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A room identifier as clients send it.
///
/// Clients may send either a JSON number or a string; both normalise to the
/// same textual form, so `1`, `1.0` and `"1"` name the same room. Existence
/// in the store is never checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawRoomId", into = "String")]
pub struct RoomId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawRoomId {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
}

impl From<RawRoomId> for RoomId {
    fn from(raw: RawRoomId) -> Self {
        match raw {
            RawRoomId::Signed(id) => RoomId::from(id),
            RawRoomId::Unsigned(id) => RoomId(id.to_string()),
            RawRoomId::Float(id) => RoomId(format_float_id(id)),
            RawRoomId::Text(id) => RoomId(id),
        }
    }
}

/// Whole floats print without a fraction, so `1.0` joins `room_1`.
fn format_float_id(id: f64) -> String {
    if id == 0.0 {
        "0".to_string()
    } else if id.fract() == 0.0 {
        format!("{id:.0}")
    } else {
        id.to_string()
    }
}

impl From<i64> for RoomId {
    fn from(id: i64) -> Self {
        RoomId(id.to_string())
    }
}

impl From<&str> for RoomId {
    fn from(id: &str) -> Self {
        RoomId(id.to_string())
    }
}

impl From<RoomId> for String {
    fn from(id: RoomId) -> Self {
        id.0
    }
}

impl RoomId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Broadcast topic carrying this room's events
    pub fn topic(&self) -> Topic {
        Topic::room(self)
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A broadcast namespace on the push channel.
///
/// Room topics are `room_<id>`, keeping them apart from any other event
/// namespace that shares the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Topic(String);

impl Topic {
    const ROOM_PREFIX: &'static str = "room_";

    pub fn room(room_id: &RoomId) -> Self {
        Topic(format!("{}{}", Self::ROOM_PREFIX, room_id.as_str()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
