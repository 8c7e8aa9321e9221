//! Events exchanged over the push channel
//!
//! Every frame is a JSON object `{"event": <name>, "data": <payload>}`.

use incognito_database::Message;
use serde::{Deserialize, Serialize};

use super::ids::RoomId;

/// Control events sent by clients. None of them is acknowledged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ClientEvent {
    JoinRoom(RoomId),
    LeaveRoom(RoomId),
}

/// Events pushed to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum ServerEvent {
    /// A message was persisted in a room the connection has joined
    NewMessage(Message),
    /// Reply to a frame that could not be understood
    Error { message: String },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::NewMessage(_) => "new_message",
            ServerEvent::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn client_events_accept_numeric_and_textual_rooms() {
        let join: ClientEvent =
            serde_json::from_value(json!({ "event": "join_room", "data": 3 })).unwrap();
        let leave: ClientEvent =
            serde_json::from_value(json!({ "event": "leave_room", "data": "3" })).unwrap();

        assert_eq!(join, ClientEvent::JoinRoom(RoomId::from(3)));
        assert_eq!(leave, ClientEvent::LeaveRoom(RoomId::from(3)));
    }

    #[test]
    fn unknown_client_events_are_rejected() {
        let result = serde_json::from_value::<ClientEvent>(json!({ "event": "typing", "data": 1 }));
        assert!(result.is_err());
    }

    #[test]
    fn new_message_carries_the_full_record() {
        let message = Message {
            id: 9,
            room_id: 1,
            user_id: None,
            content: Some("hello".to_string()),
            is_anonymous: true,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
        };

        let event = ServerEvent::NewMessage(message);
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(event.name(), "new_message");
        assert_eq!(
            value,
            json!({
                "event": "new_message",
                "data": {
                    "id": 9,
                    "room_id": 1,
                    "user_id": null,
                    "content": "hello",
                    "is_anonymous": true,
                    "created_at": "2024-01-01T00:00:00.000Z"
                }
            })
        );
    }
}
