//! Room and message operations behind the HTTP surface

use incognito_database::{
    CreateMessageRequest, Message, MessageRepository, MessageWithAuthor, Room, RoomRepository,
    StoreError,
};
use tracing::{error, info};

use crate::dispatcher::{Broadcaster, DeliveryReport};
use crate::types::{RoomId, ServerEvent, ServiceResult};

pub struct MessageService {
    rooms: RoomRepository,
    messages: MessageRepository,
    broadcaster: Broadcaster,
}

impl MessageService {
    pub fn new(rooms: RoomRepository, messages: MessageRepository, broadcaster: Broadcaster) -> Self {
        Self {
            rooms,
            messages,
            broadcaster,
        }
    }

    /// All rooms, newest first
    pub async fn list_rooms(&self) -> ServiceResult<Vec<Room>> {
        Ok(self.rooms.list_all().await.map_err(log_store_failure)?)
    }

    /// The room's messages, oldest first; empty for unknown rooms
    pub async fn list_messages(&self, room_id: i64) -> ServiceResult<Vec<MessageWithAuthor>> {
        Ok(self
            .messages
            .find_by_room(room_id)
            .await
            .map_err(log_store_failure)?)
    }

    /// Persist a message and push it to everyone currently in the room.
    ///
    /// Content is stored as given, empty or missing included, and the room is
    /// not checked for existence. Nothing is broadcast when the store fails.
    pub async fn submit_message(
        &self,
        room_id: i64,
        content: Option<String>,
        is_anonymous: bool,
    ) -> ServiceResult<(Message, DeliveryReport)> {
        let request = CreateMessageRequest::unauthored(room_id, content, is_anonymous);
        let message = self
            .messages
            .create(&request)
            .await
            .map_err(log_store_failure)?;

        let topic = RoomId::from(room_id).topic();
        let report = self
            .broadcaster
            .broadcast(&topic, &ServerEvent::NewMessage(message.clone()));

        info!(
            message_id = message.id,
            %topic,
            delivered = report.delivered,
            dropped = report.dropped,
            "message submitted"
        );

        Ok((message, report))
    }
}

fn log_store_failure(err: StoreError) -> StoreError {
    error!(operation = err.operation(), error = %err, "store operation failed");
    err
}
