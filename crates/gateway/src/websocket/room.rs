//! Room push channel
//!
//! Each socket is one registry connection. Clients send `join_room` and
//! `leave_room` frames; the server pushes `new_message` for every room the
//! socket is currently in. Membership ends when the socket closes.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use incognito_rooms::{ClientEvent, ConnectionId, RoomRegistry, ServerEvent};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::state::GatewayState;

pub async fn room_websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<GatewayState>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_room_websocket(socket, Arc::clone(&state.registry)))
}

async fn handle_room_websocket(socket: WebSocket, registry: Arc<RoomRegistry>) {
    let (connection_id, mut events) = registry.connect();
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            let text = match serde_json::to_string(&event) {
                Ok(text) => text,
                Err(err) => {
                    warn!(%connection_id, event = event.name(), error = %err, "failed to encode event");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let inbound_registry = Arc::clone(&registry);
    let mut receive_task = tokio::spawn(async move {
        while let Some(frame) = receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    handle_client_frame(&inbound_registry, connection_id, &text);
                }
                Ok(Message::Binary(bytes)) => match std::str::from_utf8(&bytes) {
                    Ok(text) => handle_client_frame(&inbound_registry, connection_id, text),
                    Err(_) => reject_frame(&inbound_registry, connection_id),
                },
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(err) => {
                    debug!(%connection_id, error = %err, "websocket receive failed");
                    break;
                }
            }
        }
    });

    // Whichever side finishes first ends the connection
    tokio::select! {
        _ = &mut send_task => receive_task.abort(),
        _ = &mut receive_task => send_task.abort(),
    }

    registry.disconnect(connection_id);
}

/// Apply one client frame to the registry.
pub(crate) fn handle_client_frame(registry: &RoomRegistry, connection_id: ConnectionId, text: &str) {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::JoinRoom(room)) => {
            registry.join(connection_id, room.topic());
        }
        Ok(ClientEvent::LeaveRoom(room)) => {
            registry.leave(connection_id, &room.topic());
        }
        Err(err) => {
            debug!(%connection_id, error = %err, "unrecognised client frame");
            reject_frame(registry, connection_id);
        }
    }
}

fn reject_frame(registry: &RoomRegistry, connection_id: ConnectionId) {
    registry.notify(
        connection_id,
        ServerEvent::Error {
            message: "Invalid event format".to_string(),
        },
    );
}
