//! # Incognito Rooms Crate
//!
//! Room membership and message fanout for the chat relay.
//!
//! - [`RoomRegistry`] owns which live connection is subscribed to which room topic.
//! - [`Broadcaster`] delivers an event to a topic's subscribers at call time.
//! - [`MessageService`] lists rooms and messages and, after persisting a new
//!   message, broadcasts it as `new_message` on the room's `room_<id>` topic.

pub mod dispatcher;
pub mod registry;
pub mod services;
pub mod types;

pub use dispatcher::{Broadcaster, DeliveryReport};
pub use registry::RoomRegistry;
pub use services::MessageService;
pub use types::{ClientEvent, ConnectionId, RoomId, ServerEvent, ServiceError, ServiceResult, Topic};
