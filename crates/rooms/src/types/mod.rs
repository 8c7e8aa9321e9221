//! Identifiers, push-channel events and errors shared by the rooms crate

pub mod errors;
pub mod events;
pub mod ids;

pub use errors::{ServiceError, ServiceResult};
pub use events::{ClientEvent, ServerEvent};
pub use ids::{ConnectionId, RoomId, Topic};
