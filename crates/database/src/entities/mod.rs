//! Records persisted by the store

pub mod message;
pub mod room;
pub mod user;

pub use message::{CreateMessageRequest, Message, MessageWithAuthor};
pub use room::Room;
pub use user::User;
