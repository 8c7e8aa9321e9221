//! Services coordinating the store and the push channel

pub mod message_service;

pub use message_service::MessageService;
