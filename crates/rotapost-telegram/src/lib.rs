//! `rotapost-telegram` — outbound message delivery to a Telegram channel.

pub mod error;
pub mod publisher;

pub use error::PublishError;
pub use publisher::Publisher;
