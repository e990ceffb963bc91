pub mod client;
pub mod error;
pub mod types;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;

pub use client::ApiClient;
pub use error::ApiError;
pub use types::{Message, OutboundReply, ParseMode, Update, User};

/// The Bot API methods the bot relies on.
///
/// The poller and the dispatcher only see this trait, so tests can drive
/// them without a network.
#[async_trait]
pub trait BotApi: Send + Sync {
    async fn get_me(&self) -> Result<User, ApiError>;

    /// Fetch pending updates. An `offset` of zero means "no filter".
    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ApiError>;

    async fn send_message(&self, reply: &OutboundReply) -> Result<Message, ApiError>;
}
