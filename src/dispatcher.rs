use std::sync::Arc;

use tracing::{debug, error, info};

use crate::api::{BotApi, OutboundReply, ParseMode, Update};

pub fn greeting(first_name: &str) -> String {
    format!("Hi, {}! I'm bot", first_name)
}

/// Build the greeting reply for `update`, threaded under the incoming message.
/// Returns `None` for updates that carry no message.
pub fn build_reply(update: &Update) -> Option<OutboundReply> {
    let message = update.message.as_ref()?;
    Some(OutboundReply {
        chat_id: message.chat.id,
        text: greeting(&message.from.first_name),
        parse_mode: ParseMode::Html,
        reply_to_message_id: message.message_id,
    })
}

/// Turns each received update into exactly one `sendMessage` call.
pub struct Dispatcher {
    api: Arc<dyn BotApi>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn BotApi>) -> Self {
        Self { api }
    }

    /// Send the greeting for `update`. Failures are logged and dropped.
    pub async fn dispatch(&self, update: &Update) {
        let Some(message) = update.message.as_ref() else {
            debug!("Skipping update {} without a message", update.update_id);
            return;
        };

        info!(
            "Message from {} ({}) in chat {}: {}",
            message.from.first_name,
            message.from.id,
            message.chat.id,
            message.text.as_deref().unwrap_or_default()
        );

        let Some(reply) = build_reply(update) else {
            return;
        };

        match self.api.send_message(&reply).await {
            Ok(sent) => debug!(
                "Replied to message {} in chat {} with message {}",
                reply.reply_to_message_id, reply.chat_id, sent.message_id
            ),
            Err(e) => error!("Failed to reply in chat {}: {}", reply.chat_id, e),
        }
    }
}
