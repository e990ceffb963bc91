//! In-memory `BotApi` used by the poller and dispatcher tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::time::Instant;

use super::types::{Chat, Message, OutboundReply, Update, User};
use super::{ApiError, BotApi};

#[derive(Default)]
pub struct FakeApi {
    batches: Mutex<VecDeque<Result<Vec<Update>, ApiError>>>,
    fetches: Mutex<Vec<(i64, Instant)>>,
    sent: Mutex<Vec<OutboundReply>>,
    fail_sends: bool,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_sends() -> Self {
        Self {
            fail_sends: true,
            ..Self::default()
        }
    }

    /// Queue a `getUpdates` answer. Once the queue is empty every fetch returns no updates.
    pub fn push_batch(&self, batch: Result<Vec<Update>, ApiError>) {
        self.batches.lock().unwrap().push_back(batch);
    }

    /// Offsets passed to `getUpdates`, in call order.
    pub fn fetched_offsets(&self) -> Vec<i64> {
        self.fetches.lock().unwrap().iter().map(|(o, _)| *o).collect()
    }

    pub fn fetch_times(&self) -> Vec<Instant> {
        self.fetches.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    pub fn sent(&self) -> Vec<OutboundReply> {
        self.sent.lock().unwrap().clone()
    }
}

pub fn remote_error() -> ApiError {
    ApiError::Remote {
        method: "getUpdates".to_string(),
        code: Some(502),
        description: "Bad Gateway".to_string(),
    }
}

pub fn message_update(update_id: i64, chat_id: i64, message_id: i64, first_name: &str) -> Update {
    Update {
        update_id,
        message: Some(Message {
            message_id,
            from: User {
                id: 1000 + update_id,
                first_name: first_name.to_string(),
                username: None,
            },
            chat: Chat { id: chat_id },
            text: Some("hello".to_string()),
        }),
    }
}

#[async_trait]
impl BotApi for FakeApi {
    async fn get_me(&self) -> Result<User, ApiError> {
        Ok(User {
            id: 1,
            first_name: "Greeter".to_string(),
            username: Some("greeter_bot".to_string()),
        })
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ApiError> {
        self.fetches.lock().unwrap().push((offset, Instant::now()));
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn send_message(&self, reply: &OutboundReply) -> Result<Message, ApiError> {
        self.sent.lock().unwrap().push(reply.clone());
        if self.fail_sends {
            return Err(ApiError::Remote {
                method: "sendMessage".to_string(),
                code: Some(403),
                description: "Forbidden: bot was blocked by the user".to_string(),
            });
        }
        Ok(Message {
            message_id: reply.reply_to_message_id + 1,
            from: User::default(),
            chat: Chat { id: reply.chat_id },
            text: Some(reply.text.clone()),
        })
    }
}
