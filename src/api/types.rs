use serde::Deserialize;

/// Outer wrapper returned by every Bot API method.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: User,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

/// One unit of inbound activity. Only `message` updates are replied to;
/// other kinds still move the offset forward.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

impl Update {
    /// Offset that acknowledges this update and everything before it.
    /// Saturates at `i64::MAX` so the offset can never wrap backwards.
    pub fn next_offset(&self) -> i64 {
        self.update_id.saturating_add(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
}

impl ParseMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
        }
    }
}

impl std::fmt::Display for ParseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a single `sendMessage` call.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundReply {
    pub chat_id: i64,
    pub text: String,
    pub parse_mode: ParseMode,
    pub reply_to_message_id: i64,
}

impl OutboundReply {
    /// Form fields in the order the Bot API documents them, all stringified.
    pub fn form_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("chat_id", self.chat_id.to_string()),
            ("text", self.text.clone()),
            ("parse_mode", self.parse_mode.to_string()),
            ("reply_to_message_id", self.reply_to_message_id.to_string()),
        ]
    }
}
