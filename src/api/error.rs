/// Failure of a single Bot API call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Connection failure, timeout, or unreadable response body.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// The body was not a valid envelope, or `result` had an unexpected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The server answered with `ok: false`.
    #[error("{method} failed ({}): {description}", code_label(.code))]
    Remote {
        method: String,
        code: Option<i64>,
        description: String,
    },

    #[error("{method} returned ok without a result")]
    MissingResult { method: String },
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        // The request URL embeds the bot token.
        ApiError::Transport(err.without_url())
    }
}

fn code_label(code: &Option<i64>) -> String {
    code.map_or_else(|| "no code".to_string(), |c| c.to_string())
}
