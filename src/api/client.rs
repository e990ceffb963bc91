use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::types::{Envelope, Message, OutboundReply, Update, User};
use super::BotApi;
use crate::config::ApiConfig;

/// HTTP client for the Bot API. One `reqwest::Client` is shared by every call.
pub struct ApiClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApiClient {
    pub fn new(token: impl Into<String>, config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url().to_string(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    /// POST `method` with form-encoded `params` and return the raw `result`.
    pub async fn call(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value, ApiError> {
        debug!("Calling {} with {} param(s)", method, params.len());

        let response = self
            .client
            .post(self.method_url(method))
            .form(params)
            .send()
            .await?;

        // Error statuses still carry an envelope, so the status code is not checked.
        let body = response.bytes().await?;
        decode_envelope(method, &body)
    }

    async fn call_typed<T: DeserializeOwned>(
        &self,
        method: &str,
        params: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let result = self.call(method, params).await?;
        Ok(serde_json::from_value(result)?)
    }
}

/// Unwrap an envelope, decoding `result` only when `ok` is true.
pub(crate) fn decode_envelope(method: &str, body: &[u8]) -> Result<serde_json::Value, ApiError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    if !envelope.ok {
        return Err(ApiError::Remote {
            method: method.to_string(),
            code: envelope.error_code,
            description: envelope.description.unwrap_or_default(),
        });
    }
    envelope.result.ok_or_else(|| ApiError::MissingResult {
        method: method.to_string(),
    })
}

#[async_trait]
impl BotApi for ApiClient {
    async fn get_me(&self) -> Result<User, ApiError> {
        self.call_typed("getMe", &[]).await
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>, ApiError> {
        let mut params = Vec::new();
        if offset > 0 {
            params.push(("offset", offset.to_string()));
        }
        self.call_typed("getUpdates", &params).await
    }

    async fn send_message(&self, reply: &OutboundReply) -> Result<Message, ApiError> {
        self.call_typed("sendMessage", &reply.form_params()).await
    }
}
