// src/notify/telegram.rs
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::notify::{MessageTransport, TransportFailure};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Envelope every Bot API method replies with.
#[derive(Debug, Deserialize)]
struct TelegramReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<i64>,
}

/// Sends messages through the Telegram Bot API `sendMessage` method.
pub struct TelegramTransport {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

impl TelegramTransport {
    pub fn new(client: reqwest::Client, token: String) -> Self {
        Self::with_api_base(client, token, TELEGRAM_API_BASE)
    }

    pub fn with_api_base(client: reqwest::Client, token: String, api_base: impl Into<String>) -> Self {
        Self {
            client,
            token,
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base, self.token)
    }
}

/// Turns a Bot API reply into success or the description Telegram gave.
fn reply_outcome(status: reqwest::StatusCode, body: &str) -> Result<(), TransportFailure> {
    match serde_json::from_str::<TelegramReply>(body) {
        Ok(reply) if reply.ok => Ok(()),
        Ok(reply) => {
            tracing::debug!("Telegram refused message: error_code={:?}", reply.error_code);
            Err(TransportFailure::new(
                reply.description.unwrap_or_else(|| format!("HTTP {}", status)),
            ))
        }
        Err(e) if status.is_success() => Err(TransportFailure::new(format!("Unreadable Telegram reply: {}", e))),
        Err(_) => Err(TransportFailure::new(format!("HTTP {}", status))),
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<(), TransportFailure> {
        let response = self
            .client
            .post(self.endpoint())
            .json(&SendMessage { chat_id, text })
            .send()
            .await
            // without_url keeps the bot token out of the message
            .map_err(|e| TransportFailure::new(e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportFailure::new(e.without_url().to_string()))?;
        reply_outcome(status, &body)
    }
}
