use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::TelegramConfig;

use super::{Notifier, NotifyError};

/// Bot API `sendMessage` client.
pub struct TelegramNotifier {
    client: reqwest::Client,
    config: Option<TelegramConfig>,
}

#[derive(Debug, Serialize)]
pub struct SendMessage<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    pub parse_mode: &'a str,
    pub disable_web_page_preview: bool,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    description: Option<String>,
}

impl TelegramNotifier {
    pub fn new(config: Option<TelegramConfig>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    fn endpoint(config: &TelegramConfig) -> String {
        format!("{}/bot{}/sendMessage", config.api_base, config.bot_token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let config = self.config.as_ref().ok_or(NotifyError::NotConfigured)?;

        let payload = SendMessage {
            chat_id: &config.chat_id,
            text,
            parse_mode: "HTML",
            disable_web_page_preview: true,
        };

        let resp = self
            .client
            .post(Self::endpoint(config))
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Unreachable(e.without_url().to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        // Keep only the API's description; the body is otherwise opaque.
        let description = resp
            .json::<ApiReply>()
            .await
            .ok()
            .and_then(|reply| reply.description);

        Err(NotifyError::Api {
            status: status.as_u16(),
            description,
        })
    }
}
