//! Chat publisher.
//!
//! Single-attempt POST of a formatted message, either to the hosted chat
//! API (static `X-API-Key` header) or to a generic webhook (no auth). The
//! two targets accept slightly different payloads and success statuses.

use std::time::Duration;

use common::config::ChatConfig;
use common::Error;
use serde::Serialize;
use tracing::debug;

/// Where a message goes and how it is authenticated.
#[derive(Debug, Clone)]
pub enum ChatTarget {
    /// Hosted chat API: `{"content": ...}` with an `X-API-Key` header,
    /// success on 200/201.
    Hosted { url: String, api_key: String },
    /// Generic webhook: `{"content": ..., "text": ...}`, no auth,
    /// success on 200/204.
    Webhook { url: String },
}

#[derive(Serialize)]
struct HostedPayload<'a> {
    content: &'a str,
}

#[derive(Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
    text: &'a str,
}

#[derive(Debug, Clone)]
pub struct ChatClient {
    client: reqwest::Client,
    target: ChatTarget,
}

impl ChatClient {
    pub fn new(target: ChatTarget, timeout_secs: u64) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("failed to build reqwest client");

        Self { client, target }
    }

    /// Build a client from config, or `None` when neither an API key nor a
    /// webhook URL is configured (the jobs then run without posting).
    pub fn from_config(chat: &ChatConfig, timeout_secs: u64) -> Option<Self> {
        if let Some(url) = chat.webhook_url.as_deref() {
            return Some(Self::new(
                ChatTarget::Webhook { url: url.to_string() },
                timeout_secs,
            ));
        }
        chat.api_key.as_deref().map(|key| {
            Self::new(
                ChatTarget::Hosted {
                    url: chat.api_url.clone(),
                    api_key: key.to_string(),
                },
                timeout_secs,
            )
        })
    }

    /// Post one message. Single attempt, no retries.
    pub async fn post(&self, message: &str) -> Result<(), Error> {
        let (req, accepted): (reqwest::RequestBuilder, &[u16]) = match &self.target {
            ChatTarget::Hosted { url, api_key } => (
                self.client
                    .post(url)
                    .header("X-API-Key", api_key)
                    .json(&HostedPayload { content: message }),
                &[200, 201],
            ),
            ChatTarget::Webhook { url } => (
                self.client.post(url).json(&WebhookPayload {
                    content: message,
                    text: message,
                }),
                &[200, 204],
            ),
        };

        let resp = req.send().await.map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status().as_u16();
        if !accepted.contains(&status) {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::ChatApi {
                status,
                message: body,
            });
        }

        debug!("Posted {} chars to chat", message.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_prefers_webhook() {
        let chat = ChatConfig {
            api_url: "https://chat.example/messages".into(),
            api_key: Some("k".into()),
            webhook_url: Some("https://hooks.example/x".into()),
        };
        let client = ChatClient::from_config(&chat, 10).unwrap();
        assert!(matches!(client.target, ChatTarget::Webhook { .. }));
    }

    #[test]
    fn from_config_without_credentials_is_none() {
        let chat = ChatConfig {
            api_url: "https://chat.example/messages".into(),
            api_key: None,
            webhook_url: None,
        };
        assert!(ChatClient::from_config(&chat, 10).is_none());
    }
}
