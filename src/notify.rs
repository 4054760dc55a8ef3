//! Host notifiers.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::json;
use tracing::{debug, info};

use statuswatch_core::{DispatchError, NotificationTarget, Notifier};

use crate::config::NotifierKind;

/// Build the notifier selected in configuration.
pub fn from_kind(kind: NotifierKind, timeout: Duration) -> Result<Arc<dyn Notifier>, reqwest::Error> {
    Ok(match kind {
        NotifierKind::Log => Arc::new(LogNotifier),
        NotifierKind::Webhook => Arc::new(WebhookNotifier::new(timeout)?),
    })
}

/// Prints messages to stdout. Targets are only labels.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_message(&self, target: &NotificationTarget, text: &str) -> Result<(), DispatchError> {
        info!(recipient = %target, "notification");
        println!("--- to {} ---\n{}\n", target, text);
        Ok(())
    }
}

/// Posts `{"content": text}` to each target, treating targets as webhook
/// URLs (Discord, Slack-compatible relays and similar).
#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    client: Client,
}

impl WebhookNotifier {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("statuswatch/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_message(&self, target: &NotificationTarget, text: &str) -> Result<(), DispatchError> {
        let url = Url::parse(target.as_str())
            .map_err(|e| DispatchError::Rejected(format!("not a webhook url: {}", e)))?;

        let response = self
            .client
            .post(url)
            .json(&json!({ "content": text }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    DispatchError::Timeout
                } else {
                    DispatchError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DispatchError::Rejected(format!("webhook returned status {}", status)));
        }

        debug!(status = %status, "webhook accepted notification");
        Ok(())
    }
}
