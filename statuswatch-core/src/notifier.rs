//! Outbound notification delivery.
//!
//! The core hands finished message text to a [`Notifier`] supplied by the
//! host. Delivery semantics are whatever the host provides; the core only
//! distinguishes success from failure.

use std::fmt::Debug;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use statuswatch_types::NotificationTarget;

/// Failure to deliver a message to one target.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// The recipient could not be reached.
    #[error("recipient unreachable: {0}")]
    Unreachable(String),

    /// The recipient (or the host) refused the message.
    #[error("message rejected: {0}")]
    Rejected(String),

    /// Delivery did not finish within the send timeout.
    #[error("delivery timed out")]
    Timeout,

    /// The delivery channel has shut down.
    #[error("notification channel closed")]
    Closed,
}

/// Host capability for sending a message to a recipient.
#[async_trait]
pub trait Notifier: Send + Sync + Debug {
    async fn send_message(&self, target: &NotificationTarget, text: &str) -> Result<(), DispatchError>;
}

/// A message produced by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub target: NotificationTarget,
    pub text: String,
}

/// Notifier that forwards messages through a channel.
///
/// Useful for hosts that deliver from their own task, and for tests.
///
/// # Example
///
/// ```rust
/// use statuswatch_core::ChannelNotifier;
///
/// let (notifier, mut rx) = ChannelNotifier::create(16);
///
/// // Later, receive notifications
/// // while let Some(n) = rx.recv().await {
/// //     println!("{} <- {}", n.target, n.text);
/// // }
/// ```
#[derive(Debug, Clone)]
pub struct ChannelNotifier {
    sender: mpsc::Sender<Notification>,
}

impl ChannelNotifier {
    /// Create a channel notifier and return it with its receiver.
    pub fn create(buffer: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer);
        (Self { sender: tx }, rx)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn send_message(&self, target: &NotificationTarget, text: &str) -> Result<(), DispatchError> {
        // Don't block the poll cycle if the consumer is behind
        self.sender
            .try_send(Notification {
                target: target.clone(),
                text: text.to_string(),
            })
            .map_err(|e| match e {
                mpsc::error::TrySendError::Full(_) => {
                    DispatchError::Rejected("notification channel full".to_string())
                }
                mpsc::error::TrySendError::Closed(_) => DispatchError::Closed,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_channel_notifier_delivers() {
        let (notifier, mut rx) = ChannelNotifier::create(4);
        let target = NotificationTarget::new("ops");

        notifier.send_message(&target, "hello").await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.target, target);
        assert_eq!(received.text, "hello");
    }

    #[tokio::test]
    async fn test_channel_notifier_full() {
        let (notifier, _rx) = ChannelNotifier::create(1);
        let target = NotificationTarget::new("ops");

        notifier.send_message(&target, "one").await.unwrap();
        let err = notifier.send_message(&target, "two").await.unwrap_err();
        assert!(matches!(err, DispatchError::Rejected(_)));
    }

    #[tokio::test]
    async fn test_channel_notifier_closed() {
        let (notifier, rx) = ChannelNotifier::create(1);
        drop(rx);

        let err = notifier
            .send_message(&NotificationTarget::new("ops"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, DispatchError::Closed));
    }
}
