//! Notification dispatch for detected transitions.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tracing::{info, warn};

use statuswatch_types::{NotificationTarget, TransitionEvent, TransitionKind};

use crate::notifier::{DispatchError, Notifier};

/// Default time allowed for a single delivery.
pub const DEFAULT_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Incidents listed in a notification before the rest are elided.
const MAX_LISTED_INCIDENTS: usize = 3;

/// Outcome of dispatching one event.
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub delivered: Vec<NotificationTarget>,
    pub failed: Vec<(NotificationTarget, DispatchError)>,
}

impl DispatchReport {
    /// Number of targets a delivery was attempted for.
    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.failed.len()
    }

    pub fn all_delivered(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Formats transition messages and fans them out to targets.
///
/// Every target gets exactly one attempt per event. A failed delivery is
/// logged and dropped; there is no retry queue, since a later poll of the
/// same state is `Unchanged` and would never resend anyway.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    notifier: Arc<dyn Notifier>,
    send_timeout: Duration,
}

impl Dispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            send_timeout: DEFAULT_SEND_TIMEOUT,
        }
    }

    /// Bound each delivery attempt (default: 10 seconds).
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Deliver `event` to every target, independently and concurrently.
    ///
    /// The report lists targets in the order given.
    ///
    /// Events that are not dispatchable produce an empty report.
    pub async fn dispatch(
        &self,
        event: &TransitionEvent,
        display_name: &str,
        targets: &[NotificationTarget],
    ) -> DispatchReport {
        let mut report = DispatchReport::default();
        if !event.is_dispatchable() {
            return report;
        }

        let message = format_transition_message(display_name, event);
        let text = message.as_str();

        // All targets at once, so a hung webhook costs at most one timeout.
        let attempts = targets.iter().map(|target| async move {
            let sent = tokio::time::timeout(self.send_timeout, self.notifier.send_message(target, text))
                .await
                .unwrap_or(Err(DispatchError::Timeout));
            (target, sent)
        });

        for (target, sent) in join_all(attempts).await {
            match sent {
                Ok(()) => {
                    info!(service = %event.service_id, recipient = %target, "sent {} notification", event.kind);
                    report.delivered.push(target.clone());
                }
                Err(e) => {
                    warn!(service = %event.service_id, recipient = %target, error = %e, "failed to send notification");
                    report.failed.push((target.clone(), e));
                }
            }
        }

        report
    }
}

/// Render the human readable message for a transition.
pub fn format_transition_message(display_name: &str, event: &TransitionEvent) -> String {
    let new = &event.new_status;

    let headline = match event.kind {
        TransitionKind::Degraded => "is having problems",
        TransitionKind::Recovered => "has recovered",
        TransitionKind::FirstObservation => "is being monitored",
        TransitionKind::Unchanged => "status update",
    };

    let mut message = format!("{} [{}] {}\n", new.severity.symbol(), display_name, headline);

    let previous = event
        .previous_status
        .as_ref()
        .map(|p| p.severity.label())
        .unwrap_or("not yet checked");
    let _ = writeln!(message, "State: {} → {}", previous, new.severity.label());

    if let Some(summary) = &new.summary {
        let _ = writeln!(message, "Details: {}", summary);
    }

    if !new.incidents.is_empty() {
        message.push_str("Active incidents:\n");
        for incident in new.incidents.iter().take(MAX_LISTED_INCIDENTS) {
            let _ = writeln!(message, "  - {} ({})", incident.name, incident.status);
        }
        let more = new.incidents.len().saturating_sub(MAX_LISTED_INCIDENTS);
        if more > 0 {
            let _ = writeln!(message, "  ... and {} more", more);
        }
    }

    if let Some(url) = &new.page_url {
        let _ = writeln!(message, "Status page: {}", url);
    }

    let _ = write!(
        message,
        "At: {}",
        new.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    message
}
