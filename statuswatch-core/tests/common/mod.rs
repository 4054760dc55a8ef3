//! Shared fakes for the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use statuswatch_adapters::{AdapterError, ProviderAdapter};
use statuswatch_core::{
    DispatchError, NormalizedStatus, NotificationTarget, Notifier, ServiceDescriptor, Severity,
    StatusMonitor,
};
use statuswatch_types::ParserKind;

/// One scripted provider response.
#[derive(Debug, Clone)]
pub enum Step {
    Status(Severity, Option<&'static str>),
    /// A status stamped with the wall clock shifted by the given offset.
    Skewed(Severity, chrono::Duration),
    FetchError,
    ParseError,
}

impl Step {
    pub fn ok(severity: Severity) -> Self {
        Step::Status(severity, None)
    }

    pub fn with_summary(severity: Severity, summary: &'static str) -> Self {
        Step::Status(severity, Some(summary))
    }

    pub fn skewed(severity: Severity, offset: chrono::Duration) -> Self {
        Step::Skewed(severity, offset)
    }
}

/// Adapter that replays a script, then keeps answering Operational.
#[derive(Debug, Default)]
pub struct ScriptedAdapter {
    script: Mutex<VecDeque<Step>>,
    calls: AtomicUsize,
}

impl ScriptedAdapter {
    pub fn new(steps: impl IntoIterator<Item = Step>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(steps.into_iter().collect()),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderAdapter for ScriptedAdapter {
    fn kind(&self) -> ParserKind {
        ParserKind::Statuspage
    }

    async fn fetch(&self, _: &ServiceDescriptor) -> Result<NormalizedStatus, AdapterError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        // Let concurrent callers interleave.
        tokio::task::yield_now().await;

        match self.script.lock().pop_front() {
            Some(Step::Status(severity, summary)) => {
                let status = NormalizedStatus::new(severity);
                Ok(match summary {
                    Some(text) => status.with_summary(text),
                    None => status,
                })
            }
            Some(Step::Skewed(severity, offset)) => {
                Ok(NormalizedStatus::at(severity, chrono::Utc::now() + offset))
            }
            Some(Step::FetchError) => Err(AdapterError::Connection("connection refused".to_string())),
            Some(Step::ParseError) => Err(AdapterError::Parse("missing field `status`".to_string())),
            None => Ok(NormalizedStatus::new(Severity::Operational)),
        }
    }
}

/// Notifier that records every delivery and fails for chosen targets.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<(String, String)>>,
    failing: Vec<String>,
}

impl RecordingNotifier {
    pub fn failing_for(targets: &[&str]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: targets.iter().map(|t| t.to_string()).collect(),
        }
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }

    pub fn sent_to(&self, target: &str) -> Vec<String> {
        self.sent
            .lock()
            .iter()
            .filter(|(t, _)| t == target)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_message(&self, target: &NotificationTarget, text: &str) -> Result<(), DispatchError> {
        if self.failing.iter().any(|t| t == target.as_str()) {
            return Err(DispatchError::Unreachable(format!("{} is offline", target)));
        }
        self.sent.lock().push((target.to_string(), text.to_string()));
        Ok(())
    }
}

pub fn github() -> ServiceDescriptor {
    ServiceDescriptor::new(
        "github",
        "GitHub",
        "https://www.githubstatus.com/api/v2/summary.json",
        ParserKind::Statuspage,
    )
}

/// A monitor over a single scripted "github" service.
pub fn github_monitor(
    adapter: Arc<ScriptedAdapter>,
    notifier: Arc<RecordingNotifier>,
    targets: &[&str],
) -> StatusMonitor {
    let mut builder = StatusMonitor::builder(notifier).service(github(), adapter);
    for target in targets {
        builder = builder.target(*target);
    }
    builder.build()
}
