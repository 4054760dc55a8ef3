//! The monitor: one fetch-detect-dispatch cycle, plus the on-demand query
//! operations hosts call.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use statuswatch_adapters::{AdapterError, AdapterSet, ProviderAdapter};
use statuswatch_types::{
    Incident, NormalizedStatus, NotificationTarget, RegistryEntry, ServiceDescriptor, Severity,
    TransitionEvent, TransitionKind,
};

use crate::dispatcher::{DispatchReport, Dispatcher};
use crate::error::MonitorError;
use crate::notifier::Notifier;
use crate::registry::StatusRegistry;

/// Default bound on a single provider fetch.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A configured service and the adapter that reads its endpoint.
#[derive(Debug, Clone)]
pub struct MonitoredService {
    pub descriptor: ServiceDescriptor,
    pub adapter: Arc<dyn ProviderAdapter>,
}

/// Per-service status as reported to hosts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub service_id: String,
    pub display_name: String,
    /// `Unknown` when the service has not been checked successfully yet.
    pub severity: Severity,
    pub summary: Option<String>,
    pub last_checked_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub incidents: Vec<Incident>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
}

impl StatusView {
    /// Sentinel for a service without a successful fetch yet.
    pub fn not_checked(descriptor: &ServiceDescriptor) -> Self {
        Self {
            service_id: descriptor.id.clone(),
            display_name: descriptor.display_name.clone(),
            severity: Severity::Unknown,
            summary: None,
            last_checked_at: None,
            incidents: Vec::new(),
            page_url: None,
        }
    }

    pub fn from_status(descriptor: &ServiceDescriptor, status: &NormalizedStatus) -> Self {
        Self {
            service_id: descriptor.id.clone(),
            display_name: descriptor.display_name.clone(),
            severity: status.severity,
            summary: status.summary.clone(),
            last_checked_at: Some(status.fetched_at),
            incidents: status.incidents.clone(),
            page_url: status.page_url.clone(),
        }
    }

    pub fn from_entry(descriptor: &ServiceDescriptor, entry: &RegistryEntry) -> Self {
        match &entry.last_status {
            Some(status) => Self {
                last_checked_at: Some(entry.last_checked_at),
                ..Self::from_status(descriptor, status)
            },
            None => Self::not_checked(descriptor),
        }
    }

    pub fn is_checked(&self) -> bool {
        self.last_checked_at.is_some()
    }
}

/// Result of one successful check.
#[derive(Debug)]
pub struct CheckOutcome {
    pub event: TransitionEvent,
    /// Present only when the event was dispatched.
    pub dispatch: Option<DispatchReport>,
}

/// Ties adapters, the registry and the dispatcher together.
///
/// The monitor itself holds no mutable state; everything that changes lives
/// in the shared [`StatusRegistry`], so it can be wrapped in an `Arc` and
/// used from every poll task and command handler at once.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use statuswatch_adapters::{AdapterSet, HttpFetcher};
/// use statuswatch_core::{ChannelNotifier, StatusMonitor};
/// use statuswatch_types::{ParserKind, ServiceDescriptor};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let (notifier, _rx) = ChannelNotifier::create(16);
/// let adapters = AdapterSet::builtin(HttpFetcher::builder().build()?);
///
/// let monitor = StatusMonitor::builder(Arc::new(notifier))
///     .services(
///         [ServiceDescriptor::new(
///             "github",
///             "GitHub",
///             "https://www.githubstatus.com/api/v2/summary.json",
///             ParserKind::Statuspage,
///         )],
///         &adapters,
///     )
///     .target("ops-room")
///     .build();
///
/// let view = monitor.force_check("github").await?;
/// println!("{}: {}", view.display_name, view.severity);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct StatusMonitor {
    services: Vec<MonitoredService>,
    registry: Arc<StatusRegistry>,
    dispatcher: Dispatcher,
    targets: Vec<NotificationTarget>,
    request_timeout: Duration,
}

impl StatusMonitor {
    /// Create a builder delivering notifications through `notifier`.
    pub fn builder(notifier: Arc<dyn Notifier>) -> StatusMonitorBuilder {
        StatusMonitorBuilder::new(notifier)
    }

    pub fn registry(&self) -> &Arc<StatusRegistry> {
        &self.registry
    }

    pub fn targets(&self) -> &[NotificationTarget] {
        &self.targets
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// Fetch timeout for one service: never more than half its own interval.
    pub fn request_timeout_for(&self, descriptor: &ServiceDescriptor) -> Duration {
        match descriptor.interval {
            Some(interval) => self.request_timeout.min(interval / 2),
            None => self.request_timeout,
        }
    }

    /// Enabled services, in configuration order.
    pub fn services(&self) -> impl Iterator<Item = &MonitoredService> {
        self.services.iter().filter(|s| s.descriptor.enabled)
    }

    /// An enabled service by id.
    pub fn service(&self, service_id: &str) -> Option<&MonitoredService> {
        self.services().find(|s| s.descriptor.id == service_id)
    }

    /// Status of every enabled service from the registry. Never fetches.
    pub fn snapshot(&self) -> Vec<StatusView> {
        self.services()
            .map(|service| match self.registry.get(&service.descriptor.id) {
                Some(entry) => StatusView::from_entry(&service.descriptor, &entry),
                None => StatusView::not_checked(&service.descriptor),
            })
            .collect()
    }

    /// Check a service right now, outside its schedule.
    ///
    /// Detection and dispatch behave exactly as for a scheduled poll, but
    /// fetch and parse errors are returned instead of only being logged.
    pub async fn force_check(&self, service_id: &str) -> Result<StatusView, MonitorError> {
        let service = self
            .service(service_id)
            .ok_or_else(|| MonitorError::UnknownService(service_id.to_string()))?;

        info!(service = %service_id, "forced check requested");
        let outcome = self.check(service).await?;
        Ok(StatusView::from_status(&service.descriptor, &outcome.event.new_status))
    }

    /// Run one scheduled poll for a service by id.
    pub async fn poll(&self, service_id: &str) -> Result<CheckOutcome, MonitorError> {
        let service = self
            .service(service_id)
            .ok_or_else(|| MonitorError::UnknownService(service_id.to_string()))?;
        self.check(service).await
    }

    /// Fetch, classify, record, then dispatch if the event warrants it.
    ///
    /// The registry is updated before dispatch is attempted, so a failed
    /// delivery can never cause the same transition to be detected again.
    /// Results are ordered by when their fetch started, not by the wall clock.
    pub async fn check(&self, service: &MonitoredService) -> Result<CheckOutcome, MonitorError> {
        let id = service.descriptor.id.as_str();
        let ticket = self.registry.begin_check(id);

        let status = match self.fetch(service).await {
            Ok(status) => status,
            Err(source) => {
                let failures = self.registry.record_failure(id);
                if source.is_parse() {
                    error!(service = %id, failures, error = %source, "status payload could not be parsed");
                } else {
                    warn!(service = %id, failures, error = %source, "status fetch failed");
                }
                return Err(MonitorError::Adapter {
                    service: id.to_string(),
                    source,
                });
            }
        };

        let event = self.registry.observe(id, ticket, status);
        match event.kind {
            TransitionKind::FirstObservation => {
                info!(service = %id, severity = %event.new_status.severity, "initial status recorded");
            }
            TransitionKind::Unchanged => {
                debug!(service = %id, severity = %event.new_status.severity, "status unchanged");
            }
            TransitionKind::Degraded | TransitionKind::Recovered => {
                info!(
                    service = %id,
                    from = %event.previous_status.as_ref().map(|s| s.severity).unwrap_or(Severity::Unknown),
                    to = %event.new_status.severity,
                    "status {}",
                    event.kind
                );
            }
        }

        let dispatch = if event.is_dispatchable() {
            let report = self
                .dispatcher
                .dispatch(&event, &service.descriptor.display_name, &self.targets)
                .await;
            self.registry.mark_notified(id, Utc::now());
            if self.targets.is_empty() {
                debug!(service = %id, "status changed but no notification targets are configured");
            }
            Some(report)
        } else {
            None
        };

        Ok(CheckOutcome { event, dispatch })
    }

    async fn fetch(&self, service: &MonitoredService) -> Result<NormalizedStatus, AdapterError> {
        let timeout = self.request_timeout_for(&service.descriptor);
        let status = tokio::time::timeout(timeout, service.adapter.fetch(&service.descriptor))
            .await
            .map_err(|_| AdapterError::Timeout)??;

        // Unknown means "could not determine"; an adapter returning it as a
        // success is an adapter bug.
        if status.severity == Severity::Unknown {
            return Err(AdapterError::Parse(format!(
                "{} adapter returned an unknown severity",
                service.adapter.kind()
            )));
        }
        Ok(status)
    }
}

/// Builder for StatusMonitor.
#[derive(Debug)]
pub struct StatusMonitorBuilder {
    notifier: Arc<dyn Notifier>,
    services: Vec<MonitoredService>,
    targets: Vec<NotificationTarget>,
    registry: Option<Arc<StatusRegistry>>,
    request_timeout: Option<Duration>,
    send_timeout: Option<Duration>,
}

impl StatusMonitorBuilder {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier,
            services: Vec::new(),
            targets: Vec::new(),
            registry: None,
            request_timeout: None,
            send_timeout: None,
        }
    }

    /// Add a service with an explicit adapter.
    ///
    /// A later service with the same id replaces the earlier one.
    pub fn service(mut self, descriptor: ServiceDescriptor, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.services.retain(|s| s.descriptor.id != descriptor.id);
        self.services.push(MonitoredService { descriptor, adapter });
        self
    }

    /// Add services, resolving each adapter from its parser kind.
    pub fn services(
        mut self,
        descriptors: impl IntoIterator<Item = ServiceDescriptor>,
        adapters: &AdapterSet,
    ) -> Self {
        for descriptor in descriptors {
            let adapter = adapters.for_service(&descriptor);
            self = self.service(descriptor, adapter);
        }
        self
    }

    /// Add a notification target.
    pub fn target(mut self, target: impl Into<NotificationTarget>) -> Self {
        self.targets.push(target.into());
        self
    }

    pub fn targets(mut self, targets: impl IntoIterator<Item = NotificationTarget>) -> Self {
        self.targets.extend(targets);
        self
    }

    /// Share an existing registry (default: a fresh one).
    pub fn registry(mut self, registry: Arc<StatusRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Bound each provider fetch (default: 10 seconds).
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Bound each notification delivery (default: 10 seconds).
    pub fn send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = Some(timeout);
        self
    }

    /// Build the monitor.
    pub fn build(self) -> StatusMonitor {
        let registry = self.registry.unwrap_or_else(|| {
            Arc::new(StatusRegistry::with_services(
                self.services.iter().map(|s| s.descriptor.id.as_str()),
            ))
        });

        let mut dispatcher = Dispatcher::new(self.notifier);
        if let Some(timeout) = self.send_timeout {
            dispatcher = dispatcher.with_send_timeout(timeout);
        }

        StatusMonitor {
            services: self.services,
            registry,
            dispatcher,
            targets: self.targets,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}
