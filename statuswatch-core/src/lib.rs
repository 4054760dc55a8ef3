//! # statuswatch-core
//!
//! Polls third-party status endpoints, detects when a service goes from
//! healthy to unhealthy (or back) and tells the configured recipients.
//!
//! ```text
//!  Scheduler ──tick──▶ StatusMonitor::poll ──▶ ProviderAdapter::fetch
//!                            │
//!                            ▼
//!                 StatusRegistry::observe  (classify + record, per service)
//!                            │ Degraded / Recovered
//!                            ▼
//!                 Dispatcher ──▶ Notifier::send_message (each target once)
//! ```
//!
//! Hosts supply the [`Notifier`] (how a message reaches a recipient) and
//! call [`StatusMonitor::snapshot`] and [`StatusMonitor::force_check`] to
//! answer user commands.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use statuswatch_adapters::{AdapterSet, HttpFetcher};
//! use statuswatch_core::{ChannelNotifier, Scheduler, StatusMonitor};
//! use statuswatch_types::{ParserKind, ServiceDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (notifier, mut rx) = ChannelNotifier::create(64);
//!     let adapters = AdapterSet::builtin(HttpFetcher::builder().build()?);
//!
//!     let monitor = Arc::new(
//!         StatusMonitor::builder(Arc::new(notifier))
//!             .services(
//!                 [ServiceDescriptor::new(
//!                     "github",
//!                     "GitHub",
//!                     "https://www.githubstatus.com/api/v2/summary.json",
//!                     ParserKind::Statuspage,
//!                 )],
//!                 &adapters,
//!             )
//!             .target("#ops")
//!             .build(),
//!     );
//!
//!     let handle = Scheduler::builder(monitor.clone())
//!         .interval(Duration::from_secs(60))
//!         .build()?
//!         .start();
//!
//!     while let Some(notification) = rx.recv().await {
//!         println!("{} <- {}", notification.target, notification.text);
//!     }
//!
//!     handle.shutdown().await;
//!     Ok(())
//! }
//! ```

mod detector;
mod dispatcher;
mod error;
mod monitor;
mod notifier;
mod registry;
mod scheduler;

pub use detector::classify;
pub use dispatcher::{format_transition_message, DispatchReport, Dispatcher, DEFAULT_SEND_TIMEOUT};
pub use error::{MonitorError, SchedulerError};
pub use monitor::{
    CheckOutcome, MonitoredService, StatusMonitor, StatusMonitorBuilder, StatusView,
    DEFAULT_REQUEST_TIMEOUT,
};
pub use notifier::{ChannelNotifier, DispatchError, Notification, Notifier};
pub use registry::{CheckTicket, StatusRegistry};
pub use scheduler::{Scheduler, SchedulerBuilder, SchedulerHandle};

// Re-export types for convenience
pub use statuswatch_types::{
    Incident, NormalizedStatus, NotificationTarget, RegistryEntry, ServiceDescriptor, Severity,
    TransitionEvent, TransitionKind,
};
