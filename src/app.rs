//! Wiring settings into a running monitor.

use std::sync::Arc;

use anyhow::{Context, Result};

use statuswatch_adapters::{AdapterSet, HttpFetcher};
use statuswatch_core::{Notifier, Scheduler, StatusMonitor};

use crate::config::Settings;
use crate::notify;

/// Build a monitor for the configured services, delivering through the
/// configured notifier.
pub fn build_monitor(settings: &Settings) -> Result<StatusMonitor> {
    let notifier = notify::from_kind(settings.notifier, settings.request_timeout)
        .context("failed to create notifier")?;
    build_monitor_with(settings, notifier)
}

/// Build a monitor delivering through `notifier`.
pub fn build_monitor_with(settings: &Settings, notifier: Arc<dyn Notifier>) -> Result<StatusMonitor> {
    let http = HttpFetcher::builder()
        .timeout(settings.request_timeout)
        .build()
        .context("failed to create HTTP client")?;
    let adapters = AdapterSet::builtin(http);

    Ok(StatusMonitor::builder(notifier)
        .services(settings.services.iter().cloned(), &adapters)
        .targets(settings.targets.iter().cloned())
        .request_timeout(settings.request_timeout)
        .build())
}

/// A scheduler polling every enabled service at the configured interval.
pub fn build_scheduler(settings: &Settings, monitor: Arc<StatusMonitor>) -> Result<Scheduler> {
    Scheduler::builder(monitor)
        .interval(settings.interval)
        .build()
        .context("invalid poll schedule")
}
