//! Recurring poll cycles, one task per enabled service.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use statuswatch_types::DEFAULT_INTERVAL_SECS;

use crate::error::SchedulerError;
use crate::monitor::StatusMonitor;

/// Drives [`StatusMonitor::poll`] for every enabled service.
///
/// Each service gets its own task and its own interval timer, so a slow or
/// failing provider never delays the others. A poll that fails is logged by
/// the monitor and the cycle simply waits for the next tick.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use std::time::Duration;
/// use statuswatch_core::{ChannelNotifier, Scheduler, StatusMonitor};
///
/// # async fn run() -> Result<(), statuswatch_core::SchedulerError> {
/// let (notifier, _rx) = ChannelNotifier::create(16);
/// let monitor = Arc::new(StatusMonitor::builder(Arc::new(notifier)).build());
///
/// let handle = Scheduler::builder(monitor)
///     .interval(Duration::from_secs(60))
///     .build()?
///     .start();
///
/// // ... later
/// handle.shutdown().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Scheduler {
    monitor: Arc<StatusMonitor>,
    interval: Duration,
    start_delay: Duration,
}

impl Scheduler {
    pub fn builder(monitor: Arc<StatusMonitor>) -> SchedulerBuilder {
        SchedulerBuilder::new(monitor)
    }

    /// Global poll interval; services may override it.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn one poll cycle per enabled service.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> SchedulerHandle {
        let (stop_tx, stop_rx) = watch::channel(false);
        let mut tasks = Vec::new();

        for service in self.monitor.services() {
            let id = service.descriptor.id.clone();
            let period = service.descriptor.effective_interval(self.interval);
            let monitor = self.monitor.clone();
            let stop_rx = stop_rx.clone();
            let start_delay = self.start_delay;

            info!(service = %id, interval_secs = period.as_secs(), "scheduling status polls");

            let task_id = id.clone();
            let task = tokio::spawn(async move {
                run_cycle(monitor, task_id, period, start_delay, stop_rx).await;
            });
            tasks.push((id, task));
        }

        SchedulerHandle { stop_tx, tasks }
    }
}

async fn run_cycle(
    monitor: Arc<StatusMonitor>,
    service_id: String,
    period: Duration,
    start_delay: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    monitor.registry().reset_failures(&service_id);

    let mut timer = tokio::time::interval_at(tokio::time::Instant::now() + start_delay, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;

            changed = stop_rx.changed() => {
                // A dropped sender means the handle is gone; stop as well.
                if changed.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
            _ = timer.tick() => {
                // Errors were already logged with their failure count.
                let _ = monitor.poll(&service_id).await;
            }
        }
    }

    debug!(service = %service_id, "poll cycle stopped");
}

/// Builder for Scheduler.
#[derive(Debug)]
pub struct SchedulerBuilder {
    monitor: Arc<StatusMonitor>,
    interval: Option<Duration>,
    start_delay: Duration,
}

impl SchedulerBuilder {
    pub fn new(monitor: Arc<StatusMonitor>) -> Self {
        Self {
            monitor,
            interval: None,
            start_delay: Duration::ZERO,
        }
    }

    /// Set the global poll interval (default: 60 seconds).
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Delay before each service's first poll (default: none).
    pub fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Build the scheduler.
    ///
    /// Fails if the global interval, or the override of any enabled
    /// service, is zero.
    pub fn build(self) -> Result<Scheduler, SchedulerError> {
        let interval = self
            .interval
            .unwrap_or(Duration::from_secs(DEFAULT_INTERVAL_SECS));
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }

        if let Some(service) = self
            .monitor
            .services()
            .find(|s| s.descriptor.interval.is_some_and(|i| i.is_zero()))
        {
            return Err(SchedulerError::ZeroServiceInterval(service.descriptor.id.clone()));
        }

        Ok(Scheduler {
            monitor: self.monitor,
            interval,
            start_delay: self.start_delay,
        })
    }
}

/// Handle for the running poll cycles.
///
/// Drop this handle to stop polling, or call `shutdown()` to stop and wait
/// for in-flight polls to finish.
#[derive(Debug)]
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<(String, JoinHandle<()>)>,
}

impl SchedulerHandle {
    /// Ids of the services being polled.
    pub fn service_ids(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|(id, _)| id.as_str())
    }

    /// Stop all cycles and wait for any poll in progress to complete.
    pub async fn shutdown(self) {
        let _ = self.stop_tx.send(true);
        for (id, task) in self.tasks {
            if let Err(e) = task.await {
                warn!(service = %id, error = %e, "poll task ended abnormally");
            }
        }
        info!("scheduler stopped");
    }

    /// Stop immediately, abandoning polls in progress.
    pub fn abort(self) {
        for (_, task) in &self.tasks {
            task.abort();
        }
    }
}
