//! Errors surfaced by the monitoring core.

use statuswatch_adapters::AdapterError;
use thiserror::Error;

/// Errors returned to callers of on-demand operations.
///
/// Scheduled polls never surface these; they are logged at the poll-cycle
/// boundary instead.
#[derive(Debug, Error)]
pub enum MonitorError {
    /// The id does not name an enabled, configured service.
    #[error("unknown or disabled service '{0}'")]
    UnknownService(String),

    /// The adapter could not determine the service's status.
    #[error("{service}: {source}")]
    Adapter {
        service: String,
        #[source]
        source: AdapterError,
    },
}

impl MonitorError {
    /// True for configuration-style errors (as opposed to fetch/parse).
    pub fn is_configuration(&self) -> bool {
        matches!(self, MonitorError::UnknownService(_))
    }

    /// The underlying adapter error, if any.
    pub fn adapter_error(&self) -> Option<&AdapterError> {
        match self {
            MonitorError::Adapter { source, .. } => Some(source),
            MonitorError::UnknownService(_) => None,
        }
    }
}

/// Errors from building a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("poll interval must be greater than zero")]
    ZeroInterval,

    #[error("poll interval for '{0}' must be greater than zero")]
    ZeroServiceInterval(String),
}
