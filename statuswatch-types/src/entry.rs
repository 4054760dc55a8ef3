//! RegistryEntry - last known state of one service.

use chrono::{DateTime, Utc};

use crate::{NormalizedStatus, Severity};

/// In-memory record of a service's last successful observation.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegistryEntry {
    pub service_id: String,

    /// Last successfully fetched status. Never holds [`Severity::Unknown`].
    pub last_status: Option<NormalizedStatus>,

    pub last_checked_at: DateTime<Utc>,

    /// When a notification was last dispatched for this service.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub last_notified_at: Option<DateTime<Utc>>,
}

impl RegistryEntry {
    pub fn new(service_id: impl Into<String>, status: NormalizedStatus, checked_at: DateTime<Utc>) -> Self {
        Self {
            service_id: service_id.into(),
            last_status: Some(status),
            last_checked_at: checked_at,
            last_notified_at: None,
        }
    }

    /// Severity of the last status, or `Unknown` when none is recorded.
    pub fn severity(&self) -> Severity {
        self.last_status
            .as_ref()
            .map(|s| s.severity)
            .unwrap_or(Severity::Unknown)
    }

    /// Summary of the last status, if any.
    pub fn summary(&self) -> Option<&str> {
        self.last_status.as_ref().and_then(|s| s.summary.as_deref())
    }
}
