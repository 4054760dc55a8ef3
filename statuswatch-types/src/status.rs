//! NormalizedStatus - the canonical output of a provider adapter.

use chrono::{DateTime, Utc};

use crate::Severity;

/// An active incident reported by a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Incident {
    /// Incident title as published by the provider.
    pub name: String,

    /// Lifecycle stage in the provider's own words (e.g. "investigating").
    pub status: String,
}

impl Incident {
    pub fn new(name: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }
}

/// A provider's status, normalized into the canonical severity scale.
///
/// Two statuses with the same severity are the same state for transition
/// purposes; the summary and incident list are informational only.
///
/// # Example
///
/// ```rust
/// use statuswatch_types::{Incident, NormalizedStatus, Severity};
///
/// let status = NormalizedStatus::new(Severity::PartialOutage)
///     .with_summary("Partial System Outage")
///     .with_incident(Incident::new("Degraded Actions runs", "investigating"))
///     .with_page_url("https://www.githubstatus.com");
///
/// assert_eq!(status.incidents.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NormalizedStatus {
    pub severity: Severity,

    /// Provider supplied description, e.g. "All Systems Operational".
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub summary: Option<String>,

    /// When the payload this status was derived from was fetched.
    pub fetched_at: DateTime<Utc>,

    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Vec::is_empty"))]
    pub incidents: Vec<Incident>,

    /// Human facing status page for the provider, if the payload names one.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub page_url: Option<String>,
}

impl NormalizedStatus {
    /// Create a status observed now.
    pub fn new(severity: Severity) -> Self {
        Self::at(severity, Utc::now())
    }

    /// Create a status observed at a specific time.
    pub fn at(severity: Severity, fetched_at: DateTime<Utc>) -> Self {
        Self {
            severity,
            summary: None,
            fetched_at,
            incidents: Vec::new(),
            page_url: None,
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_incident(mut self, incident: Incident) -> Self {
        self.incidents.push(incident);
        self
    }

    pub fn with_incidents(mut self, incidents: impl IntoIterator<Item = Incident>) -> Self {
        self.incidents.extend(incidents);
        self
    }

    pub fn with_page_url(mut self, url: impl Into<String>) -> Self {
        self.page_url = Some(url.into());
        self
    }

    /// Whether the status counts as bad (see [`Severity::is_bad`]).
    pub fn is_bad(&self) -> bool {
        self.severity.is_bad()
    }

    /// Summary text, falling back to the severity label.
    pub fn describe(&self) -> &str {
        self.summary.as_deref().unwrap_or(self.severity.label())
    }
}
