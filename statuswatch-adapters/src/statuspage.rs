//! Atlassian Statuspage adapter (`/api/v2/status.json` and `/api/v2/summary.json`).
//!
//! Most public status pages (GitHub, Cloudflare, Discord, Atlassian, ...) are
//! hosted on Statuspage and expose the same JSON API. The top-level
//! `status.indicator` field is the page's own rollup of component health:
//!
//! | indicator     | severity        |
//! |---------------|-----------------|
//! | `none`        | Operational     |
//! | `minor`       | Degraded        |
//! | `maintenance` | Degraded        |
//! | `major`       | PartialOutage   |
//! | `critical`    | MajorOutage     |
//!
//! `summary.json` additionally lists unresolved incidents, which are carried
//! through as [`Incident`]s.
//!
//! ## Example
//!
//! ```rust,no_run
//! use statuswatch_adapters::{HttpFetcher, ProviderAdapter, StatuspageAdapter};
//! use statuswatch_types::{ParserKind, ServiceDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapter = StatuspageAdapter::new(HttpFetcher::builder().build()?);
//!     let github = ServiceDescriptor::new(
//!         "github",
//!         "GitHub",
//!         "https://www.githubstatus.com/api/v2/summary.json",
//!         ParserKind::Statuspage,
//!     );
//!
//!     let status = adapter.fetch(&github).await?;
//!     println!("{}: {}", github.display_name, status.describe());
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use statuswatch_types::{Incident, NormalizedStatus, ParserKind, ServiceDescriptor, Severity};

use crate::{AdapterError, HttpFetcher, ProviderAdapter};

/// Adapter for the Statuspage status/summary endpoints.
#[derive(Debug, Clone)]
pub struct StatuspageAdapter {
    http: HttpFetcher,
}

impl StatuspageAdapter {
    pub fn new(http: HttpFetcher) -> Self {
        Self { http }
    }

    /// Normalize a raw `status.json`/`summary.json` body.
    pub fn parse(body: &[u8], fetched_at: DateTime<Utc>) -> Result<NormalizedStatus, AdapterError> {
        let payload: StatusPayload = serde_json::from_slice(body)?;

        let severity = indicator_severity(&payload.status.indicator).ok_or_else(|| {
            AdapterError::Parse(format!(
                "unrecognized status indicator '{}'",
                payload.status.indicator
            ))
        })?;

        let mut status = NormalizedStatus::at(severity, fetched_at);
        if let Some(description) = payload.status.description.filter(|d| !d.is_empty()) {
            status = status.with_summary(description);
        }
        if let Some(url) = payload.page.and_then(|p| p.url) {
            status = status.with_page_url(url);
        }

        let mut incidents = Vec::new();
        for incident in payload.incidents {
            if lifecycle_is_active(&incident.status)? {
                incidents.push(Incident::new(incident.name, incident.status));
            }
        }

        Ok(status.with_incidents(incidents))
    }
}

#[async_trait]
impl ProviderAdapter for StatuspageAdapter {
    fn kind(&self) -> ParserKind {
        ParserKind::Statuspage
    }

    async fn fetch(&self, descriptor: &ServiceDescriptor) -> Result<NormalizedStatus, AdapterError> {
        let fetched_at = Utc::now();
        let body = self.http.get(&descriptor.status_endpoint_url).await?;
        Self::parse(&body, fetched_at)
    }
}

/// Map a page-level `status.indicator` value.
pub(crate) fn indicator_severity(indicator: &str) -> Option<Severity> {
    match indicator {
        "none" => Some(Severity::Operational),
        "minor" | "maintenance" => Some(Severity::Degraded),
        "major" => Some(Severity::PartialOutage),
        "critical" => Some(Severity::MajorOutage),
        _ => None,
    }
}

/// Whether an incident or maintenance lifecycle stage is still ongoing.
///
/// Unrecognized stages are a parse error rather than a guess.
pub(crate) fn lifecycle_is_active(stage: &str) -> Result<bool, AdapterError> {
    match stage {
        "investigating" | "identified" | "monitoring" | "in_progress" | "verifying" => Ok(true),
        "resolved" | "postmortem" | "scheduled" | "completed" => Ok(false),
        other => Err(AdapterError::Parse(format!(
            "unrecognized incident status '{}'",
            other
        ))),
    }
}

#[derive(Debug, Deserialize)]
struct StatusPayload {
    page: Option<PageInfo>,
    status: StatusInfo,
    #[serde(default)]
    incidents: Vec<IncidentInfo>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageInfo {
    #[serde(default)]
    pub(crate) url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StatusInfo {
    indicator: String,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IncidentInfo {
    name: String,
    status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY_MAJOR: &str = r#"{
        "page": {"id": "kctbh9vrtdwd", "name": "GitHub", "url": "https://www.githubstatus.com"},
        "components": [],
        "incidents": [
            {"name": "Incident with Actions", "status": "investigating", "impact": "major"},
            {"name": "Old incident", "status": "resolved", "impact": "minor"}
        ],
        "status": {"indicator": "major", "description": "Partial System Outage"}
    }"#;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_indicator_mapping() {
        assert_eq!(indicator_severity("none"), Some(Severity::Operational));
        assert_eq!(indicator_severity("minor"), Some(Severity::Degraded));
        assert_eq!(indicator_severity("maintenance"), Some(Severity::Degraded));
        assert_eq!(indicator_severity("major"), Some(Severity::PartialOutage));
        assert_eq!(indicator_severity("critical"), Some(Severity::MajorOutage));
        assert_eq!(indicator_severity("purple"), None);
    }

    #[test]
    fn test_parse_status_json() {
        let body = br#"{"page":{"url":"https://www.cloudflarestatus.com"},
            "status":{"indicator":"none","description":"All Systems Operational"}}"#;
        let at = now();
        let status = StatuspageAdapter::parse(body, at).unwrap();

        assert_eq!(status.severity, Severity::Operational);
        assert_eq!(status.summary.as_deref(), Some("All Systems Operational"));
        assert_eq!(status.page_url.as_deref(), Some("https://www.cloudflarestatus.com"));
        assert_eq!(status.fetched_at, at);
        assert!(status.incidents.is_empty());
    }

    #[test]
    fn test_parse_summary_keeps_active_incidents() {
        let status = StatuspageAdapter::parse(SUMMARY_MAJOR.as_bytes(), now()).unwrap();

        assert_eq!(status.severity, Severity::PartialOutage);
        assert_eq!(status.incidents, vec![Incident::new("Incident with Actions", "investigating")]);
    }

    #[test]
    fn test_unknown_indicator_is_parse_error() {
        let body = br#"{"status":{"indicator":"purple","description":"???"}}"#;
        let err = StatuspageAdapter::parse(body, now()).unwrap_err();
        assert!(matches!(err, AdapterError::Parse(ref msg) if msg.contains("purple")));
    }

    #[test]
    fn test_missing_status_is_parse_error() {
        let err = StatuspageAdapter::parse(br#"{"page":{}}"#, now()).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn test_unknown_incident_stage_is_parse_error() {
        let body = br#"{"status":{"indicator":"minor"},
            "incidents":[{"name":"x","status":"pondering"}]}"#;
        assert!(StatuspageAdapter::parse(body, now()).unwrap_err().is_parse());
    }

    #[test]
    fn test_critical_is_a_successful_major_outage() {
        let body = br#"{"status":{"indicator":"critical","description":"Major Service Outage"}}"#;
        let status = StatuspageAdapter::parse(body, now()).unwrap();
        assert_eq!(status.severity, Severity::MajorOutage);
    }

    #[tokio::test]
    async fn test_fetch_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v2/summary.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SUMMARY_MAJOR)
            .create_async()
            .await;

        let adapter = StatuspageAdapter::new(HttpFetcher::builder().build().unwrap());
        let descriptor = ServiceDescriptor::new(
            "github",
            "GitHub",
            format!("{}/api/v2/summary.json", server.url()),
            ParserKind::Statuspage,
        );

        let status = adapter.fetch(&descriptor).await.unwrap();
        assert_eq!(status.severity, Severity::PartialOutage);
        assert_eq!(status.page_url.as_deref(), Some("https://www.githubstatus.com"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_garbage_body_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/v2/status.json")
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;

        let adapter = StatuspageAdapter::new(HttpFetcher::builder().build().unwrap());
        let descriptor = ServiceDescriptor::new(
            "x",
            "X",
            format!("{}/api/v2/status.json", server.url()),
            ParserKind::Statuspage,
        );

        assert!(adapter.fetch(&descriptor).await.unwrap_err().is_parse());
    }
}
