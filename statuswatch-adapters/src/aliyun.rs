//! Alibaba Cloud status adapter.
//!
//! The endpoint returns the list of ongoing events:
//!
//! ```json
//! {"success": true, "total": 1, "data": [{"id": 42, "title": "ECS network jitter"}]}
//! ```
//!
//! An empty list is operational; any ongoing event is reported as degraded,
//! since the payload carries no impact level.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use statuswatch_types::{Incident, NormalizedStatus, ParserKind, ServiceDescriptor, Severity};

use crate::{AdapterError, HttpFetcher, ProviderAdapter};

/// Adapter for the Alibaba Cloud status event API.
#[derive(Debug, Clone)]
pub struct AliyunAdapter {
    http: HttpFetcher,
}

impl AliyunAdapter {
    pub fn new(http: HttpFetcher) -> Self {
        Self { http }
    }

    /// Normalize a raw event-list body.
    pub fn parse(body: &[u8], fetched_at: DateTime<Utc>) -> Result<NormalizedStatus, AdapterError> {
        let payload: EventsPayload = serde_json::from_slice(body)?;

        if !payload.success {
            return Err(AdapterError::Parse(format!(
                "API reported failure: {}",
                payload.message.as_deref().unwrap_or("no message")
            )));
        }

        let events = payload
            .data
            .ok_or_else(|| AdapterError::Parse("missing 'data' event list".to_string()))?;

        if events.is_empty() {
            return Ok(NormalizedStatus::at(Severity::Operational, fetched_at)
                .with_summary("All systems operational"));
        }

        let summary = format!("{} active events", events.len());
        let incidents = events.into_iter().map(|event| {
            let name = event
                .title
                .unwrap_or_else(|| format!("event {}", event.id.map(|v| v.to_string()).unwrap_or_default()));
            Incident::new(name, event.status.unwrap_or_else(|| "ongoing".to_string()))
        });

        Ok(NormalizedStatus::at(Severity::Degraded, fetched_at)
            .with_summary(summary)
            .with_incidents(incidents))
    }
}

#[async_trait]
impl ProviderAdapter for AliyunAdapter {
    fn kind(&self) -> ParserKind {
        ParserKind::Aliyun
    }

    async fn fetch(&self, descriptor: &ServiceDescriptor) -> Result<NormalizedStatus, AdapterError> {
        let fetched_at = Utc::now();
        let body = self.http.get(&descriptor.status_endpoint_url).await?;
        Self::parse(&body, fetched_at)
    }
}

#[derive(Debug, Deserialize)]
struct EventsPayload {
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<Vec<EventInfo>>,
}

#[derive(Debug, Deserialize)]
struct EventInfo {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default, alias = "name")]
    title: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<NormalizedStatus, AdapterError> {
        AliyunAdapter::parse(body.as_bytes(), Utc::now())
    }

    #[test]
    fn test_empty_list_is_operational() {
        let status = parse(r#"{"data":[],"total":0,"success":true}"#).unwrap();
        assert_eq!(status.severity, Severity::Operational);
    }

    #[test]
    fn test_events_are_degraded() {
        let status = parse(
            r#"{"success":true,"data":[{"id":7,"title":"OSS latency"},{"id":"9","name":"RDS failover","status":"processing"}]}"#,
        )
        .unwrap();

        assert_eq!(status.severity, Severity::Degraded);
        assert_eq!(status.summary.as_deref(), Some("2 active events"));
        assert_eq!(status.incidents[0], Incident::new("OSS latency", "ongoing"));
        assert_eq!(status.incidents[1], Incident::new("RDS failover", "processing"));
    }

    #[test]
    fn test_untitled_event_uses_id() {
        let status = parse(r#"{"success":true,"data":[{"id":12}]}"#).unwrap();
        assert_eq!(status.incidents[0].name, "event 12");
    }

    #[test]
    fn test_unsuccessful_response_is_parse_error() {
        let err = parse(r#"{"success":false,"message":"throttled"}"#).unwrap_err();
        assert!(matches!(err, AdapterError::Parse(ref msg) if msg.contains("throttled")));
    }

    #[test]
    fn test_missing_data_is_parse_error() {
        assert!(parse(r#"{"success":true}"#).unwrap_err().is_parse());
    }
}
