//! Statuspage incident-lifecycle adapter (`/api/v2/incidents/unresolved.json`).
//!
//! Some providers keep the page-level indicator green while incidents are
//! open, so this adapter derives severity from the incidents themselves.
//! An incident counts while it is `investigating`, `identified` or
//! `monitoring`; the worst `impact` among those wins.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use statuswatch_types::{Incident, NormalizedStatus, ParserKind, ServiceDescriptor, Severity};

use crate::statuspage::{indicator_severity, lifecycle_is_active, PageInfo};
use crate::{AdapterError, HttpFetcher, ProviderAdapter};

/// Adapter deriving severity from a Statuspage unresolved-incident list.
#[derive(Debug, Clone)]
pub struct StatuspageIncidentsAdapter {
    http: HttpFetcher,
}

impl StatuspageIncidentsAdapter {
    pub fn new(http: HttpFetcher) -> Self {
        Self { http }
    }

    /// Normalize a raw `incidents/unresolved.json` body.
    pub fn parse(body: &[u8], fetched_at: DateTime<Utc>) -> Result<NormalizedStatus, AdapterError> {
        let payload: IncidentsPayload = serde_json::from_slice(body)?;

        let mut severity = Severity::Operational;
        let mut active = Vec::new();

        for incident in payload.incidents {
            if !lifecycle_is_active(&incident.status)? {
                continue;
            }
            // Incident impact shares the page indicator vocabulary.
            let impact = indicator_severity(&incident.impact).ok_or_else(|| {
                AdapterError::Parse(format!(
                    "unrecognized incident impact '{}'",
                    incident.impact
                ))
            })?;
            severity = severity.max(impact);
            active.push(Incident::new(incident.name, incident.status));
        }

        let summary = match active.len() {
            0 => "No active incidents".to_string(),
            1 => "1 active incident".to_string(),
            n => format!("{} active incidents", n),
        };

        let mut status = NormalizedStatus::at(severity, fetched_at)
            .with_summary(summary)
            .with_incidents(active);
        if let Some(url) = payload.page.and_then(|p| p.url) {
            status = status.with_page_url(url);
        }
        Ok(status)
    }
}

#[async_trait]
impl ProviderAdapter for StatuspageIncidentsAdapter {
    fn kind(&self) -> ParserKind {
        ParserKind::StatuspageIncidents
    }

    async fn fetch(&self, descriptor: &ServiceDescriptor) -> Result<NormalizedStatus, AdapterError> {
        let fetched_at = Utc::now();
        let body = self.http.get(&descriptor.status_endpoint_url).await?;
        Self::parse(&body, fetched_at)
    }
}

#[derive(Debug, Deserialize)]
struct IncidentsPayload {
    page: Option<PageInfo>,
    incidents: Vec<IncidentInfo>,
}

#[derive(Debug, Deserialize)]
struct IncidentInfo {
    name: String,
    status: String,
    impact: String,
}
