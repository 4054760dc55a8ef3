//! ServiceDescriptor - static description of one monitored provider.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Which provider adapter understands a service's status endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ParserKind {
    /// Atlassian Statuspage `status.json` / `summary.json`.
    Statuspage,
    /// Atlassian Statuspage `incidents/unresolved.json`.
    StatuspageIncidents,
    /// Alibaba Cloud status event list.
    Aliyun,
}

impl ParserKind {
    pub const ALL: [ParserKind; 3] = [
        ParserKind::Statuspage,
        ParserKind::StatuspageIncidents,
        ParserKind::Aliyun,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParserKind::Statuspage => "statuspage",
            ParserKind::StatuspageIncidents => "statuspage_incidents",
            ParserKind::Aliyun => "aliyun",
        }
    }
}

impl fmt::Display for ParserKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a parser name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParser(pub String);

impl fmt::Display for UnknownParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown parser '{}'", self.0)
    }
}

impl std::error::Error for UnknownParser {}

impl FromStr for ParserKind {
    type Err = UnknownParser;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParserKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s.trim())
            .ok_or_else(|| UnknownParser(s.to_string()))
    }
}

/// A configured service to monitor.
///
/// Descriptors are created once at configuration load and never mutated.
///
/// # Example
///
/// ```rust
/// use statuswatch_types::{ParserKind, ServiceDescriptor};
///
/// let github = ServiceDescriptor::new(
///     "github",
///     "GitHub",
///     "https://www.githubstatus.com/api/v2/summary.json",
///     ParserKind::Statuspage,
/// );
/// assert!(github.enabled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ServiceDescriptor {
    /// Unique key, e.g. "github".
    pub id: String,
    pub display_name: String,
    pub status_endpoint_url: String,
    pub parser: ParserKind,
    pub enabled: bool,

    /// Per-service poll interval; `None` means the global interval applies.
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub interval: Option<Duration>,
}

impl ServiceDescriptor {
    /// Create an enabled descriptor using the global interval.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        status_endpoint_url: impl Into<String>,
        parser: ParserKind,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            status_endpoint_url: status_endpoint_url.into(),
            parser,
            enabled: true,
            interval: None,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// The interval this service polls at, given the global default.
    pub fn effective_interval(&self, global: Duration) -> Duration {
        self.interval.unwrap_or(global)
    }
}
