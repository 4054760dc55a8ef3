//! Configuration loading and validation.
//!
//! Settings come from a TOML file and `STATUSWATCH_` environment variables,
//! the latter taking precedence:
//!
//! ```toml
//! interval_secs = 60
//! request_timeout_secs = 10
//! notifier = "log"
//! notify_targets = ["ops-room"]
//!
//! [services.github]
//! enabled = true
//!
//! [services.internal]
//! display_name = "Internal API"
//! url = "https://status.example.com/api/v2/status.json"
//! parser = "statuspage"
//! interval_secs = 30
//! ```
//!
//! Global mistakes are fatal. A mistake in one `[services.*]` table only
//! excludes that service; it is reported in [`Settings::rejected`].

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use statuswatch_core::DEFAULT_REQUEST_TIMEOUT;
use statuswatch_types::{
    NotificationTarget, ParserKind, ServiceDescriptor, UnknownParser, DEFAULT_INTERVAL_SECS,
};

use crate::catalog;

/// File looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "statuswatch.toml";

const ENV_PREFIX: &str = "STATUSWATCH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("interval_secs must be a positive number of seconds, got {0}")]
    InvalidInterval(i64),

    #[error("request_timeout_secs must be a positive number of seconds, got {0}")]
    InvalidTimeout(i64),

    #[error("unknown notifier '{0}' (expected \"log\" or \"webhook\")")]
    UnknownNotifier(String),

    #[error("no enabled services are configured")]
    NoServices,

    #[error("'{0}' is not a built-in service and has no url")]
    UnknownService(String),

    #[error(transparent)]
    UnknownParser(#[from] UnknownParser),

    #[error("interval_secs for '{id}' must be a positive number of seconds, got {value}")]
    InvalidServiceInterval { id: String, value: i64 },
}

/// How notifications leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotifierKind {
    /// Print messages; targets are labels.
    #[default]
    Log,
    /// POST messages to targets, which are webhook URLs.
    Webhook,
}

impl NotifierKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifierKind::Log => "log",
            NotifierKind::Webhook => "webhook",
        }
    }
}

impl fmt::Display for NotifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotifierKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "log" => Ok(NotifierKind::Log),
            "webhook" => Ok(NotifierKind::Webhook),
            _ => Err(ConfigError::UnknownNotifier(s.to_string())),
        }
    }
}

/// A `[services.*]` table that was left out, and why.
#[derive(Debug)]
pub struct RejectedService {
    pub id: String,
    pub reason: ConfigError,
}

/// Validated settings.
#[derive(Debug)]
pub struct Settings {
    pub interval: Duration,
    pub request_timeout: Duration,
    pub notifier: NotifierKind,
    pub targets: Vec<NotificationTarget>,
    /// Accepted services, enabled or not, ordered by id.
    pub services: Vec<ServiceDescriptor>,
    pub rejected: Vec<RejectedService>,
}

impl Settings {
    /// Load from `path`, or from `statuswatch.toml` if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        Self::from_builder(Config::builder().add_source(file))
    }

    /// Parse settings from TOML text (environment overrides still apply).
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        Self::from_builder(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        Self::from_sources(builder, environment())
    }

    fn from_sources(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let raw: RawSettings = builder
            .add_source(env)
            .build()?
            .try_deserialize()?;
        raw.validate()
    }

    /// Services that will be polled.
    pub fn enabled_services(&self) -> impl Iterator<Item = &ServiceDescriptor> {
        self.services.iter().filter(|s| s.enabled)
    }

    /// Fail unless at least one service is enabled.
    pub fn require_services(&self) -> Result<(), ConfigError> {
        if self.enabled_services().next().is_none() {
            return Err(ConfigError::NoServices);
        }
        Ok(())
    }
}

/// `STATUSWATCH_INTERVAL_SECS`, `STATUSWATCH_NOTIFY_TARGETS=a,b`, and
/// `STATUSWATCH_SERVICES__GITHUB__ENABLED` for nested keys.
fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("notify_targets")
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    interval_secs: Option<i64>,
    request_timeout_secs: Option<i64>,
    notifier: Option<String>,
    #[serde(default)]
    notify_targets: Vec<String>,
    #[serde(default)]
    services: BTreeMap<String, RawService>,
}

#[derive(Debug, Default, Deserialize)]
struct RawService {
    enabled: Option<bool>,
    display_name: Option<String>,
    url: Option<String>,
    parser: Option<String>,
    interval_secs: Option<i64>,
}

impl RawSettings {
    fn validate(self) -> Result<Settings, ConfigError> {
        let interval_secs = self.interval_secs.unwrap_or(DEFAULT_INTERVAL_SECS as i64);
        if interval_secs <= 0 {
            return Err(ConfigError::InvalidInterval(interval_secs));
        }
        let interval = Duration::from_secs(interval_secs as u64);

        let half = interval / 2;
        let request_timeout = match self.request_timeout_secs {
            None => DEFAULT_REQUEST_TIMEOUT.min(half),
            Some(secs) if secs <= 0 => return Err(ConfigError::InvalidTimeout(secs)),
            Some(secs) => {
                let timeout = Duration::from_secs(secs as u64);
                if timeout > half {
                    warn!(
                        request_timeout_secs = secs,
                        interval_secs, "request timeout exceeds half the poll interval; clamping"
                    );
                    half
                } else {
                    timeout
                }
            }
        };

        let notifier = match self.notifier.as_deref() {
            Some(name) => name.parse()?,
            None => NotifierKind::default(),
        };

        let targets = self
            .notify_targets
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(NotificationTarget::from)
            .collect();

        let mut services = Vec::new();
        let mut rejected = Vec::new();
        for (id, raw) in self.services {
            match raw.into_descriptor(&id) {
                Ok(descriptor) => services.push(descriptor),
                Err(reason) => {
                    warn!(service = %id, error = %reason, "service excluded from configuration");
                    rejected.push(RejectedService { id, reason });
                }
            }
        }

        Ok(Settings {
            interval,
            request_timeout,
            notifier,
            targets,
            services,
            rejected,
        })
    }
}

impl RawService {
    fn into_descriptor(self, id: &str) -> Result<ServiceDescriptor, ConfigError> {
        let mut descriptor = match (catalog::lookup(id), self.url) {
            (Some(entry), None) => entry.descriptor(),
            (Some(entry), Some(url)) => ServiceDescriptor {
                status_endpoint_url: url,
                ..entry.descriptor()
            },
            (None, Some(url)) => ServiceDescriptor::new(id, id, url, ParserKind::Statuspage),
            (None, None) => return Err(ConfigError::UnknownService(id.to_string())),
        };

        if let Some(name) = self.parser {
            descriptor.parser = name.parse::<ParserKind>()?;
        }
        if let Some(name) = self.display_name {
            descriptor.display_name = name;
        }
        descriptor = descriptor.enabled(self.enabled.unwrap_or(true));

        if let Some(value) = self.interval_secs {
            if value <= 0 {
                return Err(ConfigError::InvalidServiceInterval {
                    id: id.to_string(),
                    value,
                });
            }
            descriptor = descriptor.with_interval(Duration::from_secs(value as u64));
        }

        Ok(descriptor)
    }
}
