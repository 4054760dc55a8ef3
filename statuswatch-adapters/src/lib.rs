//! # statuswatch-adapters
//!
//! Provider adapters that fetch a public status endpoint and normalize its
//! payload into a [`NormalizedStatus`].
//!
//! Every adapter implements [`ProviderAdapter`]. A monitored service being
//! down is a *successful* fetch (e.g. `MajorOutage`); only "could not
//! determine the status" is an [`AdapterError`].
//!
//! ## Supported Providers
//!
//! - **Statuspage** ([`StatuspageAdapter`]) - `status.json`/`summary.json`
//!   page indicator, used by most public status pages
//! - **Statuspage incidents** ([`StatuspageIncidentsAdapter`]) - severity
//!   derived from the unresolved incident lifecycle
//! - **Alibaba Cloud** ([`AliyunAdapter`]) - ongoing event list
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use statuswatch_adapters::{AdapterSet, HttpFetcher};
//! use statuswatch_types::{ParserKind, ServiceDescriptor};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let adapters = AdapterSet::builtin(HttpFetcher::builder().build()?);
//!
//!     let cloudflare = ServiceDescriptor::new(
//!         "cloudflare",
//!         "Cloudflare",
//!         "https://www.cloudflarestatus.com/api/v2/status.json",
//!         ParserKind::Statuspage,
//!     );
//!
//!     let status = adapters.for_service(&cloudflare).fetch(&cloudflare).await?;
//!     println!("{}", status.severity);
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

pub mod aliyun;
pub mod error;
pub mod http;
pub mod incidents;
pub mod statuspage;

pub use aliyun::AliyunAdapter;
pub use error::AdapterError;
pub use http::{HttpFetcher, HttpFetcherBuilder};
pub use incidents::StatuspageIncidentsAdapter;
pub use statuspage::StatuspageAdapter;

// Re-export types for convenience
pub use statuswatch_types::{Incident, NormalizedStatus, ParserKind, ServiceDescriptor, Severity};

/// Fetches and normalizes one provider's status.
///
/// Implementations are stateless apart from their HTTP client; all per
/// service state lives in the monitoring core.
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
    /// The parser name this adapter answers to.
    fn kind(&self) -> ParserKind;

    /// Fetch the descriptor's endpoint and normalize the payload.
    async fn fetch(&self, descriptor: &ServiceDescriptor) -> Result<NormalizedStatus, AdapterError>;
}

/// The adapters available to a process, keyed by parser kind.
#[derive(Debug, Clone)]
pub struct AdapterSet {
    adapters: HashMap<ParserKind, Arc<dyn ProviderAdapter>>,
}

impl AdapterSet {
    /// An empty set, for hosts that register their own adapters.
    pub fn empty() -> Self {
        Self {
            adapters: HashMap::new(),
        }
    }

    /// All built-in adapters sharing one HTTP client.
    pub fn builtin(http: HttpFetcher) -> Self {
        Self::empty()
            .with(Arc::new(StatuspageAdapter::new(http.clone())))
            .with(Arc::new(StatuspageIncidentsAdapter::new(http.clone())))
            .with(Arc::new(AliyunAdapter::new(http)))
    }

    /// Register an adapter, replacing any existing one of the same kind.
    pub fn with(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    pub fn get(&self, kind: ParserKind) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.get(&kind).cloned()
    }

    /// The adapter for a service, or an adapter that always fails to parse
    /// when the kind has not been registered.
    pub fn for_service(&self, descriptor: &ServiceDescriptor) -> Arc<dyn ProviderAdapter> {
        self.get(descriptor.parser)
            .unwrap_or_else(|| Arc::new(MissingAdapter(descriptor.parser)))
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }
}

/// Stand-in for an unregistered parser kind.
#[derive(Debug)]
struct MissingAdapter(ParserKind);

#[async_trait]
impl ProviderAdapter for MissingAdapter {
    fn kind(&self) -> ParserKind {
        self.0
    }

    async fn fetch(&self, _descriptor: &ServiceDescriptor) -> Result<NormalizedStatus, AdapterError> {
        Err(AdapterError::Parse(format!(
            "no adapter registered for parser '{}'",
            self.0
        )))
    }
}
