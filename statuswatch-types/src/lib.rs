//! # statuswatch-types
//!
//! Core types for service status monitoring. This crate defines the
//! canonical vocabulary shared by provider adapters, the monitoring core and
//! any host that consumes its results.
//!
//! ## Design Goals
//!
//! - **Provider agnostic**: every provider's payload is normalized into one
//!   five-value [`Severity`]
//! - **Binary health**: a severity is either good ([`Severity::Operational`])
//!   or bad (anything else), which is what transition detection keys on
//! - **Optional serialization**: enable the `serde` feature as needed
//!
//! ## Features
//!
//! - `serde`: JSON/TOML/etc. serialization via serde
//!
//! ## Example
//!
//! ```rust
//! use statuswatch_types::{NormalizedStatus, Severity};
//!
//! let status = NormalizedStatus::new(Severity::MajorOutage)
//!     .with_summary("Major Service Outage");
//!
//! assert!(status.is_bad());
//! assert_eq!(status.severity.label(), "major outage");
//! ```

mod entry;
mod service;
mod severity;
mod status;
mod target;
mod transition;

pub use entry::*;
pub use service::*;
pub use severity::*;
pub use status::*;
pub use target::*;
pub use transition::*;

/// Poll interval used when the configuration does not set one.
pub const DEFAULT_INTERVAL_SECS: u64 = 60;
