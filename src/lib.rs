//! # statuswatch
//!
//! Watches the public status pages of third-party services and tells you
//! when one of them goes down or comes back.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          statuswatch                         │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────────────┐  │
//! │  │  config  │──▶│   app    │──▶│ statuswatch-core         │  │
//! │  │ (+catalog)   │ (wiring) │   │  Scheduler, StatusMonitor│  │
//! │  └──────────┘   └────┬─────┘   └────────────┬─────────────┘  │
//! │                      │                      │                │
//! │                      ▼                      ▼                │
//! │                ┌──────────┐         ┌──────────────┐         │
//! │                │  notify  │◀────────│  Dispatcher  │         │
//! │                │ log|webhook        └──────────────┘         │
//! │                └──────────┘                                  │
//! │  commands: status / check <id> / help / quit                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`config`]**: TOML + environment settings, per-service validation
//! - **[`catalog`]**: built-in providers that need only an id
//! - **[`app`]**: turns [`Settings`] into a [`StatusMonitor`] and [`Scheduler`]
//! - **[`notify`]**: host notifiers (stdout log, webhook POST)
//! - **[`commands`]**: host command parsing and text replies
//!
//! ## Usage
//!
//! ```bash
//! # Poll everything in statuswatch.toml, read commands from stdin
//! statuswatch run
//!
//! # One forced check
//! statuswatch check github --config ./statuswatch.toml
//!
//! # Show accepted and rejected services
//! statuswatch validate
//! ```
//!
//! ### As a library
//!
//! ```
//! use std::sync::Arc;
//! use statuswatch::{app, commands, Settings};
//! use statuswatch_core::ChannelNotifier;
//!
//! # tokio_test::block_on(async {
//! let settings = Settings::from_toml("[services.github]\n").unwrap();
//! let (notifier, _rx) = ChannelNotifier::create(16);
//! let monitor = app::build_monitor_with(&settings, Arc::new(notifier)).unwrap();
//!
//! // Nothing has been fetched yet
//! let reply = commands::execute(&monitor, &commands::Command::Status).await;
//! assert!(reply.contains("not yet checked"));
//! # });
//! ```

pub mod app;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod notify;

pub use config::{ConfigError, NotifierKind, Settings};

// Re-export the pieces hosts usually need
pub use statuswatch_core::{Scheduler, SchedulerHandle, StatusMonitor, StatusView};
