//! # hub-sync
//!
//! Clients and reconciliation helpers for keeping users, groups and project
//! permissions consistent between a Hub permission server, an Upsource code
//! review server and GitLab.
//!
//! The core is [`model::http::RestClient`]: authenticated request dispatch
//! with uniform status classification ([`error::ResponseErrorKind`]) and a
//! lazy `$top`/`$skip` [`model::pagination::Paginator`]. The Hub and Upsource
//! clients in [`application`] are thin typed layers on top of it, and
//! [`application::services::sync`] diffs desired memberships against Hub.
//!
//! ## Example
//!
//! ```ignore
//! use hub_sync::prelude::*;
//!
//! setup_logger();
//! let config = Config::new();
//! let hub = HubClient::from_config(&config)?;
//!
//! let mut users = hub.all_users(Some("login,id"))?;
//! while let Some(user) = users.next().await {
//!     info!("{}", user?.login.unwrap_or_default());
//! }
//! ```

/// Application layer: configuration, clients, services
pub mod application;
/// Global constants
pub mod constants;
/// Error types
pub mod error;
/// Wire-level client, pagination and payload models
pub mod model;
/// Commonly used re-exports
pub mod prelude;
/// Environment and logging helpers
pub mod utils;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version
#[must_use]
pub fn version() -> &'static str {
    VERSION
}
