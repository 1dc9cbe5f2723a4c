/******************************************************************************
   Author: Hub Sync Contributors
   Date: 19/10/26
******************************************************************************/

//! # Hub Sync Prelude
//!
//! Brings the commonly used types into scope:
//!
//! ```rust
//! use hub_sync::prelude::*;
//!
//! let options = RequestOptions::new().query("fields", "id,login");
//! assert_eq!(options.merged_query().get("fields").map(String::as_str), Some("id,login"));
//! ```

// ============================================================================
// CORE CONFIGURATION AND SETUP
// ============================================================================

/// Configuration for the clients
pub use crate::application::config::{Config, Credentials, ServiceConfig};

/// Library version information
pub use crate::{VERSION, version};

// ============================================================================
// ERROR HANDLING
// ============================================================================

/// Error types
pub use crate::error::{AppError, AppResult, ResponseError, ResponseErrorKind};

// ============================================================================
// TRANSPORT AND PAGINATION
// ============================================================================

/// REST client and request options
pub use crate::model::http::{Attachment, QueryParams, RequestOptions, RestClient};

/// Pagination
pub use crate::model::pagination::{Page, PageCursor, Paginator};

// ============================================================================
// CLIENTS AND SERVICES
// ============================================================================

/// Hub and Upsource clients
pub use crate::application::hub_client::HubClient;
pub use crate::application::upsource_client::UpsourceClient;

/// Service traits
pub use crate::application::interfaces::{HubService, UpsourceService};

/// Membership reconciliation
pub use crate::application::services::sync::{
    MembershipDelta, ProjectSyncContext, SyncAction, SyncReport, reconcile_project,
    reconcile_team,
};

// ============================================================================
// MODELS
// ============================================================================

/// Hub entities
pub use crate::model::hub::{
    Avatar, Email, EntityRef, HubProject, HubUser, NewUser, ProjectRole, Resource, Role,
    RoleOwner, UserGroup, UserProfile, VcsUserName,
};

/// Upsource payloads
pub use crate::model::upsource::{ProjectKind, ProjectSettings};

// ============================================================================
// UTILITIES
// ============================================================================

/// Logging utilities
pub use crate::utils::logger::setup_logger;

/// Global constants
pub use crate::constants::*;

// ============================================================================
// RE-EXPORTS FROM EXTERNAL CRATES
// ============================================================================

pub use async_trait::async_trait;
pub use reqwest::{Method, StatusCode};
pub use serde::{Deserialize, Serialize};
pub use tracing::{debug, error, info, warn};
