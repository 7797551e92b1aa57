//! amoCRM API Client Library
//!
//! Typed async client for the amoCRM v2 HTTP/JSON API: login, accounts,
//! leads, tasks, contacts, pipelines, notes and attachment downloads

pub mod config;
pub mod models;
pub mod resources;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::{CrmConfig, LoggingConfig, Settings};
pub use resources::AmoClient;
pub use services::{Query, Repair, Session, ToQuery, Validate, ValidationError};
pub use utils::error::{CrmError, CrmResult};
pub use utils::logging::init_logging;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
