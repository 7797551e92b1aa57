//! Configuration management module
//!
//! Loads connection and logging configuration from environment variables,
//! or lets callers build it directly.

pub mod settings;

pub use settings::{CrmConfig, LoggingConfig, Settings};
