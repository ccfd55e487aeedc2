//! Lockler command-line wallet connection.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with environment variable expansion

pub mod config;

pub use config::{ConfigError, LocklerConfig};
