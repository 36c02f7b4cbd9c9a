//! Configuration layer shared by the stockwatch crates.
//!
//! Everything is environment-driven: [`load_app_config`] reads `.env` plus the
//! process environment into an [`AppConfig`], which the CLI narrows into the
//! [`WatchConfig`] handed to the check pipeline.

pub mod app_config;
pub mod config;

pub use app_config::{AppConfig, PayloadFormat, StateBackend, WatchConfig};
pub use config::{load_app_config, load_app_config_from_env};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
