//! Persistent settings.

pub mod config;

pub use config::{load_config, ConfigError, MergeConfig};
