
pub mod config;

pub use config::{BridgeConfig, Config, ConfigError, OrthancConfig};
