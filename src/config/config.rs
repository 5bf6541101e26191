use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("orthanc.host must not be empty")]
    EmptyHost,

    #[error("bridge.enrichment_concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("bridge.max_upload_bytes must be at least 1")]
    ZeroUploadLimit,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub orthanc: OrthancConfig,
}

/// Settings for the bridge's own listening side.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_bind_port")]
    pub bind_port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Upper bound on concurrent document-existence probes for one listing
    /// request.
    #[serde(default = "default_enrichment_concurrency")]
    pub enrichment_concurrency: usize,
    /// Ceiling for raw DICOM upload bodies.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

/// Address and credential of the Orthanc archive. Read-only at request
/// time; every outbound request authenticates with this pair.
#[derive(Debug, Clone, Deserialize)]
pub struct OrthancConfig {
    #[serde(default = "default_orthanc_host")]
    pub host: String,
    #[serde(default = "default_orthanc_port")]
    pub port: u16,
    #[serde(default = "default_orthanc_username")]
    pub username: String,
    #[serde(default = "default_orthanc_password")]
    pub password: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_bind_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_enrichment_concurrency() -> usize {
    8
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_orthanc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_orthanc_port() -> u16 {
    8042
}

fn default_orthanc_username() -> String {
    "admin".to_string()
}

fn default_orthanc_password() -> String {
    "admin123".to_string()
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            bind_port: default_bind_port(),
            log_level: default_log_level(),
            enrichment_concurrency: default_enrichment_concurrency(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for OrthancConfig {
    fn default() -> Self {
        Self {
            host: default_orthanc_host(),
            port: default_orthanc_port(),
            username: default_orthanc_username(),
            password: default_orthanc_password(),
        }
    }
}

impl OrthancConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Loads the configuration from the path given as the first CLI
    /// argument, or falls back to the built-in defaults.
    pub fn from_args() -> Result<Self, ConfigError> {
        match std::env::args().nth(1) {
            Some(path) => Self::from_file(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_string(),
            source,
        })?;
        let config: Config = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.orthanc.host.trim().is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if self.bridge.enrichment_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.bridge.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        Ok(())
    }
}
