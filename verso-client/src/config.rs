//! Configuration loading for the Verso clients.
//!
//! All fields are required unless explicitly marked optional. No defaults.

use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    pub verso_base_url: String,
    pub consul_base_url: String,
    pub request_timeout_ms: u64,
    /// Page size for views that do not choose their own.
    pub default_limit: u32,
    pub search_semantics: SearchSemantics,
}

/// How the target deployment combines structured filters with the
/// free-text search when a query carries both. The backend owns the
/// policy; this field only describes it so a UI can label its search
/// affordance. Nothing derived from it is sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSemantics {
    /// Rows must match the filters and the search text.
    Conjunctive,
    /// Rows may match either the filters or the search text.
    Disjunctive,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing configuration file path (use --config or VERSO_CONFIG)")]
    MissingConfigPath,
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl ClientConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let path = config_path_from_args().or_else(config_path_from_env);
        let path = path.ok_or(ConfigError::MissingConfigPath)?;
        let config = Self::from_path(&path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config: ClientConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.verso_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "verso_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.consul_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "consul_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms",
                reason: "must be > 0".to_string(),
            });
        }
        if self.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "default_limit",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var("VERSO_CONFIG").ok().map(PathBuf::from)
}

fn config_path_from_args() -> Option<PathBuf> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}

// =============================================================================
// TESTS
// =============================================================================
