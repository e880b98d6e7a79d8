//! Viewer configuration.
//!
//! Loaded from a YAML file with environment-variable overrides, so deployed
//! viewers can repoint the backend without editing files.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::FormatRules;

const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_LOOKUP_CONCURRENCY: usize = 8;

/// Top-level configuration for the history viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Base URL of the REST backend.
    pub base_url: String,

    /// HTTP request timeout in seconds, applied to record fetches and
    /// reference lookups alike.
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Maximum in-flight reference lookups per type.
    #[serde(default = "default_lookup_concurrency")]
    pub lookup_concurrency: usize,

    /// Lookup path per reference type, relative to `base_url`.
    #[serde(default = "default_lookup_paths")]
    pub lookup_paths: HashMap<String, String>,

    /// Fields rendered as Yes/No.
    #[serde(default = "default_boolean_fields")]
    pub boolean_fields: HashSet<String>,

    /// RFC 3339 fields reformatted for display.
    #[serde(default = "default_timestamp_fields")]
    pub timestamp_fields: HashSet<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: default_timeout_secs(),
            lookup_concurrency: default_lookup_concurrency(),
            lookup_paths: default_lookup_paths(),
            boolean_fields: default_boolean_fields(),
            timestamp_fields: default_timestamp_fields(),
        }
    }
}

impl HistoryConfig {
    /// Load from a YAML file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut config: Self =
            serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
                path: path.display().to_string(),
                source,
            })?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Defaults plus environment overrides; never fails.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("HISTORY_API_BASE_URL") {
            self.base_url = base_url;
        }
        if let Ok(raw) = std::env::var("HISTORY_LOOKUP_CONCURRENCY") {
            if let Ok(concurrency) = raw.parse() {
                self.lookup_concurrency = concurrency;
            }
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn format_rules(&self) -> FormatRules {
        FormatRules {
            boolean_fields: self.boolean_fields.clone(),
            timestamp_fields: self.timestamp_fields.clone(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_lookup_concurrency() -> usize {
    DEFAULT_LOOKUP_CONCURRENCY
}

fn default_lookup_paths() -> HashMap<String, String> {
    [
        ("client", "clients"),
        ("classificator", "classificators"),
        ("location", "locations"),
        ("maintenance", "maintenances"),
        ("file", "files"),
        ("comment", "comments"),
        ("thirdPartyIT", "thirdPartyITs"),
    ]
    .into_iter()
    .map(|(kind, path)| (kind.to_string(), path.to_string()))
    .collect()
}

fn default_boolean_fields() -> HashSet<String> {
    ["warranty", "active", "resolved"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_timestamp_fields() -> HashSet<String> {
    ["createdAt", "modifiedAt"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_configured_reference_type() {
        let config = HistoryConfig::default();
        for descriptor in crate::reference::REFERENCE_TYPES {
            assert!(
                config.lookup_paths.contains_key(descriptor.name),
                "missing lookup path for {}",
                descriptor.name
            );
        }
    }

    #[test]
    fn yaml_overrides_defaults_and_keeps_the_rest() {
        let yaml = "base_url: http://backend:9000/api\nlookup_concurrency: 2\n";
        let config: HistoryConfig = serde_yaml::from_str(yaml).expect("valid yaml");
        assert_eq!(config.base_url, "http://backend:9000/api");
        assert_eq!(config.lookup_concurrency, 2);
        assert_eq!(config.request_timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.boolean_fields.contains("warranty"));
    }
}
