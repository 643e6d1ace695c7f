//! Configuration management for Tilt services.
//!
//! Configuration lives in a single JSON file at `~/.tilt/config.json`.
//!
//! # Configuration Priority
//!
//! 1. Environment variables (TILT_* prefix)
//! 2. Explicit config file values
//! 3. Default values
//!
//! # Environment Variable Mapping
//!
//! - `TILT_BIND_ADDRESS` → network.bind
//! - `TILT_PORT` → service.port
//! - `TILT_DB_PATH` → service.db_path
//! - `TILT_BIAS_THRESHOLD` → engine.bias_threshold
//! - `TILT_MODEL_URL` → providers.model_url
//! - `TILT_KEYWORDS_URL` → providers.keywords_url
//! - `TILT_SEARCH_URL` → providers.search_url
//! - `TILT_SEARCH_USER_AGENT` → providers.search_user_agent

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Get the configuration directory path.
pub fn config_dir() -> PathBuf {
    directories::UserDirs::new().map_or_else(
        || PathBuf::from(".tilt"),
        |dirs| dirs.home_dir().join(".tilt"),
    )
}

/// Get the configuration file path.
pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

// ============================================================================
// Network Configuration
// ============================================================================

/// Global network configuration.
///
/// Default bind is `127.0.0.1` (local only). Set to `0.0.0.0` for remote
/// access, e.g. when the browser extension talks to a deployed instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_bind_address")]
    pub bind: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
        }
    }
}

fn default_bind_address() -> String {
    "127.0.0.1".into()
}

// ============================================================================
// Service Configuration
// ============================================================================

/// HTTP service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Port the API listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Path to the activity database. Defaults to `~/.tilt/activity.db`.
    #[serde(default)]
    pub db_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            db_path: None,
        }
    }
}

fn default_port() -> u16 {
    8000
}

impl ServiceConfig {
    /// Resolved database path (configured value or the default location).
    pub fn database_path(&self) -> PathBuf {
        self.db_path
            .clone()
            .unwrap_or_else(|| config_dir().join("activity.db"))
    }
}

// ============================================================================
// Engine Configuration
// ============================================================================

/// Bias engine tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Same-leaning observation count that triggers a counter recommendation.
    #[serde(default = "default_bias_threshold")]
    pub bias_threshold: u32,

    /// How many candidates to pull from the search provider per query.
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bias_threshold: default_bias_threshold(),
            candidate_limit: default_candidate_limit(),
        }
    }
}

fn default_bias_threshold() -> u32 {
    20
}

fn default_candidate_limit() -> u32 {
    50
}

// ============================================================================
// Provider Configuration
// ============================================================================

/// Endpoints for the external capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Base URL of the leaning-classifier model server.
    #[serde(default = "default_model_url")]
    pub model_url: String,

    /// Base URL of the keyword-extraction server.
    #[serde(default = "default_keywords_url")]
    pub keywords_url: String,

    /// Base URL of the content search provider.
    #[serde(default = "default_search_url")]
    pub search_url: String,

    /// User-Agent sent to the search provider. Reddit rejects generic agents.
    #[serde(default = "default_search_user_agent")]
    pub search_user_agent: String,

    /// Per-request timeout for provider calls, in seconds.
    #[serde(default = "default_provider_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            model_url: default_model_url(),
            keywords_url: default_keywords_url(),
            search_url: default_search_url(),
            search_user_agent: default_search_user_agent(),
            timeout_secs: default_provider_timeout_secs(),
        }
    }
}

fn default_model_url() -> String {
    "http://127.0.0.1:9090".into()
}

fn default_keywords_url() -> String {
    "http://127.0.0.1:9091".into()
}

fn default_search_url() -> String {
    "https://www.reddit.com".into()
}

fn default_search_user_agent() -> String {
    "tilt-counter-recommendation/0.1".into()
}

fn default_provider_timeout_secs() -> u64 {
    15
}

// ============================================================================
// Observability Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Base log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Output format: "json" or "pretty"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration for Tilt services.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from the default path, falling back to defaults
    /// when the file does not exist, then apply environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load configuration from an explicit path.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply TILT_* environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(bind) = std::env::var("TILT_BIND_ADDRESS") {
            self.network.bind = bind;
        }
        if let Ok(port) = std::env::var("TILT_PORT") {
            if let Ok(port) = port.parse() {
                self.service.port = port;
            }
        }
        if let Ok(path) = std::env::var("TILT_DB_PATH") {
            self.service.db_path = Some(PathBuf::from(path));
        }
        if let Ok(threshold) = std::env::var("TILT_BIAS_THRESHOLD") {
            if let Ok(threshold) = threshold.parse() {
                self.engine.bias_threshold = threshold;
            }
        }
        if let Ok(url) = std::env::var("TILT_MODEL_URL") {
            self.providers.model_url = url;
        }
        if let Ok(url) = std::env::var("TILT_KEYWORDS_URL") {
            self.providers.keywords_url = url;
        }
        if let Ok(url) = std::env::var("TILT_SEARCH_URL") {
            self.providers.search_url = url;
        }
        if let Ok(agent) = std::env::var("TILT_SEARCH_USER_AGENT") {
            self.providers.search_user_agent = agent;
        }
    }

    /// Validate configured values are usable.
    pub fn validate(&self) -> Result<()> {
        if self.service.port == 0 {
            anyhow::bail!("service.port must be between 1 and 65535");
        }
        if self.engine.bias_threshold == 0 {
            anyhow::bail!("engine.bias_threshold must be at least 1");
        }
        if self.engine.candidate_limit == 0 {
            anyhow::bail!("engine.candidate_limit must be at least 1");
        }
        if self.providers.timeout_secs == 0 {
            anyhow::bail!("providers.timeout_secs must be at least 1");
        }
        Ok(())
    }
}
