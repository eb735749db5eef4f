//! TOML Configuration File Support
//!
//! Configuration for the calculator lives in an optional TOML file at
//! `$XDG_CONFIG_HOME/aicalc/config.toml` (typically `~/.config/aicalc/config.toml`).
//!
//! # Configuration Priority
//!
//! Configuration values are loaded with the following priority (highest first):
//! 1. CLI arguments (via [`ConfigOverrides`])
//! 2. Environment variables
//! 3. TOML configuration file
//! 4. Default values
//!
//! The Gemini API key is only ever taken from the environment (`GEMINI_API_KEY`,
//! falling back to `API_KEY`). It is not read from the file and never printed.
//!
//! # Example Configuration
//!
//! ```toml
//! [gateway]
//! provider = "gemini"
//! model = "gemini-2.5-flash"
//! timeout_secs = 60
//!
//! [gemini]
//! base_url = "https://generativelanguage.googleapis.com/v1beta/models"
//!
//! [ollama]
//! host = "localhost"
//! port = 11434
//! ```

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gateway::{
    GatewayConfig, DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_OLLAMA_MODEL,
    DEFAULT_TIMEOUT,
};

// =============================================================================
// Error Types
// =============================================================================

/// Errors that can occur when loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file at {path}: {source}")]
    ReadError {
        /// The path that was attempted
        path: PathBuf,
        /// The underlying IO error
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("Failed to parse TOML config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

// =============================================================================
// Configuration Source Tracking
// =============================================================================

/// Tracks where a configuration value came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Value from command-line argument
    Cli,
    /// Value from environment variable
    Env,
    /// Value from TOML configuration file
    File,
    /// Default value
    Default,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI"),
            Self::Env => write!(f, "environment"),
            Self::File => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

// =============================================================================
// Provider
// =============================================================================

/// Which AI service answers AI-mode prompts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google Gemini API
    #[default]
    Gemini,
    /// Local Ollama server
    Ollama,
}

impl FromStr for Provider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            other => Err(ConfigError::ValidationError(format!(
                "unknown provider `{other}` (expected `gemini` or `ollama`)"
            ))),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Ollama => write!(f, "ollama"),
        }
    }
}

// =============================================================================
// TOML Configuration Structures
// =============================================================================

/// Gateway section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayToml {
    /// `gemini` or `ollama`
    pub provider: Option<String>,

    /// Model identifier (provider default when absent)
    pub model: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: Option<u64>,
}

/// Gemini section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiToml {
    /// Models collection URL
    pub base_url: Option<String>,
}

/// Ollama section of the TOML configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OllamaToml {
    /// Ollama host
    pub host: Option<String>,

    /// Ollama port
    pub port: Option<u16>,
}

/// Top-level TOML configuration structure
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppToml {
    /// Gateway configuration section
    pub gateway: GatewayToml,
    /// Gemini configuration section
    pub gemini: GeminiToml,
    /// Ollama configuration section
    pub ollama: OllamaToml,
}

// =============================================================================
// Main Configuration Struct
// =============================================================================

/// Effective application configuration
///
/// Use [`load_config`] to load it with proper priority handling.
#[derive(Clone)]
pub struct AppConfig {
    /// AI provider
    pub provider: Provider,
    /// Model override (provider default when `None`)
    pub model: Option<String>,
    /// Per-request timeout for AI calls
    pub timeout: Duration,
    /// Gemini API key (environment only)
    pub api_key: Option<String>,
    /// Gemini models collection URL
    pub gemini_base_url: String,
    /// Ollama host
    pub ollama_host: String,
    /// Ollama port
    pub ollama_port: u16,
    /// Path to the config file that was loaded (if any)
    pub config_file_path: Option<PathBuf>,
    /// Source of configuration values
    source: ConfigSource,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            model: None,
            timeout: DEFAULT_TIMEOUT,
            api_key: None,
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            ollama_host: "localhost".to_string(),
            ollama_port: 11434,
            config_file_path: None,
            source: ConfigSource::Default,
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("gemini_base_url", &self.gemini_base_url)
            .field("ollama_host", &self.ollama_host)
            .field("ollama_port", &self.ollama_port)
            .field("config_file_path", &self.config_file_path)
            .field("source", &self.source)
            .finish()
    }
}

impl AppConfig {
    /// Create a new configuration with default values
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the primary source of this configuration
    #[must_use]
    pub fn source(&self) -> ConfigSource {
        self.source
    }

    /// Set the configuration source
    pub fn set_source(&mut self, source: ConfigSource) {
        self.source = source;
    }

    /// Model that will actually be used
    #[must_use]
    pub fn effective_model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) => model,
            (None, Provider::Gemini) => DEFAULT_GEMINI_MODEL,
            (None, Provider::Ollama) => DEFAULT_OLLAMA_MODEL,
        }
    }

    /// Check values that cannot be expressed by the types alone
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] for a zero timeout, an empty
    /// model name or an empty Ollama host.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        if self.model.as_deref().is_some_and(|m| m.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "model must not be empty".to_string(),
            ));
        }
        if self.provider == Provider::Ollama && self.ollama_host.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "ollama host must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Convert to the gateway connection settings
    #[must_use]
    pub fn gateway_config(&self) -> GatewayConfig {
        let model = self.effective_model().to_string();
        match self.provider {
            Provider::Gemini => GatewayConfig::Gemini {
                api_key: self.api_key.clone().unwrap_or_default(),
                model,
                base_url: self.gemini_base_url.clone(),
            },
            Provider::Ollama => GatewayConfig::Ollama {
                host: self.ollama_host.clone(),
                port: self.ollama_port,
                model,
            },
        }
    }
}

// =============================================================================
// Configuration Loading
// =============================================================================

/// Get the default configuration file path
///
/// Returns `$XDG_CONFIG_HOME/aicalc/config.toml` or
/// `~/.config/aicalc/config.toml` if `XDG_CONFIG_HOME` is not set.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("aicalc").join("config.toml"))
}

/// Load configuration from all sources with proper priority
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be parsed, or if
/// the merged values are invalid. A missing config file is not an error.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(default_config_path())
}

/// Load configuration from a specific path
///
/// # Errors
///
/// Returns an error if the specified config file cannot be read or parsed.
pub fn load_config_from_path(path: Option<PathBuf>) -> Result<AppConfig, ConfigError> {
    load_config_with_env(path, |key| std::env::var(key).ok())
}

/// Load configuration with an explicit environment lookup
///
/// `env` maps a variable name to its value. [`load_config_from_path`] passes
/// the process environment.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the result fails
/// [`AppConfig::validate`].
pub fn load_config_with_env<F>(path: Option<PathBuf>, env: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    load_config_layered(path, env, &ConfigOverrides::new())
}

/// Load file and process environment, then apply CLI overrides
///
/// # Errors
///
/// Same as [`load_config_layered`].
pub fn load_config_with_overrides(
    path: Option<PathBuf>,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, ConfigError> {
    load_config_layered(path, |key| std::env::var(key).ok(), overrides)
}

/// Load every layer (defaults, file, env, CLI) and validate once
///
/// Validation runs after the overrides, so a CLI flag can correct a bad file
/// or env value.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or the merged
/// result fails [`AppConfig::validate`].
pub fn load_config_layered<F>(
    path: Option<PathBuf>,
    env: F,
    overrides: &ConfigOverrides,
) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // Start with defaults
    let mut config = AppConfig::default();

    // Try to load from file
    if let Some(ref config_path) = path {
        if config_path.exists() {
            let toml_content =
                std::fs::read_to_string(config_path).map_err(|e| ConfigError::ReadError {
                    path: config_path.clone(),
                    source: e,
                })?;

            let toml_config: AppToml = toml::from_str(&toml_content)?;
            apply_toml_config(&mut config, &toml_config)?;
            config.config_file_path = Some(config_path.clone());
            config.source = ConfigSource::File;

            tracing::info!(
                path = %config_path.display(),
                "Loaded configuration from file"
            );
        } else {
            tracing::debug!(
                path = %config_path.display(),
                "Config file not found, using defaults"
            );
        }
    }

    // Apply environment variables (overrides file values)
    apply_env_config(&mut config, env)?;

    // CLI flags win over everything
    overrides.apply(&mut config);

    config.validate()?;
    Ok(config)
}

/// Apply TOML configuration values to the config struct
fn apply_toml_config(config: &mut AppConfig, toml: &AppToml) -> Result<(), ConfigError> {
    // Gateway settings
    if let Some(ref provider) = toml.gateway.provider {
        config.provider = provider.parse()?;
    }
    if toml.gateway.model.is_some() {
        config.model = toml.gateway.model.clone();
    }
    if let Some(secs) = toml.gateway.timeout_secs {
        config.timeout = Duration::from_secs(secs);
    }

    // Gemini settings
    if let Some(ref url) = toml.gemini.base_url {
        config.gemini_base_url = url.clone();
    }

    // Ollama settings
    if let Some(ref host) = toml.ollama.host {
        config.ollama_host = host.clone();
    }
    if let Some(port) = toml.ollama.port {
        config.ollama_port = port;
    }

    Ok(())
}

/// Apply environment variable overrides to the config
fn apply_env_config<F>(config: &mut AppConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    // The key never marks the config as env-sourced: it has no file equivalent
    config.api_key = env("GEMINI_API_KEY")
        .or_else(|| env("API_KEY"))
        .filter(|key| !key.trim().is_empty());

    if let Some(provider) = env("AICALC_PROVIDER") {
        config.provider = provider.parse()?;
        config.source = ConfigSource::Env;
    }

    if let Some(model) = env("AICALC_MODEL") {
        config.model = Some(model);
        config.source = ConfigSource::Env;
    }

    if let Some(timeout) = env("AICALC_TIMEOUT_SECS") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config.timeout = Duration::from_secs(secs);
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %timeout, "Ignoring unparsable AICALC_TIMEOUT_SECS");
        }
    }

    if let Some(host) = env("OLLAMA_HOST") {
        config.ollama_host = host;
        config.source = ConfigSource::Env;
    }

    if let Some(port) = env("OLLAMA_PORT") {
        if let Ok(p) = port.parse::<u16>() {
            config.ollama_port = p;
            config.source = ConfigSource::Env;
        } else {
            tracing::warn!(value = %port, "Ignoring unparsable OLLAMA_PORT");
        }
    }

    Ok(())
}

// =============================================================================
// CLI Override Support
// =============================================================================

/// Builder for applying CLI overrides to configuration
///
/// Pass to [`load_config_layered`] so the flags are applied before
/// validation.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    /// Provider override
    pub provider: Option<Provider>,
    /// Model override
    pub model: Option<String>,
    /// Timeout override (seconds)
    pub timeout_secs: Option<u64>,
    /// Ollama host override
    pub ollama_host: Option<String>,
    /// Ollama port override
    pub ollama_port: Option<u16>,
}

impl ConfigOverrides {
    /// Create a new empty set of overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set provider override
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set model override
    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = Some(model);
        self
    }

    /// Set timeout override
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set Ollama host override
    #[must_use]
    pub fn with_ollama_host(mut self, host: String) -> Self {
        self.ollama_host = Some(host);
        self
    }

    /// Set Ollama port override
    #[must_use]
    pub fn with_ollama_port(mut self, port: u16) -> Self {
        self.ollama_port = Some(port);
        self
    }

    /// Whether any override is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.provider.is_none()
            && self.model.is_none()
            && self.timeout_secs.is_none()
            && self.ollama_host.is_none()
            && self.ollama_port.is_none()
    }

    /// Apply overrides to a configuration
    pub fn apply(&self, config: &mut AppConfig) {
        if !self.is_empty() {
            config.source = ConfigSource::Cli;
        }

        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(ref model) = self.model {
            config.model = Some(model.clone());
        }
        if let Some(secs) = self.timeout_secs {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ref host) = self.ollama_host {
            config.ollama_host = host.clone();
        }
        if let Some(port) = self.ollama_port {
            config.ollama_port = port;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
