//! AI Gateway Traits
//!
//! The calculator core talks to a generative-AI service through the
//! [`AiGateway`] trait only. A gateway is constructed explicitly and handed to
//! the [`Conductor`](crate::Conductor), so tests can inject a fake that returns
//! canned answers or failures without touching the network.
//!
//! Every way a call can go wrong (transport error, bad status, non-JSON body,
//! missing field) is folded into one [`RemoteFailure`]. The conductor treats
//! all of them the same: the display shows `"Error"`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default Gemini model
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini REST endpoint (models collection)
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Default model when running against a local Ollama server
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

/// Structured answer from the AI service
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult {
    /// The numerical result or final answer
    pub result: String,
    /// Brief explanation of how the result was derived
    pub explanation: String,
}

/// Failure talking to the AI service
#[derive(Debug, Error)]
pub enum RemoteFailure {
    /// No API key configured for a provider that needs one
    #[error("no API key configured for {provider}")]
    MissingApiKey {
        /// Provider name
        provider: &'static str,
    },

    /// Network or client error (includes timeouts)
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("{provider} returned {status}: {body}")]
    Status {
        /// Provider name
        provider: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, for diagnostics
        body: String,
    },

    /// The service answered with no text
    #[error("no response from AI")]
    EmptyResponse,

    /// The answer was not the expected JSON shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// A required field was absent
    #[error("response is missing required field `{0}`")]
    MissingField(&'static str),

    /// The provider could not be set up at startup
    #[error("{provider} is unavailable: {reason}")]
    Unavailable {
        /// Provider name
        provider: &'static str,
        /// Why construction failed
        reason: String,
    },
}

/// AI gateway trait
///
/// Implement this to add another provider.
#[async_trait]
pub trait AiGateway: Send + Sync {
    /// Provider name (e.g., "Gemini", "Ollama")
    fn name(&self) -> &str;

    /// Check if the service is reachable
    async fn health_check(&self) -> bool;

    /// Solve a free-text math prompt
    async fn solve(&self, prompt: &str) -> Result<CalculationResult, RemoteFailure>;
}

#[async_trait]
impl<G: AiGateway + ?Sized> AiGateway for Box<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn health_check(&self) -> bool {
        (**self).health_check().await
    }

    async fn solve(&self, prompt: &str) -> Result<CalculationResult, RemoteFailure> {
        (**self).solve(prompt).await
    }
}

#[async_trait]
impl<G: AiGateway + ?Sized> AiGateway for Arc<G> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn health_check(&self) -> bool {
        (**self).health_check().await
    }

    async fn solve(&self, prompt: &str) -> Result<CalculationResult, RemoteFailure> {
        (**self).solve(prompt).await
    }
}

/// Gateway connection configuration
#[derive(Clone, PartialEq, Eq)]
pub enum GatewayConfig {
    /// Google Gemini API
    Gemini {
        /// API key (sent as a header, never logged)
        api_key: String,
        /// Model identifier
        model: String,
        /// Models collection URL
        base_url: String,
    },
    /// Local Ollama server
    Ollama {
        /// Ollama host address
        host: String,
        /// Ollama port number
        port: u16,
        /// Model identifier
        model: String,
    },
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gemini {
                api_key,
                model,
                base_url,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &if api_key.is_empty() { "" } else { "<redacted>" })
                .field("model", model)
                .field("base_url", base_url)
                .finish(),
            Self::Ollama { host, port, model } => f
                .debug_struct("Ollama")
                .field("host", host)
                .field("port", port)
                .field("model", model)
                .finish(),
        }
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self::gemini(String::new())
    }
}

impl GatewayConfig {
    /// Gemini configuration with the default model and endpoint
    pub fn gemini(api_key: impl Into<String>) -> Self {
        Self::Gemini {
            api_key: api_key.into(),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Ollama configuration with the default model
    pub fn ollama(host: impl Into<String>, port: u16) -> Self {
        Self::Ollama {
            host: host.into(),
            port,
            model: DEFAULT_OLLAMA_MODEL.to_string(),
        }
    }

    /// Provider name for this configuration
    #[must_use]
    pub fn provider(&self) -> &'static str {
        match self {
            Self::Gemini { .. } => "Gemini",
            Self::Ollama { .. } => "Ollama",
        }
    }

    /// Model identifier for this configuration
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::Gemini { model, .. } | Self::Ollama { model, .. } => model,
        }
    }

    /// Replace the model identifier
    #[must_use]
    pub fn with_model(mut self, new_model: impl Into<String>) -> Self {
        match &mut self {
            Self::Gemini { model, .. } | Self::Ollama { model, .. } => *model = new_model.into(),
        }
        self
    }
}
