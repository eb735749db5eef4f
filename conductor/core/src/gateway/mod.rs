//! AI Gateway Integration
//!
//! Abstracted access to the generative-AI service that answers AI-mode
//! prompts.
//!
//! # Available Gateways
//!
//! - **Gemini**: Google Gemini API (default, needs `GEMINI_API_KEY`)
//! - **Ollama**: Local LLM server
//!
//! # Usage
//!
//! ```ignore
//! use aicalc_core::gateway::{build_gateway, GatewayConfig, DEFAULT_TIMEOUT};
//!
//! let gateway = build_gateway(&GatewayConfig::gemini(key), DEFAULT_TIMEOUT)?;
//! let answer = gateway.solve("what is 15% of 80").await?;
//! ```

mod gemini;
mod ollama;
mod response;
mod traits;
mod unavailable;

use std::time::Duration;

pub use gemini::GeminiGateway;
pub use ollama::OllamaGateway;
pub use response::{build_prompt, parse_calculation};
pub use traits::{
    AiGateway, CalculationResult, GatewayConfig, RemoteFailure, DEFAULT_GEMINI_BASE_URL,
    DEFAULT_GEMINI_MODEL, DEFAULT_OLLAMA_MODEL,
};
pub use unavailable::UnavailableGateway;

/// Per-request timeout when none is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Construct the gateway described by `config`
pub fn build_gateway(
    config: &GatewayConfig,
    timeout: Duration,
) -> Result<Box<dyn AiGateway>, RemoteFailure> {
    let gateway: Box<dyn AiGateway> = match config {
        GatewayConfig::Gemini {
            api_key,
            model,
            base_url,
        } => Box::new(GeminiGateway::new(
            api_key.clone(),
            model.clone(),
            base_url.clone(),
            timeout,
        )?),
        GatewayConfig::Ollama { host, port, model } => Box::new(OllamaGateway::new(
            host.clone(),
            *port,
            model.clone(),
            timeout,
        )?),
    };

    tracing::info!(
        provider = gateway.name(),
        model = config.model(),
        timeout_secs = timeout.as_secs(),
        "AI gateway configured"
    );
    Ok(gateway)
}

/// Construct the configured gateway, or a stand-in that fails every prompt
///
/// A missing API key must not keep the keypad from starting. The stand-in's
/// health check fails, so the Conductor raises its usual warning on start.
#[must_use]
pub fn connect_gateway(config: &GatewayConfig, timeout: Duration) -> Box<dyn AiGateway> {
    match build_gateway(config, timeout) {
        Ok(gateway) => gateway,
        Err(e) => {
            tracing::warn!(
                provider = config.provider(),
                error = %e,
                "AI gateway unavailable, AI mode will report errors"
            );
            Box::new(UnavailableGateway::new(config.provider(), &e))
        }
    }
}
