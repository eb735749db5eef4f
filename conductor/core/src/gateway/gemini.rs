//! Google Gemini Gateway
//!
//! Calls `{base_url}/{model}:generateContent` with a JSON response schema so
//! the model answers with `{"result": ..., "explanation": ...}`. The API key
//! goes in the `x-goog-api-key` header, never in the URL, so request URLs are
//! safe to log.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::response::{build_prompt, parse_calculation};
use super::traits::{AiGateway, CalculationResult, RemoteFailure};

const PROVIDER: &str = "Gemini";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

/// Schema in Gemini's OpenAPI subset
fn response_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "result": {
                "type": "STRING",
                "description": "The numerical result or the final answer."
            },
            "explanation": {
                "type": "STRING",
                "description": "A brief explanation of how the result was derived."
            }
        },
        "required": ["result", "explanation"]
    })
}

/// Gemini gateway client
#[derive(Clone)]
pub struct GeminiGateway {
    api_key: String,
    model: String,
    base_url: String,
    client: Client,
}

impl fmt::Debug for GeminiGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiGateway")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiGateway {
    /// Create a client. Fails when `api_key` is empty.
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteFailure> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RemoteFailure::MissingApiKey { provider: PROVIDER });
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            model: model.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    fn model_url(&self) -> String {
        format!("{}/{}", self.base_url, self.model)
    }

    fn generate_url(&self) -> String {
        format!("{}:generateContent", self.model_url())
    }

    fn request_body(prompt: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(prompt),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }

    /// Concatenate the text parts of the first candidate
    fn extract_text(response: GenerateResponse) -> Result<String, RemoteFailure> {
        let candidate = response
            .candidates
            .into_iter()
            .next()
            .ok_or(RemoteFailure::EmptyResponse)?;

        let text: String = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            return Err(RemoteFailure::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl AiGateway for GeminiGateway {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn health_check(&self) -> bool {
        let result = self
            .client
            .get(self.model_url())
            .header(API_KEY_HEADER, &self.api_key)
            .timeout(Duration::from_secs(5))
            .send()
            .await;

        match result {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                warn!(error = %e, "Gemini health check failed");
                false
            }
        }
    }

    async fn solve(&self, prompt: &str) -> Result<CalculationResult, RemoteFailure> {
        let url = self.generate_url();
        debug!(url = %url, model = %self.model, "Sending request to Gemini");

        let response = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(&Self::request_body(prompt))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteFailure::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateResponse = serde_json::from_str(&raw)
            .map_err(|e| RemoteFailure::MalformedResponse(e.to_string()))?;

        parse_calculation(&Self::extract_text(parsed)?)
    }
}
