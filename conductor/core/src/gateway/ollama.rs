//! Ollama Gateway
//!
//! Gateway for a local Ollama server.
//!
//! # Ollama API
//!
//! - `/api/generate` - single completion; used with `stream: false` and a
//!   JSON schema in `format` so the answer is a `{result, explanation}` object
//! - `/api/tags` - list installed models; used as the health probe

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use super::response::{build_prompt, parse_calculation};
use super::traits::{AiGateway, CalculationResult, RemoteFailure};

const PROVIDER: &str = "Ollama";

/// Ollama gateway client
#[derive(Debug, Clone)]
pub struct OllamaGateway {
    /// Host address
    host: String,
    /// Port number
    port: u16,
    /// Model identifier
    model: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl OllamaGateway {
    /// Create a new Ollama gateway
    pub fn new(
        host: impl Into<String>,
        port: u16,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RemoteFailure> {
        Ok(Self {
            host: host.into(),
            port,
            model: model.into(),
            http_client: reqwest::Client::builder().timeout(timeout).build()?,
        })
    }

    /// Get the base URL
    fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    /// Get generate endpoint URL
    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.base_url())
    }

    /// Get tags endpoint URL
    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url())
    }

    fn request_body(&self, prompt: &str) -> serde_json::Value {
        json!({
            "model": self.model,
            "prompt": build_prompt(prompt),
            "stream": false,
            "format": {
                "type": "object",
                "properties": {
                    "result": { "type": "string" },
                    "explanation": { "type": "string" }
                },
                "required": ["result", "explanation"]
            },
            "options": { "temperature": 0 }
        })
    }
}

#[async_trait]
impl AiGateway for OllamaGateway {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .is_ok_and(|response| response.status().is_success())
    }

    async fn solve(&self, prompt: &str) -> Result<CalculationResult, RemoteFailure> {
        let url = self.generate_url();
        debug!(url = %url, model = %self.model, "Sending request to Ollama");

        let response = self
            .http_client
            .post(&url)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteFailure::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let data: serde_json::Value = response
            .json()
            .await
            .map_err(|e| RemoteFailure::MalformedResponse(e.to_string()))?;

        let content = data
            .get("response")
            .and_then(|r| r.as_str())
            .ok_or(RemoteFailure::MissingField("response"))?;

        parse_calculation(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn gateway() -> OllamaGateway {
        OllamaGateway::new("localhost", 11434, "llama3.2", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_ollama_gateway_creation() {
        let gateway = gateway();
        assert_eq!(gateway.host, "localhost");
        assert_eq!(gateway.port, 11434);
        assert_eq!(gateway.base_url(), "http://localhost:11434");
        assert_eq!(gateway.generate_url(), "http://localhost:11434/api/generate");
        assert_eq!(gateway.tags_url(), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_request_body() {
        let body = gateway().request_body("half of 9");
        assert_eq!(body["model"], "llama3.2");
        assert_eq!(body["stream"], false);
        assert!(body["prompt"].as_str().unwrap().contains("\"half of 9\""));
        assert_eq!(body["format"]["required"], json!(["result", "explanation"]));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_failure() {
        // Port 9 (discard) is not an Ollama server on any test machine.
        let gateway =
            OllamaGateway::new("127.0.0.1", 9, "llama3.2", Duration::from_millis(500)).unwrap();
        assert!(!gateway.health_check().await);
        assert!(matches!(
            gateway.solve("1+1").await,
            Err(RemoteFailure::Transport(_))
        ));
    }

    fn mock_gateway(server: &MockServer) -> OllamaGateway {
        OllamaGateway::new(
            server.host(),
            server.port(),
            "llama3.2",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_solve_reads_response_field() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/generate")
                    .body_includes(r#""model":"llama3.2""#)
                    .body_includes(r#""stream":false"#);
                then.status(200).json_body(json!({
                    "model": "llama3.2",
                    "response": "{\"result\": \"12\", \"explanation\": \"15% of 80 is 12.\"}",
                    "done": true
                }));
            })
            .await;

        let answer = mock_gateway(&server).solve("15% of 80").await.unwrap();

        mock.assert_async().await;
        assert_eq!(answer.result, "12");
        assert_eq!(answer.explanation, "15% of 80 is 12.");
    }

    #[tokio::test]
    async fn test_solve_maps_error_status() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(500).body("model not loaded");
            })
            .await;

        match mock_gateway(&server).solve("1+1").await {
            Err(RemoteFailure::Status {
                provider,
                status,
                body,
            }) => {
                assert_eq!(provider, "Ollama");
                assert_eq!(status, 500);
                assert_eq!(body, "model not loaded");
            }
            other => panic!("Expected Status failure, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_solve_without_response_field() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200).json_body(json!({"model": "llama3.2", "done": true}));
            })
            .await;

        assert!(matches!(
            mock_gateway(&server).solve("1+1").await,
            Err(RemoteFailure::MissingField("response"))
        ));
    }

    #[tokio::test]
    async fn test_answer_missing_explanation() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/generate");
                then.status(200)
                    .json_body(json!({"response": "{\"result\": \"2\"}"}));
            })
            .await;

        assert!(matches!(
            mock_gateway(&server).solve("1+1").await,
            Err(RemoteFailure::MissingField("explanation"))
        ));
    }

    #[tokio::test]
    async fn test_health_check_uses_tags() {
        let server = MockServer::start_async().await;
        let tags = server
            .mock_async(|when, then| {
                when.method(GET).path("/api/tags");
                then.status(200).json_body(json!({"models": []}));
            })
            .await;

        assert!(mock_gateway(&server).health_check().await);
        tags.assert_async().await;
    }
}
