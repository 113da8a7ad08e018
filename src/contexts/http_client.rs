//! HTTP implementation of the generation call boundary.
//!
//! Speaks a messages-style JSON API: the request carries the system prompt,
//! a single user message, the token ceiling and sampling parameters; the
//! reply carries the generated text at `content[0].text`. Endpoint and
//! credentials come from the environment so the rest of the crate never
//! touches transport details.

use reqwest::blocking::Client;
use serde_json::json;
use std::time::Duration;

use super::model_invoker::{GenerationCall, GenerationRequest, TransportError};

const API_URL_VAR: &str = "CODESMITH_API_URL";
const API_KEY_VAR: &str = "CODESMITH_API_KEY";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy)]
pub struct SamplingParams {
    pub temperature: f64,
    pub top_p: f64,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.9,
        }
    }
}

/// Blocking HTTP client for one model endpoint.
pub struct HttpGenerationClient {
    http: Client,
    endpoint: String,
    api_key: String,
    model: String,
    sampling: SamplingParams,
}

impl HttpGenerationClient {
    /// Builds a client for the given endpoint and model.
    pub fn new(
        endpoint: String,
        api_key: String,
        model: String,
        sampling: SamplingParams,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .timeout(Duration::from_secs(read_timeout_secs))
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint,
            api_key,
            model,
            sampling,
        })
    }

    /// Builds a client from `CODESMITH_API_URL` / `CODESMITH_API_KEY`.
    pub fn from_env(
        model: String,
        sampling: SamplingParams,
        connect_timeout_secs: u64,
        read_timeout_secs: u64,
    ) -> Result<Self, TransportError> {
        let endpoint = std::env::var(API_URL_VAR).map_err(|_| {
            TransportError::Network(format!("{} is not set", API_URL_VAR))
        })?;
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            TransportError::Network(format!("{} is not set", API_KEY_VAR))
        })?;

        Self::new(
            endpoint,
            api_key,
            model,
            sampling,
            connect_timeout_secs,
            read_timeout_secs,
        )
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl GenerationCall for HttpGenerationClient {
    fn call(&self, request: &GenerationRequest) -> Result<String, TransportError> {
        let body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "system": request.system_prompt,
            "messages": [
                {
                    "role": "user",
                    "content": request.user_prompt
                }
            ],
            "temperature": self.sampling.temperature,
            "top_p": self.sampling.top_p,
        });

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-api-key", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(TransportError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        let parsed: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| TransportError::MalformedResponse(e.to_string()))?;

        parsed["content"][0]["text"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| {
                TransportError::MalformedResponse(
                    "No content[0].text field in response".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sampling_params() {
        let sampling = SamplingParams::default();
        assert_eq!(sampling.temperature, 0.2);
        assert_eq!(sampling.top_p, 0.9);
    }

    #[test]
    fn test_client_construction() {
        let client = HttpGenerationClient::new(
            "http://localhost:9999/v1/messages".to_string(),
            "test-key".to_string(),
            "test-model".to_string(),
            SamplingParams::default(),
            5,
            5,
        );
        assert!(client.is_ok());
        assert_eq!(client.unwrap().model(), "test-model");
    }
}
