//! OpenAIApiBackend - Chat Completions client.
//!
//! Works against api.openai.com or any server speaking the same protocol
//! (set `base_url`).

use crate::completion::{CompletionBackend, CompletionRequest};
use crate::http::{
    DEFAULT_TIMEOUT, build_client, map_http_error, map_transport_error, parse_retry_after,
};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use sleuth_core::error::{Result, SleuthError};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const PROVIDER: &str = "OpenAI";

/// Backend that talks to the OpenAI HTTP API.
#[derive(Clone)]
pub struct OpenAIApiBackend {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
}

impl OpenAIApiBackend {
    /// Creates a backend with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(DEFAULT_TIMEOUT)?,
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            temperature: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.client = build_client(timeout)?;
        Ok(self)
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn build_request(&self, request: CompletionRequest) -> ChatCompletionRequest {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = request.system {
            messages.push(ChatMessage {
                role: "system",
                content: system,
            });
        }
        messages.push(ChatMessage {
            role: "user",
            content: request.prompt,
        });

        ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            response_format: request.json.then_some(ResponseFormat {
                r#type: "json_object",
            }),
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String> {
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| map_transport_error(PROVIDER, err))?;

        if !response.status().is_success() {
            let status = response.status();
            let retry_after = parse_retry_after(response.headers().get("retry-after"));
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read OpenAI error body".to_string());
            return Err(map_http_error(
                PROVIDER,
                status,
                error_message(&body_text),
                retry_after,
            ));
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|err| {
            SleuthError::invalid_response(format!("Failed to parse OpenAI response: {}", err))
        })?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl CompletionBackend for OpenAIApiBackend {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let body = self.build_request(request);
        debug!(model = %self.model, json = body.response_format.is_some(), "Sending chat completion");
        self.send_request(&body).await
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    r#type: &'static str,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string())
}

fn extract_text_response(response: ChatCompletionResponse) -> Result<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            SleuthError::invalid_response("OpenAI API returned no content in the response")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_body_asks_for_json_object() {
        let backend = OpenAIApiBackend::new("sk-test", "gpt-4o-mini")
            .unwrap()
            .with_temperature(0.2);
        let body = backend.build_request(
            CompletionRequest::json("Claim: water is wet").with_system("Be terse."),
        );

        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["response_format"], json!({"type": "json_object"}));
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "Claim: water is wet");
    }

    #[test]
    fn test_plain_request_has_no_response_format() {
        let backend = OpenAIApiBackend::new("sk-test", "gpt-4o-mini").unwrap();
        let mut request = CompletionRequest::json("hello");
        request.json = false;

        let value = serde_json::to_value(backend.build_request(request)).unwrap();
        assert!(value.get("response_format").is_none());
        assert!(value.get("temperature").is_none());
        assert_eq!(value["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let backend = OpenAIApiBackend::new("k", "m")
            .unwrap()
            .with_base_url("http://localhost:11434/v1/");
        assert_eq!(backend.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_extract_text_and_errors() {
        let parsed: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": "{}"}}]})).unwrap();
        assert_eq!(extract_text_response(parsed).unwrap(), "{}");

        let empty: ChatCompletionResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(extract_text_response(empty).unwrap_err().is_upstream());

        assert_eq!(
            error_message(r#"{"error": {"message": "bad key", "type": "auth"}}"#),
            "bad key"
        );
        assert_eq!(error_message("gateway down"), "gateway down");
    }
}
