//! Script generation over an OpenAI-compatible chat completions API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::prompts::ScriptPrompts;
use crate::traits::{GenerationError, GeneratorConfig, ScriptGenerator, ScriptRequest};

const RETRY_BASE_DELAY: Duration = Duration::from_millis(500);

/// Generator that talks to the chat completions endpoint.
pub struct OpenAiScriptGenerator {
    client: Client,
    api_key: String,
    config: GeneratorConfig,
    name: String,
}

impl OpenAiScriptGenerator {
    pub fn new(config: GeneratorConfig) -> Result<Self, GenerationError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GenerationError::NotConfigured)?;

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::Request {
                status: None,
                message: format!("Failed to build HTTP client: {}", e),
                retryable: false,
            })?;

        Ok(Self {
            client,
            api_key,
            name: format!("openai:{}", config.model),
            config,
        })
    }

    fn build_request(&self, request: &ScriptRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: ScriptPrompts::system_prompt(request.mood, request.duration_minutes),
                },
                ChatMessage {
                    role: "user",
                    content: ScriptPrompts::user_prompt(request.mood, request.duration_minutes),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    async fn send_request(&self, body: &ChatCompletionRequest) -> Result<String, GenerationError> {
        let response = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    GenerationError::Timeout(self.config.timeout)
                } else {
                    GenerationError::Request {
                        status: None,
                        message: err.to_string(),
                        retryable: err.is_connect(),
                    }
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &body_text));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| GenerationError::InvalidResponse(err.to_string()))?;

        extract_text_response(parsed)
    }
}

#[async_trait]
impl ScriptGenerator for OpenAiScriptGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, request: &ScriptRequest) -> Result<String, GenerationError> {
        let body = self.build_request(request);
        let mut attempt = 0u32;

        loop {
            debug!(
                model = %self.config.model,
                mood = %request.mood,
                duration = request.duration_minutes,
                attempt,
                "Requesting meditation script"
            );

            match self.send_request(&body).await {
                Ok(script) => {
                    info!(chars = script.len(), attempt, "Meditation script generated");
                    return Ok(script);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(error = %e, attempt, "Script generation failed, retrying");
                    tokio::time::sleep(RETRY_BASE_DELAY * attempt).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
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

fn extract_text_response(response: ChatCompletionResponse) -> Result<String, GenerationError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)
}

fn map_http_error(status: StatusCode, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorResponse>(body)
        .map(|wrapper| wrapper.error.message)
        .unwrap_or_else(|_| body.to_string());

    let retryable = matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    );

    GenerationError::Request {
        status: Some(status.as_u16()),
        message,
        retryable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindful_core::Mood;

    #[test]
    fn test_new_requires_api_key() {
        assert!(matches!(
            OpenAiScriptGenerator::new(GeneratorConfig::default()),
            Err(GenerationError::NotConfigured)
        ));
        assert!(matches!(
            OpenAiScriptGenerator::new(GeneratorConfig::default().with_api_key("  ")),
            Err(GenerationError::NotConfigured)
        ));
    }

    #[test]
    fn test_build_request_uses_prompts() {
        let generator =
            OpenAiScriptGenerator::new(GeneratorConfig::default().with_api_key("sk-test")).unwrap();
        let body = generator.build_request(&ScriptRequest::new(Mood::Restless, 2));
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["model"], "gpt-4o-mini");
        assert_eq!(json["max_tokens"], 1000);
        assert_eq!(json["messages"][0]["role"], "system");
        assert!(json["messages"][0]["content"]
            .as_str()
            .unwrap()
            .contains("approximately 300 words"));
        assert_eq!(
            json["messages"][1]["content"],
            "Create a 2-minute guided meditation for someone feeling restless."
        );
        assert_eq!(generator.name(), "openai:gpt-4o-mini");
    }

    #[test]
    fn test_extract_text_response() {
        let parsed: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"Close your eyes."}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text_response(parsed).unwrap(), "Close your eyes.");

        let empty: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"content":"   "}}]}"#).unwrap();
        assert!(matches!(
            extract_text_response(empty),
            Err(GenerationError::EmptyResponse)
        ));

        let none: ChatCompletionResponse = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(matches!(
            extract_text_response(none),
            Err(GenerationError::EmptyResponse)
        ));
    }

    #[test]
    fn test_map_http_error() {
        let err = map_http_error(
            StatusCode::TOO_MANY_REQUESTS,
            r#"{"error":{"message":"Rate limit reached","type":"requests"}}"#,
        );
        match err {
            GenerationError::Request {
                status,
                message,
                retryable,
            } => {
                assert_eq!(status, Some(429));
                assert_eq!(message, "Rate limit reached");
                assert!(retryable);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let err = map_http_error(StatusCode::UNAUTHORIZED, "bad key");
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("bad key"));
    }
}
