use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::{GenerationRequest, LanguageModelService};

/// Client for any OpenAI-compatible `/chat/completions` endpoint.
pub struct OpenAiClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OpenAiClient {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                AppError::Configuration(format!("failed to create language model client: {err}"))
            })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn api_key(&self) -> AppResult<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| AppError::Configuration("OpenAI API key not configured".to_string()))
    }
}

#[async_trait]
impl LanguageModelService for OpenAiClient {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        let api_key = self.api_key()?;
        let payload = ChatCompletionsRequest {
            model: &request.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user_prompt,
                },
            ],
            max_tokens: request.max_output_tokens,
            temperature: request.temperature,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|err| AppError::LanguageModel(format!("request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::LanguageModel(format!(
                "provider responded with {status}: {body}"
            )));
        }

        let completion: ChatCompletionsResponse = response
            .json()
            .await
            .map_err(|err| AppError::LanguageModel(format!("failed to parse response: {err}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                AppError::LanguageModel("response did not contain assistant text".to_string())
            })
    }
}

#[derive(Serialize)]
struct ChatCompletionsRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatCompletionsResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}
