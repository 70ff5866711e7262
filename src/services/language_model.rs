use async_trait::async_trait;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_output_tokens: u32,
    pub temperature: f64,
}

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String>;
}
