use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("repository host error: {0}")]
    RepositoryHost(String),
    #[error("language model error: {0}")]
    LanguageModel(String),
    #[error("report error: {0}")]
    Report(String),
}

pub type AppResult<T> = Result<T, AppError>;
