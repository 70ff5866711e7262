use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{LanguageModelService, RepositoryHostService};

#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub repository_host: Arc<dyn RepositoryHostService>,
    pub language_model: Arc<dyn LanguageModelService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        repository_host: Arc<dyn RepositoryHostService>,
        language_model: Arc<dyn LanguageModelService>,
    ) -> Self {
        Self {
            config,
            repository_host,
            language_model,
        }
    }
}
