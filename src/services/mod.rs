pub mod language_model;
pub mod repository_host;

pub use language_model::{GenerationRequest, LanguageModelService};
pub use repository_host::{PullRecord, RepositoryHostService};
