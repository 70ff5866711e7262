use async_trait::async_trait;

use crate::domain::pull_request::{Commit, FileChange};
use crate::error::AppResult;

/// A closed pull request as listed by the host, before enrichment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRecord {
    pub number: u64,
    pub title: String,
    pub merged_at: Option<String>,
    pub author: String,
    pub commits_url: String,
}

/// Read access to a code-hosting API.
///
/// Implementations report a missing or inaccessible resource as
/// [`AppError::NotFound`](crate::error::AppError::NotFound) and every other
/// failed response as [`AppError::RepositoryHost`](crate::error::AppError::RepositoryHost).
#[async_trait]
pub trait RepositoryHostService: Send + Sync {
    async fn list_user_orgs(&self) -> AppResult<Vec<String>>;
    async fn list_org_repos(&self, org: &str) -> AppResult<Vec<String>>;
    async fn list_closed_pulls(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<Vec<PullRecord>>;
    async fn list_pull_commits(&self, commits_url: &str) -> AppResult<Vec<Commit>>;
    async fn list_pull_files(&self, owner: &str, repo: &str, number: u64)
    -> AppResult<Vec<FileChange>>;
}
