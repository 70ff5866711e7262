//! In-memory stand-ins for the host and model services.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::AppConfig;
use crate::context::AppContext;
use crate::domain::pull_request::{Commit, FileChange, FileStatus};
use crate::error::{AppError, AppResult};
use crate::services::{GenerationRequest, LanguageModelService, PullRecord, RepositoryHostService};

pub fn context(host: Arc<StubHost>, model: Arc<StubModel>) -> AppContext {
    AppContext::new(AppConfig::default(), host, model)
}

pub fn pull_record(number: u64, merged_at: Option<&str>) -> PullRecord {
    PullRecord {
        number,
        title: format!("Change {number}"),
        merged_at: merged_at.map(str::to_string),
        author: "octocat".to_string(),
        commits_url: format!("stub://commits/{number}"),
    }
}

#[derive(Default)]
pub struct StubHost {
    pages: HashMap<String, Vec<Vec<PullRecord>>>,
    not_found: HashSet<String>,
    failing: HashSet<String>,
    default_detail: bool,
    page_log: Mutex<Vec<(String, u32)>>,
    file_log: Mutex<Vec<u64>>,
}

impl StubHost {
    pub fn with_pages(mut self, repo: &str, pages: Vec<Vec<PullRecord>>) -> Self {
        self.pages.insert(repo.to_string(), pages);
        self
    }

    pub fn with_not_found(mut self, repo: &str) -> Self {
        self.not_found.insert(repo.to_string());
        self
    }

    pub fn with_failure(mut self, repo: &str) -> Self {
        self.failing.insert(repo.to_string());
        self
    }

    /// Every pull request gets one commit and one file.
    pub fn with_default_detail(mut self) -> Self {
        self.default_detail = true;
        self
    }

    pub fn page_requests(&self, repo: &str) -> Vec<u32> {
        self.page_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(name, _)| name == repo)
            .map(|(_, page)| *page)
            .collect()
    }

    pub fn file_requests(&self) -> Vec<u64> {
        let mut numbers = self.file_log.lock().unwrap().clone();
        numbers.sort_unstable();
        numbers
    }
}

#[async_trait]
impl RepositoryHostService for StubHost {
    async fn list_user_orgs(&self) -> AppResult<Vec<String>> {
        Ok(vec!["acme".to_string()])
    }

    async fn list_org_repos(&self, org: &str) -> AppResult<Vec<String>> {
        let mut repos: Vec<String> = self
            .pages
            .keys()
            .filter(|name| name.starts_with(&format!("{org}/")))
            .cloned()
            .collect();
        repos.sort();
        Ok(repos)
    }

    async fn list_closed_pulls(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        _per_page: u32,
    ) -> AppResult<Vec<PullRecord>> {
        let full_name = format!("{owner}/{repo}");
        self.page_log.lock().unwrap().push((full_name.clone(), page));
        if self.not_found.contains(&full_name) {
            return Err(AppError::NotFound(full_name));
        }
        if self.failing.contains(&full_name) {
            return Err(AppError::RepositoryHost(format!(
                "GitHub responded with 500 Internal Server Error for {full_name}"
            )));
        }
        let index = page.saturating_sub(1) as usize;
        Ok(self
            .pages
            .get(&full_name)
            .and_then(|pages| pages.get(index))
            .cloned()
            .unwrap_or_default())
    }

    async fn list_pull_commits(&self, commits_url: &str) -> AppResult<Vec<Commit>> {
        if !self.default_detail {
            return Ok(Vec::new());
        }
        Ok(vec![Commit {
            message: format!("Work from {commits_url}"),
            author: "Ada".to_string(),
        }])
    }

    async fn list_pull_files(
        &self,
        _owner: &str,
        _repo: &str,
        number: u64,
    ) -> AppResult<Vec<FileChange>> {
        self.file_log.lock().unwrap().push(number);
        if !self.default_detail {
            return Ok(Vec::new());
        }
        Ok(vec![FileChange {
            filename: format!("src/change_{number}.rs"),
            changes: Some(10),
            status: FileStatus::Modified,
        }])
    }
}

/// Returns a fixed reply, failing any request whose user prompt contains
/// `fail_marker`.
pub struct StubModel {
    reply: String,
    fail_marker: Option<String>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            fail_marker: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_on(mut self, marker: &str) -> Self {
        self.fail_marker = Some(marker.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModelService for StubModel {
    async fn generate(&self, request: &GenerationRequest) -> AppResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        match &self.fail_marker {
            Some(marker) if request.user_prompt.contains(marker.as_str()) => Err(
                AppError::LanguageModel("provider responded with 429: rate limited".to_string()),
            ),
            _ => Ok(self.reply.clone()),
        }
    }
}
