use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Response, StatusCode,
    header::{ACCEPT, USER_AGENT},
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::domain::pull_request::{Commit, FileChange, FileStatus};
use crate::error::{AppError, AppResult};
use crate::services::{PullRecord, RepositoryHostService};

const GITHUB_ACCEPT: &str = "application/vnd.github.v3+json";
const CLIENT_USER_AGENT: &str = concat!("prdigest/", env!("CARGO_PKG_VERSION"));
const REPO_PAGE_SIZE: u32 = 100;

pub struct GitHubClient {
    http: Client,
    api_url: String,
    token: Option<String>,
}

impl GitHubClient {
    pub fn new(api_url: String, token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| {
                AppError::Configuration(format!("failed to create GitHub HTTP client: {err}"))
            })?;
        Ok(Self {
            http,
            api_url: api_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    fn token(&self) -> AppResult<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| AppError::Configuration("GitHub token not configured".to_string()))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> AppResult<Response> {
        let token = self.token()?;
        self.http
            .get(url)
            .bearer_auth(token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .query(query)
            .send()
            .await
            .map_err(|err| AppError::RepositoryHost(format!("failed to call GitHub: {err}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let response = self.get(url, query).await?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            return Err(AppError::RepositoryHost(format!(
                "GitHub responded with {status} for {url}: {body}"
            )));
        }
        response.json::<T>().await.map_err(|err| {
            AppError::RepositoryHost(format!("failed to parse GitHub response from {url}: {err}"))
        })
    }
}

#[async_trait]
impl RepositoryHostService for GitHubClient {
    async fn list_user_orgs(&self) -> AppResult<Vec<String>> {
        let orgs: Vec<GitHubOrg> = self.get_json(&self.endpoint("user/orgs"), &[]).await?;
        Ok(orgs.into_iter().map(|org| org.login).collect())
    }

    async fn list_org_repos(&self, org: &str) -> AppResult<Vec<String>> {
        let url = self.endpoint(&format!("orgs/{org}/repos"));
        let query = [
            ("per_page", REPO_PAGE_SIZE.to_string()),
            ("sort", "updated".to_string()),
        ];
        let response = self.get(&url, &query).await?;
        let status = response.status();
        if status != StatusCode::OK {
            warn!(%org, %status, "repository listing unavailable");
            return Ok(Vec::new());
        }
        let repos: Vec<GitHubRepo> = response.json().await.map_err(|err| {
            AppError::RepositoryHost(format!("failed to parse repositories for {org}: {err}"))
        })?;
        Ok(repos.into_iter().map(|repo| repo.full_name).collect())
    }

    async fn list_closed_pulls(
        &self,
        owner: &str,
        repo: &str,
        page: u32,
        per_page: u32,
    ) -> AppResult<Vec<PullRecord>> {
        let url = self.endpoint(&format!("repos/{owner}/{repo}/pulls"));
        let query = [
            ("state", "closed".to_string()),
            ("sort", "updated".to_string()),
            ("direction", "desc".to_string()),
            ("per_page", per_page.to_string()),
            ("page", page.to_string()),
        ];
        let pulls: Vec<GitHubPull> = self.get_json(&url, &query).await?;
        debug!(%owner, %repo, page, count = pulls.len(), "fetched closed pull request page");
        Ok(pulls.into_iter().map(PullRecord::from).collect())
    }

    async fn list_pull_commits(&self, commits_url: &str) -> AppResult<Vec<Commit>> {
        let commits: Vec<GitHubCommit> = self.get_json(commits_url, &[]).await?;
        Ok(commits.into_iter().map(Commit::from).collect())
    }

    async fn list_pull_files(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> AppResult<Vec<FileChange>> {
        let url = self.endpoint(&format!("repos/{owner}/{repo}/pulls/{number}/files"));
        let files: Vec<GitHubFile> = self.get_json(&url, &[]).await?;
        Ok(files.into_iter().map(FileChange::from).collect())
    }
}

#[derive(Deserialize)]
struct GitHubOrg {
    login: String,
}

#[derive(Deserialize)]
struct GitHubRepo {
    full_name: String,
}

#[derive(Deserialize)]
struct GitHubPull {
    number: u64,
    #[serde(default)]
    title: String,
    merged_at: Option<String>,
    user: Option<GitHubUser>,
    commits_url: String,
}

#[derive(Deserialize)]
struct GitHubUser {
    login: String,
}

impl From<GitHubPull> for PullRecord {
    fn from(pull: GitHubPull) -> Self {
        Self {
            number: pull.number,
            title: pull.title,
            merged_at: pull.merged_at,
            author: pull
                .user
                .map(|user| user.login)
                .unwrap_or_else(|| "ghost".to_string()),
            commits_url: pull.commits_url,
        }
    }
}

#[derive(Deserialize)]
struct GitHubCommit {
    commit: GitHubCommitDetail,
}

#[derive(Deserialize)]
struct GitHubCommitDetail {
    message: String,
    author: Option<GitHubCommitAuthor>,
}

#[derive(Deserialize)]
struct GitHubCommitAuthor {
    name: String,
}

impl From<GitHubCommit> for Commit {
    fn from(commit: GitHubCommit) -> Self {
        Self {
            message: commit.commit.message,
            author: commit
                .commit
                .author
                .map(|author| author.name)
                .unwrap_or_else(|| "unknown".to_string()),
        }
    }
}

#[derive(Deserialize)]
struct GitHubFile {
    filename: String,
    changes: Option<u64>,
    status: Option<String>,
}

impl From<GitHubFile> for FileChange {
    fn from(file: GitHubFile) -> Self {
        Self {
            filename: file.filename,
            changes: file.changes,
            status: file
                .status
                .as_deref()
                .map(FileStatus::parse)
                .unwrap_or_else(|| FileStatus::Other("unknown".to_string())),
        }
    }
}
