use std::collections::HashSet;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::domain::pull_request::PullRequest;
use crate::domain::repository::RepoName;
use crate::domain::window::MergeWindow;
use crate::error::{AppError, AppResult};
use crate::services::PullRecord;

pub const PULL_PAGE_SIZE: u32 = 50;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The repository is missing or the token cannot see it.
    NotFound,
    /// Merged pull requests in the window, possibly none.
    Fetched(Vec<PullRequest>),
}

impl FetchOutcome {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchOutcome::NotFound)
    }

    pub fn into_pull_requests(self) -> Vec<PullRequest> {
        match self {
            FetchOutcome::NotFound => Vec::new(),
            FetchOutcome::Fetched(pulls) => pulls,
        }
    }
}

/// Walks every page of closed pull requests until the host returns an empty
/// page. The listing cannot be filtered by merge date server-side, so the
/// full closed set is always read. A pull request updated mid-walk can shift
/// onto a later page; only its first occurrence is kept. `None` means the
/// repository was not found.
pub async fn list_all_closed_pulls(
    ctx: &AppContext,
    repo: &RepoName,
) -> AppResult<Option<Vec<PullRecord>>> {
    let mut all = Vec::new();
    let mut seen = HashSet::new();
    let mut page = 1;
    loop {
        let batch = match ctx
            .repository_host
            .list_closed_pulls(&repo.owner, &repo.name, page, PULL_PAGE_SIZE)
            .await
        {
            Ok(batch) => batch,
            Err(AppError::NotFound(detail)) => {
                warn!(repo = %repo, %detail, "repository not found or not accessible");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };
        if batch.is_empty() {
            break;
        }
        all.extend(batch.into_iter().filter(|record| seen.insert(record.number)));
        page += 1;
    }
    debug!(repo = %repo, total = all.len(), pages = page - 1, "collected closed pull requests");
    Ok(Some(all))
}

pub fn filter_merged(records: Vec<PullRecord>, window: &MergeWindow) -> Vec<PullRecord> {
    records
        .into_iter()
        .filter(|record| {
            record
                .merged_at
                .as_deref()
                .is_some_and(|merged_at| window.contains(merged_at))
        })
        .collect()
}

pub async fn fetch_merged_prs(
    ctx: &AppContext,
    repo: &RepoName,
    window: &MergeWindow,
) -> AppResult<FetchOutcome> {
    let Some(records) = list_all_closed_pulls(ctx, repo).await? else {
        return Ok(FetchOutcome::NotFound);
    };
    let merged = filter_merged(records, window);

    let pulls = stream::iter(merged.into_iter().map(|record| enrich(ctx, repo, record)))
        .buffered(ctx.config.concurrency)
        .try_collect::<Vec<_>>()
        .await?;
    Ok(FetchOutcome::Fetched(pulls))
}

async fn enrich(ctx: &AppContext, repo: &RepoName, record: PullRecord) -> AppResult<PullRequest> {
    let host = &ctx.repository_host;
    let (commits, files) = futures::try_join!(
        host.list_pull_commits(&record.commits_url),
        host.list_pull_files(&repo.owner, &repo.name, record.number),
    )?;
    Ok(PullRequest {
        number: record.number,
        title: record.title,
        merged_at: record.merged_at.unwrap_or_default(),
        author: record.author,
        commits,
        files,
    })
}
