use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{info, warn};

use crate::context::AppContext;
use crate::domain::repository::{RepoName, RepoSelection};
use crate::domain::summary::{PipelineReport, RepoDigest, UnitSummaries};
use crate::domain::window::MergeWindow;
use crate::error::{AppError, AppResult};
use crate::workflow::fetch::fetch_merged_prs;
use crate::workflow::summarize::{summarize_aggregate, summarize_unit};

/// Fetches and summarizes every selected repository.
///
/// Repositories and the pull requests inside each one are processed
/// concurrently, bounded by `config.concurrency`. Summarization failures are
/// contained in their own entry; a host failure aborts the whole run.
pub async fn run_pipeline(
    ctx: &AppContext,
    org: &str,
    repo_full_names: &[String],
    window: &MergeWindow,
) -> AppResult<PipelineReport> {
    let org = org.trim();
    if org.is_empty() {
        return Err(AppError::InvalidInput(
            "organization must not be empty".to_string(),
        ));
    }
    if repo_full_names.is_empty() {
        return Err(AppError::InvalidInput(
            "at least one repository must be selected".to_string(),
        ));
    }

    let selection = RepoSelection::from_identifiers(repo_full_names);
    for skipped in &selection.skipped {
        warn!(identifier = %skipped, "skipping malformed repository identifier");
    }

    let digests = stream::iter(
        selection
            .repos
            .iter()
            .map(|repo| digest_repository(ctx, repo, window)),
    )
    .buffered(ctx.config.concurrency)
    .try_collect::<Vec<_>>()
    .await?;

    let mut report = PipelineReport {
        org: org.to_string(),
        start_date: window.start().to_string(),
        end_date: window.end().to_string(),
        skipped: selection.skipped,
        ..PipelineReport::default()
    };
    for digest in digests {
        report.insert(digest);
    }
    Ok(report)
}

pub async fn digest_repository(
    ctx: &AppContext,
    repo: &RepoName,
    window: &MergeWindow,
) -> AppResult<RepoDigest> {
    let full_name = repo.full_name();
    let outcome = fetch_merged_prs(ctx, repo, window).await?;
    let not_found = outcome.is_not_found();
    let pull_requests = outcome.into_pull_requests();
    info!(repo = %full_name, merged = pull_requests.len(), "summarizing repository");

    let summaries = stream::iter(
        pull_requests
            .iter()
            .map(|pr| summarize_unit(ctx, &full_name, pr)),
    )
    .buffered(ctx.config.concurrency)
    .collect::<Vec<String>>()
    .await;

    let summary = summarize_aggregate(ctx, &full_name, &summaries).await;
    let unit_summaries: UnitSummaries = pull_requests
        .iter()
        .map(|pr| pr.number)
        .zip(summaries)
        .collect();

    Ok(RepoDigest {
        full_name,
        not_found,
        pull_requests,
        unit_summaries,
        summary,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::workflow::testing::{StubHost, StubModel, context, pull_record};

    fn february() -> MergeWindow {
        MergeWindow::parse("2025-02-01", "2025-02-28").unwrap()
    }

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[tokio::test]
    async fn end_to_end_single_pull_request() {
        let host = Arc::new(
            StubHost::default()
                .with_pages(
                    "acme/widget",
                    vec![vec![
                        pull_record(1, Some("2025-02-10T12:00:00Z")),
                        pull_record(2, Some("2025-03-01T08:00:00Z")),
                    ]],
                )
                .with_default_detail(),
        );
        let model = Arc::new(StubModel::replying("Widget gained a cache."));
        let ctx = context(host.clone(), model.clone());

        let report = run_pipeline(&ctx, "acme", &names(&["acme/widget"]), &february())
            .await
            .unwrap();

        let pulls = &report.repo_pull_requests["acme/widget"];
        assert_eq!(pulls.len(), 1);
        assert_eq!(pulls[0].number, 1);
        assert_eq!(pulls[0].commits.len(), 1);
        assert_eq!(pulls[0].files.len(), 1);
        assert_eq!(host.file_requests(), vec![1]);
        assert_eq!(
            report.unit_summaries["acme/widget"][&1_u64],
            "Widget gained a cache."
        );
        assert_eq!(report.repo_summaries["acme/widget"], "Widget gained a cache.");
        assert_eq!(model.call_count(), 1);
        assert_eq!(report.start_date, "2025-02-01");
        assert_eq!(report.end_date, "2025-02-28");
    }

    #[tokio::test]
    async fn one_failed_unit_does_not_affect_siblings() {
        let host = Arc::new(StubHost::default().with_pages(
            "acme/widget",
            vec![vec![
                pull_record(1, Some("2025-02-03T12:00:00Z")),
                pull_record(2, Some("2025-02-04T12:00:00Z")),
                pull_record(3, Some("2025-02-05T12:00:00Z")),
            ]],
        ));
        let model = Arc::new(StubModel::replying("Fine.").failing_on("PR #2: Change 2"));
        let ctx = context(host, model.clone());

        let report = run_pipeline(&ctx, "acme", &names(&["acme/widget"]), &february())
            .await
            .unwrap();

        let units = &report.unit_summaries["acme/widget"];
        assert_eq!(units.len(), 3);
        assert_eq!(units[&1_u64], "Fine.");
        assert!(units[&2_u64].starts_with("Error summarizing PR #2: "));
        assert_eq!(units[&3_u64], "Fine.");

        let requests = model.requests();
        let aggregate = requests
            .iter()
            .find(|request| request.model == "gpt-4")
            .expect("aggregate call should run");
        assert!(aggregate.user_prompt.contains("PR Summary 3:"));
        assert!(aggregate.user_prompt.contains("Error summarizing PR #2"));
        assert_eq!(report.repo_summaries["acme/widget"], "Fine.");
    }

    #[tokio::test]
    async fn every_valid_repository_gets_an_entry() {
        let host = Arc::new(
            StubHost::default()
                .with_pages(
                    "acme/widget",
                    vec![vec![pull_record(1, Some("2025-02-10T12:00:00Z"))]],
                )
                .with_not_found("acme/ghost"),
        );
        let model = Arc::new(StubModel::replying("Done."));
        let ctx = context(host, model.clone());

        let report = run_pipeline(
            &ctx,
            "acme",
            &names(&["acme/widget", "not-a-repo", "acme/empty", "acme/ghost"]),
            &february(),
        )
        .await
        .unwrap();

        for repo in ["acme/widget", "acme/empty", "acme/ghost"] {
            assert!(report.repo_pull_requests.contains_key(repo), "{repo}");
            assert!(report.repo_summaries.contains_key(repo), "{repo}");
            assert!(report.unit_summaries.contains_key(repo), "{repo}");
        }
        assert!(!report.repo_pull_requests.contains_key("not-a-repo"));
        assert_eq!(report.skipped, vec!["not-a-repo"]);
        assert_eq!(report.not_found, vec!["acme/ghost"]);
        assert_eq!(
            report.repo_summaries["acme/empty"],
            "No merged PRs found for acme/empty in this date range."
        );
        assert!(report.unit_summaries["acme/ghost"].is_empty());
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn unit_summary_keys_match_fetched_pull_requests() {
        let host = Arc::new(StubHost::default().with_pages(
            "acme/widget",
            vec![
                vec![
                    pull_record(10, Some("2025-02-20T12:00:00Z")),
                    pull_record(11, None),
                ],
                vec![pull_record(4, Some("2025-02-02T12:00:00Z"))],
            ],
        ));
        let ctx = context(host, Arc::new(StubModel::replying("ok")));

        let report = run_pipeline(&ctx, "acme", &names(&["acme/widget"]), &february())
            .await
            .unwrap();

        let fetched: Vec<u64> = report.repo_pull_requests["acme/widget"]
            .iter()
            .map(|pr| pr.number)
            .collect();
        assert_eq!(fetched, vec![10, 4]);
        let mut keyed: Vec<u64> = report.unit_summaries["acme/widget"]
            .keys()
            .copied()
            .collect();
        keyed.sort_unstable();
        assert_eq!(keyed, vec![4, 10]);
    }

    #[tokio::test]
    async fn repeated_pull_is_summarized_once() {
        let host = Arc::new(StubHost::default().with_pages(
            "acme/widget",
            vec![
                vec![
                    pull_record(5, Some("2025-02-05T10:00:00Z")),
                    pull_record(6, Some("2025-02-06T10:00:00Z")),
                ],
                vec![pull_record(6, Some("2025-02-06T10:00:00Z"))],
            ],
        ));
        let model = Arc::new(StubModel::replying("ok"));
        let ctx = context(host, model.clone());

        let report = run_pipeline(&ctx, "acme", &names(&["acme/widget"]), &february())
            .await
            .unwrap();

        let fetched: Vec<u64> = report.repo_pull_requests["acme/widget"]
            .iter()
            .map(|pr| pr.number)
            .collect();
        assert_eq!(fetched, vec![5, 6]);
        assert_eq!(report.unit_summaries["acme/widget"].len(), 2);
        // Two unit calls plus one aggregate call.
        assert_eq!(model.call_count(), 3);
        let aggregate = model
            .requests()
            .into_iter()
            .find(|request| request.model == "gpt-4")
            .expect("aggregate call should run");
        assert!(!aggregate.user_prompt.contains("PR Summary 3:"));
    }

    #[tokio::test]
    async fn host_failure_aborts_the_run() {
        let host = Arc::new(StubHost::default().with_failure("acme/broken"));
        let ctx = context(host, Arc::new(StubModel::replying("ok")));

        let err = run_pipeline(
            &ctx,
            "acme",
            &names(&["acme/fine", "acme/broken"]),
            &february(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::RepositoryHost(_)));
    }

    #[tokio::test]
    async fn rejects_missing_org_or_selection() {
        let ctx = context(
            Arc::new(StubHost::default()),
            Arc::new(StubModel::replying("ok")),
        );
        assert!(matches!(
            run_pipeline(&ctx, " ", &names(&["acme/widget"]), &february()).await,
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            run_pipeline(&ctx, "acme", &[], &february()).await,
            Err(AppError::InvalidInput(_))
        ));
    }
}
