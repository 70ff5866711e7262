use tracing::warn;

use crate::context::AppContext;
use crate::domain::pull_request::PullRequest;
use crate::services::GenerationRequest;

const UNIT_SYSTEM_PROMPT: &str = "You are a software engineering summarizer.";
const UNIT_MAX_TOKENS: u32 = 1000;
const UNIT_TEMPERATURE: f64 = 0.0;

const AGGREGATE_SYSTEM_PROMPT: &str = "You are an expert summarizer.";
const AGGREGATE_MAX_TOKENS: u32 = 500;
const AGGREGATE_TEMPERATURE: f64 = 0.7;

pub fn no_merged_prs_message(repo: &str) -> String {
    format!("No merged PRs found for {repo} in this date range.")
}

pub fn unit_prompt(repo: &str, pr: &PullRequest) -> String {
    let commit_lines = pr
        .commits
        .iter()
        .map(|commit| format!("- {} (by {})", commit.message, commit.author))
        .collect::<Vec<_>>()
        .join("\n");
    let file_lines = pr
        .files
        .iter()
        .map(|file| {
            let changes = file
                .changes
                .map(|count| count.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            format!(
                "- {} [{}, {} changes]",
                file.filename,
                file.status.as_str(),
                changes
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an AI assistant that summarizes a single pull request.\n\n\
         Repository: {repo}\n\
         PR #{number}: {title} (merged {merged_at} by {author})\n\n\
         Commits:\n{commit_lines}\n\n\
         Files Changed:\n{file_lines}\n\n\
         Provide a concise (2-4 sentences) summary of what changed and why.",
        number = pr.number,
        title = pr.title,
        merged_at = pr.merged_at,
        author = pr.author,
    )
}

pub fn aggregate_prompt(repo: &str, summaries: &[String]) -> String {
    let combined = summaries
        .iter()
        .enumerate()
        .map(|(index, summary)| format!("PR Summary {}:\n{summary}\n", index + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an AI that creates an overall summary for {repo}.\n\n\
         The following are partial summaries of multiple pull requests:\n\n\
         {combined}\n\n\
         Please combine them into a concise overall summary (5-6 sentences max)."
    )
}

/// Never fails: a generation error becomes a placeholder naming the PR.
pub async fn summarize_unit(ctx: &AppContext, repo: &str, pr: &PullRequest) -> String {
    let request = GenerationRequest {
        model: ctx.config.unit_model.clone(),
        system_prompt: UNIT_SYSTEM_PROMPT.to_string(),
        user_prompt: unit_prompt(repo, pr),
        max_output_tokens: UNIT_MAX_TOKENS,
        temperature: UNIT_TEMPERATURE,
    };
    match ctx.language_model.generate(&request).await {
        Ok(text) => text.trim().to_string(),
        Err(err) => {
            warn!(%repo, pr = pr.number, error = %err, "pull request summary failed");
            format!("Error summarizing PR #{}: {err}", pr.number)
        }
    }
}

/// Reduces unit summaries to one narrative. Zero or one summary never reaches
/// the model.
pub async fn summarize_aggregate(ctx: &AppContext, repo: &str, summaries: &[String]) -> String {
    match summaries {
        [] => return no_merged_prs_message(repo),
        [only] => return only.clone(),
        _ => {}
    }

    let request = GenerationRequest {
        model: ctx.config.aggregate_model.clone(),
        system_prompt: AGGREGATE_SYSTEM_PROMPT.to_string(),
        user_prompt: aggregate_prompt(repo, summaries),
        max_output_tokens: AGGREGATE_MAX_TOKENS,
        temperature: AGGREGATE_TEMPERATURE,
    };
    match ctx.language_model.generate(&request).await {
        Ok(text) => text.trim().to_string(),
        Err(err) => {
            warn!(%repo, error = %err, "repository summary failed");
            format!("Error generating final summary: {err}")
        }
    }
}
