use std::fmt::Write as _;

use clap::ValueEnum;

use crate::domain::pull_request::PullRequest;
use crate::domain::summary::PipelineReport;
use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

pub fn render(report: &PipelineReport, format: ReportFormat) -> AppResult<String> {
    match format {
        ReportFormat::Text => Ok(render_text(report)),
        ReportFormat::Json => serde_json::to_string_pretty(report)
            .map_err(|err| AppError::Report(format!("failed to encode report: {err}"))),
    }
}

pub fn render_text(report: &PipelineReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Summary for {} ({} - {})",
        report.org, report.start_date, report.end_date
    );

    for (repo, summary) in &report.repo_summaries {
        let _ = writeln!(out, "\n## {repo}\n");
        if report.not_found.contains(repo) {
            let _ = writeln!(out, "Repository not found or not accessible.\n");
        }
        let _ = writeln!(out, "Final Summary:\n{summary}");

        let pulls = report
            .repo_pull_requests
            .get(repo)
            .map(Vec::as_slice)
            .unwrap_or_default();
        if pulls.is_empty() {
            continue;
        }
        let _ = writeln!(out, "\nPull Requests:");
        let units = report.unit_summaries.get(repo);
        for pr in pulls {
            let unit = units.and_then(|units| units.get(&pr.number));
            write_pull_request(&mut out, pr, unit.map(String::as_str));
        }
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped malformed repository identifiers:");
        for identifier in &report.skipped {
            let _ = writeln!(out, "• {identifier}");
        }
    }
    out
}

fn write_pull_request(out: &mut String, pr: &PullRequest, summary: Option<&str>) {
    let _ = writeln!(out, "\nPR #{}: {}", pr.number, pr.title);
    let _ = writeln!(out, "Merged At: {}", pr.merged_at);
    let _ = writeln!(out, "Author: {}", pr.author);
    if let Some(summary) = summary {
        let _ = writeln!(out, "Summary:\n{summary}");
    }
    if !pr.commits.is_empty() {
        let _ = writeln!(out, "Commits:");
        for commit in &pr.commits {
            let headline = commit.message.lines().next().unwrap_or_default();
            let _ = writeln!(out, "• {}: {headline}", commit.author);
        }
    }
    if !pr.files.is_empty() {
        let _ = writeln!(out, "Files Changed:");
        for file in &pr.files {
            let changes = file
                .changes
                .map(|count| count.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let _ = writeln!(out, "• {} ({changes} changes)", file.filename);
        }
    }
}
