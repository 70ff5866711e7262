use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::pull_request::PullRequest;

/// PR number to generated summary, scoped to one repository.
pub type UnitSummaries = BTreeMap<u64, String>;

/// Everything produced for one repository during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepoDigest {
    pub full_name: String,
    pub not_found: bool,
    pub pull_requests: Vec<PullRequest>,
    pub unit_summaries: UnitSummaries,
    pub summary: String,
}

/// Result of one pipeline run. Keyed maps mirror what a renderer consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub org: String,
    pub start_date: String,
    pub end_date: String,
    pub repo_pull_requests: BTreeMap<String, Vec<PullRequest>>,
    pub repo_summaries: BTreeMap<String, String>,
    pub unit_summaries: BTreeMap<String, UnitSummaries>,
    pub not_found: Vec<String>,
    pub skipped: Vec<String>,
}

impl PipelineReport {
    pub fn insert(&mut self, digest: RepoDigest) {
        if digest.not_found {
            self.not_found.push(digest.full_name.clone());
        }
        self.repo_pull_requests
            .insert(digest.full_name.clone(), digest.pull_requests);
        self.repo_summaries
            .insert(digest.full_name.clone(), digest.summary);
        self.unit_summaries
            .insert(digest.full_name, digest.unit_summaries);
    }
}
