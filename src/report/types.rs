use std::collections::BTreeMap;

use crate::model::PullRequestCounts;

/// Counts for one repository.
#[derive(Debug, Clone)]
pub struct RepositorySummary {
    /// Repository name
    pub name: String,
    /// Open/closed/merged tallies for its pull requests
    pub counts: PullRequestCounts,
}

/// Summary of every repository of one account.
#[derive(Debug)]
pub struct Report {
    /// Account label, e.g. "organization/acme"
    pub account: String,
    /// Per-repository counts, in fetched order
    pub repositories: Vec<RepositorySummary>,
    /// Sum over all repositories
    pub totals: PullRequestCounts,
    /// Per-author totals keyed by login; deleted accounts are grouped as "ghost"
    pub authors: BTreeMap<String, PullRequestCounts>,
}
