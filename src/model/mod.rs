pub mod types;

pub use types::{
    Account, AccountType, Mergeable, PullRequest, PullRequestCounts, PullRequestState, Repository,
    RepositoryNode,
};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Malformed {kind} node: {source}")]
pub struct MappingError {
    pub kind: &'static str,
    #[source]
    pub source: serde_json::Error,
}

#[derive(Deserialize)]
struct Author {
    login: String,
}

/// Raw pull-request node as returned by the GraphQL API.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PullRequestNode {
    id: String,
    number: u64,
    title: String,
    body: String,
    author: Option<Author>,
    base_ref_name: String,
    additions: u64,
    deletions: u64,
    changed_files: u64,
    state: PullRequestState,
    created_at: String,
    closed: bool,
    closed_at: Option<String>,
    merged: bool,
    merged_at: Option<String>,
    mergeable: Mergeable,
}

/// Map a raw repository node into its metadata.
pub fn repository_node(node: Value) -> Result<RepositoryNode, MappingError> {
    serde_json::from_value(node).map_err(|source| MappingError {
        kind: "repository",
        source,
    })
}

/// Map a raw pull-request node.
///
/// A missing or null `author` (deleted account) becomes an empty login;
/// every other field is required.
pub fn pull_request(node: Value) -> Result<PullRequest, MappingError> {
    let raw: PullRequestNode = serde_json::from_value(node).map_err(|source| MappingError {
        kind: "pull request",
        source,
    })?;

    Ok(PullRequest {
        id: raw.id,
        number: raw.number,
        title: raw.title,
        body: raw.body,
        author_login: raw.author.map(|author| author.login).unwrap_or_default(),
        base_ref_name: raw.base_ref_name,
        additions: raw.additions,
        deletions: raw.deletions,
        changed_files: raw.changed_files,
        state: raw.state,
        created_at: raw.created_at,
        closed: raw.closed,
        closed_at: raw.closed_at,
        merged: raw.merged,
        merged_at: raw.merged_at,
        mergeable: raw.mergeable,
    })
}
