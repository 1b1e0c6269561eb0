pub mod paginate;
pub mod query;
#[cfg(test)]
pub mod testing;
pub mod transport;

pub use transport::{HttpTransport, Transport};

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, info_span, instrument, Instrument};

use crate::model::{self, Account, MappingError, PullRequest, Repository};
use paginate::Pages;
use query::Query;

#[derive(Debug, Error)]
pub enum GithubError {
    #[error("GitHub API request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("GitHub API returned HTTP {status}: {message}")]
    Status { status: u16, message: String },

    #[error("GitHub API reported errors: {}", join_messages(.0))]
    Api(Vec<ApiError>),

    #[error("Failed to decode GitHub API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("GitHub API response is missing `{0}`")]
    MissingField(String),

    #[error(transparent)]
    Mapping(#[from] MappingError),

    #[error("Pagination stopped after {0} pages (github.max_pages)")]
    PageLimit(u32),
}

/// One entry of a GraphQL `errors` list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub path: Option<Vec<Value>>,
}

#[cfg(test)]
impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
            path: None,
        }
    }
}

fn join_messages(errors: &[ApiError]) -> String {
    errors.iter().map(describe).collect::<Vec<_>>().join("; ")
}

fn describe(error: &ApiError) -> String {
    let mut text = error.message.clone();
    if let Some(kind) = &error.kind {
        text.push_str(&format!(" ({kind})"));
    }
    if let Some(path) = &error.path {
        let segments: Vec<String> = path
            .iter()
            .map(|segment| match segment {
                Value::String(name) => name.clone(),
                other => other.to_string(),
            })
            .collect();
        text.push_str(&format!(" at {}", segments.join(".")));
    }
    text
}

/// Fetch every repository of `account` with its pull requests attached.
///
/// Repositories are walked page by page; each repository's pull requests are
/// fully paginated before the next repository is looked at. The first
/// failure aborts the whole walk.
#[instrument(skip_all, fields(account = %account))]
pub async fn fetch_repositories(
    transport: &dyn Transport,
    account: &Account,
    max_pages: Option<u32>,
) -> Result<Vec<Repository>, GithubError> {
    let mut pages = Pages::new(transport, Query::Repositories { account }, max_pages);
    let mut repositories = Vec::new();

    while let Some(page) = pages.next_page().await? {
        for node in page {
            let node = model::repository_node(node)?;
            let pull_requests = fetch_pull_requests(transport, &account.login, &node.name, max_pages)
                .instrument(info_span!("repository", name = %node.name))
                .await?;
            let repository = node.with_pull_requests(pull_requests);
            debug!(
                repository = repository.name(),
                id = repository.id(),
                pull_requests = repository.pull_requests().len(),
                "fetched pull requests"
            );
            repositories.push(repository);
        }
    }

    info!(repositories = repositories.len(), "fetched all repositories");
    Ok(repositories)
}

/// Fetch every pull request of `owner/repository`, in server order.
pub async fn fetch_pull_requests(
    transport: &dyn Transport,
    owner: &str,
    repository: &str,
    max_pages: Option<u32>,
) -> Result<Vec<PullRequest>, GithubError> {
    let nodes = paginate::fetch_all(transport, Query::PullRequests { owner, repository }, max_pages).await?;
    nodes
        .into_iter()
        .map(|node| model::pull_request(node).map_err(GithubError::from))
        .collect()
}
