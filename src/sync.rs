use thiserror::Error;
use tracing::{info, instrument};

use crate::cache::{CacheError, CacheStore};
use crate::github::{self, GithubError, Transport};
use crate::model::{Account, Repository};

#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Github(#[from] GithubError),

    #[error(transparent)]
    Cache(#[from] CacheError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SyncOptions {
    /// Ignore any cached snapshot and fetch from the API.
    pub refresh: bool,
    /// Page ceiling per paginated collection.
    pub max_pages: Option<u32>,
}

/// Return the repositories of `account`, from the cache when present,
/// otherwise from the API (and then cached).
///
/// A failed fetch writes nothing: the cache only ever holds complete runs.
#[instrument(skip_all, fields(account = %account, refresh = options.refresh))]
pub async fn load_or_fetch(
    cache: &CacheStore,
    transport: &dyn Transport,
    account: &Account,
    options: SyncOptions,
) -> Result<Vec<Repository>, SyncError> {
    if !options.refresh {
        if let Some(repositories) = cache.load(account)? {
            info!(repositories = repositories.len(), "using cached repositories");
            return Ok(repositories);
        }
    }

    info!("fetching repositories from GitHub");
    let repositories = github::fetch_repositories(transport, account, options.max_pages).await?;
    cache.save(account, &repositories)?;
    info!(path = %cache.path_for(account).display(), "cached repositories");
    Ok(repositories)
}
