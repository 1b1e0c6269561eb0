//! On-disk snapshot of an account's repositories.
//!
//! One JSON file per `(account type, login)` pair. Entries never expire: once
//! written, a snapshot is served until it is deleted by hand or replaced by a
//! `--refresh` run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, instrument};

use crate::model::{Account, Repository};

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Failed to access cache file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Cache file {} is corrupt: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize cache snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File backing the entry for `account`.
    pub fn path_for(&self, account: &Account) -> PathBuf {
        let login: String = account
            .login
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{}-{}.json", account.account_type, login))
    }

    /// Read the snapshot for `account`, or `None` if it was never saved.
    #[instrument(skip_all, fields(account = %account))]
    pub fn load(&self, account: &Account) -> Result<Option<Vec<Repository>>, CacheError> {
        let path = self.path_for(account);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no cache entry");
                return Ok(None);
            }
            Err(source) => return Err(CacheError::Io { path, source }),
        };

        let repositories: Vec<Repository> = serde_json::from_str(&contents)
            .map_err(|source| CacheError::Decode { path: path.clone(), source })?;
        debug!(path = %path.display(), repositories = repositories.len(), "loaded cache entry");
        Ok(Some(repositories))
    }

    /// Replace the snapshot for `account`, creating the cache directory if needed.
    ///
    /// The snapshot is written to a temporary sibling and renamed into place
    /// so `load` never observes a half-written file.
    #[instrument(skip_all, fields(account = %account, repositories = repositories.len()))]
    pub fn save(&self, account: &Account, repositories: &[Repository]) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(account);
        let json = serde_json::to_string_pretty(repositories)?;
        let tmp = path.with_extension("json.tmp");
        write_then_rename(&tmp, &path, json.as_bytes())?;
        debug!(path = %path.display(), bytes = json.len(), "wrote cache entry");
        Ok(())
    }
}

fn write_then_rename(tmp: &Path, path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    fs::write(tmp, bytes).map_err(|source| CacheError::Io {
        path: tmp.to_path_buf(),
        source,
    })?;
    fs::rename(tmp, path).map_err(|source| CacheError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::pull_request_json;
    use crate::model::{self, AccountType, RepositoryNode};

    fn sample_repositories() -> Vec<Repository> {
        let mut without_author = pull_request_json("p2", true, false);
        without_author["author"] = serde_json::Value::Null;
        vec![
            RepositoryNode {
                id: "R_1".to_string(),
                name: "r1".to_string(),
            }
            .with_pull_requests(vec![
                model::pull_request(pull_request_json("p1", true, true)).unwrap(),
                model::pull_request(without_author).unwrap(),
            ]),
            RepositoryNode {
                id: "R_2".to_string(),
                name: "r2".to_string(),
            }
            .with_pull_requests(vec![]),
        ]
    }

    #[test]
    fn test_load_missing_entry_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let account = Account::new(AccountType::User, "octocat");
        assert!(store.load(&account).unwrap().is_none());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path().join("nested").join("cache"));
        let account = Account::new(AccountType::Organization, "acme");
        let repositories = sample_repositories();

        store.save(&account, &repositories).unwrap();
        let loaded = store.load(&account).unwrap().unwrap();

        assert_eq!(loaded, repositories);
        assert!(!store.path_for(&account).with_extension("json.tmp").exists());
    }

    #[test]
    fn test_save_overwrites_previous_entry() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let account = Account::new(AccountType::Organization, "acme");

        store.save(&account, &sample_repositories()).unwrap();
        store.save(&account, &[]).unwrap();

        assert_eq!(store.load(&account).unwrap().unwrap(), Vec::<Repository>::new());
    }

    #[test]
    fn test_keys_are_separate_per_account_type() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let org = Account::new(AccountType::Organization, "acme");
        let user = Account::new(AccountType::User, "acme");

        store.save(&org, &sample_repositories()).unwrap();

        assert!(store.load(&user).unwrap().is_none());
        assert_eq!(store.path_for(&org).file_name().unwrap(), "organization-acme.json");
        assert_eq!(store.path_for(&user).file_name().unwrap(), "user-acme.json");
    }

    #[test]
    fn test_login_is_sanitized_in_path() {
        let store = CacheStore::new("/tmp/cache");
        let account = Account::new(AccountType::User, "../etc/passwd");
        assert_eq!(
            store.path_for(&account),
            PathBuf::from("/tmp/cache/user-.._etc_passwd.json")
        );
    }

    #[test]
    fn test_corrupt_entry_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let account = Account::new(AccountType::User, "octocat");
        fs::write(store.path_for(&account), "[{\"id\": 1").unwrap();

        let err = store.load(&account).unwrap_err();
        assert!(matches!(err, CacheError::Decode { .. }));
    }

    #[test]
    fn test_cache_file_uses_camel_case() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::new(dir.path());
        let account = Account::new(AccountType::Organization, "acme");
        store.save(&account, &sample_repositories()).unwrap();

        let raw = fs::read_to_string(store.path_for(&account)).unwrap();
        assert!(raw.contains("\"pullRequests\""));
        assert!(raw.contains("\"authorLogin\": \"\""));
    }
}
