use serde::{Deserialize, Serialize};

/// Whether the queried GitHub account is a user or an organization.
/// Determines the root field of the repository query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    User,
    Organization,
}

impl AccountType {
    /// GraphQL root field for this account type.
    pub fn root_field(self) -> &'static str {
        match self {
            AccountType::User => "user",
            AccountType::Organization => "organization",
        }
    }
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.root_field())
    }
}

/// The account whose repositories are summarized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub account_type: AccountType,
    pub login: String,
}

impl Account {
    pub fn new(account_type: AccountType, login: impl Into<String>) -> Self {
        Self {
            account_type,
            login: login.into(),
        }
    }
}

impl std::fmt::Display for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.account_type, self.login)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PullRequestState {
    Open,
    Closed,
    Merged,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mergeable {
    Mergeable,
    Conflicting,
    Unknown,
}

/// A pull request snapshot as of fetch time.
///
/// The same shape is used for the cache file, so field names follow the
/// GraphQL camelCase spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullRequest {
    pub id: String,
    pub number: u64,
    pub title: String,
    pub body: String,
    /// Login of the author; empty when the account no longer exists.
    pub author_login: String,
    pub base_ref_name: String,
    pub additions: u64,
    pub deletions: u64,
    pub changed_files: u64,
    pub state: PullRequestState,
    pub created_at: String,
    pub closed: bool,
    pub closed_at: Option<String>,
    pub merged: bool,
    pub merged_at: Option<String>,
    pub mergeable: Mergeable,
}

/// Repository metadata from one edge of the repository query, before its
/// pull requests are known.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepositoryNode {
    pub id: String,
    pub name: String,
}

impl RepositoryNode {
    /// Complete the repository once its pull-request pagination has finished.
    pub fn with_pull_requests(self, pull_requests: Vec<PullRequest>) -> Repository {
        Repository {
            id: self.id,
            name: self.name,
            pull_requests,
        }
    }
}

/// A repository together with every pull request fetched for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Repository {
    id: String,
    name: String,
    pull_requests: Vec<PullRequest>,
}

impl Repository {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pull_requests(&self) -> &[PullRequest] {
        &self.pull_requests
    }

    pub fn counts(&self) -> PullRequestCounts {
        PullRequestCounts::from_pull_requests(&self.pull_requests)
    }
}

/// Open/closed/merged tallies over a set of pull requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PullRequestCounts {
    pub open: usize,
    pub closed: usize,
    pub merged: usize,
    pub total: usize,
}

impl PullRequestCounts {
    pub fn from_pull_requests<'a>(pull_requests: impl IntoIterator<Item = &'a PullRequest>) -> Self {
        let mut counts = Self::default();
        for pr in pull_requests {
            counts.record(pr);
        }
        counts
    }

    /// Add a single pull request. Merged pull requests are also closed, so
    /// they count towards both tallies.
    pub fn record(&mut self, pr: &PullRequest) {
        self.total += 1;
        if pr.closed {
            self.closed += 1;
        } else {
            self.open += 1;
        }
        if pr.merged {
            self.merged += 1;
        }
    }
}

impl std::ops::AddAssign for PullRequestCounts {
    fn add_assign(&mut self, other: Self) {
        self.open += other.open;
        self.closed += other.closed;
        self.merged += other.merged;
        self.total += other.total;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_root_field() {
        assert_eq!(AccountType::User.root_field(), "user");
        assert_eq!(AccountType::Organization.root_field(), "organization");
        assert_eq!(AccountType::Organization.to_string(), "organization");
    }

    #[test]
    fn test_account_display() {
        let account = Account::new(AccountType::User, "octocat");
        assert_eq!(account.to_string(), "user/octocat");
    }

    #[test]
    fn test_repository_node_builds_repository() {
        let node = RepositoryNode {
            id: "R_1".to_string(),
            name: "widgets".to_string(),
        };
        let repo = node.with_pull_requests(vec![]);
        assert_eq!(repo.id(), "R_1");
        assert_eq!(repo.name(), "widgets");
        assert!(repo.pull_requests().is_empty());
        assert_eq!(repo.counts(), PullRequestCounts::default());
    }

    #[test]
    fn test_counts_add_assign() {
        let mut total = PullRequestCounts {
            open: 1,
            closed: 2,
            merged: 1,
            total: 3,
        };
        total += PullRequestCounts {
            open: 4,
            closed: 0,
            merged: 0,
            total: 4,
        };
        assert_eq!(total.open, 5);
        assert_eq!(total.closed, 2);
        assert_eq!(total.merged, 1);
        assert_eq!(total.total, 7);
    }
}
