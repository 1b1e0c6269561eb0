use serde_json::Value;

use crate::model::Account;

/// Items requested per page. GitHub's GraphQL maximum for `first`.
pub const PAGE_SIZE: u32 = 100;

/// The two paginated collections this tool walks.
#[derive(Debug, Clone, Copy)]
pub enum Query<'a> {
    /// Repositories owned by a user or organization.
    Repositories { account: &'a Account },
    /// Pull requests of a single repository.
    PullRequests { owner: &'a str, repository: &'a str },
}

impl Query<'_> {
    /// Short label used in logs and errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Query::Repositories { .. } => "repositories",
            Query::PullRequests { .. } => "pull requests",
        }
    }

    /// JSON pointer from the response `data` object to the paginated connection.
    pub fn connection_pointer(&self) -> String {
        match self {
            Query::Repositories { account } => {
                format!("/{}/repositories", account.account_type.root_field())
            }
            Query::PullRequests { .. } => "/repository/pullRequests".to_string(),
        }
    }

    /// Build the full query document for one page, starting after `cursor`.
    pub fn document(&self, cursor: Option<&str>) -> String {
        let mut pagination = format!("first: {PAGE_SIZE}");
        if let Some(cursor) = cursor {
            pagination.push_str(&format!(", after: {}", string_literal(cursor)));
        }

        match self {
            Query::Repositories { account } => format!(
                r#"query {{
  {root}(login: {login}) {{
    repositories(ownerAffiliations: OWNER, {pagination}) {{
      edges {{
        node {{
          id
          name
        }}
      }}
      pageInfo {{
        endCursor
        hasNextPage
      }}
    }}
  }}
}}"#,
                root = account.account_type.root_field(),
                login = string_literal(&account.login),
            ),
            Query::PullRequests { owner, repository } => format!(
                r#"query {{
  repository(owner: {owner}, name: {name}) {{
    pullRequests({pagination}) {{
      edges {{
        node {{
          id
          number
          title
          body
          baseRefName
          author {{
            login
          }}
          additions
          deletions
          changedFiles
          state
          createdAt
          closed
          closedAt
          merged
          mergedAt
          mergeable
        }}
      }}
      pageInfo {{
        endCursor
        hasNextPage
      }}
    }}
  }}
}}"#,
                owner = string_literal(owner),
                name = string_literal(repository),
            ),
        }
    }
}

/// Quote a value as a GraphQL string literal. JSON string escaping is a
/// subset of what GraphQL accepts.
fn string_literal(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}
