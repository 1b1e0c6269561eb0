use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::query::Query;
use super::transport::Transport;
use super::GithubError;
use crate::model::MappingError;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    end_cursor: Option<String>,
    has_next_page: bool,
}

#[derive(Deserialize)]
struct Edge {
    node: Value,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Connection {
    edges: Vec<Edge>,
    page_info: PageInfo,
}

/// Cursor state for walking one paginated collection, one page per call.
pub struct Pages<'a> {
    transport: &'a dyn Transport,
    query: Query<'a>,
    cursor: Option<String>,
    exhausted: bool,
    fetched: u32,
    max_pages: Option<u32>,
}

impl<'a> Pages<'a> {
    /// `max_pages` of `None` walks until the server reports no further page.
    pub fn new(transport: &'a dyn Transport, query: Query<'a>, max_pages: Option<u32>) -> Self {
        Self {
            transport,
            query,
            cursor: None,
            exhausted: false,
            fetched: 0,
            max_pages,
        }
    }

    /// Fetch the next page of raw nodes, or `None` once the collection is exhausted.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Value>>, GithubError> {
        if self.exhausted {
            return Ok(None);
        }
        if let Some(limit) = self.max_pages {
            if self.fetched >= limit {
                return Err(GithubError::PageLimit(limit));
            }
        }

        let document = self.query.document(self.cursor.as_deref());
        let mut data = self.transport.execute(&document).await?;
        self.fetched += 1;

        let pointer = self.query.connection_pointer();
        let connection = data
            .pointer_mut(&pointer)
            .map(Value::take)
            .filter(|value| !value.is_null())
            .ok_or_else(|| GithubError::MissingField(pointer.trim_start_matches('/').replace('/', ".")))?;
        let connection: Connection =
            serde_json::from_value(connection).map_err(|source| MappingError {
                kind: "connection",
                source,
            })?;

        if connection.page_info.has_next_page {
            let cursor = connection
                .page_info
                .end_cursor
                .ok_or_else(|| GithubError::MissingField("pageInfo.endCursor".to_string()))?;
            self.cursor = Some(cursor);
        } else {
            self.exhausted = true;
        }

        debug!(
            kind = self.query.kind(),
            page = self.fetched,
            edges = connection.edges.len(),
            has_next_page = !self.exhausted,
            "fetched page"
        );

        Ok(Some(connection.edges.into_iter().map(|edge| edge.node).collect()))
    }
}

/// Walk every page of `query` and return the nodes in server order.
pub async fn fetch_all(
    transport: &dyn Transport,
    query: Query<'_>,
    max_pages: Option<u32>,
) -> Result<Vec<Value>, GithubError> {
    let mut pages = Pages::new(transport, query, max_pages);
    let mut nodes = Vec::new();
    while let Some(page) = pages.next_page().await? {
        nodes.extend(page);
    }
    Ok(nodes)
}
