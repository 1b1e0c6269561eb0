//! In-memory transport and page fixtures for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{GithubError, Transport};

/// Replays canned responses in order and records every query it receives.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, GithubError>>>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = Result<Value, GithubError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, document: &str) -> Result<Value, GithubError> {
        self.requests.lock().unwrap().push(document.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("transport called more times than scripted")
    }
}

fn page_info(end_cursor: Option<&str>) -> Value {
    json!({
        "endCursor": end_cursor.unwrap_or("last"),
        "hasNextPage": end_cursor.is_some(),
    })
}

/// `data` object for one page of repositories under `root` (`user` or `organization`).
pub fn repositories_page(root: &str, names: &[&str], end_cursor: Option<&str>) -> Value {
    let edges: Vec<Value> = names
        .iter()
        .map(|name| json!({ "node": { "id": format!("R_{name}"), "name": name } }))
        .collect();
    let mut data = serde_json::Map::new();
    data.insert(
        root.to_string(),
        json!({ "repositories": { "edges": edges, "pageInfo": page_info(end_cursor) } }),
    );
    Value::Object(data)
}

/// `data` object for one page of pull requests.
pub fn pull_requests_page(nodes: Vec<Value>, end_cursor: Option<&str>) -> Value {
    let edges: Vec<Value> = nodes.into_iter().map(|node| json!({ "node": node })).collect();
    json!({
        "repository": {
            "pullRequests": { "edges": edges, "pageInfo": page_info(end_cursor) }
        }
    })
}
