use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use super::{ApiError, GithubError};

pub const DEFAULT_ENDPOINT: &str = "https://api.github.com/graphql";

const USER_AGENT: &str = "pr-summary";

/// Executes a GraphQL document and returns the response `data` object.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, document: &str) -> Result<Value, GithubError>;
}

/// Transport that talks to the GitHub GraphQL endpoint over HTTPS.
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: String,
    token: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    #[instrument(skip_all, fields(endpoint = %self.endpoint))]
    async fn execute(&self, document: &str) -> Result<Value, GithubError> {
        debug!(query_bytes = document.len(), "sending GraphQL query");
        let response = self
            .client
            .post(&self.endpoint)
            .header("User-Agent", USER_AGENT)
            .bearer_auth(&self.token)
            .json(&json!({ "query": document }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), body_bytes = body.len(), "received GraphQL response");

        decode_response(status, &body)
    }
}

#[derive(Deserialize)]
struct Envelope {
    data: Option<Value>,
    errors: Option<Vec<ApiError>>,
    /// REST-style error message, sent with 401/403 responses.
    message: Option<String>,
}

/// Judge a fully buffered response. Any `errors` list fails the whole
/// response, discarding partial `data`.
fn decode_response(status: StatusCode, body: &str) -> Result<Value, GithubError> {
    let envelope: Envelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) if !status.is_success() => {
            let excerpt: String = body.trim().chars().take(200).collect();
            return Err(GithubError::Status {
                status: status.as_u16(),
                message: if excerpt.is_empty() {
                    reason(status)
                } else {
                    excerpt
                },
            });
        }
        Err(err) => return Err(GithubError::Decode(err)),
    };

    if let Some(errors) = envelope.errors {
        return Err(GithubError::Api(errors));
    }

    if !status.is_success() {
        return Err(GithubError::Status {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_else(|| reason(status)),
        });
    }

    envelope
        .data
        .ok_or_else(|| GithubError::MissingField("data".to_string()))
}

fn reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("unknown").to_string()
}
