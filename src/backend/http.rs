// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! HTTP search backend
//!
//! Talks to an Elasticsearch-compatible node over its REST API:
//!
//! | Operation        | Request                  |
//! |------------------|--------------------------|
//! | `search`         | `POST /{index}/_search`  |
//! | `create_index`   | `PUT /{index}`           |
//! | `delete_index`   | `DELETE /{index}`        |
//! | `index_document` | `POST /{index}/_doc`     |
//! | `refresh`        | `POST /{index}/_refresh` |

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::traits::{SearchBackend, SearchHit, SearchResponse};
use crate::config::RetrieveConfig;
use crate::error::RetrieveError;
use crate::retrieve::QueryDocument;

static DEFAULT_BACKEND: OnceLock<HttpBackend> = OnceLock::new();

/// Shared backend built from [`RetrieveConfig::from_env`] on first use.
///
/// Lives for the rest of the process; there is no teardown.
pub fn default_backend() -> Result<&'static HttpBackend, RetrieveError> {
    if let Some(backend) = DEFAULT_BACKEND.get() {
        return Ok(backend);
    }
    let backend = HttpBackend::new(&RetrieveConfig::from_env())?;
    info!(url = %backend.base_url(), "Search backend initialized");
    // A concurrent first call may have won the race; either instance is equivalent.
    Ok(DEFAULT_BACKEND.get_or_init(|| backend))
}

#[derive(Debug, Deserialize)]
struct RawSearchResponse {
    hits: RawHits,
}

#[derive(Debug, Deserialize)]
struct RawHits {
    #[serde(default)]
    total: Option<RawTotal>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// `hits.total` is a bare number on old nodes and `{value, relation}` since 7.x.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTotal {
    Count(u64),
    Object { value: u64 },
}

impl RawTotal {
    fn value(&self) -> u64 {
        match self {
            RawTotal::Count(n) | RawTotal::Object { value: n } => *n,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Value,
    #[serde(default)]
    sort: Vec<Value>,
}

impl From<RawHit> for SearchHit {
    fn from(raw: RawHit) -> Self {
        Self {
            id: raw.id,
            source: raw.source,
            sort: raw.sort,
        }
    }
}

pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    pub fn new(config: &RetrieveConfig) -> Result<Self, RetrieveError> {
        Self::with_base_url(
            config.node_url(),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RetrieveError> {
        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| RetrieveError::Transport(format!("invalid node url '{raw}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(RetrieveError::Transport(format!("invalid node url '{raw}'")));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `{base}/{index}[/{endpoint}]` with the index name as one encoded path segment.
    fn url(&self, index: &str, endpoint: Option<&str>) -> Result<Url, RetrieveError> {
        validate_index_name(index)?;
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| RetrieveError::Transport(format!("invalid node url '{}'", self.base_url)))?
            .pop_if_empty()
            .push(index)
            .extend(endpoint);
        Ok(url)
    }

    /// Send a request and return status plus parsed body.
    /// Bodies that are not JSON come back as a JSON string.
    async fn send(
        &self,
        method: Method,
        index: &str,
        endpoint: Option<&str>,
        body: Option<&Value>,
    ) -> Result<(StatusCode, Value), RetrieveError> {
        let mut request = self.client.request(method, self.url(index, endpoint)?);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };
        Ok((status, body))
    }

    /// Like [`send`](Self::send) but non-success statuses become errors.
    async fn send_checked(
        &self,
        method: Method,
        index: &str,
        endpoint: Option<&str>,
        body: Option<&Value>,
    ) -> Result<Value, RetrieveError> {
        let (status, body) = self.send(method, index, endpoint, body).await?;
        if !status.is_success() {
            warn!(index = %index, endpoint = ?endpoint, status = status.as_u16(), "Search backend request failed");
            return Err(RetrieveError::Backend {
                status: status.as_u16(),
                meta: body,
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl SearchBackend for HttpBackend {
    async fn search(&self, index: &str, query: &QueryDocument) -> Result<SearchResponse, RetrieveError> {
        let body = serde_json::to_value(query)
            .map_err(|e| RetrieveError::Transport(format!("failed to encode query: {e}")))?;
        let (status, body) = self
            .send(Method::POST, index, Some("_search"), Some(&body))
            .await?;

        if !status.is_success() {
            return Ok(SearchResponse::failed(status.as_u16(), body));
        }

        let raw: RawSearchResponse = serde_json::from_value(body)
            .map_err(|e| RetrieveError::Transport(format!("undecodable search response: {e}")))?;
        let total = raw.hits.total.as_ref().map_or(0, RawTotal::value);
        let hits: Vec<SearchHit> = raw.hits.hits.into_iter().map(SearchHit::from).collect();

        debug!(index = %index, hits = hits.len(), total, "Search completed");
        Ok(SearchResponse::ok(hits, total))
    }

    async fn create_index(&self, index: &str, config: &Value) -> Result<(), RetrieveError> {
        self.send_checked(Method::PUT, index, None, Some(config)).await?;
        info!(index = %index, "Index created");
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), RetrieveError> {
        self.send_checked(Method::DELETE, index, None, None).await?;
        info!(index = %index, "Index deleted");
        Ok(())
    }

    async fn index_document(&self, index: &str, document: &Value) -> Result<String, RetrieveError> {
        let body = self
            .send_checked(Method::POST, index, Some("_doc"), Some(document))
            .await?;
        body.get("_id")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| RetrieveError::Transport("index response carries no _id".into()))
    }

    async fn refresh(&self, index: &str) -> Result<(), RetrieveError> {
        self.send_checked(Method::POST, index, Some("_refresh"), None)
            .await
            .map(|_| ())
    }
}

/// Index names travel as a single path segment. Names that would address a
/// different endpoint are refused before any request is built.
fn validate_index_name(index: &str) -> Result<(), RetrieveError> {
    let invalid = index.is_empty()
        || index == "."
        || index == ".."
        || index.starts_with('_')
        || index
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '?' | '#' | '"' | '<' | '>' | '|') || c.is_whitespace());
    if invalid {
        return Err(RetrieveError::InvalidIndexName(index.to_string()));
    }
    Ok(())
}
