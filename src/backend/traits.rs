// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RetrieveError;
use crate::retrieve::QueryDocument;

/// Status code of a successful search.
pub const STATUS_OK: u16 = 200;

/// One document returned by a search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    /// Document id (`_id`)
    pub id: String,
    /// Stored document (`_source`)
    pub source: Value,
    /// Sort values, one per sort field, in sort order
    pub sort: Vec<Value>,
}

/// Raw outcome of a search request.
///
/// A non-200 `status` is still returned as `Ok` by backends; the caller
/// decides how to fail and `meta` carries the engine's diagnostic payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResponse {
    pub status: u16,
    pub hits: Vec<SearchHit>,
    /// Total matching documents, independent of `size` and `search_after`
    pub total: u64,
    pub meta: Value,
}

impl SearchResponse {
    pub fn ok(hits: Vec<SearchHit>, total: u64) -> Self {
        Self {
            status: STATUS_OK,
            hits,
            total,
            meta: Value::Null,
        }
    }

    pub fn failed(status: u16, meta: Value) -> Self {
        Self {
            status,
            hits: Vec::new(),
            total: 0,
            meta,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Search engine collaborator.
///
/// Connection lifetime belongs to the implementation; the retrieve API only
/// borrows a handle per call.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    /// Run a query against a named index.
    async fn search(&self, index: &str, query: &QueryDocument) -> Result<SearchResponse, RetrieveError>;

    /// Create an index from a `{settings, mappings}` body.
    async fn create_index(&self, index: &str, config: &Value) -> Result<(), RetrieveError>;

    async fn delete_index(&self, index: &str) -> Result<(), RetrieveError>;

    /// Store a document, returning its generated id.
    async fn index_document(&self, index: &str, document: &Value) -> Result<String, RetrieveError>;

    /// Make every stored document visible to search.
    /// Default implementation is a no-op for backends that index synchronously.
    async fn refresh(&self, _index: &str) -> Result<(), RetrieveError> {
        Ok(())
    }
}
