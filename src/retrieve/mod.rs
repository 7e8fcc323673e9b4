// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Cursor-paginated retrieval
//!
//! # Architecture
//!
//! ```text
//! retrieve(backend, params)
//!       │
//!       ├─→ compile_filter(filters)          ─→ MalformedFilterTree?
//!       ├─→ search_clause(queryString)       (optional, scoring)
//!       ├─→ SortKey(orderBy + _id desc)
//!       ├─→ cursor.search_after(sort key)    ─→ MalformedCursor?
//!       │
//!       ├─→ backend.search(index, query)     ─→ Backend / Transport?
//!       │
//!       └─→ Page { items, pageInfo { endCursor?, size, total } }
//! ```
//!
//! Errors before the request is sent never reach the backend.

mod cursor;
mod request;
mod types;

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::backend::{default_backend, SearchBackend, SearchHit};
use crate::error::{Result, RetrieveError};
use crate::filter::{compile_filter, FilterNode};
use crate::metrics::{self, LatencyTimer};

pub use cursor::{sanitize_sort_value, Cursor, LONG_MIN_SENTINEL, MAX_SAFE_INTEGER};
pub use request::{search_clause, QueryDocument, SortField, SortKey, DOCUMENT_ID_FIELD, SEARCH_FIELDS};
pub use types::{Direction, OrderBy, Page, PageInfo};

/// Page size when the caller gives none.
pub const DEFAULT_LIMIT: usize = 25;

fn default_limit() -> usize { DEFAULT_LIMIT }

/// Input of a [`retrieve`] call.
///
/// Deserializes from the camelCase request shape:
///
/// ```json
/// {
///   "indexName": "items",
///   "queryString": "awesome",
///   "filters": {"attributeName": "number", "op": "and", "filters": [{"op": ">", "value": 3}]},
///   "orderBy": [{"number": "asc"}],
///   "cursor": {"number.retrieve": 4, "_id": "Xk3fZ4oB"},
///   "limit": 10
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrieveParams {
    pub index_name: String,
    /// Free-text query; empty means no free-text search
    #[serde(default)]
    pub query_string: Option<String>,
    #[serde(default)]
    pub filters: Option<FilterNode>,
    #[serde(default)]
    pub order_by: Vec<OrderBy>,
    /// `endCursor` of the previous page
    #[serde(default)]
    pub cursor: Option<Cursor>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl RetrieveParams {
    pub fn new(index_name: impl Into<String>) -> Self {
        Self {
            index_name: index_name.into(),
            query_string: None,
            filters: None,
            order_by: Vec::new(),
            cursor: None,
            limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn query(mut self, query_string: impl Into<String>) -> Self {
        self.query_string = Some(query_string.into());
        self
    }

    #[must_use]
    pub fn filters(mut self, filters: FilterNode) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    #[must_use]
    pub fn cursor(mut self, cursor: Option<Cursor>) -> Self {
        self.cursor = cursor;
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }
}

/// Assemble the request body and the sort key it was built with.
///
/// Fails with [`RetrieveError::MalformedFilterTree`] or
/// [`RetrieveError::MalformedCursor`]; nothing here touches the network.
pub fn build_query(params: &RetrieveParams) -> Result<(QueryDocument, SortKey)> {
    let filter = compile_filter(params.filters.as_ref())?;
    let search = params
        .query_string
        .as_deref()
        .filter(|q| !q.trim().is_empty())
        .map(search_clause);
    let sort = SortKey::new(&params.order_by);
    let search_after = params
        .cursor
        .as_ref()
        .map(|c| c.search_after(&sort))
        .transpose()?;

    let query = QueryDocument::build(filter, search, &sort, fetch_size(params.limit), search_after);
    Ok((query, sort))
}

/// One hit past the page tells whether another page exists.
fn fetch_size(limit: usize) -> usize {
    if limit == 0 {
        0
    } else {
        limit + 1
    }
}

/// Fetch one page of `Item`s from `params.index_name`.
///
/// # Example
///
/// ```rust,no_run
/// # use search_retrieve::{retrieve, RetrieveParams, OrderBy};
/// # use search_retrieve::backend::InMemoryBackend;
/// # async fn example(backend: &InMemoryBackend) -> Result<(), search_retrieve::RetrieveError> {
/// let mut cursor = None;
/// loop {
///     let params = RetrieveParams::new("items")
///         .order_by(OrderBy::asc("number"))
///         .cursor(cursor)
///         .limit(100);
///     let page = retrieve::<serde_json::Value, _>(backend, &params).await?;
///     // ... use page.items
///     cursor = page.page_info.end_cursor;
///     if cursor.is_none() {
///         break;
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub async fn retrieve<Item, B>(backend: &B, params: &RetrieveParams) -> Result<Page<Item>>
where
    Item: DeserializeOwned,
    B: SearchBackend + ?Sized,
{
    let _timer = LatencyTimer::new(&params.index_name);
    let result = execute(backend, params).await;

    match &result {
        Ok(page) => {
            metrics::record_retrieve(&params.index_name, "success");
            metrics::record_page_size(&params.index_name, page.page_info.size);
        }
        Err(e) => {
            metrics::record_retrieve(&params.index_name, e.kind());
            if let RetrieveError::MalformedFilterTree(filter_error) = e {
                metrics::record_compile_error(filter_error.kind());
            }
            warn!(index = %params.index_name, error = %e, "Retrieve failed");
        }
    }
    result
}

/// [`retrieve`] against the shared HTTP backend configured from the environment.
pub async fn retrieve_default<Item: DeserializeOwned>(params: &RetrieveParams) -> Result<Page<Item>> {
    let backend = default_backend()?;
    retrieve(backend, params).await
}

async fn execute<Item, B>(backend: &B, params: &RetrieveParams) -> Result<Page<Item>>
where
    Item: DeserializeOwned,
    B: SearchBackend + ?Sized,
{
    let (query, sort) = build_query(params)?;
    debug!(
        index = %params.index_name,
        limit = params.limit,
        resumed = query.search_after.is_some(),
        "Retrieving page"
    );

    let response = backend.search(&params.index_name, &query).await?;
    if !response.is_success() {
        return Err(RetrieveError::Backend {
            status: response.status,
            meta: response.meta,
        });
    }

    let total = response.total;
    let mut hits = response.hits;
    let has_more = has_more(hits.len(), params.limit, total);
    hits.truncate(params.limit);
    let end_cursor = hits
        .last()
        .filter(|_| has_more)
        .map(|last| Cursor::from_sort_values(&sort, &last.sort));

    let items = hits
        .into_iter()
        .map(decode_hit)
        .collect::<Result<Vec<Item>>>()?;

    debug!(
        index = %params.index_name,
        size = items.len(),
        total,
        has_next = end_cursor.is_some(),
        "Page retrieved"
    );

    Ok(Page {
        page_info: PageInfo {
            end_cursor,
            size: items.len(),
            total,
        },
        items,
    })
}

/// The look-ahead hit came back and the page has not reached the total.
fn has_more(returned: usize, limit: usize, total: u64) -> bool {
    returned > limit && (limit as u64) < total
}

fn decode_hit<Item: DeserializeOwned>(hit: SearchHit) -> Result<Item> {
    serde_json::from_value(hit.source)
        .map_err(|e| RetrieveError::Decode(format!("hit '{}': {e}", hit.id)))
}
