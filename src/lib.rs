//! # Search Retrieve
//!
//! Boolean filter trees and cursor pagination over an Elasticsearch-style
//! search engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      RetrieveParams                         │
//! │  • indexName, queryString, filters, orderBy, cursor, limit  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Filter Compiler                          │
//! │  • FilterNode tree → bool query (filter/must_not/should)    │
//! │  • attributeName flows down to operator filters             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Query Orchestrator                        │
//! │  • free-text multi_match over _search1.._search5            │
//! │  • sort key (orderBy + _id tiebreaker), search_after        │
//! │  • hits → Page { items, pageInfo { endCursor, size, total }}│
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     SearchBackend                           │
//! │  • HttpBackend (reqwest) or InMemoryBackend                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use search_retrieve::{retrieve_default, FilterNode, OperatorLeaf, OrderBy, RetrieveParams};
//! use serde_json::Value;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), search_retrieve::RetrieveError> {
//!     // 3 < number < 6, sorted ascending, 10 per page
//!     let params = RetrieveParams::new("items")
//!         .filters(FilterNode::attribute_all("number", vec![OperatorLeaf::gt(3), OperatorLeaf::lt(6)]))
//!         .order_by(OrderBy::asc("number"))
//!         .limit(10);
//!
//!     // Talks to ELASTIC_HOST:ELASTIC_PORT (default 127.0.0.1:9200)
//!     let page = retrieve_default::<Value>(&params).await?;
//!     println!("{} of {}", page.page_info.size, page.page_info.total);
//!
//!     if let Some(cursor) = page.page_info.end_cursor {
//!         let next = retrieve_default::<Value>(&params.cursor(Some(cursor))).await?;
//!         println!("next page: {} items", next.items.len());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! See [`RetrieveConfig`] for all configuration options.
//!
//! ## Modules
//!
//! - [`filter`]: Filter tree AST and compiler
//! - [`retrieve`](mod@retrieve): Query assembly, cursors and pages
//! - [`backend`]: Search backends (HTTP, Memory)
//! - [`mapping`]: Index definitions with `.retrieve` and `_searchN` fields
//! - [`metrics`]: Counters and histograms

pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod mapping;
pub mod metrics;
pub mod retrieve;

pub use backend::{default_backend, HttpBackend, InMemoryBackend, SearchBackend, SearchHit, SearchResponse};
pub use config::RetrieveConfig;
pub use error::{FilterError, Result, RetrieveError};
pub use filter::{compile_filter, Combinator, FilterNode, OperatorLeaf};
pub use retrieve::{
    build_query, retrieve, retrieve_default, Cursor, Direction, OrderBy, Page, PageInfo,
    QueryDocument, RetrieveParams, SortKey, DEFAULT_LIMIT,
};
pub use crate::metrics::LatencyTimer;
