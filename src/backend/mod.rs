// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search backends
//!
//! The retrieve API talks to the engine only through [`SearchBackend`]:
//!
//! - [`HttpBackend`]: Elasticsearch-compatible node over HTTP
//! - [`InMemoryBackend`]: evaluates the generated query DSL over in-memory
//!   documents, for tests and local development

mod http;
mod memory;
mod traits;

pub use http::{default_backend, HttpBackend};
pub use memory::{document, InMemoryBackend};
pub use traits::{SearchBackend, SearchHit, SearchResponse, STATUS_OK};
