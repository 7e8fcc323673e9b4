// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter Compilation
//!
//! Turns a caller-supplied boolean filter tree into the search engine's native
//! `bool` query.
//!
//! # Architecture
//!
//! ```text
//! FilterNode (AST, from JSON or builders)
//!     ↓
//!     FilterCompiler::compile  (recursive, attributeName flows downward)
//!     ↓
//! CompiledClause { filter, must_not, should, minimum_should_match, must }
//!     ↓
//!     into_bool()  →  {"bool": {...}}
//! ```
//!
//! # Example
//!
//! ```rust
//! use search_retrieve::filter::{compile_filter, FilterNode, OperatorLeaf};
//! use serde_json::json;
//!
//! let tree = FilterNode::attribute_all("number", vec![OperatorLeaf::gt(3), OperatorLeaf::lt(6)]);
//! let query = compile_filter(Some(&tree)).unwrap();
//! assert_eq!(query, json!({"bool": {"filter": [
//!     {"range": {"number.retrieve": {"gt": 3}}},
//!     {"range": {"number.retrieve": {"lt": 6}}}
//! ]}}));
//! ```

mod clause;
mod compiler;
mod types;

pub use clause::CompiledClause;
pub use compiler::{compile_filter, retrieve_field, FilterCompiler, RETRIEVE_SUFFIX};
pub use types::{
    AttributeGroup, BooleanGroup, Combinator, Coordinates, DistanceUnit, ExistenceOperator,
    FilterNode, FilterValue, OperatorLeaf, ValueOperator,
};
