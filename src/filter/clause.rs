// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Compiled boolean clause
//!
//! The result of compiling one filter node: the body of an Elasticsearch
//! `bool` query. Every branch of the compiler produces this one shape, and
//! partial results are combined with [`CompiledClause::merge`].
//!
//! ```text
//! { "filter": [...], "must_not": [...], "should": [...],
//!   "minimum_should_match": 1, "must": [...] }
//! ```

use serde::Serialize;
use serde_json::{json, Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompiledClause {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must_not: Vec<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_should_match: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Value>,
}

impl CompiledClause {
    pub fn filter(query: Value) -> Self {
        Self {
            filter: vec![query],
            ..Default::default()
        }
    }

    pub fn must_not(query: Value) -> Self {
        Self {
            must_not: vec![query],
            ..Default::default()
        }
    }

    /// At least one of `clauses` must match.
    pub fn any_of(clauses: Vec<Value>) -> Self {
        Self {
            should: clauses,
            minimum_should_match: Some(1),
            ..Default::default()
        }
    }

    pub fn all_of(clauses: Vec<Value>) -> Self {
        Self {
            must: clauses,
            ..Default::default()
        }
    }

    /// Append `other`'s arrays to ours under matching keys.
    ///
    /// `minimum_should_match` keeps the larger of the two values.
    #[must_use]
    pub fn merge(mut self, other: CompiledClause) -> Self {
        self.filter.extend(other.filter);
        self.must_not.extend(other.must_not);
        self.should.extend(other.should);
        self.must.extend(other.must);
        self.minimum_should_match = match (self.minimum_should_match, other.minimum_should_match) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self
    }

    pub fn is_empty(&self) -> bool {
        self.filter.is_empty()
            && self.must_not.is_empty()
            && self.should.is_empty()
            && self.must.is_empty()
    }

    /// Body of the `bool` query, keys in a stable order.
    pub fn to_body(&self) -> Value {
        let mut body = Map::new();
        if !self.filter.is_empty() {
            body.insert("filter".into(), Value::Array(self.filter.clone()));
        }
        if !self.must_not.is_empty() {
            body.insert("must_not".into(), Value::Array(self.must_not.clone()));
        }
        if !self.should.is_empty() {
            body.insert("should".into(), Value::Array(self.should.clone()));
        }
        if let Some(n) = self.minimum_should_match {
            body.insert("minimum_should_match".into(), json!(n));
        }
        if !self.must.is_empty() {
            body.insert("must".into(), Value::Array(self.must.clone()));
        }
        Value::Object(body)
    }

    /// Wrap as a nested boolean query: `{ "bool": { ... } }`
    pub fn into_bool(self) -> Value {
        json!({ "bool": self.to_body() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_appends_in_order() {
        let a = CompiledClause::filter(json!({"term": {"a.retrieve": 1}}));
        let b = CompiledClause::must_not(json!({"term": {"a.retrieve": 2}}));
        let c = CompiledClause::filter(json!({"term": {"a.retrieve": 3}}));

        let merged = CompiledClause::default().merge(a).merge(b).merge(c);
        assert_eq!(
            merged.filter,
            vec![json!({"term": {"a.retrieve": 1}}), json!({"term": {"a.retrieve": 3}})]
        );
        assert_eq!(merged.must_not, vec![json!({"term": {"a.retrieve": 2}})]);
        assert!(merged.should.is_empty());
        assert_eq!(merged.minimum_should_match, None);
    }

    #[test]
    fn test_merge_minimum_should_match() {
        let a = CompiledClause::any_of(vec![json!({"match_all": {}})]);
        let merged = CompiledClause::default().merge(a);
        assert_eq!(merged.minimum_should_match, Some(1));
        assert_eq!(merged.should.len(), 1);
    }

    #[test]
    fn test_into_bool_skips_empty_keys() {
        let clause = CompiledClause::filter(json!({"exists": {"field": "x.retrieve"}}));
        assert_eq!(
            clause.into_bool(),
            json!({"bool": {"filter": [{"exists": {"field": "x.retrieve"}}]}})
        );
        assert_eq!(CompiledClause::default().into_bool(), json!({"bool": {}}));
    }

    #[test]
    fn test_serialize_matches_body() {
        let clause = CompiledClause::any_of(vec![json!({"bool": {}})]);
        assert_eq!(serde_json::to_value(&clause).unwrap(), clause.to_body());
        assert!(!clause.is_empty());
        assert!(CompiledClause::default().is_empty());
    }
}
