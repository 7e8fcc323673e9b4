// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! In-memory search backend
//!
//! Evaluates the query DSL this crate generates against JSON documents held
//! in memory. Intended for tests and local development, not as a search
//! engine:
//!
//! - `.retrieve` fields resolve to the plain source field (no mapping)
//! - `match` compares lowercase whitespace tokens
//! - `multi_match` matches when a query token is a substring of any token of
//!   any document value (approximating the ngram analyzer), fuzziness ignored
//! - missing sort values sort last in both directions and are reported as
//!   `i64::MAX` (asc) or `i64::MIN` (desc), like the engine's long sentinels;
//!   a `search_after` value of either, or of [`LONG_MIN_SENTINEL`], resumes
//!   among the missing values
//!
//! Unknown query types are answered with status 400, like the real engine.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::{json, Map, Value};
use tracing::debug;

use super::traits::{SearchBackend, SearchHit, SearchResponse};
use crate::error::RetrieveError;
use crate::filter::{DistanceUnit, RETRIEVE_SUFFIX};
use crate::retrieve::{Direction, QueryDocument, DOCUMENT_ID_FIELD, LONG_MIN_SENTINEL};

const EARTH_RADIUS_METERS: f64 = 6_371_008.8;

#[derive(Default)]
struct MemoryIndex {
    documents: Vec<(String, Value)>,
}

pub struct InMemoryBackend {
    indices: DashMap<String, MemoryIndex>,
    next_id: AtomicU64,
    failure: Mutex<Option<(u16, Value)>>,
    search_calls: AtomicUsize,
}

impl InMemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            indices: DashMap::new(),
            next_id: AtomicU64::new(0),
            failure: Mutex::new(None),
            search_calls: AtomicUsize::new(0),
        }
    }

    /// Answer every subsequent search with `status` and `meta`.
    pub fn fail_with(&self, status: u16, meta: Value) {
        *self.failure.lock() = Some((status, meta));
    }

    pub fn clear_failure(&self) {
        *self.failure.lock() = None;
    }

    /// Number of search requests received so far
    #[must_use]
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(AtomicOrdering::SeqCst)
    }

    /// Number of documents stored in `index`
    #[must_use]
    pub fn len(&self, index: &str) -> usize {
        self.indices.get(index).map_or(0, |i| i.documents.len())
    }

    fn next_document_id(&self) -> String {
        let n = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        format!("doc-{n:08}")
    }

    fn run_search(index: &MemoryIndex, query: &QueryDocument) -> Result<SearchResponse, String> {
        let sort = parse_sort(&query.sort)?;

        let mut matched = Vec::new();
        for (id, document) in &index.documents {
            if matches(&query.query, document)? {
                matched.push((id, document, sort_values(&sort, id, document)));
            }
        }
        let total = matched.len() as u64;

        matched.sort_by(|a, b| compare_tuples(&sort, &a.2, &b.2));

        if let Some(after) = &query.search_after {
            if after.len() != sort.len() {
                return Err(format!(
                    "search_after has {} value(s) but sort has {} field(s)",
                    after.len(),
                    sort.len()
                ));
            }
            matched.retain(|(_, _, values)| compare_tuples(&sort, values, after) == Ordering::Greater);
        }

        let hits = matched
            .into_iter()
            .take(query.size)
            .map(|(id, document, sort)| SearchHit {
                id: id.clone(),
                source: document.clone(),
                sort,
            })
            .collect();

        Ok(SearchResponse::ok(hits, total))
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SearchBackend for InMemoryBackend {
    async fn search(&self, index: &str, query: &QueryDocument) -> Result<SearchResponse, RetrieveError> {
        self.search_calls.fetch_add(1, AtomicOrdering::SeqCst);

        if let Some((status, meta)) = self.failure.lock().clone() {
            return Ok(SearchResponse::failed(status, meta));
        }

        let Some(memory_index) = self.indices.get(index) else {
            return Ok(SearchResponse::failed(
                404,
                json!({"error": {"type": "index_not_found_exception", "index": index}}),
            ));
        };

        match Self::run_search(&memory_index, query) {
            Ok(response) => {
                debug!(index = %index, hits = response.hits.len(), total = response.total, "In-memory search");
                Ok(response)
            }
            Err(reason) => Ok(SearchResponse::failed(
                400,
                json!({"error": {"type": "parsing_exception", "reason": reason}}),
            )),
        }
    }

    async fn create_index(&self, index: &str, _config: &Value) -> Result<(), RetrieveError> {
        if self.indices.contains_key(index) {
            return Err(RetrieveError::Backend {
                status: 400,
                meta: json!({"error": {"type": "resource_already_exists_exception", "index": index}}),
            });
        }
        self.indices.insert(index.to_string(), MemoryIndex::default());
        Ok(())
    }

    async fn delete_index(&self, index: &str) -> Result<(), RetrieveError> {
        match self.indices.remove(index) {
            Some(_) => Ok(()),
            None => Err(RetrieveError::Backend {
                status: 404,
                meta: json!({"error": {"type": "index_not_found_exception", "index": index}}),
            }),
        }
    }

    async fn index_document(&self, index: &str, document: &Value) -> Result<String, RetrieveError> {
        let id = self.next_document_id();
        self.indices
            .entry(index.to_string())
            .or_default()
            .documents
            .push((id.clone(), document.clone()));
        Ok(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Query evaluation
// ═══════════════════════════════════════════════════════════════════════════

fn single_entry<'a>(value: &'a Value, what: &str) -> Result<(&'a String, &'a Value), String> {
    let object = value
        .as_object()
        .ok_or_else(|| format!("[{what}] must be an object"))?;
    let mut entries = object.iter();
    match (entries.next(), entries.next()) {
        (Some(entry), None) => Ok(entry),
        _ => Err(format!("[{what}] must have exactly one key")),
    }
}

fn matches(query: &Value, document: &Value) -> Result<bool, String> {
    let (kind, body) = single_entry(query, "query")?;

    match kind.as_str() {
        "match_all" => Ok(true),
        "bool" => matches_bool(body, document),
        "term" => {
            let (field, expected) = single_entry(body, "term")?;
            Ok(field_values(document, field).iter().any(|v| values_equal(v, expected)))
        }
        "range" => {
            let (field, bounds) = single_entry(body, "range")?;
            let bounds = bounds.as_object().ok_or("[range] bounds must be an object")?;
            Ok(field_values(document, field)
                .iter()
                .any(|v| bounds.iter().all(|(op, bound)| within_bound(v, op, bound))))
        }
        "prefix" => {
            let (field, prefix) = single_entry(body, "prefix")?;
            let prefix = scalar_text(prefix).ok_or("[prefix] value must be a scalar")?;
            Ok(field_values(document, field)
                .iter()
                .filter_map(|v| scalar_text(v))
                .any(|text| text.starts_with(&prefix)))
        }
        "match" => {
            let (field, text) = single_entry(body, "match")?;
            let wanted = tokens(text);
            Ok(field_values(document, field)
                .iter()
                .flat_map(|v| tokens(v))
                .any(|t| wanted.contains(&t)))
        }
        "exists" => {
            let field = body
                .get("field")
                .and_then(Value::as_str)
                .ok_or("[exists] requires a field")?;
            Ok(!field_values(document, field).is_empty())
        }
        "geo_distance" => matches_geo_distance(body, document),
        "multi_match" => {
            let wanted = tokens(body.get("query").unwrap_or(&Value::Null));
            let mut available = Vec::new();
            collect_tokens(document, &mut available);
            Ok(wanted
                .iter()
                .any(|w| available.iter().any(|t| t.contains(w.as_str()))))
        }
        other => Err(format!("unknown query [{other}]")),
    }
}

fn matches_bool(body: &Value, document: &Value) -> Result<bool, String> {
    let body = body.as_object().ok_or("[bool] must be an object")?;
    let clauses = |key: &str| -> Vec<&Value> {
        match body.get(key) {
            Some(Value::Array(items)) => items.iter().collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(single) => vec![single],
        }
    };

    let filter = clauses("filter");
    let must = clauses("must");
    let must_not = clauses("must_not");
    let should = clauses("should");

    for clause in filter.iter().chain(must.iter()) {
        if !matches(clause, document)? {
            return Ok(false);
        }
    }
    for clause in &must_not {
        if matches(clause, document)? {
            return Ok(false);
        }
    }

    let default_minimum = if filter.is_empty() && must.is_empty() && !should.is_empty() { 1 } else { 0 };
    let minimum = body
        .get("minimum_should_match")
        .and_then(Value::as_u64)
        .unwrap_or(default_minimum) as usize;
    if minimum == 0 {
        return Ok(true);
    }

    let mut satisfied = 0;
    for clause in &should {
        if matches(clause, document)? {
            satisfied += 1;
        }
    }
    Ok(satisfied >= minimum)
}

fn matches_geo_distance(body: &Value, document: &Value) -> Result<bool, String> {
    let body = body.as_object().ok_or("[geo_distance] must be an object")?;
    let distance = body
        .get("distance")
        .and_then(Value::as_str)
        .ok_or("[geo_distance] requires a distance")?;
    let max_meters = parse_distance(distance)?;

    let (field, origin) = body
        .iter()
        .find(|(k, _)| k.as_str() != "distance")
        .ok_or("[geo_distance] requires a point")?;
    let origin = parse_point(origin).ok_or("[geo_distance] invalid origin")?;

    Ok(field_values(document, field)
        .iter()
        .filter_map(|v| parse_point(v))
        .any(|point| haversine_meters(origin, point) <= max_meters))
}

fn parse_distance(distance: &str) -> Result<f64, String> {
    let split = distance
        .find(|c: char| c.is_ascii_alphabetic())
        .unwrap_or(distance.len());
    let (number, unit) = distance.split_at(split);
    let number: f64 = number
        .parse()
        .map_err(|_| format!("invalid distance '{distance}'"))?;
    let unit = if unit.is_empty() {
        DistanceUnit::M
    } else {
        DistanceUnit::parse(unit).ok_or_else(|| format!("unknown distance unit '{unit}'"))?
    };
    Ok(number * unit.meters())
}

fn parse_point(value: &Value) -> Option<(f64, f64)> {
    match value {
        Value::Object(o) => Some((o.get("lat")?.as_f64()?, o.get("lon")?.as_f64()?)),
        Value::String(s) => {
            let (lat, lon) = s.split_once(',')?;
            Some((lat.trim().parse().ok()?, lon.trim().parse().ok()?))
        }
        // GeoJSON order: [lon, lat]
        Value::Array(a) if a.len() == 2 => Some((a[1].as_f64()?, a[0].as_f64()?)),
        _ => None,
    }
}

fn haversine_meters((lat1, lon1): (f64, f64), (lat2, lon2): (f64, f64)) -> f64 {
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();
    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_METERS * a.sqrt().asin()
}

/// Non-null values at a dotted path, arrays flattened one level.
fn field_values<'a>(document: &'a Value, field: &str) -> Vec<&'a Value> {
    let path = field.strip_suffix(RETRIEVE_SUFFIX).unwrap_or(field);
    let mut current = document;
    for segment in path.split('.') {
        match current.get(segment) {
            Some(next) => current = next,
            None => return Vec::new(),
        }
    }
    match current {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter(|v| !v.is_null()).collect(),
        other => vec![other],
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn tokens(value: &Value) -> Vec<String> {
    scalar_text(value)
        .map(|text| text.split_whitespace().map(str::to_lowercase).collect())
        .unwrap_or_default()
}

fn collect_tokens(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(o) => o.values().for_each(|v| collect_tokens(v, out)),
        Value::Array(a) => a.iter().for_each(|v| collect_tokens(v, out)),
        other => out.extend(tokens(other)),
    }
}

fn values_equal(actual: &Value, expected: &Value) -> bool {
    compare_values(actual, expected) == Some(Ordering::Equal)
}

fn within_bound(value: &Value, op: &str, bound: &Value) -> bool {
    let Some(ordering) = compare_values(value, bound) else {
        return false;
    };
    match op {
        "gt" => ordering == Ordering::Greater,
        "gte" => ordering != Ordering::Less,
        "lt" => ordering == Ordering::Less,
        "lte" => ordering != Ordering::Greater,
        _ => false,
    }
}

/// Compare two scalars; numeric strings compare with numbers like the
/// engine coerces them. `None` when the values are not comparable.
fn compare_values(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::Number(x), Value::String(s)) => x.as_f64()?.partial_cmp(&s.parse::<f64>().ok()?),
        (Value::String(s), Value::Number(y)) => s.parse::<f64>().ok()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::String(s)) => Some(x.to_string().cmp(s)),
        _ => None,
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Sorting
// ═══════════════════════════════════════════════════════════════════════════

fn parse_sort(sort: &[Value]) -> Result<Vec<(String, Direction)>, String> {
    sort.iter()
        .map(|entry| {
            let (field, direction) = single_entry(entry, "sort")?;
            let direction = match direction.as_str() {
                Some("asc") => Direction::Asc,
                Some("desc") => Direction::Desc,
                _ => return Err(format!("invalid sort direction for [{field}]")),
            };
            Ok((field.clone(), direction))
        })
        .collect()
}

fn sort_values(sort: &[(String, Direction)], id: &str, document: &Value) -> Vec<Value> {
    sort.iter()
        .map(|(field, direction)| {
            if field == DOCUMENT_ID_FIELD {
                Value::String(id.to_string())
            } else {
                field_values(document, field)
                    .first()
                    .map_or_else(|| missing_sort_value(*direction), |v| (*v).clone())
            }
        })
        .collect()
}

fn missing_sort_value(direction: Direction) -> Value {
    match direction {
        Direction::Asc => json!(i64::MAX),
        Direction::Desc => json!(i64::MIN),
    }
}

fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Number(n) => matches!(n.as_i64(), Some(i64::MAX | i64::MIN)),
        Value::String(s) => s == LONG_MIN_SENTINEL,
        _ => false,
    }
}

fn compare_tuples(sort: &[(String, Direction)], a: &[Value], b: &[Value]) -> Ordering {
    for ((_, direction), (x, y)) in sort.iter().zip(a.iter().zip(b)) {
        let ordering = match (is_missing(x), is_missing(y)) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            (false, false) => {
                let ordering = compare_values(x, y).unwrap_or_else(|| type_rank(x).cmp(&type_rank(y)));
                match direction {
                    Direction::Asc => ordering,
                    Direction::Desc => ordering.reverse(),
                }
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

/// Convenience for tests and demos: a document as a JSON object.
pub fn document(fields: &[(&str, Value)]) -> Value {
    let map: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| ((*k).to_string(), v.clone()))
        .collect();
    Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retrieve::{OrderBy, SortKey};

    async fn seeded(values: &[Value]) -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend.create_index("items", &json!({})).await.unwrap();
        for v in values {
            backend.index_document("items", v).await.unwrap();
        }
        backend
    }

    fn query(q: Value, sort: &[OrderBy], size: usize) -> QueryDocument {
        QueryDocument {
            query: q,
            sort: SortKey::new(sort).to_json(),
            size,
            search_after: None,
            track_total_hits: true,
        }
    }

    #[tokio::test]
    async fn test_match_all_and_total() {
        let backend = seeded(&[json!({"n": 1}), json!({"n": 2}), json!({"n": 3})]).await;
        let response = backend
            .search("items", &query(json!({"match_all": {}}), &[], 2))
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.total, 3);
        assert_eq!(response.hits.len(), 2);
        // _id desc by default
        assert_eq!(response.hits[0].source, json!({"n": 3}));
        assert_eq!(backend.search_calls(), 1);
    }

    #[tokio::test]
    async fn test_sort_and_search_after() {
        let backend = seeded(&[json!({"n": 2}), json!({"n": 0}), json!({"n": 1})]).await;
        let mut q = query(json!({"match_all": {}}), &[OrderBy::asc("n")], 10);
        let response = backend.search("items", &q).await.unwrap();
        let ns: Vec<_> = response.hits.iter().map(|h| h.source["n"].clone()).collect();
        assert_eq!(ns, vec![json!(0), json!(1), json!(2)]);

        q.search_after = Some(response.hits[0].sort.clone());
        let response = backend.search("items", &q).await.unwrap();
        assert_eq!(response.total, 3);
        let ns: Vec<_> = response.hits.iter().map(|h| h.source["n"].clone()).collect();
        assert_eq!(ns, vec![json!(1), json!(2)]);
    }

    #[tokio::test]
    async fn test_missing_values_sort_last() {
        let backend = seeded(&[json!({"n": 1}), json!({}), json!({"n": 0})]).await;
        for order in [OrderBy::asc("n"), OrderBy::desc("n")] {
            let response = backend
                .search("items", &query(json!({"match_all": {}}), &[order], 10))
                .await
                .unwrap();
            assert_eq!(response.hits[2].source, json!({}));
        }
    }

    #[tokio::test]
    async fn test_missing_values_report_long_sentinels() {
        let backend = seeded(&[json!({"n": 1}), json!({}), json!({})]).await;

        let mut q = query(json!({"match_all": {}}), &[OrderBy::asc("n")], 2);
        let response = backend.search("items", &q).await.unwrap();
        assert_eq!(response.hits[1].sort[0], json!(i64::MAX));

        // Resuming from the sanitized sentinel continues among the missing values
        q.search_after = Some(vec![json!(LONG_MIN_SENTINEL), response.hits[1].sort[1].clone()]);
        let rest = backend.search("items", &q).await.unwrap();
        assert_eq!(rest.hits.len(), 1);
        assert_eq!(rest.hits[0].source, json!({}));
        assert_ne!(rest.hits[0].id, response.hits[1].id);

        let q = query(json!({"match_all": {}}), &[OrderBy::desc("n")], 10);
        let response = backend.search("items", &q).await.unwrap();
        assert_eq!(response.hits[0].source, json!({"n": 1}));
        assert_eq!(response.hits[2].sort[0], json!(i64::MIN));
    }

    #[test]
    fn test_term_range_prefix_exists() {
        let doc = json!({"n": 5, "s": "myString5 is awesome", "e": null});
        assert!(matches(&json!({"term": {"n.retrieve": 5}}), &doc).unwrap());
        assert!(!matches(&json!({"term": {"n.retrieve": 4}}), &doc).unwrap());
        assert!(matches(&json!({"range": {"n.retrieve": {"gt": 3, "lte": 5}}}), &doc).unwrap());
        assert!(!matches(&json!({"range": {"n.retrieve": {"lt": 5}}}), &doc).unwrap());
        assert!(matches(&json!({"prefix": {"s.retrieve": "myString"}}), &doc).unwrap());
        assert!(matches(&json!({"exists": {"field": "n.retrieve"}}), &doc).unwrap());
        assert!(!matches(&json!({"exists": {"field": "e.retrieve"}}), &doc).unwrap());
        assert!(!matches(&json!({"exists": {"field": "missing.retrieve"}}), &doc).unwrap());
    }

    #[test]
    fn test_match_tokens() {
        let doc = json!({"s": "myString5 is awesome"});
        assert!(matches(&json!({"match": {"s": "MYSTRING5"}}), &doc).unwrap());
        assert!(!matches(&json!({"match": {"s": "myString"}}), &doc).unwrap());
    }

    #[test]
    fn test_bool_semantics() {
        let doc = json!({"n": 5});
        let q = json!({"bool": {
            "should": [
                {"bool": {"filter": [{"term": {"n.retrieve": 1}}]}},
                {"bool": {"filter": [{"term": {"n.retrieve": 5}}]}}
            ],
            "minimum_should_match": 1
        }});
        assert!(matches(&q, &doc).unwrap());
        assert!(!matches(&json!({"bool": {"must_not": [{"term": {"n.retrieve": 5}}]}}), &doc).unwrap());
        assert!(matches(&json!({"bool": {}}), &doc).unwrap());
        // should is optional when filter is present
        let q = json!({"bool": {"filter": [{"match_all": {}}], "should": [{"term": {"n.retrieve": 1}}]}});
        assert!(matches(&q, &doc).unwrap());
    }

    #[test]
    fn test_geo_distance() {
        let milan = json!({"loc": {"lat": 45.4642, "lon": 9.19}});
        let q = |d: &str| json!({"geo_distance": {"distance": d, "loc": {"lat": 45.0703, "lon": 7.6869}}});
        // Turin to Milan is about 126 km
        assert!(matches(&q("130km"), &milan).unwrap());
        assert!(!matches(&q("120km"), &milan).unwrap());
        assert!(matches(&q("80mi"), &milan).unwrap());
        assert!(matches(&q("130km"), &json!({"loc": "45.4642,9.19"})).unwrap());
        assert!(matches(&q("10parsecs"), &milan).is_err());
    }

    #[test]
    fn test_multi_match_substring() {
        let doc = json!({"s": "yourString8 is awesome", "n": 8});
        let q = |text: &str| json!({"multi_match": {"query": text, "fields": ["_search1^5"]}});
        assert!(matches(&q("8"), &doc).unwrap());
        assert!(matches(&q("string8"), &doc).unwrap());
        assert!(!matches(&q("9"), &doc).unwrap());
    }

    #[tokio::test]
    async fn test_unknown_query_is_400() {
        let backend = seeded(&[json!({"n": 1})]).await;
        let response = backend
            .search("items", &query(json!({"wildcard": {"n": "*"}}), &[], 10))
            .await
            .unwrap();
        assert_eq!(response.status, 400);
        assert_eq!(response.meta["error"]["type"], json!("parsing_exception"));
    }

    #[tokio::test]
    async fn test_missing_index_and_injected_failure() {
        let backend = InMemoryBackend::new();
        let response = backend
            .search("nope", &query(json!({"match_all": {}}), &[], 10))
            .await
            .unwrap();
        assert_eq!(response.status, 404);

        backend.fail_with(503, json!({"error": "unavailable"}));
        let response = backend
            .search("nope", &query(json!({"match_all": {}}), &[], 10))
            .await
            .unwrap();
        assert_eq!(response.status, 503);
        backend.clear_failure();
        assert_eq!(backend.search_calls(), 2);
    }

    #[tokio::test]
    async fn test_index_lifecycle() {
        let backend = InMemoryBackend::new();
        backend.create_index("a", &json!({})).await.unwrap();
        assert!(backend.create_index("a", &json!({})).await.is_err());
        backend.index_document("a", &document(&[("n", json!(1))])).await.unwrap();
        assert_eq!(backend.len("a"), 1);
        backend.delete_index("a").await.unwrap();
        assert!(backend.delete_index("a").await.is_err());
        assert_eq!(backend.len("a"), 0);
    }
}
