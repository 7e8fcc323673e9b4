// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search request assembly: sort key, free-text clause and the request body.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::types::{Direction, OrderBy};
use crate::filter::retrieve_field;

/// Tiebreaker field appended to every sort.
pub const DOCUMENT_ID_FIELD: &str = "_id";

/// Weighted free-text fields, highest priority first. The index mapping
/// copies each property into one of these by its search priority.
pub const SEARCH_FIELDS: [&str; 5] = [
    "_search1^5",
    "_search2^4",
    "_search3^3",
    "_search4^2",
    "_search5^1",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    /// Field path as sent to the engine, e.g. `number.retrieve`
    pub path: String,
    pub direction: Direction,
}

/// Total order used for sorting and cursoring.
///
/// Caller fields are sorted on their exact `.retrieve` companion field and
/// the document id always comes last, so ties never make a page boundary
/// ambiguous.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    fields: Vec<SortField>,
}

impl SortKey {
    pub fn new(order_by: &[OrderBy]) -> Self {
        let mut fields: Vec<SortField> = order_by
            .iter()
            .map(|o| SortField {
                path: retrieve_field(&o.field),
                direction: o.direction,
            })
            .collect();
        fields.push(SortField {
            path: DOCUMENT_ID_FIELD.to_string(),
            direction: Direction::Desc,
        });
        Self { fields }
    }

    pub fn fields(&self) -> &[SortField] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// `[{"number.retrieve": "asc"}, {"_id": "desc"}]`
    pub fn to_json(&self) -> Vec<Value> {
        self.fields
            .iter()
            .map(|f| {
                let mut entry = Map::new();
                entry.insert(f.path.clone(), json!(f.direction.as_str()));
                Value::Object(entry)
            })
            .collect()
    }
}

/// Multi-field weighted free-text clause over the `_searchN` fields.
///
/// Fuzziness is always `AUTO` (edit distance scaled to term length).
pub fn search_clause(query_string: &str) -> Value {
    json!({
        "multi_match": {
            "query": query_string,
            "fields": SEARCH_FIELDS,
            "type": "most_fields",
            "fuzziness": "AUTO"
        }
    })
}

/// Body of a `_search` request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDocument {
    pub query: Value,
    pub sort: Vec<Value>,
    pub size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_after: Option<Vec<Value>>,
    #[serde(default)]
    pub track_total_hits: bool,
}

impl QueryDocument {
    /// Combine the filter clause (non-scoring) with the optional search
    /// clause (scoring).
    pub fn build(
        filter: Value,
        search: Option<Value>,
        sort: &SortKey,
        size: usize,
        search_after: Option<Vec<Value>>,
    ) -> Self {
        let mut bool_query = Map::new();
        bool_query.insert("filter".into(), Value::Array(vec![filter]));
        if let Some(search) = search {
            bool_query.insert("must".into(), search);
        }

        Self {
            query: json!({ "bool": bool_query }),
            sort: sort.to_json(),
            size,
            search_after,
            track_total_hits: true,
        }
    }
}
