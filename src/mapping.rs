// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Index Mapping
//!
//! Builds index definitions that the retrieve API can query:
//!
//! - every property gets an exact `.retrieve` companion sub-field, used for
//!   filtering and sorting
//! - every property with a [`SearchPriority`] is copied into one of five
//!   `_searchN` fields, analyzed with ngrams, so a free-text
//!   query can weight matches by the priority of the field they hit
//!
//! # Example
//!
//! ```rust
//! use search_retrieve::mapping::{IndexConfig, PropertyOptions, SearchPriority};
//!
//! let config = IndexConfig::new()
//!     .property("title", PropertyOptions::new().search_priority(SearchPriority::Level1))
//!     .property("year", PropertyOptions::new().field_type("integer"))
//!     .property("location", PropertyOptions::new().field_type("geo_point").search_priority(SearchPriority::None));
//!
//! let body = config.to_json();
//! assert_eq!(body["mappings"]["properties"]["title"]["copy_to"], "_search1");
//! assert_eq!(body["mappings"]["properties"]["year"]["fields"]["retrieve"]["type"], "integer");
//! ```

use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::backend::SearchBackend;
use crate::error::RetrieveError;
use crate::metrics;

/// Sub-field name of the exact companion field (see [`crate::filter::RETRIEVE_SUFFIX`]).
pub const RETRIEVE_SUBFIELD: &str = "retrieve";

/// Keyword values longer than this are not indexed on the `.retrieve` field.
pub const KEYWORD_IGNORE_ABOVE: u32 = 256;

const DEFAULT_FIELD_TYPE: &str = "text";
const GEO_POINT: &str = "geo_point";

/// Free-text weight of a property. Lower level means higher importance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchPriority {
    /// Not searchable by free text
    None,
    Level1,
    Level2,
    #[default]
    Level3,
    Level4,
    Level5,
}

impl SearchPriority {
    pub fn level(&self) -> u8 {
        match self {
            SearchPriority::None => 0,
            SearchPriority::Level1 => 1,
            SearchPriority::Level2 => 2,
            SearchPriority::Level3 => 3,
            SearchPriority::Level4 => 4,
            SearchPriority::Level5 => 5,
        }
    }

    /// `_searchN` field this priority copies into
    pub fn search_field(&self) -> Option<String> {
        match self {
            SearchPriority::None => None,
            other => Some(format!("_search{}", other.level())),
        }
    }
}

/// Mapping options of a single property
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyOptions {
    field_type: Option<String>,
    search_priority: SearchPriority,
    custom_fields: Map<String, Value>,
    custom_options: Map<String, Value>,
}

impl PropertyOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine field type (default: `text`)
    #[must_use]
    pub fn field_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    #[must_use]
    pub fn search_priority(mut self, priority: SearchPriority) -> Self {
        self.search_priority = priority;
        self
    }

    /// Extra multi-field next to `.retrieve`
    #[must_use]
    pub fn custom_field(mut self, name: impl Into<String>, mapping: Value) -> Self {
        self.custom_fields.insert(name.into(), mapping);
        self
    }

    /// Extra top-level mapping parameter; overrides generated ones.
    #[must_use]
    pub fn custom_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.custom_options.insert(key.into(), value);
        self
    }
}

/// Field mapping for one property.
///
/// `text` properties get a `keyword` companion, other types a companion of
/// the same type. `geo_point` properties get none (they are filtered with
/// `geoDistance` on the field itself).
pub fn property(options: &PropertyOptions) -> Value {
    let field_type = options.field_type.as_deref().unwrap_or(DEFAULT_FIELD_TYPE);

    let mut mapping = Map::new();
    mapping.insert("type".into(), json!(field_type));

    if let Some(search_field) = options.search_priority.search_field() {
        mapping.insert("copy_to".into(), json!(search_field));
    }

    let mut fields = options.custom_fields.clone();
    if field_type != GEO_POINT {
        let companion = if field_type == DEFAULT_FIELD_TYPE {
            json!({"type": "keyword", "ignore_above": KEYWORD_IGNORE_ABOVE})
        } else {
            json!({"type": field_type})
        };
        fields.insert(RETRIEVE_SUBFIELD.into(), companion);
    }
    if !fields.is_empty() {
        mapping.insert("fields".into(), Value::Object(fields));
    }

    for (key, value) in &options.custom_options {
        mapping.insert(key.clone(), value.clone());
    }
    Value::Object(mapping)
}

/// Settings enabling ngram free-text search on the `_searchN` fields.
fn autocomplete_settings() -> Value {
    json!({
        "max_ngram_diff": 20,
        "analysis": {
            "filter": {
                "ngram_filter": {
                    "type": "ngram",
                    "min_gram": 1,
                    "max_gram": 20,
                    "token_chars": ["letter", "digit"]
                }
            },
            "analyzer": {
                "ngram_analyzer": {
                    "type": "custom",
                    "tokenizer": "whitespace",
                    "filter": ["lowercase", "asciifolding", "ngram_filter"]
                },
                "whitespace_analyzer": {
                    "type": "custom",
                    "tokenizer": "whitespace",
                    "filter": ["lowercase", "asciifolding"]
                },
                "email_analyzer": {
                    "type": "custom",
                    "tokenizer": "uax_url_email",
                    "filter": ["lowercase"]
                }
            }
        }
    })
}

/// Index definition builder producing the `{settings, mappings}` body.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexConfig {
    properties: Map<String, Value>,
    searchable: bool,
    custom_settings: Map<String, Value>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            properties: Map::new(),
            searchable: true,
            custom_settings: Map::new(),
        }
    }
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a property mapped with [`property`].
    #[must_use]
    pub fn property(self, name: impl Into<String>, options: PropertyOptions) -> Self {
        self.raw_property(name, property(&options))
    }

    /// Add a property with a hand-written mapping.
    #[must_use]
    pub fn raw_property(mut self, name: impl Into<String>, mapping: Value) -> Self {
        self.properties.insert(name.into(), mapping);
        self
    }

    /// Without free-text search there are no `_searchN` fields and no analyzers.
    #[must_use]
    pub fn searchable(mut self, searchable: bool) -> Self {
        self.searchable = searchable;
        self
    }

    #[must_use]
    pub fn custom_setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.custom_settings.insert(key.into(), value);
        self
    }

    pub fn to_json(&self) -> Value {
        let mut settings = Map::new();
        if self.searchable {
            if let Value::Object(base) = autocomplete_settings() {
                settings = base;
            }
        }
        for (key, value) in &self.custom_settings {
            settings.insert(key.clone(), value.clone());
        }

        let mut properties = self.properties.clone();
        if self.searchable {
            for level in 1..=5 {
                properties.insert(
                    format!("_search{level}"),
                    json!({
                        "type": "text",
                        "analyzer": "ngram_analyzer",
                        "search_analyzer": "whitespace_analyzer"
                    }),
                );
            }
        }

        let mut body = Map::new();
        if !settings.is_empty() {
            body.insert("settings".into(), Value::Object(settings));
        }
        body.insert(
            "mappings".into(),
            json!({"dynamic": false, "properties": properties}),
        );
        Value::Object(body)
    }
}

/// Create `name` with the given definition.
pub async fn create_index<B>(backend: &B, name: &str, config: &IndexConfig) -> Result<(), RetrieveError>
where
    B: SearchBackend + ?Sized,
{
    match backend.create_index(name, &config.to_json()).await {
        Ok(()) => {
            metrics::record_index_operation("create", true);
            info!(index = %name, "Search index created");
            Ok(())
        }
        Err(e) => {
            metrics::record_index_operation("create", false);
            warn!(index = %name, error = %e, "Failed to create search index");
            Err(e)
        }
    }
}

pub async fn delete_index<B>(backend: &B, name: &str) -> Result<(), RetrieveError>
where
    B: SearchBackend + ?Sized,
{
    match backend.delete_index(name).await {
        Ok(()) => {
            metrics::record_index_operation("delete", true);
            info!(index = %name, "Search index deleted");
            Ok(())
        }
        Err(e) => {
            metrics::record_index_operation("delete", false);
            warn!(index = %name, error = %e, "Failed to delete search index");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InMemoryBackend;

    #[test]
    fn test_default_property_is_text() {
        assert_eq!(
            property(&PropertyOptions::new()),
            json!({
                "type": "text",
                "copy_to": "_search3",
                "fields": {"retrieve": {"type": "keyword", "ignore_above": 256}}
            })
        );
    }

    #[test]
    fn test_typed_property_companion() {
        let mapping = property(
            &PropertyOptions::new()
                .field_type("integer")
                .search_priority(SearchPriority::Level5),
        );
        assert_eq!(mapping["copy_to"], json!("_search5"));
        assert_eq!(mapping["fields"]["retrieve"], json!({"type": "integer"}));
    }

    #[test]
    fn test_unsearchable_geo_point() {
        let mapping = property(
            &PropertyOptions::new()
                .field_type("geo_point")
                .search_priority(SearchPriority::None),
        );
        assert_eq!(mapping, json!({"type": "geo_point"}));
    }

    #[test]
    fn test_custom_fields_and_options() {
        let mapping = property(
            &PropertyOptions::new()
                .custom_field("email", json!({"type": "text", "analyzer": "email_analyzer"}))
                .custom_option("copy_to", json!("_search1"))
                .custom_option("index", json!(false)),
        );
        assert_eq!(mapping["copy_to"], json!("_search1"));
        assert_eq!(mapping["index"], json!(false));
        assert_eq!(mapping["fields"]["email"]["analyzer"], json!("email_analyzer"));
        assert!(mapping["fields"].get("retrieve").is_some());
    }

    #[test]
    fn test_search_priority_levels() {
        assert_eq!(SearchPriority::default(), SearchPriority::Level3);
        assert_eq!(SearchPriority::None.search_field(), None);
        assert_eq!(SearchPriority::Level1.search_field().as_deref(), Some("_search1"));
    }

    #[test]
    fn test_index_config_searchable() {
        let body = IndexConfig::new()
            .property("string", PropertyOptions::new())
            .custom_setting("number_of_replicas", json!(0))
            .to_json();
        assert_eq!(body["settings"]["max_ngram_diff"], json!(20));
        assert_eq!(body["settings"]["number_of_replicas"], json!(0));
        assert!(body["settings"]["analysis"]["analyzer"]["ngram_analyzer"].is_object());
        assert_eq!(body["mappings"]["dynamic"], json!(false));
        let properties = body["mappings"]["properties"].as_object().unwrap();
        assert_eq!(properties.len(), 6);
        assert_eq!(properties["_search4"]["search_analyzer"], json!("whitespace_analyzer"));
    }

    #[test]
    fn test_index_config_not_searchable() {
        let body = IndexConfig::new()
            .raw_property("raw", json!({"type": "keyword"}))
            .searchable(false)
            .to_json();
        assert!(body.get("settings").is_none());
        assert_eq!(body["mappings"]["properties"], json!({"raw": {"type": "keyword"}}));
    }

    #[tokio::test]
    async fn test_create_and_delete_index() {
        let backend = InMemoryBackend::new();
        let config = IndexConfig::new().property("n", PropertyOptions::new().field_type("integer"));
        create_index(&backend, "items", &config).await.unwrap();
        assert!(create_index(&backend, "items", &config).await.is_err());
        delete_index(&backend, "items").await.unwrap();
        assert!(delete_index(&backend, "items").await.is_err());
    }
}
