// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter Compiler
//!
//! Translates a [`FilterNode`] tree to the Elasticsearch `bool` query DSL.
//!
//! # Generated Query DSL
//!
//! ```text
//! =           {"term":   {"<attr>.retrieve": v}}             filter
//! !=          {"term":   {"<attr>.retrieve": v}}             must_not
//! > >= < <=   {"range":  {"<attr>.retrieve": {"gt": v}}}     filter
//! startsWith  {"prefix": {"<attr>.retrieve": v}}             filter
//! match       {"match":  {"<attr>": v}}                      filter
//! exists      {"exists": {"field": "<attr>.retrieve"}}       filter
//! notExists   {"exists": {"field": "<attr>.retrieve"}}       must_not
//! geoDistance {"geo_distance": {"distance": "10km", "<attr>": {lat, lon}}}  filter
//!
//! or          {"should": [{"bool": ..}, ..], "minimum_should_match": 1}
//! and/leaves  filter and must_not entries appended in order
//! and/groups  {"must": [{"bool": ..}, ..]}
//! ```
//!
//! Exact, range, prefix and existence checks target the non-analyzed
//! `<attr>.retrieve` sub-field that the index mapping adds to every property
//! (see [`crate::mapping`]). `match` targets the analyzed field itself.

use serde_json::{json, Value};

use super::clause::CompiledClause;
use super::types::{Combinator, ExistenceOperator, FilterNode, OperatorLeaf, ValueOperator};
use crate::error::FilterError;

/// Suffix of the exact (keyword/numeric) companion field of every attribute.
pub const RETRIEVE_SUFFIX: &str = ".retrieve";

/// Exact companion field name for an attribute: `number` -> `number.retrieve`
pub fn retrieve_field(attribute_name: &str) -> String {
    format!("{attribute_name}{RETRIEVE_SUFFIX}")
}

/// Compile the top-level filter of a request.
///
/// Returns `{"bool": ...}` for a tree and `{"match_all": {}}` when there is none.
pub fn compile_filter(filters: Option<&FilterNode>) -> Result<Value, FilterError> {
    match filters {
        Some(node) => Ok(FilterCompiler::compile(node, None)?.into_bool()),
        None => Ok(json!({ "match_all": {} })),
    }
}

/// Filter tree compiler
pub struct FilterCompiler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildKind {
    Leaves,
    Groups,
}

impl FilterCompiler {
    /// Compile `node` under the attribute name set by its ancestors, if any.
    pub fn compile(
        node: &FilterNode,
        inherited_attribute: Option<&str>,
    ) -> Result<CompiledClause, FilterError> {
        match node {
            FilterNode::Leaf(leaf) => {
                let attribute = inherited_attribute
                    .ok_or_else(|| FilterError::UnresolvedAttribute(leaf.token().to_string()))?;
                Self::compile_leaf(leaf, attribute)
            }
            FilterNode::Boolean(group) => {
                Self::compile_group(group.combinator, &group.children, inherited_attribute)
            }
            FilterNode::Attribute(group) => {
                if let Some(outer) = inherited_attribute {
                    if outer != group.attribute_name {
                        return Err(FilterError::AttributeOverride {
                            outer: outer.to_string(),
                            inner: group.attribute_name.clone(),
                        });
                    }
                }
                Self::compile_group(group.combinator, &group.children, Some(&group.attribute_name))
            }
        }
    }

    fn compile_group(
        combinator: Option<Combinator>,
        children: &[FilterNode],
        attribute: Option<&str>,
    ) -> Result<CompiledClause, FilterError> {
        let kind = Self::classify(children)?;

        // Single child: the combinator is irrelevant and may be omitted
        let combinator = match combinator {
            _ if children.len() == 1 => return Self::compile(&children[0], attribute),
            None => return Err(FilterError::MissingOperator(children.len())),
            Some(c) => c,
        };

        match (combinator, kind) {
            (Combinator::Or, _) => {
                let should = children
                    .iter()
                    .map(|child| Self::compile(child, attribute).map(CompiledClause::into_bool))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledClause::any_of(should))
            }
            (Combinator::And, ChildKind::Leaves) => {
                children.iter().try_fold(CompiledClause::default(), |acc, child| {
                    Ok(acc.merge(Self::compile(child, attribute)?))
                })
            }
            (Combinator::And, ChildKind::Groups) => {
                let must = children
                    .iter()
                    .map(|child| Self::compile(child, attribute).map(CompiledClause::into_bool))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CompiledClause::all_of(must))
            }
        }
    }

    /// Children of a group are either all operator filters or all groups.
    fn classify(children: &[FilterNode]) -> Result<ChildKind, FilterError> {
        let first = children.first().ok_or(FilterError::MissingOperator(0))?;
        let leaves = first.is_leaf();
        if children.iter().any(|c| c.is_leaf() != leaves) {
            return Err(FilterError::MixedChildren);
        }
        Ok(if leaves { ChildKind::Leaves } else { ChildKind::Groups })
    }

    fn compile_leaf(leaf: &OperatorLeaf, attribute: &str) -> Result<CompiledClause, FilterError> {
        let exact = retrieve_field(attribute);

        match leaf {
            OperatorLeaf::Value { op, value } => {
                let value = value.to_json();
                match op {
                    ValueOperator::Eq => Ok(CompiledClause::filter(json!({ "term": { exact: value } }))),
                    ValueOperator::NotEq => {
                        Ok(CompiledClause::must_not(json!({ "term": { exact: value } })))
                    }
                    ValueOperator::Gt
                    | ValueOperator::Gte
                    | ValueOperator::Lt
                    | ValueOperator::Lte => {
                        let bound = op
                            .range_bound()
                            .ok_or_else(|| FilterError::InvalidOperator(op.as_str().to_string()))?;
                        Ok(CompiledClause::filter(
                            json!({ "range": { exact: { bound: value } } }),
                        ))
                    }
                    ValueOperator::StartsWith => {
                        Ok(CompiledClause::filter(json!({ "prefix": { exact: value } })))
                    }
                    ValueOperator::Match => {
                        Ok(CompiledClause::filter(json!({ "match": { attribute: value } })))
                    }
                    ValueOperator::Contains => Err(FilterError::InvalidOperator(op.as_str().to_string())),
                }
            }
            OperatorLeaf::Existence(ExistenceOperator::Exists) => {
                Ok(CompiledClause::filter(json!({ "exists": { "field": exact } })))
            }
            OperatorLeaf::Existence(ExistenceOperator::NotExists) => {
                Ok(CompiledClause::must_not(json!({ "exists": { "field": exact } })))
            }
            OperatorLeaf::GeoDistance {
                origin,
                distance,
                unit,
            } => Ok(CompiledClause::filter(json!({
                "geo_distance": {
                    "distance": format!("{}{}", distance, unit.as_str()),
                    attribute: { "lat": origin.lat, "lon": origin.lon },
                }
            }))),
        }
    }
}
