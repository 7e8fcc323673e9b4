// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Filter tree AST
//!
//! A type-safe representation of the declarative filter description callers
//! hand to [`retrieve`](crate::retrieve()). The tree deserializes from the wire
//! shape used by HTTP callers:
//!
//! ```json
//! {
//!   "op": "or",
//!   "filters": [
//!     { "attributeName": "number", "op": "and",
//!       "filters": [{ "op": ">", "value": 3 }, { "op": "<", "value": 6 }] },
//!     { "attributeName": "exists", "filters": [{ "op": "exists" }] }
//!   ]
//! }
//! ```
//!
//! # Example
//!
//! ```rust
//! use search_retrieve::filter::{FilterNode, OperatorLeaf};
//!
//! // number > 3 AND number < 6
//! let range = FilterNode::attribute_all(
//!     "number",
//!     vec![OperatorLeaf::gt(3), OperatorLeaf::lt(6)],
//! );
//!
//! // (number in range) OR status = "active"
//! let tree = FilterNode::or(vec![
//!     range,
//!     FilterNode::attribute("status", OperatorLeaf::eq("active")),
//! ]);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::FilterError;

/// Boolean combinator of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    fn from_token(token: &str) -> Result<Self, FilterError> {
        match token {
            "and" => Ok(Combinator::And),
            "or" => Ok(Combinator::Or),
            other => Err(FilterError::InvalidOperator(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Combinator::And => "and",
            Combinator::Or => "or",
        }
    }
}

/// Filter tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawNode", into = "RawNode")]
pub enum FilterNode {
    /// Boolean combination of groups: `{ op?, filters }`
    Boolean(BooleanGroup),
    /// Group fixing the field name for everything below it: `{ attributeName, op?, filters }`
    Attribute(AttributeGroup),
    /// Operator filter: `{ op, value? }`. Only valid below an [`AttributeGroup`].
    Leaf(OperatorLeaf),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BooleanGroup {
    /// May be omitted only when there is exactly one child.
    pub combinator: Option<Combinator>,
    pub children: Vec<FilterNode>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeGroup {
    pub attribute_name: String,
    /// May be omitted only when there is exactly one child.
    pub combinator: Option<Combinator>,
    /// Either all [`FilterNode::Leaf`], or all boolean sub-groups that inherit
    /// `attribute_name`.
    pub children: Vec<FilterNode>,
}

/// Operator filter, the base case of the tree.
#[derive(Debug, Clone, PartialEq)]
pub enum OperatorLeaf {
    /// `=`, `!=`, `>`, `>=`, `<`, `<=`, `match`, `startsWith`, `contains`
    Value { op: ValueOperator, value: FilterValue },
    /// `exists`, `notExists`
    Existence(ExistenceOperator),
    /// `geoDistance`
    GeoDistance {
        origin: Coordinates,
        distance: f64,
        unit: DistanceUnit,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOperator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    Match,
    StartsWith,
    /// Part of the wire vocabulary but rejected by the compiler.
    Contains,
}

impl ValueOperator {
    fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "=" => ValueOperator::Eq,
            "!=" => ValueOperator::NotEq,
            ">" => ValueOperator::Gt,
            ">=" => ValueOperator::Gte,
            "<" => ValueOperator::Lt,
            "<=" => ValueOperator::Lte,
            "match" => ValueOperator::Match,
            "startsWith" => ValueOperator::StartsWith,
            "contains" => ValueOperator::Contains,
            _ => return None,
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ValueOperator::Eq => "=",
            ValueOperator::NotEq => "!=",
            ValueOperator::Gt => ">",
            ValueOperator::Gte => ">=",
            ValueOperator::Lt => "<",
            ValueOperator::Lte => "<=",
            ValueOperator::Match => "match",
            ValueOperator::StartsWith => "startsWith",
            ValueOperator::Contains => "contains",
        }
    }

    /// Bound name inside a `range` query; `None` for non-range operators.
    pub fn range_bound(self) -> Option<&'static str> {
        match self {
            ValueOperator::Gt => Some("gt"),
            ValueOperator::Gte => Some("gte"),
            ValueOperator::Lt => Some("lt"),
            ValueOperator::Lte => Some("lte"),
            ValueOperator::Eq
            | ValueOperator::NotEq
            | ValueOperator::Match
            | ValueOperator::StartsWith
            | ValueOperator::Contains => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExistenceOperator {
    Exists,
    NotExists,
}

/// Value compared by a [`ValueOperator`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Number(Number),
    Text(String),
}

impl FilterValue {
    pub fn to_json(&self) -> Value {
        match self {
            FilterValue::Number(n) => Value::Number(n.clone()),
            FilterValue::Text(s) => Value::String(s.clone()),
        }
    }
}

impl TryFrom<Value> for FilterValue {
    type Error = FilterError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Number(n) => Ok(FilterValue::Number(n)),
            Value::String(s) => Ok(FilterValue::Text(s)),
            other => Err(FilterError::Invalid(format!(
                "value must be a string or a number, got {other}"
            ))),
        }
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl From<i32> for FilterValue {
    fn from(n: i32) -> Self {
        FilterValue::Number(n.into())
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n.into())
    }
}

impl From<u64> for FilterValue {
    fn from(n: u64) -> Self {
        FilterValue::Number(n.into())
    }
}

impl From<f64> for FilterValue {
    fn from(n: f64) -> Self {
        // NaN and infinities have no JSON number form
        Number::from_f64(n).map_or_else(|| FilterValue::Text(n.to_string()), FilterValue::Number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// Elasticsearch distance units. Every accepted spelling is kept so the
/// rendered distance matches what the caller sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceUnit {
    #[serde(rename = "mi")]
    Mi,
    #[serde(rename = "miles")]
    Miles,
    #[serde(rename = "yd")]
    Yd,
    #[serde(rename = "yards")]
    Yards,
    #[serde(rename = "ft")]
    Ft,
    #[serde(rename = "feet")]
    Feet,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "inch")]
    Inch,
    #[serde(rename = "km")]
    Km,
    #[serde(rename = "kilometers")]
    Kilometers,
    #[serde(rename = "m")]
    M,
    #[serde(rename = "meters")]
    Meters,
    #[serde(rename = "cm")]
    Cm,
    #[serde(rename = "centimeters")]
    Centimeters,
    #[serde(rename = "mm")]
    Mm,
    #[serde(rename = "millimeters")]
    Millimeters,
    #[serde(rename = "nm")]
    Nm,
    #[serde(rename = "nmi")]
    Nmi,
    #[serde(rename = "nauticalmiles")]
    NauticalMiles,
}

impl DistanceUnit {
    /// All units, shortest spelling first within each family.
    pub const ALL: [DistanceUnit; 19] = [
        DistanceUnit::Mi,
        DistanceUnit::Miles,
        DistanceUnit::Yd,
        DistanceUnit::Yards,
        DistanceUnit::Ft,
        DistanceUnit::Feet,
        DistanceUnit::In,
        DistanceUnit::Inch,
        DistanceUnit::Km,
        DistanceUnit::Kilometers,
        DistanceUnit::M,
        DistanceUnit::Meters,
        DistanceUnit::Cm,
        DistanceUnit::Centimeters,
        DistanceUnit::Mm,
        DistanceUnit::Millimeters,
        DistanceUnit::Nm,
        DistanceUnit::Nmi,
        DistanceUnit::NauticalMiles,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceUnit::Mi => "mi",
            DistanceUnit::Miles => "miles",
            DistanceUnit::Yd => "yd",
            DistanceUnit::Yards => "yards",
            DistanceUnit::Ft => "ft",
            DistanceUnit::Feet => "feet",
            DistanceUnit::In => "in",
            DistanceUnit::Inch => "inch",
            DistanceUnit::Km => "km",
            DistanceUnit::Kilometers => "kilometers",
            DistanceUnit::M => "m",
            DistanceUnit::Meters => "meters",
            DistanceUnit::Cm => "cm",
            DistanceUnit::Centimeters => "centimeters",
            DistanceUnit::Mm => "mm",
            DistanceUnit::Millimeters => "millimeters",
            DistanceUnit::Nm => "nm",
            DistanceUnit::Nmi => "nmi",
            DistanceUnit::NauticalMiles => "nauticalmiles",
        }
    }

    pub fn meters(&self) -> f64 {
        match self {
            DistanceUnit::Mi | DistanceUnit::Miles => 1609.344,
            DistanceUnit::Yd | DistanceUnit::Yards => 0.9144,
            DistanceUnit::Ft | DistanceUnit::Feet => 0.3048,
            DistanceUnit::In | DistanceUnit::Inch => 0.0254,
            DistanceUnit::Km | DistanceUnit::Kilometers => 1000.0,
            DistanceUnit::M | DistanceUnit::Meters => 1.0,
            DistanceUnit::Cm | DistanceUnit::Centimeters => 0.01,
            DistanceUnit::Mm | DistanceUnit::Millimeters => 0.001,
            DistanceUnit::Nm | DistanceUnit::Nmi | DistanceUnit::NauticalMiles => 1852.0,
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|u| u.as_str() == token)
    }
}

impl FilterNode {
    /// Parse the wire JSON shape, keeping the structured error.
    pub fn from_json(value: &Value) -> Result<Self, FilterError> {
        let raw = RawNode::deserialize(value).map_err(|e| FilterError::Invalid(e.to_string()))?;
        FilterNode::try_from(raw)
    }

    /// Render the wire JSON shape accepted by [`FilterNode::from_json`].
    pub fn to_json(&self) -> Result<Value, FilterError> {
        serde_json::to_value(RawNode::from(self.clone())).map_err(|e| FilterError::Invalid(e.to_string()))
    }

    /// Single operator filter on an attribute, combinator omitted.
    pub fn attribute(name: impl Into<String>, leaf: OperatorLeaf) -> Self {
        FilterNode::Attribute(AttributeGroup {
            attribute_name: name.into(),
            combinator: None,
            children: vec![FilterNode::Leaf(leaf)],
        })
    }

    /// All operator filters must hold on the attribute.
    pub fn attribute_all(name: impl Into<String>, leaves: Vec<OperatorLeaf>) -> Self {
        FilterNode::Attribute(AttributeGroup {
            attribute_name: name.into(),
            combinator: Some(Combinator::And),
            children: leaves.into_iter().map(FilterNode::Leaf).collect(),
        })
    }

    /// At least one operator filter must hold on the attribute.
    pub fn attribute_any(name: impl Into<String>, leaves: Vec<OperatorLeaf>) -> Self {
        FilterNode::Attribute(AttributeGroup {
            attribute_name: name.into(),
            combinator: Some(Combinator::Or),
            children: leaves.into_iter().map(FilterNode::Leaf).collect(),
        })
    }

    /// Attribute group over nested sub-groups, e.g. `number: (>3 and <6) or =9`.
    pub fn attribute_groups(
        name: impl Into<String>,
        combinator: Option<Combinator>,
        groups: Vec<FilterNode>,
    ) -> Self {
        FilterNode::Attribute(AttributeGroup {
            attribute_name: name.into(),
            combinator,
            children: groups,
        })
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Boolean(BooleanGroup {
            combinator: Some(Combinator::And),
            children,
        })
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Boolean(BooleanGroup {
            combinator: Some(Combinator::Or),
            children,
        })
    }

    /// Group with the combinator omitted; valid only with a single child.
    pub fn group(children: Vec<FilterNode>) -> Self {
        FilterNode::Boolean(BooleanGroup {
            combinator: None,
            children,
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, FilterNode::Leaf(_))
    }
}

impl OperatorLeaf {
    fn value(op: ValueOperator, value: impl Into<FilterValue>) -> Self {
        OperatorLeaf::Value {
            op,
            value: value.into(),
        }
    }

    pub fn eq(value: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::Eq, value)
    }

    pub fn not_eq(value: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::NotEq, value)
    }

    pub fn gt(value: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::Gt, value)
    }

    pub fn gte(value: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::Gte, value)
    }

    pub fn lt(value: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::Lt, value)
    }

    pub fn lte(value: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::Lte, value)
    }

    /// Full-text match on the analyzed field
    pub fn matches(text: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::Match, text)
    }

    pub fn starts_with(prefix: impl Into<FilterValue>) -> Self {
        Self::value(ValueOperator::StartsWith, prefix)
    }

    pub fn exists() -> Self {
        OperatorLeaf::Existence(ExistenceOperator::Exists)
    }

    pub fn not_exists() -> Self {
        OperatorLeaf::Existence(ExistenceOperator::NotExists)
    }

    pub fn geo_distance(origin: Coordinates, distance: f64, unit: DistanceUnit) -> Self {
        OperatorLeaf::GeoDistance {
            origin,
            distance,
            unit,
        }
    }

    /// Wire token of the operator, e.g. `">="` or `"geoDistance"`.
    pub fn token(&self) -> &'static str {
        match self {
            OperatorLeaf::Value { op, .. } => op.as_str(),
            OperatorLeaf::Existence(ExistenceOperator::Exists) => "exists",
            OperatorLeaf::Existence(ExistenceOperator::NotExists) => "notExists",
            OperatorLeaf::GeoDistance { .. } => "geoDistance",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Wire representation
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attribute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    op: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    filters: Option<Vec<RawNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    origin: Option<Coordinates>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    unit: Option<DistanceUnit>,
}

impl TryFrom<RawNode> for FilterNode {
    type Error = FilterError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let Some(filters) = raw.filters else {
            if raw.attribute_name.is_some() {
                return Err(FilterError::Invalid(
                    "attributeName requires a `filters` list".into(),
                ));
            }
            return leaf_from_raw(raw.op, raw.value, raw.origin, raw.distance, raw.unit)
                .map(FilterNode::Leaf);
        };

        let combinator = raw.op.as_deref().map(Combinator::from_token).transpose()?;
        let children = filters
            .into_iter()
            .map(FilterNode::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(match raw.attribute_name {
            Some(attribute_name) => FilterNode::Attribute(AttributeGroup {
                attribute_name,
                combinator,
                children,
            }),
            None => FilterNode::Boolean(BooleanGroup {
                combinator,
                children,
            }),
        })
    }
}

fn leaf_from_raw(
    op: Option<String>,
    value: Option<Value>,
    origin: Option<Coordinates>,
    distance: Option<f64>,
    unit: Option<DistanceUnit>,
) -> Result<OperatorLeaf, FilterError> {
    let op = op.ok_or_else(|| FilterError::Invalid("operator filter without `op`".into()))?;
    match op.as_str() {
        "exists" => Ok(OperatorLeaf::exists()),
        "notExists" => Ok(OperatorLeaf::not_exists()),
        "geoDistance" => {
            let missing = |field: &str| FilterError::Invalid(format!("geoDistance requires `{field}`"));
            Ok(OperatorLeaf::GeoDistance {
                origin: origin.ok_or_else(|| missing("origin"))?,
                distance: distance.ok_or_else(|| missing("distance"))?,
                unit: unit.ok_or_else(|| missing("unit"))?,
            })
        }
        token => {
            let op = ValueOperator::from_token(token)
                .ok_or_else(|| FilterError::InvalidOperator(token.to_string()))?;
            let value = value
                .ok_or_else(|| FilterError::Invalid(format!("operator '{token}' requires a `value`")))?;
            Ok(OperatorLeaf::Value {
                op,
                value: FilterValue::try_from(value)?,
            })
        }
    }
}

impl From<FilterNode> for RawNode {
    fn from(node: FilterNode) -> Self {
        match node {
            FilterNode::Boolean(group) => RawNode {
                op: group.combinator.map(|c| c.as_str().to_string()),
                filters: Some(group.children.into_iter().map(RawNode::from).collect()),
                ..Default::default()
            },
            FilterNode::Attribute(group) => RawNode {
                attribute_name: Some(group.attribute_name),
                op: group.combinator.map(|c| c.as_str().to_string()),
                filters: Some(group.children.into_iter().map(RawNode::from).collect()),
                ..Default::default()
            },
            FilterNode::Leaf(leaf) => {
                let op = Some(leaf.token().to_string());
                match leaf {
                    OperatorLeaf::Value { value, .. } => RawNode {
                        op,
                        value: Some(value.to_json()),
                        ..Default::default()
                    },
                    OperatorLeaf::Existence(_) => RawNode {
                        op,
                        ..Default::default()
                    },
                    OperatorLeaf::GeoDistance {
                        origin,
                        distance,
                        unit,
                    } => RawNode {
                        op,
                        origin: Some(origin),
                        distance: Some(distance),
                        unit: Some(unit),
                        ..Default::default()
                    },
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_range_bound() {
        assert_eq!(ValueOperator::Gt.range_bound(), Some("gt"));
        assert_eq!(ValueOperator::Gte.range_bound(), Some("gte"));
        assert_eq!(ValueOperator::Lt.range_bound(), Some("lt"));
        assert_eq!(ValueOperator::Lte.range_bound(), Some("lte"));
        for op in [
            ValueOperator::Eq,
            ValueOperator::NotEq,
            ValueOperator::Match,
            ValueOperator::StartsWith,
            ValueOperator::Contains,
        ] {
            assert_eq!(op.range_bound(), None, "{}", op.as_str());
        }
    }

    #[test]
    fn test_parse_single_attribute_filter() {
        let node = FilterNode::from_json(&json!({
            "filters": [{ "attributeName": "number", "filters": [{ "op": "=", "value": 5 }] }]
        }))
        .unwrap();

        assert_eq!(
            node,
            FilterNode::group(vec![FilterNode::attribute("number", OperatorLeaf::eq(5))])
        );
    }

    #[test]
    fn test_parse_nested_tree() {
        let node: FilterNode = serde_json::from_value(json!({
            "op": "or",
            "filters": [
                {
                    "op": "and",
                    "filters": [
                        { "attributeName": "exists", "filters": [{ "op": "exists" }] },
                        {
                            "attributeName": "number",
                            "op": "or",
                            "filters": [{ "op": "<", "value": 0 }, { "op": ">=", "value": 4 }]
                        }
                    ]
                },
                { "attributeName": "string", "filters": [{ "op": "startsWith", "value": "my" }] }
            ]
        }))
        .unwrap();

        match node {
            FilterNode::Boolean(BooleanGroup { combinator, children }) => {
                assert_eq!(combinator, Some(Combinator::Or));
                assert_eq!(children.len(), 2);
                assert!(matches!(children[0], FilterNode::Boolean(_)));
                assert!(matches!(children[1], FilterNode::Attribute(_)));
            }
            _ => panic!("Expected Boolean node"),
        }
    }

    #[test]
    fn test_parse_geo_distance() {
        let node = FilterNode::from_json(&json!({
            "attributeName": "location",
            "filters": [{
                "op": "geoDistance",
                "origin": { "lat": 45.46, "lon": 9.19 },
                "distance": 12.5,
                "unit": "nauticalmiles"
            }]
        }))
        .unwrap();

        assert_eq!(
            node,
            FilterNode::attribute(
                "location",
                OperatorLeaf::geo_distance(
                    Coordinates { lat: 45.46, lon: 9.19 },
                    12.5,
                    DistanceUnit::NauticalMiles
                )
            )
        );
    }

    #[test]
    fn test_parse_unknown_operator() {
        let err = FilterNode::from_json(&json!({
            "attributeName": "number",
            "filters": [{ "op": "~=", "value": 1 }]
        }))
        .unwrap_err();
        assert_eq!(err, FilterError::InvalidOperator("~=".into()));
    }

    #[test]
    fn test_parse_unknown_combinator() {
        let err = FilterNode::from_json(&json!({ "op": "xor", "filters": [] })).unwrap_err();
        assert_eq!(err, FilterError::InvalidOperator("xor".into()));
    }

    #[test]
    fn test_parse_value_operator_without_value() {
        let err = FilterNode::from_json(&json!({
            "attributeName": "number",
            "filters": [{ "op": ">" }]
        }))
        .unwrap_err();
        assert!(matches!(err, FilterError::Invalid(_)));
    }

    #[test]
    fn test_contains_is_parsed() {
        let node = FilterNode::from_json(&json!({ "op": "contains", "value": "abc" })).unwrap();
        assert_eq!(node, FilterNode::Leaf(OperatorLeaf::Value {
            op: ValueOperator::Contains,
            value: FilterValue::Text("abc".into()),
        }));
    }

    #[test]
    fn test_wire_shape_survives_serialization() {
        let wire = json!({
            "op": "and",
            "filters": [
                { "attributeName": "string", "filters": [{ "op": "match", "value": "myString0" }] },
                { "attributeName": "exists", "filters": [{ "op": "notExists" }] }
            ]
        });
        let node = FilterNode::from_json(&wire).unwrap();
        assert_eq!(node.to_json().unwrap(), wire);
    }

    #[test]
    fn test_geo_distance_to_json() {
        let node = FilterNode::attribute(
            "location",
            OperatorLeaf::geo_distance(Coordinates { lat: 45.07, lon: 7.69 }, 150.0, DistanceUnit::Km),
        );
        assert_eq!(
            node.to_json().unwrap(),
            json!({
                "attributeName": "location",
                "filters": [{
                    "op": "geoDistance",
                    "origin": {"lat": 45.07, "lon": 7.69},
                    "distance": 150.0,
                    "unit": "km"
                }]
            })
        );
    }

    #[test]
    fn test_distance_unit_spellings() {
        for unit in DistanceUnit::ALL {
            assert_eq!(DistanceUnit::parse(unit.as_str()), Some(unit));
            let parsed: DistanceUnit = serde_json::from_value(json!(unit.as_str())).unwrap();
            assert_eq!(parsed, unit);
        }
        assert_eq!(DistanceUnit::Km.meters(), DistanceUnit::Kilometers.meters());
        assert_eq!(DistanceUnit::parse("furlongs"), None);
    }

    #[test]
    fn test_filter_value_conversions() {
        assert_eq!(FilterValue::from(5).to_json(), json!(5));
        assert_eq!(FilterValue::from(2.5).to_json(), json!(2.5));
        assert_eq!(FilterValue::from("abc").to_json(), json!("abc"));
        assert!(FilterValue::try_from(json!(true)).is_err());
    }
}
