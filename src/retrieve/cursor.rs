// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Pagination cursor
//!
//! A cursor maps every sort field name to the sort value of the last item of
//! a page:
//!
//! ```json
//! { "number.retrieve": 2, "_id": "Xk3fZ4oB" }
//! ```
//!
//! Callers hand it back verbatim (as JSON or as the opaque token produced by
//! [`Cursor::to_token`]) and it is decoded into a `search_after` vector in
//! sort key order.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::request::SortKey;
use crate::error::RetrieveError;

/// Largest integer a 64-bit float represents exactly (2^53 - 1).
pub const MAX_SAFE_INTEGER: u64 = 9_007_199_254_740_991;

/// Sent in place of sort values that lost precision in a float round-trip.
///
/// The engine reports a missing numeric sort value as `i64::MAX`. Passed
/// through a float it becomes `9223372036854775808`, which the engine rejects
/// as out of range for a long.
pub const LONG_MIN_SENTINEL: &str = "-9223372036854775808";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(Map<String, Value>);

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a sort field value
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.0.insert(field.into(), value);
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Cursor positioned on a hit, given the hit's sort values.
    ///
    /// Fields without a corresponding sort value are left out, which makes
    /// the cursor fail to decode rather than resume at a wrong position.
    pub fn from_sort_values(sort: &SortKey, values: &[Value]) -> Self {
        let map = sort
            .fields()
            .iter()
            .zip(values)
            .map(|(field, value)| (field.path.clone(), value.clone()))
            .collect();
        Self(map)
    }

    /// Decode into a `search_after` vector following `sort`'s field order.
    pub fn search_after(&self, sort: &SortKey) -> Result<Vec<Value>, RetrieveError> {
        sort.fields()
            .iter()
            .map(|field| match self.0.get(&field.path) {
                None | Some(Value::Null) => Err(RetrieveError::MalformedCursor(format!(
                    "missing value for sort field '{}'",
                    field.path
                ))),
                Some(value) => Ok(sanitize_sort_value(value.clone())),
            })
            .collect()
    }

    /// Opaque URL-safe token for callers that pass cursors around as strings.
    pub fn to_token(&self) -> String {
        URL_SAFE_NO_PAD.encode(Value::Object(self.0.clone()).to_string())
    }

    pub fn from_token(token: &str) -> Result<Self, RetrieveError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|e| RetrieveError::MalformedCursor(format!("invalid token encoding: {e}")))?;
        let map: Map<String, Value> = serde_json::from_slice(&bytes)
            .map_err(|e| RetrieveError::MalformedCursor(format!("invalid token payload: {e}")))?;
        Ok(Self(map))
    }
}

impl From<Map<String, Value>> for Cursor {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

/// Replace whole numbers outside the float-safe integer range with
/// [`LONG_MIN_SENTINEL`]; every other value passes through unchanged.
pub fn sanitize_sort_value(value: Value) -> Value {
    match &value {
        Value::Number(n) if is_unsafe_integer(n) => Value::String(LONG_MIN_SENTINEL.to_string()),
        _ => value,
    }
}

fn is_unsafe_integer(n: &Number) -> bool {
    if let Some(i) = n.as_i64() {
        return i.unsigned_abs() > MAX_SAFE_INTEGER;
    }
    if let Some(u) = n.as_u64() {
        return u > MAX_SAFE_INTEGER;
    }
    n.as_f64()
        .is_some_and(|f| f.is_finite() && f.fract() == 0.0 && f.abs() > MAX_SAFE_INTEGER as f64)
}
