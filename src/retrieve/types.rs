// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Page and ordering types exposed by the retrieve API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::cursor::Cursor;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

/// One caller ordering entry. On the wire: `{ "number": "asc" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, Direction>", into = "BTreeMap<String, Direction>")]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

impl OrderBy {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: Direction::Desc,
        }
    }
}

impl TryFrom<BTreeMap<String, Direction>> for OrderBy {
    type Error = String;

    fn try_from(map: BTreeMap<String, Direction>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "orderBy entry must name exactly one field, got {}",
                map.len()
            ));
        }
        let (field, direction) = map
            .into_iter()
            .next()
            .ok_or_else(|| "empty orderBy entry".to_string())?;
        Ok(Self { field, direction })
    }
}

impl From<OrderBy> for BTreeMap<String, Direction> {
    fn from(order: OrderBy) -> Self {
        BTreeMap::from([(order.field, order.direction)])
    }
}

/// Pagination metadata of a [`Page`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// Position after the last item; absent when no further results exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_cursor: Option<Cursor>,
    /// Number of items on this page
    pub size: usize,
    /// Total number of matching documents reported by the backend
    pub total: u64,
}

/// One cursor-paginated page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<Item> {
    pub items: Vec<Item>,
    pub page_info: PageInfo,
}

impl<Item> Page<Item> {
    pub fn has_next_page(&self) -> bool {
        self.page_info.end_cursor.is_some()
    }

    /// Cursor to pass to the next call, if any.
    pub fn end_cursor(&self) -> Option<&Cursor> {
        self.page_info.end_cursor.as_ref()
    }
}
