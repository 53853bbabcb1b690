//! Table state as reported by data-grid UIs
//!
//! Field names follow the camelCase JSON the UI sends, e.g.
//! `{"pagination":{"pageIndex":0,"pageSize":10},"sorting":[{"id":"email","desc":false}],
//!   "columnFilters":[{"id":"status","value":["active"]}],"globalFilter":""}`.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub page_index: u64,
    pub page_size: u64,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: 10,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub id: String,
    #[serde(default)]
    pub desc: bool,
}

/// Raw column filter value.
///
/// A list means "match any of these"; everything else is a single predicate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<String>),
}

impl FilterValue {
    /// Blank values are dropped instead of producing a predicate.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Text(s) => s.trim().is_empty(),
            FilterValue::List(items) => items.iter().all(|s| s.trim().is_empty()),
            FilterValue::Bool(_) | FilterValue::Number(_) => false,
        }
    }
}

impl From<bool> for FilterValue {
    fn from(b: bool) -> Self {
        FilterValue::Bool(b)
    }
}

impl From<i64> for FilterValue {
    fn from(n: i64) -> Self {
        FilterValue::Number(n.into())
    }
}

impl From<&str> for FilterValue {
    fn from(s: &str) -> Self {
        FilterValue::Text(s.to_owned())
    }
}

impl From<String> for FilterValue {
    fn from(s: String) -> Self {
        FilterValue::Text(s)
    }
}

impl<S: Into<String>> From<Vec<S>> for FilterValue {
    fn from(items: Vec<S>) -> Self {
        FilterValue::List(items.into_iter().map(Into::into).collect())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub id: String,
    #[serde(default)]
    pub value: Option<FilterValue>,
}

impl FilterCondition {
    pub fn new(id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self {
            id: id.into(),
            value: Some(value.into()),
        }
    }

    /// The value, unless it is missing or blank.
    #[must_use]
    pub fn active_value(&self) -> Option<&FilterValue> {
        self.value.as_ref().filter(|v| !v.is_blank())
    }
}

/// Complete description of the requested page. Built fresh per request.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    #[serde(default)]
    pub pagination: PaginationState,
    #[serde(default)]
    pub sorting: Vec<SortSpec>,
    #[serde(default)]
    pub column_filters: Vec<FilterCondition>,
    #[serde(default)]
    pub global_filter: String,
}

impl TableState {
    #[must_use]
    pub fn page(page_index: u64, page_size: u64) -> Self {
        Self {
            pagination: PaginationState {
                page_index,
                page_size,
            },
            ..Self::default()
        }
    }

    #[must_use]
    pub fn sorted_by(mut self, id: impl Into<String>, desc: bool) -> Self {
        self.sorting = vec![SortSpec {
            id: id.into(),
            desc,
        }];
        self
    }

    #[must_use]
    pub fn with_filter(mut self, id: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.column_filters.push(FilterCondition::new(id, value));
        self
    }

    #[must_use]
    pub fn with_global_filter(mut self, term: impl Into<String>) -> Self {
        self.global_filter = term.into();
        self
    }
}
