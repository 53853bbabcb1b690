//! Per-entity filter policy
//!
//! An `EntityPolicy` replaces hand-written per-entity query functions: it says
//! how each column filter is compared, which fields the free-text search
//! covers, and which order keeps pagination stable when the UI sends none.

use std::collections::BTreeMap;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use odata_core::ast::Value;
use odata_core::{OrderKey, SortDir};
use serde::{Deserialize, Serialize};

/// How a column filter value is compared against its field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldOperator {
    /// `contains(field,'v')` for scalars
    #[default]
    Contains,
    /// `field eq 'v'`
    Equals,
    /// `field eq true|false`, coercing "true"/"false" strings
    EqualsBoolean,
    /// `field eq 42`, parsing numeric strings
    EqualsNumber,
}

impl FieldOperator {
    /// Coerce a raw UI string into the literal this operator compares with.
    /// Returns `None` when the string cannot represent the field's type.
    #[must_use]
    pub fn coerce(self, raw: &str) -> Option<Value> {
        let raw = raw.trim();
        match self {
            FieldOperator::Contains | FieldOperator::Equals => Some(Value::String(raw.to_owned())),
            FieldOperator::EqualsBoolean => {
                if raw.eq_ignore_ascii_case("true") {
                    Some(Value::Bool(true))
                } else if raw.eq_ignore_ascii_case("false") {
                    Some(Value::Bool(false))
                } else {
                    None
                }
            }
            FieldOperator::EqualsNumber => BigDecimal::from_str(raw).ok().map(Value::Number),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOperator {
    Equals,
    #[default]
    Contains,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchField {
    pub field: String,
    #[serde(default)]
    pub operator: SearchOperator,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntityPolicy {
    /// Field → operator; unknown fields fall back to `contains`.
    #[serde(default)]
    pub fields: BTreeMap<String, FieldOperator>,
    /// Fields OR-ed together for the free-text search.
    #[serde(default)]
    pub search: Vec<SearchField>,
    /// Order used when the table has no active sort.
    pub default_order: OrderKey,
    #[serde(default)]
    pub select: Option<Vec<String>>,
    #[serde(default)]
    pub max_page_size: Option<u64>,
}

impl EntityPolicy {
    pub fn new(default_order_field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            fields: BTreeMap::new(),
            search: Vec::new(),
            default_order: OrderKey::new(default_order_field, dir),
            select: None,
            max_page_size: None,
        }
    }

    #[must_use]
    pub fn field(mut self, name: impl Into<String>, op: FieldOperator) -> Self {
        self.fields.insert(name.into(), op);
        self
    }

    #[must_use]
    pub fn search_on(mut self, name: impl Into<String>, operator: SearchOperator) -> Self {
        self.search.push(SearchField {
            field: name.into(),
            operator,
        });
        self
    }

    #[must_use]
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn max_page_size(mut self, max: u64) -> Self {
        self.max_page_size = Some(max);
        self
    }

    #[must_use]
    pub fn operator_for(&self, field: &str) -> FieldOperator {
        self.fields.get(field).copied().unwrap_or_default()
    }

    /// Requested page size capped by `max_page_size`.
    #[must_use]
    pub fn clamp_page_size(&self, requested: u64) -> u64 {
        match self.max_page_size {
            Some(max) if max > 0 => requested.min(max),
            _ => requested,
        }
    }
}
