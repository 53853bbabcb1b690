//! Table state → OData query translation
//!
//! Filtering always starts the user on the first page: whenever at least one
//! `$filter` fragment is produced, `$skip` is forced to 0 regardless of the
//! requested page index. This holds for every entity, including top-level
//! lists.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use odata_core::ast::Value;
use odata_core::filter::{contains_expr, eq_expr, or_group};
use odata_core::{contains, equals, equals_or, Error, OrderKey, QueryAssembler, SortDir};
use tracing::{debug, instrument, warn};

use crate::policy::{EntityPolicy, FieldOperator, SearchOperator};
use crate::state::{FilterCondition, FilterValue, TableState};

/// Build the query string for `state` under `policy`.
///
/// `search_term` overrides `state.global_filter` when it is non-blank.
///
/// # Errors
/// Returns `Error::InvalidField` when a filter, sort or search field name is
/// malformed and `Error::InvalidLimit` for a zero page size.
pub fn build_query(
    state: &TableState,
    policy: &EntityPolicy,
    search_term: Option<&str>,
) -> Result<String, Error> {
    let qs = assemble(state, policy, search_term)?.build()?;
    debug!(query = %qs, "built table query");
    Ok(qs)
}

/// Same as [`build_query`] but returns the configured assembler, for callers
/// that need the unencoded parameters or a fingerprint.
///
/// # Errors
/// See [`build_query`].
#[instrument(
    name = "table_query.assemble",
    skip_all,
    fields(
        page_index = state.pagination.page_index,
        page_size = state.pagination.page_size,
        filters = state.column_filters.len()
    )
)]
pub fn assemble(
    state: &TableState,
    policy: &EntityPolicy,
    search_term: Option<&str>,
) -> Result<QueryAssembler, Error> {
    let mut fragments = Vec::new();

    if let Some(term) = effective_search(state, search_term) {
        match search_fragment(policy, term)? {
            Some(group) => fragments.push(group),
            None => warn!("search term ignored: policy has no search fields"),
        }
    }

    for condition in &state.column_filters {
        if let Some(fragment) = column_fragment(policy, condition)? {
            fragments.push(fragment);
        }
    }

    let filtered = !fragments.is_empty();

    let order = state
        .sorting
        .first()
        .map(|s| OrderKey::new(s.id.clone(), SortDir::from_desc_flag(s.desc)))
        .unwrap_or_else(|| policy.default_order.clone());

    let page_size = policy.clamp_page_size(state.pagination.page_size);
    if page_size != state.pagination.page_size {
        debug!(
            requested = state.pagination.page_size,
            page_size, "page size clamped by policy"
        );
    }

    let skip = if filtered {
        0
    } else {
        state.pagination.page_index.saturating_mul(page_size)
    };

    let mut assembler = QueryAssembler::new()
        .filter(fragments)
        .order_by(order.field, order.dir)
        .skip(skip)
        .top(page_size)
        .count(true);

    if let Some(fields) = &policy.select {
        assembler = assembler.select(fields.iter().cloned());
    }

    Ok(assembler)
}

fn effective_search<'a>(state: &'a TableState, search_term: Option<&'a str>) -> Option<&'a str> {
    search_term
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| Some(state.global_filter.trim()).filter(|s| !s.is_empty()))
}

fn search_fragment(policy: &EntityPolicy, term: &str) -> Result<Option<String>, Error> {
    let alternatives = policy
        .search
        .iter()
        .map(|sf| match sf.operator {
            SearchOperator::Equals => eq_expr(&sf.field, term),
            SearchOperator::Contains => contains_expr(&sf.field, term),
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(or_group(alternatives))
}

fn column_fragment(
    policy: &EntityPolicy,
    condition: &FilterCondition,
) -> Result<Option<String>, Error> {
    let field = condition.id.as_str();
    let Some(value) = condition.active_value() else {
        debug!(field, "dropping empty column filter");
        return Ok(None);
    };
    let op = policy.operator_for(field);

    match value {
        FilterValue::List(raw) => {
            let values: Vec<Value> = raw
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .filter_map(|s| coerce_or_warn(op, field, s))
                .collect();
            equals_or(field, values)
        }
        FilterValue::Bool(b) => equals(field, *b).map(Some),
        FilterValue::Number(n) => match BigDecimal::from_str(&n.to_string()) {
            Ok(n) => equals(field, n).map(Some),
            Err(_) => {
                warn!(field, value = %n, "dropping unrepresentable numeric filter");
                Ok(None)
            }
        },
        FilterValue::Text(raw) => {
            let raw = raw.trim();
            match op {
                FieldOperator::Contains => contains(field, raw).map(Some),
                _ => match coerce_or_warn(op, field, raw) {
                    Some(v) => equals(field, v).map(Some),
                    None => Ok(None),
                },
            }
        }
    }
}

fn coerce_or_warn(op: FieldOperator, field: &str, raw: &str) -> Option<Value> {
    let coerced = op.coerce(raw);
    if coerced.is_none() {
        warn!(field, value = raw, operator = ?op, "dropping filter value of the wrong type");
    }
    coerced
}
