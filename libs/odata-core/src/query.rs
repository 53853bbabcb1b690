//! Query string assembly
//!
//! `QueryAssembler` accumulates system query options and serializes them in a
//! fixed order: `$select`, `$filter`, `$orderby`, `$skip`, `$top`, `$count`.
//! Filter fragments from every `filter()` call are AND-ed together.
//!
//! ```rust,ignore
//! let qs = QueryAssembler::new()
//!     .filter([contains("email", "acme")?])
//!     .order_by("createdAt", SortDir::Desc)
//!     .skip(0)
//!     .top(25)
//!     .count(true)
//!     .build()?;
//! ```

use crate::filter::validate_field;
use crate::pagination::query_fingerprint;
use crate::{Error, OrderKey, SortDir};

pub const SELECT: &str = "$select";
pub const FILTER: &str = "$filter";
pub const ORDERBY: &str = "$orderby";
pub const SKIP: &str = "$skip";
pub const TOP: &str = "$top";
pub const COUNT: &str = "$count";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[must_use]
pub struct QueryAssembler {
    select: Option<Vec<String>>,
    filters: Vec<String>,
    order: Option<OrderKey>,
    skip: Option<u64>,
    top: Option<u64>,
    count: Option<bool>,
}

impl QueryAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict returned fields. Last call wins.
    pub fn select<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Append pre-built fragments. Blank fragments are ignored.
    ///
    /// Each fragment must be self-contained: the builders in
    /// [`crate::filter`] already parenthesize OR-groups.
    pub fn filter<I, S>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(
            fragments
                .into_iter()
                .map(Into::into)
                .filter(|f| !f.trim().is_empty()),
        );
        self
    }

    /// Single-column ordering. Last call wins.
    pub fn order_by(mut self, field: impl Into<String>, dir: SortDir) -> Self {
        self.order = Some(OrderKey::new(field, dir));
        self
    }

    pub fn skip(mut self, n: u64) -> Self {
        self.skip = Some(n);
        self
    }

    /// Page size; must be greater than zero when the query is built.
    pub fn top(mut self, n: u64) -> Self {
        self.top = Some(n);
        self
    }

    pub fn count(mut self, include: bool) -> Self {
        self.count = Some(include);
        self
    }

    #[must_use]
    pub fn has_filter(&self) -> bool {
        !self.filters.is_empty()
    }

    /// The accumulated `$filter` value, if any fragment was added.
    #[must_use]
    pub fn filter_expression(&self) -> Option<String> {
        if self.filters.is_empty() {
            None
        } else {
            Some(self.filters.join(" and "))
        }
    }

    /// Validated, unencoded `(key, value)` pairs in serialization order.
    ///
    /// # Errors
    /// Returns `Error::InvalidField` for a malformed select or orderby field,
    /// and `Error::InvalidLimit` when `top` was set to zero.
    pub fn to_params(&self) -> Result<Vec<(&'static str, String)>, Error> {
        let mut params = Vec::with_capacity(6);

        if let Some(fields) = &self.select {
            for f in fields {
                validate_field(f)?;
            }
            if !fields.is_empty() {
                params.push((SELECT, fields.join(",")));
            }
        }

        if let Some(expr) = self.filter_expression() {
            params.push((FILTER, expr));
        }

        if let Some(order) = &self.order {
            validate_field(&order.field)?;
            params.push((ORDERBY, order.to_string()));
        }

        if let Some(skip) = self.skip {
            params.push((SKIP, skip.to_string()));
        }

        if let Some(top) = self.top {
            if top == 0 {
                return Err(Error::InvalidLimit);
            }
            params.push((TOP, top.to_string()));
        }

        if let Some(count) = self.count {
            params.push((COUNT, count.to_string()));
        }

        Ok(params)
    }

    /// Serialize to `key=value&key=value`, percent-encoding each value.
    /// Returns an empty string when nothing was configured.
    ///
    /// # Errors
    /// Same as [`QueryAssembler::to_params`].
    pub fn build(&self) -> Result<String, Error> {
        Ok(self
            .to_params()?
            .into_iter()
            .map(|(k, v)| format!("{k}={}", urlencoding::encode(&v)))
            .collect::<Vec<_>>()
            .join("&"))
    }

    /// Stable short hash of the built query string.
    ///
    /// # Errors
    /// Same as [`QueryAssembler::build`].
    pub fn fingerprint(&self) -> Result<String, Error> {
        self.build().map(|qs| query_fingerprint(&qs))
    }
}
