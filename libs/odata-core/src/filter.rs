//! `$filter` fragment builders
//!
//! Each builder validates the field name, constructs an [`Expr`] and renders
//! it. The `*_expr` variants return the AST for callers that compose further;
//! the plain variants return the rendered fragment with no leading or
//! trailing boolean keyword.
//!
//! ```rust,ignore
//! assert_eq!(equals("name", "O'Brien")?, "name eq 'O''Brien'");
//! assert_eq!(contains("email", "@acme")?, "contains(email,'@acme')");
//! assert_eq!(
//!     equals_or("status", ["active", "inactive"])?.as_deref(),
//!     Some("(status eq 'active' or status eq 'inactive')"),
//! );
//! ```

use crate::ast::{CompareOperator, Expr, Value};
use crate::Error;

/// Check that `field` is a usable OData property path.
///
/// Accepts ASCII letters, digits, `_`, `.` and `/` (navigation paths),
/// starting with a letter or underscore.
///
/// # Errors
/// Returns `Error::InvalidField` for empty or malformed names.
pub fn validate_field(field: &str) -> Result<&str, Error> {
    let mut chars = field.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '/'));
    if starts_ok && rest_ok {
        Ok(field)
    } else {
        Err(Error::InvalidField(field.to_owned()))
    }
}

fn ident(field: &str) -> Result<Expr, Error> {
    validate_field(field).map(|f| Expr::Identifier(f.to_owned()))
}

/// `field eq value`
///
/// # Errors
/// Returns `Error::InvalidField` if `field` is not a valid property name.
pub fn eq_expr(field: &str, value: impl Into<Value>) -> Result<Expr, Error> {
    Ok(Expr::Compare(
        Box::new(ident(field)?),
        CompareOperator::Eq,
        Box::new(Expr::Value(value.into())),
    ))
}

/// `contains(field,'value')`
///
/// # Errors
/// Returns `Error::InvalidField` if `field` is not a valid property name.
pub fn contains_expr(field: &str, value: &str) -> Result<Expr, Error> {
    Ok(Expr::Function(
        "contains".to_owned(),
        vec![ident(field)?, Expr::Value(Value::String(value.to_owned()))],
    ))
}

/// `(field eq v1 or field eq v2 ...)`, or `None` when `values` is empty.
///
/// # Errors
/// Returns `Error::InvalidField` if `field` is not a valid property name.
pub fn any_of_expr<I>(field: &str, values: I) -> Result<Option<Expr>, Error>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    validate_field(field)?;
    let alternatives = values
        .into_iter()
        .map(|v| eq_expr(field, v))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Expr::any_of(alternatives))
}

/// Render `field eq value`. Strings are quoted with `'` doubled;
/// booleans, numbers, GUIDs and dates stay bare.
///
/// # Errors
/// Returns `Error::InvalidField` if `field` is not a valid property name.
pub fn equals(field: &str, value: impl Into<Value>) -> Result<String, Error> {
    eq_expr(field, value).map(|e| e.to_string())
}

/// Render `contains(field,'value')`. Case handling is left to the server.
///
/// # Errors
/// Returns `Error::InvalidField` if `field` is not a valid property name.
pub fn contains(field: &str, value: &str) -> Result<String, Error> {
    contains_expr(field, value).map(|e| e.to_string())
}

/// Render an OR-group over `values`. A single value is still parenthesized.
/// An empty input means "no constraint" and yields `Ok(None)`.
///
/// # Errors
/// Returns `Error::InvalidField` if `field` is not a valid property name,
/// even when `values` is empty.
pub fn equals_or<I>(field: &str, values: I) -> Result<Option<String>, Error>
where
    I: IntoIterator,
    I::Item: Into<Value>,
{
    Ok(any_of_expr(field, values)?.map(render_group))
}

/// Render alternatives as one parenthesized OR-group, or `None` if empty.
pub fn or_group(alternatives: impl IntoIterator<Item = Expr>) -> Option<String> {
    Expr::any_of(alternatives).map(render_group)
}

fn render_group(expr: Expr) -> String {
    match expr {
        Expr::Or(..) => expr.to_string(),
        // a lone alternative is not an Or node, bracket it to keep the group shape
        single => format!("({single})"),
    }
}
