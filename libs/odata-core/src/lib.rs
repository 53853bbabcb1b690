pub mod filter;
pub mod page;
pub mod pagination;
pub mod query;

pub use filter::{contains, equals, equals_or, or_group, validate_field};
pub use page::{normalize_response, QueryResult};
pub use pagination::query_fingerprint;
pub use query::QueryAssembler;

pub mod ast {
    use bigdecimal::BigDecimal;
    use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
    use std::fmt;
    use uuid::Uuid;

    #[derive(Clone, Debug, PartialEq)]
    pub enum Expr {
        And(Box<Expr>, Box<Expr>),
        Or(Box<Expr>, Box<Expr>),
        Not(Box<Expr>),
        Compare(Box<Expr>, CompareOperator, Box<Expr>),
        Function(String, Vec<Expr>),
        Identifier(String),
        Value(Value),
    }

    impl Expr {
        /// Combine two expressions with AND: `expr1 and expr2`
        #[must_use]
        pub fn and(self, other: Expr) -> Expr {
            Expr::And(Box::new(self), Box::new(other))
        }

        /// Combine two expressions with OR: `(expr1 or expr2)`
        #[must_use]
        pub fn or(self, other: Expr) -> Expr {
            Expr::Or(Box::new(self), Box::new(other))
        }

        /// Negate an expression: `not (expr)`
        #[must_use]
        #[allow(clippy::should_implement_trait)]
        pub fn not(self) -> Expr {
            !self
        }

        /// Fold a list of expressions into a left-leaning OR chain.
        /// Returns `None` for an empty list.
        pub fn any_of(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
            exprs.into_iter().reduce(Expr::or)
        }

        /// Fold a list of expressions into a left-leaning AND chain.
        pub fn all_of(exprs: impl IntoIterator<Item = Expr>) -> Option<Expr> {
            exprs.into_iter().reduce(Expr::and)
        }
    }

    impl std::ops::Not for Expr {
        type Output = Expr;

        fn not(self) -> Self::Output {
            Expr::Not(Box::new(self))
        }
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub enum CompareOperator {
        Eq,
        Ne,
        Gt,
        Ge,
        Lt,
        Le,
    }

    impl CompareOperator {
        #[must_use]
        pub fn as_str(self) -> &'static str {
            match self {
                CompareOperator::Eq => "eq",
                CompareOperator::Ne => "ne",
                CompareOperator::Gt => "gt",
                CompareOperator::Ge => "ge",
                CompareOperator::Lt => "lt",
                CompareOperator::Le => "le",
            }
        }
    }

    #[derive(Clone, Debug, PartialEq)]
    pub enum Value {
        Null,
        Bool(bool),
        Number(BigDecimal),
        Uuid(Uuid),
        DateTime(DateTime<Utc>),
        Date(NaiveDate),
        String(String),
    }

    impl Value {
        /// Short type name, used in diagnostics.
        #[must_use]
        pub fn kind(&self) -> &'static str {
            match self {
                Value::Null => "null",
                Value::Bool(_) => "bool",
                Value::Number(_) => "number",
                Value::Uuid(_) => "uuid",
                Value::DateTime(_) => "datetime",
                Value::Date(_) => "date",
                Value::String(_) => "string",
            }
        }
    }

    /// Quote a string literal, doubling embedded single quotes.
    #[must_use]
    pub fn quote_string(s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// OData literal form. Only strings are quoted; everything else is
    /// written bare so the server sees the right primitive type.
    impl fmt::Display for Value {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Value::Null => f.write_str("null"),
                Value::Bool(b) => write!(f, "{b}"),
                Value::Number(n) => write!(f, "{n}"),
                Value::Uuid(u) => write!(f, "{}", u.as_hyphenated()),
                Value::DateTime(dt) => {
                    f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
                }
                Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
                Value::String(s) => f.write_str(&quote_string(s)),
            }
        }
    }

    impl From<bool> for Value {
        fn from(b: bool) -> Self {
            Value::Bool(b)
        }
    }

    impl From<&str> for Value {
        fn from(s: &str) -> Self {
            Value::String(s.to_owned())
        }
    }

    impl From<String> for Value {
        fn from(s: String) -> Self {
            Value::String(s)
        }
    }

    impl From<&String> for Value {
        fn from(s: &String) -> Self {
            Value::String(s.clone())
        }
    }

    impl From<BigDecimal> for Value {
        fn from(n: BigDecimal) -> Self {
            Value::Number(n)
        }
    }

    macro_rules! impl_from_int {
        ($($t:ty),*) => {
            $(
                impl From<$t> for Value {
                    fn from(n: $t) -> Self {
                        Value::Number(BigDecimal::from(n))
                    }
                }
            )*
        };
    }

    impl_from_int!(i32, i64, u32, u64);

    impl From<Uuid> for Value {
        fn from(u: Uuid) -> Self {
            Value::Uuid(u)
        }
    }

    impl From<DateTime<Utc>> for Value {
        fn from(dt: DateTime<Utc>) -> Self {
            Value::DateTime(dt)
        }
    }

    impl From<NaiveDate> for Value {
        fn from(d: NaiveDate) -> Self {
            Value::Date(d)
        }
    }

    /// Renders `$filter` syntax.
    ///
    /// OR chains are flattened into a single parenthesized group, so an
    /// `Or` node can always be AND-ed with siblings without further
    /// bracketing. AND chains are written bare with an explicit ` and `.
    impl fmt::Display for Expr {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                Expr::And(a, b) => write!(f, "{a} and {b}"),
                Expr::Or(..) => {
                    let mut alternatives = Vec::new();
                    collect_or(self, &mut alternatives);
                    f.write_str("(")?;
                    for (i, alt) in alternatives.iter().enumerate() {
                        if i > 0 {
                            f.write_str(" or ")?;
                        }
                        write!(f, "{alt}")?;
                    }
                    f.write_str(")")
                }
                Expr::Not(inner) => match inner.as_ref() {
                    Expr::Or(..) => write!(f, "not {inner}"),
                    _ => write!(f, "not ({inner})"),
                },
                Expr::Compare(l, op, r) => write!(f, "{l} {} {r}", op.as_str()),
                Expr::Function(name, args) => {
                    write!(f, "{name}(")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(")")
                }
                Expr::Identifier(name) => f.write_str(name),
                Expr::Value(v) => write!(f, "{v}"),
            }
        }
    }

    fn collect_or<'a>(expr: &'a Expr, out: &mut Vec<&'a Expr>) {
        match expr {
            Expr::Or(a, b) => {
                collect_or(a, out);
                collect_or(b, out);
            }
            other => out.push(other),
        }
    }
}

// Ordering primitives
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortDir {
    /// Reverse the sort direction (Asc <-> Desc)
    #[must_use]
    pub fn reverse(self) -> Self {
        match self {
            SortDir::Asc => SortDir::Desc,
            SortDir::Desc => SortDir::Asc,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDir::Asc => "asc",
            SortDir::Desc => "desc",
        }
    }

    /// `desc == true` maps to `Desc`, as table UIs report it.
    #[must_use]
    pub fn from_desc_flag(desc: bool) -> Self {
        if desc {
            SortDir::Desc
        } else {
            SortDir::Asc
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OrderKey {
    pub field: String,
    pub dir: SortDir,
}

impl OrderKey {
    pub fn new(field: impl Into<String>, dir: SortDir) -> Self {
        Self {
            field: field.into(),
            dir,
        }
    }
}

// Renders the `$orderby` value, e.g. "created_at desc"
impl std::fmt::Display for OrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.field, self.dir.as_str())
    }
}

/// Unified error type for query construction
///
/// Every error here is a programmer error in the calling code path:
/// bad field names or a zero page size. Response normalization never
/// fails and therefore has no variant.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid field name: '{0}'")]
    InvalidField(String),

    #[error("INVALID_LIMIT")]
    InvalidLimit,

    // Reserved for structural validation of assembled queries
    #[error("invalid query: {0}")]
    QueryBuild(String),

    #[error("unknown entity: {0}")]
    UnknownEntity(String),
}

mod tests;
