//! The rendering protocol shared by every node of a statement tree.
//!
//! A node renders itself into SQL text while pushing any values it binds into
//! the caller's [`BindParameterList`]. `None` means "contributes nothing":
//! callers propagate it instead of emitting an empty keyword section.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::bind::BindParameterList;
use crate::component::ConditionScope;
use crate::value::{SqlType, Value};

/// Anything that can render into SQL text plus bind parameters.
pub trait Render: fmt::Debug + Send + Sync {
    /// Render into `binds`, wrapping the output in parentheses when `encapsulate` is set.
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String>;

    /// Whether this node produces a row set (a subquery rather than a scalar fragment).
    fn is_query(&self) -> bool {
        false
    }

    /// Whether this node is an AND/OR condition group that must keep its own
    /// parentheses when nested in another group.
    fn is_group(&self) -> bool {
        false
    }

    /// Render with a fresh bind list.
    fn to_sql(&self) -> Option<(String, BindParameterList)> {
        let mut binds = BindParameterList::new();
        self.render(&mut binds, false).map(|sql| (sql, binds))
    }
}

/// The single parenthesization primitive.
pub fn encapsulate(text: Option<String>, flag: bool) -> Option<String> {
    match text {
        None => None,
        Some(text) if text.is_empty() => None,
        Some(text) if flag => Some(format!("( {} )", text)),
        Some(text) => Some(text),
    }
}

pub type DeferredExpr = Arc<dyn Fn() -> Expr + Send + Sync>;
pub type DeferredOperand = Arc<dyn Fn() -> Operand + Send + Sync>;
pub type GroupFn = Arc<dyn Fn(ConditionScope) -> ConditionScope + Send + Sync>;

/// A SQL sub-expression: column name, nested statement, or deferred fragment.
#[derive(Clone)]
pub enum Expr {
    /// Verbatim SQL text, never bound
    Sql(String),
    /// A nested renderable (subquery, raw fragment, function...)
    Node(Arc<dyn Render>),
    /// Evaluated at render time
    Deferred(DeferredExpr),
    /// Builds a nested AND/OR condition group on a scratch scope at render time
    Group(GroupFn),
}

impl Expr {
    pub fn sql(sql: impl Into<String>) -> Self {
        Expr::Sql(sql.into())
    }

    pub fn node(node: impl Render + 'static) -> Self {
        Expr::Node(Arc::new(node))
    }

    pub fn deferred(f: impl Fn() -> Expr + Send + Sync + 'static) -> Self {
        Expr::Deferred(Arc::new(f))
    }

    pub fn group(f: impl Fn(ConditionScope) -> ConditionScope + Send + Sync + 'static) -> Self {
        Expr::Group(Arc::new(f))
    }

    /// Whether this expression is a row-producing subquery.
    pub fn is_query(&self) -> bool {
        match self {
            Expr::Node(node) => node.is_query(),
            _ => false,
        }
    }

    /// Whether this expression is a nested condition group.
    pub fn is_group(&self) -> bool {
        match self {
            Expr::Node(node) => node.is_group(),
            Expr::Group(_) => true,
            _ => false,
        }
    }

    pub fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        match self {
            Expr::Sql(sql) if sql.is_empty() => None,
            Expr::Sql(sql) => Some(sql.clone()),
            Expr::Node(node) => node.render(binds, encapsulate),
            Expr::Deferred(f) => f().render(binds, encapsulate),
            // A group is always its own parenthesized fragment
            Expr::Group(f) => f(ConditionScope::default()).render(binds),
        }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Sql(sql) => f.debug_tuple("Sql").field(sql).finish(),
            Expr::Node(node) => f.debug_tuple("Node").field(node).finish(),
            Expr::Deferred(_) => f.write_str("Deferred(..)"),
            Expr::Group(_) => f.write_str("Group(..)"),
        }
    }
}

impl From<&str> for Expr {
    fn from(sql: &str) -> Self {
        Expr::Sql(sql.to_string())
    }
}

impl From<String> for Expr {
    fn from(sql: String) -> Self {
        Expr::Sql(sql)
    }
}

impl From<&String> for Expr {
    fn from(sql: &String) -> Self {
        Expr::Sql(sql.clone())
    }
}

/// The right-hand side of a comparison or assignment.
///
/// Scalars are bound; lists expand into parenthesized placeholder tuples;
/// expressions render verbatim or delegate to their node.
#[derive(Clone)]
pub enum Operand {
    Value(Value, Option<SqlType>),
    List(Vec<Operand>),
    Expr(Expr),
    Deferred(DeferredOperand),
}

impl Operand {
    /// A bound value with an explicit type tag.
    pub fn typed(value: impl Into<Value>, sql_type: SqlType) -> Self {
        Operand::Value(value.into(), Some(sql_type))
    }

    /// Unbound SQL text, e.g. a column on the other side of a comparison.
    pub fn raw(sql: impl Into<String>) -> Self {
        Operand::Expr(Expr::Sql(sql.into()))
    }

    pub fn list<T: Into<Operand>>(items: impl IntoIterator<Item = T>) -> Self {
        Operand::List(items.into_iter().map(Into::into).collect())
    }

    pub fn deferred(f: impl Fn() -> Operand + Send + Sync + 'static) -> Self {
        Operand::Deferred(Arc::new(f))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Operand::Value(Value::Null, _))
    }

    /// Evaluates a deferred operand, leaving every other variant as is.
    pub fn resolve(&self) -> Cow<'_, Operand> {
        match self {
            Operand::Deferred(f) => Cow::Owned(f().resolve().into_owned()),
            other => Cow::Borrowed(other),
        }
    }

    /// Lists and subqueries compare with `IN` rather than `=`.
    pub fn is_set(&self) -> bool {
        match self {
            Operand::List(_) => true,
            Operand::Expr(expr) => expr.is_query(),
            _ => false,
        }
    }

    pub fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        match self {
            Operand::Value(value, sql_type) => {
                Some(binds.add_typed(value.clone(), *sql_type).placeholder())
            }
            // Elements that render nothing are dropped; an empty list renders nothing
            // and the enclosing condition decides what that means for its operator
            Operand::List(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .filter_map(|item| item.render(binds, matches!(item, Operand::List(_))))
                    .collect();
                if parts.is_empty() {
                    return None;
                }
                self::encapsulate(Some(parts.join(", ")), true)
            }
            Operand::Expr(expr) => expr.render(binds, encapsulate),
            Operand::Deferred(f) => f().render(binds, encapsulate),
        }
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Value(value, None) => f.debug_tuple("Value").field(value).finish(),
            Operand::Value(value, Some(t)) => f.debug_tuple("Value").field(value).field(t).finish(),
            Operand::List(items) => f.debug_tuple("List").field(items).finish(),
            Operand::Expr(expr) => f.debug_tuple("Expr").field(expr).finish(),
            Operand::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

macro_rules! impl_operand_from_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Operand {
                fn from(v: $ty) -> Self {
                    Operand::Value(v.into(), None)
                }
            }
        )*
    };
}

impl_operand_from_value! {
    bool, i8, i16, i32, i64, u16, u32, u64, usize, f32, f64,
    &str, String, &String,
    rust_decimal::Decimal,
    uuid::Uuid,
    chrono::NaiveDate,
    chrono::NaiveTime,
    chrono::NaiveDateTime,
    chrono::DateTime<chrono::Utc>,
    serde_json::Value,
    Value,
}

impl<T: Into<Value>> From<Option<T>> for Operand {
    fn from(v: Option<T>) -> Self {
        Operand::Value(v.into(), None)
    }
}

impl<T: Into<Operand>> From<Vec<T>> for Operand {
    fn from(items: Vec<T>) -> Self {
        Operand::list(items)
    }
}

impl<T: Into<Operand>, const N: usize> From<[T; N]> for Operand {
    fn from(items: [T; N]) -> Self {
        Operand::list(items)
    }
}

impl From<Expr> for Operand {
    fn from(expr: Expr) -> Self {
        Operand::Expr(expr)
    }
}

/// A statement-level boolean that may be decided at render time.
#[derive(Clone)]
pub enum Flag {
    Static(bool),
    Deferred(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl Flag {
    pub fn resolve(&self) -> bool {
        match self {
            Flag::Static(value) => *value,
            Flag::Deferred(f) => f(),
        }
    }
}

impl Default for Flag {
    fn default() -> Self {
        Flag::Static(false)
    }
}

impl fmt::Debug for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Flag::Static(value) => f.debug_tuple("Static").field(value).finish(),
            Flag::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
