//! Leaf statement fragments.

use crate::bind::BindParameterList;
use crate::render::{encapsulate, Expr, Operand, Render};
use crate::value::{SqlType, Value};

/// Verbatim SQL carrying its own named binds.
///
/// ```ignore
/// let recent = Raw::new("created_at > :since").bind("since", "2024-01-01");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Raw {
    sql: String,
    binds: BindParameterList,
}

impl Raw {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: BindParameterList::new(),
        }
    }

    /// Binds a value referenced as `:name` in the fragment.
    pub fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.binds.add_named(name, value, None);
        self
    }

    pub fn bind_typed(mut self, name: &str, value: impl Into<Value>, sql_type: SqlType) -> Self {
        self.binds.add_named(name, value, Some(sql_type));
        self
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }
}

impl Render for Raw {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        if self.sql.is_empty() {
            return None;
        }
        binds.merge(&self.binds);
        self::encapsulate(Some(self.sql.clone()), encapsulate)
    }
}

/// Row constructor, `( a, b )`, for composite comparisons.
#[derive(Debug, Clone, Default)]
pub struct Row {
    items: Vec<Expr>,
}

impl Row {
    pub fn new<T: Into<Expr>>(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }
}

impl Render for Row {
    // Always parenthesized: the parentheses are the constructor
    fn render(&self, binds: &mut BindParameterList, _encapsulate: bool) -> Option<String> {
        let parts: Vec<String> = self
            .items
            .iter()
            .filter_map(|item| item.render(binds, true))
            .collect();
        encapsulate(Some(parts.join(", ")), true)
    }
}

fn render_range(
    keyword: &str,
    expr: &Expr,
    low: &Operand,
    high: &Operand,
    binds: &mut BindParameterList,
    encapsulate: bool,
) -> Option<String> {
    let expr = expr.render(binds, true)?;
    let low = low.render(binds, true)?;
    let high = high.render(binds, true)?;
    self::encapsulate(
        Some(format!("{} {} {} AND {}", expr, keyword, low, high)),
        encapsulate,
    )
}

/// `expr BETWEEN low AND high`
#[derive(Debug, Clone)]
pub struct Between {
    expr: Expr,
    low: Operand,
    high: Operand,
}

impl Between {
    pub fn new(expr: impl Into<Expr>, low: impl Into<Operand>, high: impl Into<Operand>) -> Self {
        Self {
            expr: expr.into(),
            low: low.into(),
            high: high.into(),
        }
    }
}

impl Render for Between {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        render_range("BETWEEN", &self.expr, &self.low, &self.high, binds, encapsulate)
    }
}

/// `expr NOT BETWEEN low AND high`
#[derive(Debug, Clone)]
pub struct NotBetween {
    expr: Expr,
    low: Operand,
    high: Operand,
}

impl NotBetween {
    pub fn new(expr: impl Into<Expr>, low: impl Into<Operand>, high: impl Into<Operand>) -> Self {
        Self {
            expr: expr.into(),
            low: low.into(),
            high: high.into(),
        }
    }
}

impl Render for NotBetween {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        render_range("NOT BETWEEN", &self.expr, &self.low, &self.high, binds, encapsulate)
    }
}

/// Generic SQL function call, `NAME(arg, ...)`.
#[derive(Debug, Clone)]
pub struct Func {
    name: String,
    args: Vec<Operand>,
}

impl Func {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Adds a bound argument.
    pub fn arg(mut self, value: impl Into<Operand>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Adds an unbound argument such as a column name.
    pub fn column(mut self, expr: impl Into<Expr>) -> Self {
        self.args.push(Operand::Expr(expr.into()));
        self
    }
}

impl Render for Func {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let args: Vec<String> = self
            .args
            .iter()
            .filter_map(|arg| arg.render(binds, true))
            .collect();
        self::encapsulate(
            Some(format!("{}({})", self.name, args.join(", "))),
            encapsulate,
        )
    }
}

/// `EXISTS( subquery )`
#[derive(Debug, Clone)]
pub struct Exists {
    query: Expr,
}

impl Exists {
    pub fn new(query: impl Into<Expr>) -> Self {
        Self { query: query.into() }
    }
}

impl Render for Exists {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let query = self.query.render(binds, true)?;
        self::encapsulate(Some(format!("EXISTS{}", query)), encapsulate)
    }
}

/// `NOT EXISTS( subquery )`
#[derive(Debug, Clone)]
pub struct NotExists {
    query: Expr,
}

impl NotExists {
    pub fn new(query: impl Into<Expr>) -> Self {
        Self { query: query.into() }
    }
}

impl Render for NotExists {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let query = self.query.render(binds, true)?;
        self::encapsulate(Some(format!("NOT EXISTS{}", query)), encapsulate)
    }
}

/// `expr IS NOT NULL`
///
/// A condition with an operator and a null value always renders `IS NULL`,
/// so the negated form has to be a fragment of its own.
#[derive(Debug, Clone)]
pub struct IsNotNull {
    expr: Expr,
}

impl IsNotNull {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self { expr: expr.into() }
    }
}

impl Render for IsNotNull {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let expr = self.expr.render(binds, true)?;
        self::encapsulate(Some(format!("{} IS NOT NULL", expr)), encapsulate)
    }
}

/// Conversions letting fragments be used wherever an expression or operand is expected.
macro_rules! impl_node_conversions {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for $crate::render::Expr {
                fn from(node: $ty) -> Self {
                    $crate::render::Expr::node(node)
                }
            }

            impl From<$ty> for $crate::render::Operand {
                fn from(node: $ty) -> Self {
                    $crate::render::Operand::Expr($crate::render::Expr::node(node))
                }
            }
        )*
    };
}

impl_node_conversions!(Raw, Row, Between, NotBetween, Func, Exists, NotExists, IsNotNull);

pub(crate) use impl_node_conversions;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_merges_its_binds() {
        let raw = Raw::new("created_at > :since").bind("since", "2024-01-01");
        let (sql, binds) = raw.to_sql().unwrap();
        assert_eq!(sql, "created_at > :since");
        assert_eq!(binds.get("since").unwrap().value(), &Value::from("2024-01-01"));
    }

    #[test]
    fn test_raw_encapsulated() {
        let mut binds = BindParameterList::new();
        assert_eq!(
            Raw::new("a OR b").render(&mut binds, true).as_deref(),
            Some("( a OR b )")
        );
        assert_eq!(Raw::new("").render(&mut binds, true), None);
    }

    #[test]
    fn test_row_constructor() {
        let (sql, binds) = Row::new(["a", "b"]).to_sql().unwrap();
        assert_eq!(sql, "( a, b )");
        assert!(binds.is_empty());
    }

    #[test]
    fn test_between() {
        let (sql, binds) = Between::new("age", 18, 65).to_sql().unwrap();
        assert_eq!(sql, "age BETWEEN :_h_0 AND :_h_1");
        assert_eq!(binds.values(), vec![Value::Int(18), Value::Int(65)]);
    }

    #[test]
    fn test_not_between() {
        let (sql, _) = NotBetween::new("age", 18, 65).to_sql().unwrap();
        assert_eq!(sql, "age NOT BETWEEN :_h_0 AND :_h_1");
    }

    #[test]
    fn test_func_mixes_columns_and_binds() {
        let func = Func::new("COALESCE").column("nickname").arg("anonymous");
        let (sql, binds) = func.to_sql().unwrap();
        assert_eq!(sql, "COALESCE(nickname, :_h_0)");
        assert_eq!(binds.values(), vec![Value::from("anonymous")]);
    }

    #[test]
    fn test_func_without_args() {
        let (sql, _) = Func::new("NOW").to_sql().unwrap();
        assert_eq!(sql, "NOW()");
    }

    #[test]
    fn test_exists_wraps_query() {
        let (sql, _) = Exists::new(Raw::new("SELECT 1 FROM foo")).to_sql().unwrap();
        assert_eq!(sql, "EXISTS( SELECT 1 FROM foo )");
        let (sql, _) = NotExists::new(Raw::new("SELECT 1 FROM foo")).to_sql().unwrap();
        assert_eq!(sql, "NOT EXISTS( SELECT 1 FROM foo )");
    }

    #[test]
    fn test_exists_of_nothing_is_nothing() {
        assert!(Exists::new(Raw::new("")).to_sql().is_none());
    }

    #[test]
    fn test_is_not_null() {
        let (sql, _) = IsNotNull::new("deleted_at").to_sql().unwrap();
        assert_eq!(sql, "deleted_at IS NOT NULL");
    }
}
