//! WHERE / HAVING condition groups.

use crate::bind::BindParameterList;
use crate::clause::{HavingClause, WhereClause};
use crate::fragment::{Between, Exists, Func, IsNotNull, NotBetween, NotExists, Raw};
use crate::render::{encapsulate, Expr, Operand, Render};
use crate::value::Value;
use crate::{Result, SqlWeaveError};

/// Comparison operators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operator {
    /// Equal (=)
    Eq,
    /// Not equal (!=)
    Ne,
    /// Null-safe equal (<=>)
    NullSafeEq,
    /// Greater than (>)
    Gt,
    /// Greater than or equal (>=)
    Gte,
    /// Less than (<)
    Lt,
    /// Less than or equal (<=)
    Lte,
    /// IN clause
    In,
    /// NOT IN clause
    NotIn,
    /// LIKE pattern matching
    Like,
    /// NOT LIKE pattern matching
    NotLike,
    /// REGEXP pattern matching
    Regexp,
    /// Any other operator, rendered verbatim
    Custom(String),
}

impl Operator {
    /// Returns the SQL operator string.
    pub fn to_sql(&self) -> &str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::NullSafeEq => "<=>",
            Operator::Gt => ">",
            Operator::Gte => ">=",
            Operator::Lt => "<",
            Operator::Lte => "<=",
            Operator::In => "IN",
            Operator::NotIn => "NOT IN",
            Operator::Like => "LIKE",
            Operator::NotLike => "NOT LIKE",
            Operator::Regexp => "REGEXP",
            Operator::Custom(op) => op,
        }
    }
}

impl From<&str> for Operator {
    fn from(op: &str) -> Self {
        match op.trim().to_ascii_uppercase().as_str() {
            "=" => Operator::Eq,
            "!=" | "<>" => Operator::Ne,
            "<=>" => Operator::NullSafeEq,
            ">" => Operator::Gt,
            ">=" => Operator::Gte,
            "<" => Operator::Lt,
            "<=" => Operator::Lte,
            "IN" => Operator::In,
            "NOT IN" => Operator::NotIn,
            "LIKE" => Operator::Like,
            "NOT LIKE" => Operator::NotLike,
            "REGEXP" => Operator::Regexp,
            _ => Operator::Custom(op.trim().to_string()),
        }
    }
}

impl From<String> for Operator {
    fn from(op: String) -> Self {
        Operator::from(op.as_str())
    }
}

/// How a condition attaches to the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    And,
    Or,
}

impl Link {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Link::And => "AND",
            Link::Or => "OR",
        }
    }
}

/// One entry of a condition group.
///
/// No operator means `column` is a complete boolean fragment.
#[derive(Debug, Clone)]
pub struct Condition {
    pub column: Expr,
    pub operator: Option<Operator>,
    pub value: Option<Operand>,
    pub link: Link,
}

impl Condition {
    /// A standalone boolean fragment.
    pub fn fragment(column: impl Into<Expr>) -> Self {
        Self {
            column: column.into(),
            operator: None,
            value: None,
            link: Link::And,
        }
    }

    /// Equality shorthand: lists and subqueries compare with `IN`.
    pub fn equal(column: impl Into<Expr>, value: impl Into<Operand>) -> Self {
        let value = value.into();
        let operator = if value.is_set() { Operator::In } else { Operator::Eq };
        Self::compare(column, operator, value)
    }

    /// `column operator value`
    pub fn compare(
        column: impl Into<Expr>,
        operator: impl Into<Operator>,
        value: impl Into<Operand>,
    ) -> Self {
        Self {
            column: column.into(),
            operator: Some(operator.into()),
            value: Some(value.into()),
            link: Link::And,
        }
    }

    pub fn with_link(mut self, link: Link) -> Self {
        self.link = link;
        self
    }
}

/// The one-, two- and three-argument call shapes of `where`/`having`.
///
/// - a fragment (`"a IS NULL"`, `Raw`, `Between`...) is a raw boolean expression
/// - `(column, value)` is the equality shorthand
/// - `(column, operator, value)` is an explicit comparison
pub trait IntoCondition {
    fn into_condition(self) -> Condition;
}

impl IntoCondition for Condition {
    fn into_condition(self) -> Condition {
        self
    }
}

impl IntoCondition for &str {
    fn into_condition(self) -> Condition {
        Condition::fragment(self)
    }
}

impl IntoCondition for String {
    fn into_condition(self) -> Condition {
        Condition::fragment(self)
    }
}

impl IntoCondition for Expr {
    fn into_condition(self) -> Condition {
        Condition::fragment(self)
    }
}

macro_rules! impl_fragment_condition {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoCondition for $ty {
                fn into_condition(self) -> Condition {
                    Condition::fragment(self)
                }
            }
        )*
    };
}

impl_fragment_condition!(Raw, Between, NotBetween, Exists, NotExists, IsNotNull, Func, Conditions);

impl<C: Into<Expr>, V: Into<Operand>> IntoCondition for (C, V) {
    fn into_condition(self) -> Condition {
        Condition::equal(self.0, self.1)
    }
}

impl<C: Into<Expr>, O: Into<Operator>, V: Into<Operand>> IntoCondition for (C, O, V) {
    fn into_condition(self) -> Condition {
        Condition::compare(self.0, self.1, self.2)
    }
}

/// An entry of a bulk [`Conditions::equals`] call.
#[derive(Debug, Clone)]
pub enum Criterion {
    /// `column = value` (or `IN` / `IS NULL`)
    Eq(Expr, Operand),
    /// A raw boolean fragment
    Raw(Expr),
    /// Entries folded into the receiving group
    Group(Conditions),
}

impl<K: Into<Expr>, V: Into<Operand>> From<(K, V)> for Criterion {
    fn from((column, value): (K, V)) -> Self {
        Criterion::Eq(column.into(), value.into())
    }
}

impl From<&str> for Criterion {
    fn from(fragment: &str) -> Self {
        Criterion::Raw(fragment.into())
    }
}

impl From<Raw> for Criterion {
    fn from(fragment: Raw) -> Self {
        Criterion::Raw(fragment.into())
    }
}

impl From<Conditions> for Criterion {
    fn from(group: Conditions) -> Self {
        Criterion::Group(group)
    }
}

/// An ordered list of conditions joined by their links.
#[derive(Debug, Clone, Default)]
pub struct Conditions {
    entries: Vec<Condition>,
}

impl Conditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, link: Link, clause: impl IntoCondition) {
        self.entries.push(clause.into_condition().with_link(link));
    }

    /// Adds a condition from a runtime argument list.
    ///
    /// Accepts the same one-, two- and three-argument shapes as [`IntoCondition`];
    /// strings in column position name a column and in operator position name
    /// the operator.
    pub fn add_args(&mut self, link: Link, args: Vec<Operand>) -> Result<()> {
        let arity = args.len();
        let mut args = args.into_iter();
        let condition = match (arity, args.next(), args.next(), args.next()) {
            (1, Some(column), None, None) => Condition::fragment(operand_to_expr(column)?),
            (2, Some(column), Some(value), None) => Condition::equal(operand_to_expr(column)?, value),
            (3, Some(column), Some(operator), Some(value)) => {
                Condition::compare(operand_to_expr(column)?, operand_to_operator(operator)?, value)
            }
            _ => {
                return Err(SqlWeaveError::InvalidArgument(format!(
                    "Condition expects 1, 2 or 3 arguments, got {}",
                    arity
                )))
            }
        };
        self.entries.push(condition.with_link(link));
        Ok(())
    }

    /// Bulk-adds equality entries, raw fragments and whole groups, ANDed.
    pub fn equals<I, T>(&mut self, criteria: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<Criterion>,
    {
        for criterion in criteria {
            match criterion.into() {
                Criterion::Eq(column, value) => self.add(Link::And, Condition::equal(column, value)),
                Criterion::Raw(fragment) => self.add(Link::And, Condition::fragment(fragment)),
                Criterion::Group(group) => self.merge(&group),
            }
        }
    }

    /// Appends every entry of `other`.
    pub fn merge(&mut self, other: &Conditions) {
        self.entries.extend(other.entries.iter().cloned());
    }

    pub fn entries(&self) -> &[Condition] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn operand_to_expr(operand: Operand) -> Result<Expr> {
    match operand {
        Operand::Expr(expr) => Ok(expr),
        Operand::Value(Value::String(column), _) => Ok(Expr::Sql(column)),
        other => Err(SqlWeaveError::InvalidArgument(format!(
            "Expected a column or expression, got {:?}",
            other
        ))),
    }
}

fn operand_to_operator(operand: Operand) -> Result<Operator> {
    match operand {
        Operand::Value(Value::String(op), _) => Ok(Operator::from(op)),
        Operand::Expr(Expr::Sql(op)) => Ok(Operator::from(op)),
        other => Err(SqlWeaveError::InvalidArgument(format!(
            "Expected an operator, got {:?}",
            other
        ))),
    }
}

impl Conditions {
    /// Renders one entry into `binds`, leaving the list untouched when it yields nothing.
    fn render_entry(condition: &Condition, binds: &mut BindParameterList) -> Option<String> {
        let mut scratch = binds.clone();
        // Comparisons and nested groups keep their own parentheses
        let encapsulate = condition.operator.is_some() || condition.column.is_group();
        let column = condition.column.render(&mut scratch, encapsulate)?;

        let Some(operator) = &condition.operator else {
            *binds = scratch;
            return Some(column);
        };
        // A null value collapses to IS NULL whatever the stated operator
        let value = condition.value.as_ref().map(Operand::resolve);
        let Some(value) = value.filter(|value| !value.is_null()) else {
            *binds = scratch;
            return Some(format!("{} IS NULL", column));
        };
        match value.render(&mut scratch, true) {
            Some(value) => {
                *binds = scratch;
                Some(format!("{} {} {}", column, operator.to_sql(), value))
            }
            // An empty set excludes nothing under NOT IN and matches nothing otherwise
            None if *operator == Operator::NotIn => Some("1 = 1".to_string()),
            None => Some("1 = 0".to_string()),
        }
    }
}

impl Render for Conditions {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        let mut sql = String::new();
        let mut kept = 0;
        for condition in &self.entries {
            // A group that produced nothing vanishes instead of leaving `AND ()`
            let Some(entry) = Self::render_entry(condition, binds) else {
                continue;
            };
            if kept > 0 {
                sql.push(' ');
                sql.push_str(condition.link.to_sql());
                sql.push(' ');
            }
            kept += 1;
            sql.push_str(&entry);
        }
        self::encapsulate(Some(sql), encapsulate)
    }

    fn is_group(&self) -> bool {
        self.entries.len() > 1
    }
}

impl From<Conditions> for Expr {
    fn from(group: Conditions) -> Self {
        Expr::node(group)
    }
}

/// Scratch target handed to condition-group closures.
///
/// Exposes both the WHERE and HAVING fluent methods, each backed by a fresh
/// group. Whatever the closure adds renders as its own parenthesized
/// fragment, binding into the enclosing statement's list at render time.
#[derive(Debug, Clone, Default)]
pub struct ConditionScope {
    where_: Conditions,
    having: Conditions,
}

impl ConditionScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn render(&self, binds: &mut BindParameterList) -> Option<String> {
        let parts: Vec<String> = [&self.where_, &self.having]
            .into_iter()
            .filter_map(|group| group.render(binds, true))
            .collect();
        if parts.is_empty() {
            return None;
        }
        Some(parts.join(" AND "))
    }
}

impl WhereClause for ConditionScope {
    fn where_conditions_mut(&mut self) -> &mut Conditions {
        &mut self.where_
    }
}

impl HavingClause for ConditionScope {
    fn having_conditions_mut(&mut self) -> &mut Conditions {
        &mut self.having
    }
}
