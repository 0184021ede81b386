//! Fluent clause methods shared by statements and the builder.
//!
//! Each trait needs a single accessor to the owning component; every
//! chaining method is a provided default on top of it. `Select`, `Update`,
//! `Delete`, `QueryBuilder` and the closure scratch scope pick up exactly
//! the clauses their grammar allows.

use crate::bind::BindParameterList;
use crate::component::{
    Assignment, Assignments, Columns, Condition, ConditionScope, Conditions, Criterion, Group, IntoCondition,
    Join, JoinKind, JoinOn, Limit, Link, Operator, Order, OrderDirection, Table,
};
use crate::fragment::{Between, Exists, IsNotNull, NotBetween, NotExists};
use crate::render::{Expr, Operand};
use crate::value::{SqlType, Value};
use crate::Result;

/// WHERE conditions.
pub trait WhereClause: Sized {
    fn where_conditions_mut(&mut self) -> &mut Conditions;

    /// Adds an AND-linked condition: a fragment, `(column, value)` or
    /// `(column, operator, value)`.
    fn where_(mut self, condition: impl IntoCondition) -> Self {
        self.where_conditions_mut().add(Link::And, condition);
        self
    }

    fn and_where(self, condition: impl IntoCondition) -> Self {
        self.where_(condition)
    }

    fn or_where(mut self, condition: impl IntoCondition) -> Self {
        self.where_conditions_mut().add(Link::Or, condition);
        self
    }

    /// Runtime-arity form of [`where_`](Self::where_); anything but 1, 2 or 3
    /// arguments is rejected.
    fn where_args(mut self, args: Vec<Operand>) -> Result<Self> {
        self.where_conditions_mut().add_args(Link::And, args)?;
        Ok(self)
    }

    fn or_where_args(mut self, args: Vec<Operand>) -> Result<Self> {
        self.where_conditions_mut().add_args(Link::Or, args)?;
        Ok(self)
    }

    fn where_equals<I, T>(mut self, criteria: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Criterion>,
    {
        self.where_conditions_mut().equals(criteria);
        self
    }

    fn where_in(self, column: impl Into<Expr>, values: impl Into<Operand>) -> Self {
        self.where_(Condition::compare(column, Operator::In, values))
    }

    fn where_not_in(self, column: impl Into<Expr>, values: impl Into<Operand>) -> Self {
        self.where_(Condition::compare(column, Operator::NotIn, values))
    }

    fn where_null(self, column: impl Into<Expr>) -> Self {
        self.where_(Condition::compare(column, Operator::Eq, Value::Null))
    }

    fn where_not_null(self, column: impl Into<Expr>) -> Self {
        self.where_(IsNotNull::new(column))
    }

    fn where_between(
        self,
        column: impl Into<Expr>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        self.where_(Between::new(column, low, high))
    }

    fn where_not_between(
        self,
        column: impl Into<Expr>,
        low: impl Into<Operand>,
        high: impl Into<Operand>,
    ) -> Self {
        self.where_(NotBetween::new(column, low, high))
    }

    fn where_exists(self, query: impl Into<Expr>) -> Self {
        self.where_(Exists::new(query))
    }

    fn where_not_exists(self, query: impl Into<Expr>) -> Self {
        self.where_(NotExists::new(query))
    }

    /// Nested AND group built on a scratch scope at render time.
    fn where_group(
        self,
        group: impl Fn(ConditionScope) -> ConditionScope + Send + Sync + 'static,
    ) -> Self {
        self.where_(Expr::group(group))
    }

    fn or_where_group(
        self,
        group: impl Fn(ConditionScope) -> ConditionScope + Send + Sync + 'static,
    ) -> Self {
        self.or_where(Expr::group(group))
    }
}

/// HAVING conditions.
pub trait HavingClause: Sized {
    fn having_conditions_mut(&mut self) -> &mut Conditions;

    fn having(mut self, condition: impl IntoCondition) -> Self {
        self.having_conditions_mut().add(Link::And, condition);
        self
    }

    fn and_having(self, condition: impl IntoCondition) -> Self {
        self.having(condition)
    }

    fn or_having(mut self, condition: impl IntoCondition) -> Self {
        self.having_conditions_mut().add(Link::Or, condition);
        self
    }

    fn having_args(mut self, args: Vec<Operand>) -> Result<Self> {
        self.having_conditions_mut().add_args(Link::And, args)?;
        Ok(self)
    }

    fn or_having_args(mut self, args: Vec<Operand>) -> Result<Self> {
        self.having_conditions_mut().add_args(Link::Or, args)?;
        Ok(self)
    }

    fn having_group(
        self,
        group: impl Fn(ConditionScope) -> ConditionScope + Send + Sync + 'static,
    ) -> Self {
        self.having(Expr::group(group))
    }

    fn or_having_group(
        self,
        group: impl Fn(ConditionScope) -> ConditionScope + Send + Sync + 'static,
    ) -> Self {
        self.or_having(Expr::group(group))
    }
}

/// FROM / target table.
pub trait FromClause: Sized {
    fn table_mut(&mut self) -> &mut Table;

    fn from(mut self, table: impl Into<Expr>) -> Self {
        self.table_mut().add(table, None);
        self
    }

    fn from_as(mut self, table: impl Into<Expr>, alias: &str) -> Self {
        self.table_mut().add(table, Some(alias));
        self
    }
}

/// Select list.
pub trait ColumnsClause: Sized {
    fn columns_mut(&mut self) -> &mut Columns;

    fn column(mut self, column: impl Into<Expr>) -> Self {
        self.columns_mut().add(column, None);
        self
    }

    fn column_as(mut self, column: impl Into<Expr>, alias: &str) -> Self {
        self.columns_mut().add(column, Some(alias));
        self
    }

    fn columns<I, T>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Expr>,
    {
        for column in columns {
            self.columns_mut().add(column, None);
        }
        self
    }
}

pub trait JoinClause: Sized {
    fn join_mut(&mut self) -> &mut Join;

    fn join(
        mut self,
        kind: JoinKind,
        table: impl Into<Expr>,
        alias: Option<&str>,
        on: Option<JoinOn>,
    ) -> Self {
        self.join_mut().add(kind, table, alias, on);
        self
    }

    fn inner_join(self, table: impl Into<Expr>, alias: Option<&str>, on: impl Into<JoinOn>) -> Self {
        self.join(JoinKind::Inner, table, alias, Some(on.into()))
    }

    fn left_join(self, table: impl Into<Expr>, alias: Option<&str>, on: impl Into<JoinOn>) -> Self {
        self.join(JoinKind::Left, table, alias, Some(on.into()))
    }

    fn right_join(self, table: impl Into<Expr>, alias: Option<&str>, on: impl Into<JoinOn>) -> Self {
        self.join(JoinKind::Right, table, alias, Some(on.into()))
    }
}

pub trait GroupClause: Sized {
    fn group_mut(&mut self) -> &mut Group;

    fn group_by(mut self, column: impl Into<Expr>) -> Self {
        self.group_mut().add(column);
        self
    }

    fn with_rollup(mut self) -> Self {
        self.group_mut().set_with_rollup(true);
        self
    }
}

pub trait OrderClause: Sized {
    fn order_mut(&mut self) -> &mut Order;

    /// `direction` may be omitted with `None` to leave it to the server default.
    fn order_by(
        mut self,
        column: impl Into<Expr>,
        direction: impl Into<Option<OrderDirection>>,
    ) -> Self {
        self.order_mut().add(column, direction.into());
        self
    }

    fn order_by_asc(self, column: impl Into<Expr>) -> Self {
        self.order_by(column, OrderDirection::Asc)
    }

    fn order_by_desc(self, column: impl Into<Expr>) -> Self {
        self.order_by(column, OrderDirection::Desc)
    }
}

pub trait LimitClause: Sized {
    fn limit_mut(&mut self) -> &mut Limit;

    fn limit(mut self, limit: u64) -> Self {
        self.limit_mut().set_limit(limit);
        self
    }

    /// Rendered only together with a limit.
    fn offset(mut self, offset: u64) -> Self {
        self.limit_mut().set_offset(offset);
        self
    }
}

/// INSERT values / UPDATE SET pairs.
pub trait AssignClause: Sized {
    fn assignments_mut(&mut self) -> &mut Assignments;

    fn assign(mut self, column: impl Into<Expr>, value: impl Into<Operand>) -> Self {
        self.assignments_mut().assign(column, value);
        self
    }

    /// Bulk form: `(column, value)` pairs and raw `"col = expr"` fragments.
    fn assignments<I, T>(mut self, assignments: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Assignment>,
    {
        self.assignments_mut().extend(assignments);
        self
    }
}

/// Pre-bound named parameters, merged into the render list.
pub trait BindClause: Sized {
    fn binds_mut(&mut self) -> &mut BindParameterList;

    /// Binds a value referenced as `:name` by a raw fragment.
    fn bind(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.binds_mut().add_named(name, value, None);
        self
    }

    fn bind_typed(mut self, name: &str, value: impl Into<Value>, sql_type: SqlType) -> Self {
        self.binds_mut().add_named(name, value, Some(sql_type));
        self
    }
}
