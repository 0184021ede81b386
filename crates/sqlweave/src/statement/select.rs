use std::sync::Arc;

use crate::bind::BindParameterList;
use crate::component::{Columns, Conditions, Group, Join, Limit, Order, Table};
use crate::render::{encapsulate, Flag, Render};

use super::{impl_clause, push_clause, render_seeded};

/// `SELECT [DISTINCT] cols FROM .. [WHERE ..] [GROUP BY ..] [HAVING ..] [ORDER BY ..] [LIMIT ..]`
///
/// ```ignore
/// let select = Select::new()
///     .from_as("foo", "f")
///     .where_(("bar", "=", "baz"));
/// let (sql, binds) = select.to_sql().unwrap();
/// assert_eq!(sql, "SELECT * FROM foo AS f WHERE bar = :_h_0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Select {
    pub(crate) distinct: Flag,
    pub(crate) columns: Columns,
    pub(crate) from: Table,
    pub(crate) join: Join,
    pub(crate) where_: Conditions,
    pub(crate) group: Group,
    pub(crate) having: Conditions,
    pub(crate) order: Order,
    pub(crate) limit: Limit,
    pub(crate) binds: BindParameterList,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = Flag::Static(distinct);
        self
    }

    /// DISTINCT decided when the statement renders.
    pub fn distinct_when(mut self, distinct: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.distinct = Flag::Deferred(Arc::new(distinct));
        self
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct.resolve()
    }

    pub fn column_list(&self) -> &Columns {
        &self.columns
    }

    pub fn where_conditions(&self) -> &Conditions {
        &self.where_
    }

    pub fn having_conditions(&self) -> &Conditions {
        &self.having
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn limit_clause(&self) -> &Limit {
        &self.limit
    }

    /// Re-initializes every clause.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reset_columns(&mut self) {
        self.columns = Columns::new();
    }

    pub fn reset_order(&mut self) {
        self.order = Order::new();
    }

    pub fn reset_limit(&mut self) {
        self.limit = Limit::new();
    }
}

impl Render for Select {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        // Nothing to select from and nothing to select
        if self.columns.is_empty() && self.from.is_empty() {
            return None;
        }
        let sql = render_seeded(binds, &self.binds, |binds| {
            let mut sql = String::from("SELECT");
            if self.distinct.resolve() {
                sql.push_str(" DISTINCT");
            }
            let columns = self.columns.render(binds, false);
            sql.push(' ');
            sql.push_str(columns.as_deref().unwrap_or("*"));

            if let Some(from) = self.from.render(binds, false) {
                push_clause(&mut sql, "FROM", Some(from));
                push_clause(&mut sql, "", self.join.render(binds, false));
            }
            push_clause(&mut sql, "WHERE", self.where_.render(binds, false));
            push_clause(&mut sql, "", self.group.render(binds, false));
            push_clause(&mut sql, "HAVING", self.having.render(binds, false));
            push_clause(&mut sql, "ORDER BY", self.order.render(binds, false));
            push_clause(&mut sql, "", self.limit.render(binds, false));
            Some(sql)
        })?;
        self::encapsulate(Some(sql), encapsulate)
    }

    fn is_query(&self) -> bool {
        true
    }
}

impl_clause!(Select {
    ColumnsClause::columns_mut => Columns, columns;
    FromClause::table_mut => Table, from;
    JoinClause::join_mut => Join, join;
    WhereClause::where_conditions_mut => Conditions, where_;
    GroupClause::group_mut => Group, group;
    HavingClause::having_conditions_mut => Conditions, having;
    OrderClause::order_mut => Order, order;
    LimitClause::limit_mut => Limit, limit;
    BindClause::binds_mut => BindParameterList, binds;
});

crate::fragment::impl_node_conversions!(Select);
