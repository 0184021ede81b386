use crate::bind::BindParameterList;
use crate::component::{Conditions, Limit, Order, Table};
use crate::render::{encapsulate, Render};

use super::{impl_clause, push_clause, render_seeded};

/// `DELETE FROM table [WHERE ..] [ORDER BY ..] [LIMIT ..]`
#[derive(Debug, Clone)]
pub struct Delete {
    pub(crate) table: Table,
    pub(crate) where_: Conditions,
    pub(crate) order: Order,
    pub(crate) limit: Limit,
    pub(crate) binds: BindParameterList,
}

impl Default for Delete {
    fn default() -> Self {
        Self {
            table: Table::without_alias(),
            where_: Conditions::new(),
            order: Order::new(),
            limit: Limit::new(),
            binds: BindParameterList::new(),
        }
    }
}

impl Delete {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reset_where(&mut self) {
        self.where_ = Conditions::new();
    }
}

impl Render for Delete {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        if self.table.is_empty() {
            return None;
        }
        let sql = render_seeded(binds, &self.binds, |binds| {
            let mut sql = format!("DELETE FROM {}", self.table.render(binds, false)?);
            push_clause(&mut sql, "WHERE", self.where_.render(binds, false));
            push_clause(&mut sql, "ORDER BY", self.order.render(binds, false));
            push_clause(&mut sql, "", self.limit.render(binds, false));
            Some(sql)
        })?;
        self::encapsulate(Some(sql), encapsulate)
    }
}

impl_clause!(Delete {
    FromClause::table_mut => Table, table;
    WhereClause::where_conditions_mut => Conditions, where_;
    OrderClause::order_mut => Order, order;
    LimitClause::limit_mut => Limit, limit;
    BindClause::binds_mut => BindParameterList, binds;
});
