use crate::bind::BindParameterList;
use crate::component::{Assignments, Conditions, Limit, Order, Table, UpdateAssignments};
use crate::render::{encapsulate, Render};

use super::{impl_clause, push_clause, render_seeded};

/// `UPDATE table SET .. [WHERE ..] [ORDER BY ..] [LIMIT ..]`
///
/// The target keeps its alias so WHERE conditions can reference it.
#[derive(Debug, Clone, Default)]
pub struct Update {
    pub(crate) table: Table,
    pub(crate) set: UpdateAssignments,
    pub(crate) where_: Conditions,
    pub(crate) order: Order,
    pub(crate) limit: Limit,
    pub(crate) binds: BindParameterList,
}

impl Update {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self) -> &UpdateAssignments {
        &self.set
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reset_assignments(&mut self) {
        self.set = UpdateAssignments::new();
    }

    pub fn reset_where(&mut self) {
        self.where_ = Conditions::new();
    }
}

impl Render for Update {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        if self.table.is_empty() || self.set.is_empty() {
            return None;
        }
        let sql = render_seeded(binds, &self.binds, |binds| {
            let table = self.table.render(binds, false)?;
            let set = self.set.render(binds, false)?;
            let mut sql = format!("UPDATE {} SET {}", table, set);
            push_clause(&mut sql, "WHERE", self.where_.render(binds, false));
            push_clause(&mut sql, "ORDER BY", self.order.render(binds, false));
            push_clause(&mut sql, "", self.limit.render(binds, false));
            Some(sql)
        })?;
        self::encapsulate(Some(sql), encapsulate)
    }
}

impl_clause!(Update {
    FromClause::table_mut => Table, table;
    AssignClause::assignments_mut => Assignments, set;
    WhereClause::where_conditions_mut => Conditions, where_;
    OrderClause::order_mut => Order, order;
    LimitClause::limit_mut => Limit, limit;
    BindClause::binds_mut => BindParameterList, binds;
});
