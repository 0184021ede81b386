use std::sync::Arc;

use crate::bind::BindParameterList;
use crate::component::{Assignments, InsertAssignments, Table};
use crate::render::{encapsulate, Flag, Render};

use super::{impl_clause, render_seeded};

/// `INSERT [IGNORE] INTO table ( cols ) VALUES ( vals )`
#[derive(Debug, Clone)]
pub struct Insert {
    pub(crate) ignore: Flag,
    pub(crate) table: Table,
    pub(crate) values: InsertAssignments,
    pub(crate) binds: BindParameterList,
}

impl Default for Insert {
    fn default() -> Self {
        Self {
            ignore: Flag::default(),
            table: Table::without_alias(),
            values: InsertAssignments::new(),
            binds: BindParameterList::new(),
        }
    }
}

impl Insert {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = Flag::Static(ignore);
        self
    }

    /// IGNORE decided when the statement renders.
    pub fn ignore_when(mut self, ignore: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.ignore = Flag::Deferred(Arc::new(ignore));
        self
    }

    pub fn values(&self) -> &InsertAssignments {
        &self.values
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn reset_assignments(&mut self) {
        self.values = InsertAssignments::new();
    }
}

impl Render for Insert {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        if self.table.is_empty() || self.values.is_empty() {
            return None;
        }
        let sql = render_seeded(binds, &self.binds, |binds| {
            let table = self.table.render(binds, false)?;
            let values = self.values.render(binds, false)?;
            let keyword = if self.ignore.resolve() {
                "INSERT IGNORE INTO"
            } else {
                "INSERT INTO"
            };
            Some(format!("{} {} {}", keyword, table, values))
        })?;
        self::encapsulate(Some(sql), encapsulate)
    }
}

impl_clause!(Insert {
    FromClause::table_mut => Table, table;
    AssignClause::assignments_mut => Assignments, values;
    BindClause::binds_mut => BindParameterList, binds;
});
