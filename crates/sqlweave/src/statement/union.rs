use crate::bind::BindParameterList;
use crate::component::{Limit, Order};
use crate::render::{encapsulate, Render};

use super::{impl_clause, push_clause, render_seeded, Select};

/// Duplicate handling between union members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnionMode {
    #[default]
    Distinct,
    All,
}

impl UnionMode {
    pub fn to_sql(&self) -> &'static str {
        match self {
            UnionMode::Distinct => "UNION DISTINCT",
            UnionMode::All => "UNION ALL",
        }
    }
}

/// `( s1 ) UNION DISTINCT ( s2 ) ...`
///
/// Members always render parenthesized. A trailing ORDER BY / LIMIT applies
/// to the whole union, which is then parenthesized as well.
#[derive(Debug, Clone, Default)]
pub struct Union {
    pub(crate) selects: Vec<Select>,
    pub(crate) mode: UnionMode,
    pub(crate) order: Order,
    pub(crate) limit: Limit,
    pub(crate) binds: BindParameterList,
}

impl Union {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_select(mut self, select: Select) -> Self {
        self.selects.push(select);
        self
    }

    pub fn add_selects(mut self, selects: impl IntoIterator<Item = Select>) -> Self {
        self.selects.extend(selects);
        self
    }

    pub fn all(mut self) -> Self {
        self.mode = UnionMode::All;
        self
    }

    pub fn mode(mut self, mode: UnionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn selects(&self) -> &[Select] {
        &self.selects
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Render for Union {
    fn render(&self, binds: &mut BindParameterList, encapsulate: bool) -> Option<String> {
        if self.selects.is_empty() {
            return None;
        }
        let sql = render_seeded(binds, &self.binds, |binds| {
            let members: Vec<String> = self
                .selects
                .iter()
                .filter_map(|select| select.render(binds, true))
                .collect();
            if members.is_empty() {
                return None;
            }
            let separator = format!(" {} ", self.mode.to_sql());
            let mut sql = members.join(&separator);

            let order = self.order.render(binds, false);
            let limit = self.limit.render(binds, false);
            if order.is_some() || limit.is_some() {
                sql = format!("( {} )", sql);
                push_clause(&mut sql, "ORDER BY", order);
                push_clause(&mut sql, "", limit);
            }
            Some(sql)
        })?;
        self::encapsulate(Some(sql), encapsulate)
    }

    fn is_query(&self) -> bool {
        true
    }
}

impl_clause!(Union {
    OrderClause::order_mut => Order, order;
    LimitClause::limit_mut => Limit, limit;
    BindClause::binds_mut => BindParameterList, binds;
});

crate::fragment::impl_node_conversions!(Union);
