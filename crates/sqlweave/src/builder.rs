//! The QueryBuilder facade.
//!
//! One mutable accumulator for every clause, from which concrete statements
//! are derived on demand (select, count, exists, insert, update, delete).
//! Derivation clones the relevant components, so a derived statement never
//! shares mutable state with the builder it came from.

use std::fmt;
use std::sync::Arc;

use futures::stream::BoxStream;
use tracing::{debug, warn};

use crate::bind::BindParameterList;
use crate::clause::{ColumnsClause, FromClause};
use crate::component::{
    Assignments, Columns, Conditions, Group, InsertAssignments, Join, Limit, Order, OrderEntry,
    Table, UpdateAssignments,
};
use crate::connection::Connection;
use crate::executor::preview;
use crate::fragment::Exists;
use crate::render::{Flag, Render};
use crate::row::Row;
use crate::statement::{impl_clause, Delete, Insert, Select, Update};
use crate::value::Value;
use crate::{Result, SqlWeaveError};

const SKIP_LOCKED: &str = "FOR UPDATE SKIP LOCKED";

/// Fluent builder that renders and runs statements against a [`Connection`].
///
/// ```ignore
/// let active = QueryBuilder::new()
///     .with_connection(conn)
///     .from_as("users", "u")
///     .where_(("u.status", "active"))
///     .order_by_desc("u.created_at")
///     .limit(20);
///
/// let total = active.count().await?;
/// let mut rows = active.fetch_all()?;
/// ```
#[derive(Clone, Default)]
pub struct QueryBuilder {
    connection: Option<Arc<dyn Connection>>,
    distinct: Flag,
    ignore: Flag,
    skip_locked: bool,
    columns: Columns,
    from: Table,
    join: Join,
    where_: Conditions,
    group: Group,
    having: Conditions,
    order: Order,
    limit: Limit,
    assignments: Assignments,
    binds: BindParameterList,
}

impl fmt::Debug for QueryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryBuilder")
            .field("connected", &self.connection.is_some())
            .field("distinct", &self.distinct)
            .field("ignore", &self.ignore)
            .field("skip_locked", &self.skip_locked)
            .field("columns", &self.columns)
            .field("from", &self.from)
            .field("join", &self.join)
            .field("where", &self.where_)
            .field("group", &self.group)
            .field("having", &self.having)
            .field("order", &self.order)
            .field("limit", &self.limit)
            .field("assignments", &self.assignments)
            .field("binds", &self.binds)
            .finish()
    }
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connection(mut self, connection: Arc<dyn Connection>) -> Self {
        self.connection = Some(connection);
        self
    }

    pub fn set_connection(&mut self, connection: Arc<dyn Connection>) {
        self.connection = Some(connection);
    }

    pub fn distinct(mut self, distinct: bool) -> Self {
        self.distinct = Flag::Static(distinct);
        self
    }

    /// DISTINCT decided each time a select is rendered.
    pub fn distinct_when(mut self, distinct: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.distinct = Flag::Deferred(Arc::new(distinct));
        self
    }

    pub fn ignore(mut self, ignore: bool) -> Self {
        self.ignore = Flag::Static(ignore);
        self
    }

    pub fn ignore_when(mut self, ignore: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.ignore = Flag::Deferred(Arc::new(ignore));
        self
    }

    /// Appends `FOR UPDATE SKIP LOCKED` to reads when the connection supports it.
    pub fn for_update_skip_locked(mut self) -> Self {
        self.skip_locked = true;
        self
    }

    /// Current ORDER BY entries, for callers that rewrite ordering (paginators).
    pub fn order_by_entries(&self) -> &[OrderEntry] {
        self.order.entries()
    }

    pub fn where_conditions(&self) -> &Conditions {
        &self.where_
    }

    pub fn having_conditions(&self) -> &Conditions {
        &self.having
    }

    pub fn limit_clause(&self) -> &Limit {
        &self.limit
    }

    /// Clears every clause and flag; the connection is kept.
    pub fn reset(&mut self) {
        *self = Self {
            connection: self.connection.take(),
            ..Self::default()
        };
    }

    pub fn reset_columns(&mut self) {
        self.columns = Columns::new();
    }

    pub fn reset_join(&mut self) {
        self.join = Join::new();
    }

    pub fn reset_where(&mut self) {
        self.where_ = Conditions::new();
    }

    pub fn reset_group(&mut self) {
        self.group = Group::new();
    }

    pub fn reset_having(&mut self) {
        self.having = Conditions::new();
    }

    pub fn reset_order(&mut self) {
        self.order = Order::new();
    }

    pub fn reset_limit(&mut self) {
        self.limit = Limit::new();
    }

    pub fn reset_assignments(&mut self) {
        self.assignments = Assignments::new();
    }

    pub fn make_select(&self) -> Select {
        Select {
            distinct: self.distinct.clone(),
            columns: self.columns.clone(),
            from: self.from.clone(),
            join: self.join.clone(),
            where_: self.where_.clone(),
            group: self.group.clone(),
            having: self.having.clone(),
            order: self.order.clone(),
            limit: self.limit,
            binds: self.binds.clone(),
        }
    }

    /// `SELECT COUNT(*) AS count FROM ( <select> ) AS countable`
    ///
    /// ORDER BY and LIMIT are dropped from the inner select. Unless HAVING or
    /// DISTINCT depend on the selected columns, they are replaced by `1`.
    pub fn make_count(&self) -> Select {
        let mut inner = self.make_select();
        inner.reset_order();
        inner.reset_limit();
        if inner.having.is_empty() && !inner.is_distinct() {
            inner.reset_columns();
            inner.columns.add("1", None);
        }
        Select::new()
            .column_as("COUNT(*)", "count")
            .from_as(inner, "countable")
    }

    /// `SELECT EXISTS( SELECT 1 ... ) AS `exists``
    pub fn make_exists(&self) -> Select {
        let mut inner = self.make_select();
        inner.reset_columns();
        inner.columns.add("1", None);
        Select::new().column_as(Exists::new(inner), "`exists`")
    }

    pub fn make_insert(&self) -> Insert {
        let mut table = self.from.clone();
        table.set_use_alias(false);
        Insert {
            ignore: self.ignore.clone(),
            table,
            values: InsertAssignments::from(self.assignments.clone()),
            binds: self.binds.clone(),
        }
    }

    pub fn make_update(&self) -> Update {
        Update {
            table: self.from.clone(),
            set: UpdateAssignments::from(self.assignments.clone()),
            where_: self.where_.clone(),
            order: self.order.clone(),
            limit: self.limit,
            binds: self.binds.clone(),
        }
    }

    pub fn make_delete(&self) -> Delete {
        let mut table = self.from.clone();
        table.set_use_alias(false);
        Delete {
            table,
            where_: self.where_.clone(),
            order: self.order.clone(),
            limit: self.limit,
            binds: self.binds.clone(),
        }
    }

    /// First row of the select, if any.
    pub async fn fetch_one(&self) -> Result<Option<Row>> {
        let connection = self.connection()?;
        let (sql, binds) = render(&self.make_select(), "SELECT")?;
        let sql = self.apply_lock(sql, connection.as_ref());
        debug!(sql_preview = %preview(&sql, 100), binds = binds.len(), "fetch_one");
        connection.fetch_one(&sql, &binds).await
    }

    /// Every row of the select as a one-pass stream.
    pub fn fetch_all(&self) -> Result<BoxStream<'static, Result<Row>>> {
        let connection = self.connection()?;
        let (sql, binds) = render(&self.make_select(), "SELECT")?;
        let sql = self.apply_lock(sql, connection.as_ref());
        debug!(sql_preview = %preview(&sql, 100), binds = binds.len(), "fetch_all");
        Ok(connection.fetch_all(sql, binds))
    }

    /// One column (by select-list position) of every row.
    pub fn fetch_column(&self, column: usize) -> Result<BoxStream<'static, Result<Value>>> {
        let connection = self.connection()?;
        let (sql, binds) = render(&self.make_select(), "SELECT")?;
        let sql = self.apply_lock(sql, connection.as_ref());
        debug!(sql_preview = %preview(&sql, 100), binds = binds.len(), column, "fetch_column");
        Ok(connection.fetch_column(sql, binds, column))
    }

    /// Number of rows the select would return, ignoring ORDER BY and LIMIT.
    pub async fn count(&self) -> Result<u64> {
        let connection = self.connection()?;
        let (sql, binds) = render(&self.make_count(), "COUNT")?;
        debug!(sql_preview = %preview(&sql, 100), binds = binds.len(), "count");
        let row = connection.fetch_one(&sql, &binds).await?;
        match row.as_ref().and_then(|row| row.get("count")) {
            Some(Value::Int(n)) => u64::try_from(*n)
                .map_err(|_| SqlWeaveError::Deserialization(format!("Negative row count {}", n))),
            Some(Value::UInt(n)) => Ok(*n),
            Some(Value::Decimal(n)) => n
                .to_string()
                .parse::<u64>()
                .map_err(|e| SqlWeaveError::Deserialization(format!("Invalid row count {}: {}", n, e))),
            other => Err(SqlWeaveError::Deserialization(format!(
                "Expected a row count, got {:?}",
                other
            ))),
        }
    }

    /// Whether the select matches at least one row.
    pub async fn exists(&self) -> Result<bool> {
        let connection = self.connection()?;
        let (sql, binds) = render(&self.make_exists(), "EXISTS")?;
        debug!(sql_preview = %preview(&sql, 100), binds = binds.len(), "exists");
        let row = connection.fetch_one(&sql, &binds).await?;
        match row.as_ref().and_then(|row| row.get("exists")) {
            Some(Value::Int(n)) => Ok(*n != 0),
            Some(Value::UInt(n)) => Ok(*n != 0),
            Some(Value::Bool(b)) => Ok(*b),
            other => Err(SqlWeaveError::Deserialization(format!(
                "Expected an EXISTS flag, got {:?}",
                other
            ))),
        }
    }

    /// Runs the derived INSERT and returns the affected row count.
    pub async fn insert(&self) -> Result<u64> {
        self.execute(&self.make_insert(), "INSERT").await
    }

    pub async fn update(&self) -> Result<u64> {
        self.execute(&self.make_update(), "UPDATE").await
    }

    pub async fn delete(&self) -> Result<u64> {
        self.execute(&self.make_delete(), "DELETE").await
    }

    async fn execute(&self, statement: &dyn Render, kind: &str) -> Result<u64> {
        let connection = self.connection()?;
        let (sql, binds) = render(statement, kind)?;
        debug!(sql_preview = %preview(&sql, 100), binds = binds.len(), "execute");
        connection.execute(&sql, &binds).await
    }

    fn connection(&self) -> Result<&Arc<dyn Connection>> {
        self.connection.as_ref().ok_or_else(|| {
            SqlWeaveError::Connection("No connection attached to the query builder".to_string())
        })
    }

    fn apply_lock(&self, sql: String, connection: &dyn Connection) -> String {
        if !self.skip_locked {
            return sql;
        }
        if !connection.supports_skip_locked() {
            warn!("Connection does not support SKIP LOCKED, reading without a lock");
            return sql;
        }
        format!("{} {}", sql, SKIP_LOCKED)
    }
}

/// Renders with a fresh bind list; an incomplete statement is an error here.
fn render(statement: &dyn Render, kind: &str) -> Result<(String, BindParameterList)> {
    statement.to_sql().ok_or_else(|| {
        SqlWeaveError::Query(format!("{} statement is incomplete and renders nothing", kind))
    })
}

impl_clause!(QueryBuilder {
    ColumnsClause::columns_mut => Columns, columns;
    FromClause::table_mut => Table, from;
    JoinClause::join_mut => Join, join;
    WhereClause::where_conditions_mut => Conditions, where_;
    GroupClause::group_mut => Group, group;
    HavingClause::having_conditions_mut => Conditions, having;
    OrderClause::order_mut => Order, order;
    LimitClause::limit_mut => Limit, limit;
    AssignClause::assignments_mut => Assignments, assignments;
    BindClause::binds_mut => BindParameterList, binds;
});
