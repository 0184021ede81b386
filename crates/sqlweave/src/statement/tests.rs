//! Tests for statement rendering.

use super::*;
use crate::bind::BindParameterList;
use crate::clause::{
    AssignClause, BindClause, ColumnsClause, FromClause, GroupClause, HavingClause, JoinClause,
    LimitClause, OrderClause, WhereClause,
};
use crate::fragment::Raw;
use crate::component::{Conditions, Link};
use crate::render::{Operand, Render};
use crate::value::Value;

fn render(statement: &dyn Render) -> (String, Vec<Value>) {
    let (sql, binds) = statement.to_sql().unwrap();
    (sql, binds.values())
}

#[test]
fn test_select_with_alias_and_where() {
    let select = Select::new().from_as("foo", "f").where_(("bar", "=", "baz"));
    let (sql, values) = render(&select);
    assert_eq!(sql, "SELECT * FROM foo AS f WHERE bar = :_h_0");
    assert_eq!(values, vec![Value::from("baz")]);
}

#[test]
fn test_select_full_grammar() {
    let select = Select::new()
        .distinct(true)
        .column("u.country")
        .column_as("COUNT(*)", "total")
        .from_as("users", "u")
        .inner_join("orders", Some("o"), ("o.user_id", "u.id"))
        .where_(("u.active", 1))
        .group_by("u.country")
        .having(("total", ">", 10))
        .order_by_desc("total")
        .limit(5)
        .offset(10);
    let (sql, values) = render(&select);
    assert_eq!(
        sql,
        "SELECT DISTINCT u.country, COUNT(*) AS total FROM users AS u \
         INNER JOIN orders AS o ON ( o.user_id = u.id ) WHERE u.active = :_h_0 \
         GROUP BY u.country HAVING total > :_h_1 ORDER BY total DESC LIMIT 5 OFFSET 10"
    );
    assert_eq!(values, vec![Value::Int(1), Value::Int(10)]);
}

#[test]
fn test_select_columns_without_from() {
    let select = Select::new().column("NOW()");
    assert_eq!(render(&select).0, "SELECT NOW()");
}

#[test]
fn test_offset_without_limit_is_dropped() {
    let select = Select::new().from("t").offset(10);
    assert_eq!(render(&select).0, "SELECT * FROM t");
}

#[test]
fn test_where_in_expands_list() {
    let select = Select::new().from("t").where_in("id", [1, 2, 3]);
    let (sql, values) = render(&select);
    assert_eq!(sql, "SELECT * FROM t WHERE id IN ( :_h_0, :_h_1, :_h_2 )");
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_null_equality_binds_nothing() {
    let select = Select::new()
        .from("t")
        .where_(("deleted_at", Value::Null))
        .where_null("archived_at");
    let (sql, values) = render(&select);
    assert_eq!(
        sql,
        "SELECT * FROM t WHERE deleted_at IS NULL AND archived_at IS NULL"
    );
    assert!(values.is_empty());
}

#[test]
fn test_subquery_in_where_shares_bind_list() {
    let paying = Select::new()
        .column("user_id")
        .from("orders")
        .where_(("total", ">", 100));
    let select = Select::new()
        .from("users")
        .where_(("status", "active"))
        .where_in("id", paying);
    let (sql, values) = render(&select);
    assert_eq!(
        sql,
        "SELECT * FROM users WHERE status = :_h_0 \
         AND id IN ( SELECT user_id FROM orders WHERE total > :_h_1 )"
    );
    assert_eq!(values, vec![Value::from("active"), Value::Int(100)]);
}

#[test]
fn test_subquery_as_table_and_join() {
    let totals = Select::new()
        .column("user_id")
        .column_as("SUM(amount)", "spent")
        .from("payments")
        .group_by("user_id");
    let select = Select::new()
        .columns(["u.id", "p.spent"])
        .from_as("users", "u")
        .left_join(totals, Some("p"), ("p.user_id", "u.id"));
    assert_eq!(
        render(&select).0,
        "SELECT u.id, p.spent FROM users AS u LEFT JOIN \
         ( SELECT user_id, SUM(amount) AS spent FROM payments GROUP BY user_id ) AS p \
         ON ( p.user_id = u.id )"
    );

    let outer = Select::new()
        .column("t.n")
        .from_as(Select::new().column_as("COUNT(*)", "n").from("users"), "t");
    assert_eq!(
        render(&outer).0,
        "SELECT t.n FROM ( SELECT COUNT(*) AS n FROM users ) AS t"
    );
}

#[test]
fn test_where_exists() {
    let orders = Select::new()
        .column("1")
        .from("orders")
        .where_("orders.user_id = u.id");
    let select = Select::new().from_as("users", "u").where_exists(orders);
    assert_eq!(
        render(&select).0,
        "SELECT * FROM users AS u WHERE EXISTS( SELECT 1 FROM orders WHERE orders.user_id = u.id )"
    );
}

#[test]
fn test_where_group() {
    let select = Select::new()
        .from("t")
        .where_(("a", 1))
        .where_group(|scope| scope.where_(("b", 2)).or_where(("c", 3)));
    let (sql, values) = render(&select);
    assert_eq!(
        sql,
        "SELECT * FROM t WHERE a = :_h_0 AND ( b = :_h_1 OR c = :_h_2 )"
    );
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
}

#[test]
fn test_deferred_operand_resolved_at_render() {
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    let threshold = Arc::new(AtomicI64::new(1));
    let seen = threshold.clone();
    let select = Select::new()
        .from("t")
        .where_(("score", ">", Operand::deferred(move || seen.load(Ordering::SeqCst).into())));
    assert_eq!(render(&select).1, vec![Value::Int(1)]);
    threshold.store(7, Ordering::SeqCst);
    assert_eq!(render(&select).1, vec![Value::Int(7)]);
}

#[test]
fn test_pre_bound_named_parameter() {
    let select = Select::new()
        .from("events")
        .where_("created_at > :since")
        .bind("since", "2024-01-01");
    let (sql, binds) = select.to_sql().unwrap();
    assert_eq!(sql, "SELECT * FROM events WHERE created_at > :since");
    assert_eq!(
        binds.get("since").map(|p| p.value().clone()),
        Some(Value::from("2024-01-01"))
    );
}

#[test]
fn test_raw_fragment_binds_travel_with_it() {
    let select = Select::new()
        .from("events")
        .where_(Raw::new("kind = :kind").bind("kind", "click"))
        .where_(("user_id", 9));
    let (sql, values) = render(&select);
    assert_eq!(sql, "SELECT * FROM events WHERE kind = :kind AND user_id = :_h_0");
    assert_eq!(values, vec![Value::from("click"), Value::Int(9)]);
}

#[test]
fn test_render_is_idempotent() {
    let select = Select::new()
        .from("t")
        .where_(("a", 1))
        .where_in("b", ["x", "y"])
        .bind("fixed", 3);
    let first = select.to_sql().unwrap();
    let second = select.to_sql().unwrap();
    assert_eq!(first.0, second.0);
    assert_eq!(first.1.to_ordered_values(), second.1.to_ordered_values());
}

#[test]
fn test_bind_order_matches_call_order() {
    let update = Update::new()
        .from("t")
        .assign("a", 1)
        .assign("b", 2)
        .where_(("c", 3))
        .where_(("d", 4));
    let (sql, values) = render(&update);
    assert_eq!(
        sql,
        "UPDATE t SET a = :_h_0, b = :_h_1 WHERE c = :_h_2 AND d = :_h_3"
    );
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3), Value::Int(4)]);
}

#[test]
fn test_clone_independence() {
    let original = Select::new().from("t").where_(("a", 1));
    let copy = original.clone().where_(("b", 2));
    assert_eq!(render(&original).0, "SELECT * FROM t WHERE a = :_h_0");
    assert_eq!(render(&copy).0, "SELECT * FROM t WHERE a = :_h_0 AND b = :_h_1");
}

#[test]
fn test_empty_statements_render_nothing() {
    assert!(Select::new().to_sql().is_none());
    assert!(Insert::new().to_sql().is_none());
    assert!(Insert::new().from("foo").to_sql().is_none());
    assert!(Update::new().from("foo").to_sql().is_none());
    assert!(Update::new().assign("a", 1).to_sql().is_none());
    assert!(Delete::new().to_sql().is_none());
    assert!(Union::new().to_sql().is_none());
}

#[test]
fn test_insert() {
    let insert = Insert::new().from("foo").assign("bar", "v");
    let (sql, values) = render(&insert);
    assert_eq!(sql, "INSERT INTO foo ( bar ) VALUES ( :_h_0 )");
    assert_eq!(values, vec![Value::from("v")]);
}

#[test]
fn test_insert_ignore_with_raw_value() {
    let insert = Insert::new()
        .ignore(true)
        .from_as("users", "u")
        .assign("name", "alice")
        .assign("created_at", Operand::raw("NOW()"));
    let (sql, values) = render(&insert);
    assert_eq!(
        sql,
        "INSERT IGNORE INTO users ( name, created_at ) VALUES ( :_h_0, NOW() )"
    );
    assert_eq!(values, vec![Value::from("alice")]);
}

#[test]
fn test_update_keeps_alias() {
    let update = Update::new()
        .from_as("users", "u")
        .assign("u.name", "x")
        .where_(("u.id", 1))
        .order_by_asc("u.id")
        .limit(1);
    assert_eq!(
        render(&update).0,
        "UPDATE users AS u SET u.name = :_h_0 WHERE u.id = :_h_1 ORDER BY u.id ASC LIMIT 1"
    );
}

#[test]
fn test_delete_drops_alias() {
    let delete = Delete::new()
        .from_as("users", "u")
        .where_null("deleted_at")
        .limit(100);
    let (sql, values) = render(&delete);
    assert_eq!(sql, "DELETE FROM users WHERE deleted_at IS NULL LIMIT 100");
    assert!(values.is_empty());
}

#[test]
fn test_union_distinct() {
    let s1 = Select::new().from("a").where_(("x", 1));
    let s2 = Select::new().from("b").where_(("y", 2));
    let union = Union::new().add_selects([s1, s2]);
    let (sql, values) = render(&union);
    assert_eq!(
        sql,
        "( SELECT * FROM a WHERE x = :_h_0 ) UNION DISTINCT ( SELECT * FROM b WHERE y = :_h_1 )"
    );
    assert_eq!(values, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn test_union_all_with_order_and_limit() {
    let union = Union::new()
        .add_select(Select::new().column("id").from("a"))
        .add_select(Select::new().column("id").from("b"))
        .all()
        .order_by_desc("id")
        .limit(5);
    assert_eq!(
        render(&union).0,
        "( ( SELECT id FROM a ) UNION ALL ( SELECT id FROM b ) ) ORDER BY id DESC LIMIT 5"
    );
}

#[test]
fn test_union_as_subquery() {
    let union = Union::new()
        .add_select(Select::new().column("id").from("a"))
        .add_select(Select::new().column("id").from("b"));
    let select = Select::new().column("COUNT(*)").from_as(union, "ids");
    assert_eq!(
        render(&select).0,
        "SELECT COUNT(*) FROM ( ( SELECT id FROM a ) UNION DISTINCT ( SELECT id FROM b ) ) AS ids"
    );
}

#[test]
fn test_reset_clears_clauses() {
    let mut select = Select::new().from("t").where_(("a", 1)).order_by_asc("a").limit(3);
    select.reset_order();
    select.reset_limit();
    assert_eq!(render(&select).0, "SELECT * FROM t WHERE a = :_h_0");
    select.reset();
    assert!(select.to_sql().is_none());
}

#[test]
fn test_condition_group_keeps_parentheses() {
    let mut either = Conditions::new();
    either.add(Link::And, ("b", 2));
    either.add(Link::Or, ("c", 3));
    let select = Select::new().from("t").where_(("a", 1)).where_(either.clone());
    let (sql, values) = render(&select);
    assert_eq!(sql, "SELECT * FROM t WHERE a = :_h_0 AND ( b = :_h_1 OR c = :_h_2 )");
    assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);

    let grouped = Select::new()
        .column("kind")
        .from("t")
        .group_by("kind")
        .having(either);
    assert_eq!(
        render(&grouped).0,
        "SELECT kind FROM t GROUP BY kind HAVING ( b = :_h_0 OR c = :_h_1 )"
    );
}

#[test]
fn test_empty_not_in_keeps_every_row() {
    let select = Select::new()
        .from("t")
        .where_not_in("id", Vec::<i64>::new())
        .where_(("a", 1));
    let (sql, values) = render(&select);
    assert_eq!(sql, "SELECT * FROM t WHERE 1 = 1 AND a = :_h_0");
    assert_eq!(values, vec![Value::Int(1)]);
}

#[test]
fn test_render_nothing_leaves_binds_untouched() {
    let mut binds = BindParameterList::new();
    binds.add("outer");

    let insert = Insert::new().from("t").assignments(["NOW()"]).bind("seed", 1);
    assert_eq!(insert.render(&mut binds, false), None);
    let update = Update::new().assign("a", 1).bind("seed", 1);
    assert_eq!(update.render(&mut binds, false), None);
    let delete = Delete::new().where_(("a", 1)).bind("seed", 1);
    assert_eq!(delete.render(&mut binds, false), None);
    let union = Union::new().add_select(Select::new()).bind("seed", 1);
    assert_eq!(union.render(&mut binds, false), None);

    assert_eq!(binds.len(), 1);
    assert!(binds.get("seed").is_none());
    assert_eq!(binds.add("next").name(), "_h_1");
}

#[test]
fn test_successful_render_commits_seeded_binds() {
    let mut binds = BindParameterList::new();
    binds.add("outer");
    let select = Select::new()
        .from("events")
        .where_("created_at > :since")
        .where_(("kind", "click"))
        .bind("since", "2024-01-01");
    let sql = select.render(&mut binds, false);
    assert_eq!(
        sql.as_deref(),
        Some("SELECT * FROM events WHERE created_at > :since AND kind = :_h_1")
    );
    assert_eq!(
        binds.values(),
        vec![Value::from("outer"), Value::from("2024-01-01"), Value::from("click")]
    );
}
