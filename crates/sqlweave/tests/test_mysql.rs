//! Integration tests against a live MySQL server.
//!
//! These tests require a MySQL database to be running.
//! Set DATABASE_URL, then run with `--ignored`.

use std::sync::Arc;

use futures::TryStreamExt;
use sqlweave::prelude::*;
use sqlweave::Row;

async fn connect() -> MySqlConnection {
    let uri = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "mysql://root@localhost/sqlweave_test".to_string());
    MySqlConnection::connect(&uri, PoolConfig::default()).await.unwrap()
}

#[tokio::test]
#[ignore] // Only run with --ignored flag when database is available
async fn test_crud_round_trip() -> Result<()> {
    let conn = connect().await;
    let pool = conn.pool().clone();

    sqlx::query("DROP TABLE IF EXISTS sqlweave_users")
        .execute(&pool)
        .await
        .unwrap();
    sqlx::query(
        "CREATE TABLE sqlweave_users (
            id BIGINT AUTO_INCREMENT PRIMARY KEY,
            name VARCHAR(64) NOT NULL,
            age INT NOT NULL,
            deleted_at DATETIME NULL
        )",
    )
    .execute(&pool)
    .await
    .unwrap();

    let conn: Arc<dyn Connection> = Arc::new(conn);
    let table = QueryBuilder::new()
        .with_connection(conn.clone())
        .from("sqlweave_users");

    for (name, age) in [("alice", 30), ("bob", 17), ("carol", 45)] {
        let inserted = table
            .clone()
            .assign("name", name)
            .assign("age", age)
            .insert()
            .await?;
        assert_eq!(inserted, 1);
    }

    let adults = table.clone().where_(("age", ">=", 18));
    assert_eq!(adults.count().await?, 2);
    assert!(adults.exists().await?);
    assert!(!table.clone().where_(("name", "dave")).exists().await?);

    let names: Vec<Value> = adults
        .clone()
        .column("name")
        .order_by_asc("name")
        .fetch_column(0)?
        .try_collect()
        .await?;
    assert_eq!(names, vec![Value::from("alice"), Value::from("carol")]);

    let updated = table
        .clone()
        .assign("deleted_at", Operand::raw("NOW()"))
        .where_(("name", "bob"))
        .update()
        .await?;
    assert_eq!(updated, 1);

    let bob: Option<Row> = table
        .clone()
        .where_not_null("deleted_at")
        .fetch_one()
        .await?;
    assert_eq!(
        bob.and_then(|row| row.get("name").cloned()),
        Some(Value::from("bob"))
    );

    let deleted = table.clone().where_in("name", ["alice", "bob"]).delete().await?;
    assert_eq!(deleted, 2);
    assert_eq!(table.count().await?, 1);

    sqlx::query("DROP TABLE sqlweave_users")
        .execute(&pool)
        .await
        .unwrap();
    Ok(())
}

#[tokio::test]
#[ignore] // Only run with --ignored flag when database is available
async fn test_subquery_binds_expand_in_order() -> Result<()> {
    let conn: Arc<dyn Connection> = Arc::new(connect().await);

    let row = QueryBuilder::new()
        .with_connection(conn)
        .column_as(Raw::new(":a + :b").bind("a", 2).bind("b", 3), "total")
        .column_as(Select::new().column_as("COUNT(*)", "n").from_as(Raw::new("( SELECT 1 UNION ALL SELECT 2 )"), "x"), "n")
        .fetch_one()
        .await?;

    let row = row.unwrap();
    assert!(matches!(row.get("total"), Some(Value::Int(5)) | Some(Value::Decimal(_))));
    assert_eq!(row.get("n"), Some(&Value::Int(2)));
    Ok(())
}
