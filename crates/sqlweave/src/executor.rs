//! Statement execution with retry and observability.
//!
//! - Automatic retry on transient errors (deadlock, lock wait timeout, dropped connection)
//! - Tracing spans per statement
//! - Slow statement logging

use std::future::Future;
use std::time::{Duration, Instant};

use sqlx::mysql::{MySqlArguments, MySqlDatabaseError, MySqlPool};
use sqlx::Error as SqlxError;
use tracing::{debug, instrument, warn};

use crate::row::Row;
use crate::value::Value;
use crate::{Result, SqlWeaveError};

/// MySQL error numbers worth retrying.
const ER_LOCK_WAIT_TIMEOUT: u16 = 1205;
const ER_LOCK_DEADLOCK: u16 = 1213;

/// Configuration for statement execution with retry support.
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Maximum number of retries for transient errors
    pub max_retries: u32,
    /// Initial delay between retries in milliseconds
    pub initial_delay_ms: u64,
    /// Maximum delay between retries in milliseconds
    pub max_delay_ms: u64,
    /// Backoff multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Threshold for slow statement logging in milliseconds
    pub slow_query_threshold_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_delay_ms: 50,
            max_delay_ms: 2000,
            backoff_multiplier: 2.0,
            slow_query_threshold_ms: 1000,
        }
    }
}

impl ExecutorConfig {
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Default::default()
        }
    }

    pub(crate) fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::from_millis(self.initial_delay_ms);
        }

        let delay_ms = (self.initial_delay_ms as f64) * self.backoff_multiplier.powi(attempt as i32);

        Duration::from_millis((delay_ms as u64).min(self.max_delay_ms))
    }
}

/// Runs expanded (`?`-placeholder) statements against a pool.
pub struct QueryExecutor<'a> {
    pool: &'a MySqlPool,
    config: &'a ExecutorConfig,
}

impl<'a> QueryExecutor<'a> {
    pub fn new(pool: &'a MySqlPool, config: &'a ExecutorConfig) -> Self {
        Self { pool, config }
    }

    /// Fetches at most one row.
    #[instrument(skip(self, sql, values), fields(sql_preview = %preview(sql, 100), binds = values.len()))]
    pub async fn fetch_optional(&self, sql: &str, values: &[Value]) -> Result<Option<Row>> {
        let row = self
            .with_retry(sql, || async {
                let arguments = bind_arguments(values)?;
                Ok::<_, Failure>(sqlx::query_with(sql, arguments).fetch_optional(self.pool).await?)
            })
            .await?;
        row.as_ref().map(Row::from_mysql).transpose()
    }

    /// Runs an INSERT/UPDATE/DELETE and returns the affected row count.
    #[instrument(skip(self, sql, values), fields(sql_preview = %preview(sql, 100), binds = values.len()))]
    pub async fn execute(&self, sql: &str, values: &[Value]) -> Result<u64> {
        let rows_affected = self
            .with_retry(sql, || async {
                let arguments = bind_arguments(values)?;
                Ok::<_, Failure>(sqlx::query_with(sql, arguments)
                    .execute(self.pool)
                    .await?
                    .rows_affected())
            })
            .await?;
        debug!(rows_affected, "Statement executed successfully");
        Ok(rows_affected)
    }

    async fn with_retry<T, F, Fut>(&self, sql: &str, mut run: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = std::result::Result<T, Failure>>,
    {
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            let start = Instant::now();

            match run().await {
                Ok(result) => {
                    log_completion(self.config, sql, start.elapsed(), attempt);
                    return Ok(result);
                }
                Err(Failure::Bind(e)) => return Err(e),
                Err(Failure::Driver(e)) => {
                    let elapsed = start.elapsed();
                    let retryable = is_retryable_error(&e);

                    warn!(
                        sql = %preview(sql, 50),
                        attempt,
                        elapsed_ms = elapsed.as_millis() as u64,
                        retryable,
                        error = %e,
                        "Statement failed"
                    );

                    if retryable && attempt < self.config.max_retries {
                        let delay = self.config.delay_for_attempt(attempt);
                        debug!(delay_ms = delay.as_millis() as u64, "Retrying after delay");
                        tokio::time::sleep(delay).await;
                        last_error = Some(e);
                        continue;
                    }

                    return Err(SqlWeaveError::from(e));
                }
            }
        }

        Err(last_error
            .map(SqlWeaveError::from)
            .unwrap_or_else(|| SqlWeaveError::Query("Statement failed after all retries".to_string())))
    }
}

/// Failure of one attempt: argument building never succeeds on retry.
pub(crate) enum Failure {
    Bind(SqlWeaveError),
    Driver(SqlxError),
}

impl From<SqlxError> for Failure {
    fn from(err: SqlxError) -> Self {
        Failure::Driver(err)
    }
}

impl From<SqlWeaveError> for Failure {
    fn from(err: SqlWeaveError) -> Self {
        Failure::Bind(err)
    }
}

/// Builds positional driver arguments.
pub(crate) fn bind_arguments(values: &[Value]) -> Result<MySqlArguments> {
    let mut arguments = MySqlArguments::default();
    for value in values {
        value.bind_to_arguments(&mut arguments)?;
    }
    Ok(arguments)
}

/// Deadlocks, lock wait timeouts and lost connections.
pub(crate) fn is_retryable_error(err: &SqlxError) -> bool {
    if let SqlxError::Database(db_err) = err {
        if let Some(mysql_err) = db_err.try_downcast_ref::<MySqlDatabaseError>() {
            return matches!(mysql_err.number(), ER_LOCK_DEADLOCK | ER_LOCK_WAIT_TIMEOUT);
        }
        return db_err.code().is_some_and(|code| code.starts_with("40"));
    }

    matches!(err, SqlxError::Io(_) | SqlxError::PoolTimedOut)
}

pub(crate) fn log_completion(config: &ExecutorConfig, sql: &str, elapsed: Duration, attempt: u32) {
    let elapsed_ms = elapsed.as_millis() as u64;

    if elapsed_ms >= config.slow_query_threshold_ms {
        warn!(
            sql = %preview(sql, 100),
            elapsed_ms,
            threshold_ms = config.slow_query_threshold_ms,
            attempt,
            "Slow statement detected"
        );
    } else {
        debug!(sql = %preview(sql, 100), elapsed_ms, attempt, "Statement completed");
    }
}

pub(crate) fn preview(sql: &str, chars: usize) -> String {
    sql.chars().take(chars).collect()
}
