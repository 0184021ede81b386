//! Error types for sqlweave

use thiserror::Error;

/// Result type alias for sqlweave operations
pub type Result<T> = std::result::Result<T, SqlWeaveError>;

/// Unified error type for all sqlweave operations
#[derive(Error, Debug, Clone)]
pub enum SqlWeaveError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    /// Caller passed arguments the builder cannot interpret
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// Unique constraint violation
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Foreign key constraint violation
    #[error("Foreign key constraint violation: {0}")]
    ForeignKey(String),

    /// Deadlock detected - retryable
    #[error("Deadlock detected: {0}")]
    Deadlock(String),

    /// Connection or lock wait timeout - retryable
    #[error("Timeout: {0}")]
    Timeout(String),

    /// Transient error that may succeed on retry
    #[error("Transient error: {0}")]
    Transient(String),
}

impl SqlWeaveError {
    /// Returns true if this error is potentially retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SqlWeaveError::Deadlock(_) | SqlWeaveError::Timeout(_) | SqlWeaveError::Transient(_)
        )
    }

    /// Returns true if this is a constraint violation error
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            SqlWeaveError::Conflict(_) | SqlWeaveError::ForeignKey(_)
        )
    }
}

impl From<serde_json::Error> for SqlWeaveError {
    fn from(err: serde_json::Error) -> Self {
        SqlWeaveError::Serialization(err.to_string())
    }
}

// MySQL-specific error conversions (when mysql-errors feature is enabled)
#[cfg(feature = "mysql-errors")]
impl From<sqlx::Error> for SqlWeaveError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;
        use sqlx::Error;
        match &err {
            Error::Configuration(_) => SqlWeaveError::Connection(err.to_string()),
            Error::Database(db_err) => {
                match db_err.kind() {
                    ErrorKind::UniqueViolation => return SqlWeaveError::Conflict(err.to_string()),
                    ErrorKind::ForeignKeyViolation => {
                        return SqlWeaveError::ForeignKey(err.to_string())
                    }
                    ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                        return SqlWeaveError::Validation(err.to_string())
                    }
                    _ => {}
                }
                // Fall back to the SQLSTATE class
                if let Some(code) = db_err.code() {
                    let code_str: &str = &code;
                    match code_str {
                        // Deadlock found when trying to get lock (ER_LOCK_DEADLOCK)
                        "40001" => return SqlWeaveError::Deadlock(err.to_string()),
                        // Transaction rollback class
                        code if code.starts_with("40") => {
                            return SqlWeaveError::Transient(err.to_string())
                        }
                        // Connection exception class
                        code if code.starts_with("08") => {
                            return SqlWeaveError::Connection(err.to_string())
                        }
                        _ => {}
                    }
                }
                SqlWeaveError::Database(err.to_string())
            }
            Error::Io(_) => SqlWeaveError::Connection(err.to_string()),
            Error::Tls(_) => SqlWeaveError::Connection(err.to_string()),
            Error::Protocol(_) => SqlWeaveError::Connection(err.to_string()),
            Error::RowNotFound => SqlWeaveError::Query("Row not found".to_string()),
            Error::TypeNotFound { .. } => SqlWeaveError::Deserialization(err.to_string()),
            Error::ColumnIndexOutOfBounds { .. } => SqlWeaveError::Query(err.to_string()),
            Error::ColumnNotFound(_) => SqlWeaveError::Query(err.to_string()),
            Error::ColumnDecode { .. } => SqlWeaveError::Deserialization(err.to_string()),
            Error::Decode(_) => SqlWeaveError::Deserialization(err.to_string()),
            Error::PoolTimedOut => SqlWeaveError::Timeout("Connection pool timed out".to_string()),
            Error::PoolClosed => SqlWeaveError::Connection("Connection pool closed".to_string()),
            Error::WorkerCrashed => SqlWeaveError::Internal("Worker thread crashed".to_string()),
            _ => SqlWeaveError::Database(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_database() {
        let err = SqlWeaveError::Database("invalid query".to_string());
        assert_eq!(err.to_string(), "Database error: invalid query");
    }

    #[test]
    fn test_error_display_query() {
        let err = SqlWeaveError::Query("statement has no FROM target".to_string());
        assert_eq!(err.to_string(), "Query error: statement has no FROM target");
    }

    #[test]
    fn test_error_display_invalid_argument() {
        let err = SqlWeaveError::InvalidArgument("expected 1 to 3 arguments, got 4".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid argument: expected 1 to 3 arguments, got 4"
        );
    }

    #[test]
    fn test_error_display_connection() {
        let err = SqlWeaveError::Connection("timeout".to_string());
        assert_eq!(err.to_string(), "Connection error: timeout");
    }

    #[test]
    fn test_error_display_conflict() {
        let err = SqlWeaveError::Conflict("Duplicate entry '1' for key 'PRIMARY'".to_string());
        assert_eq!(err.to_string(), "Conflict: Duplicate entry '1' for key 'PRIMARY'");
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<String>("invalid").unwrap_err();
        let err: SqlWeaveError = json_err.into();
        assert!(matches!(err, SqlWeaveError::Serialization(_)));
    }

    #[test]
    fn test_is_retryable() {
        assert!(SqlWeaveError::Deadlock("test".to_string()).is_retryable());
        assert!(SqlWeaveError::Timeout("test".to_string()).is_retryable());
        assert!(SqlWeaveError::Transient("test".to_string()).is_retryable());
        assert!(!SqlWeaveError::Conflict("test".to_string()).is_retryable());
        assert!(!SqlWeaveError::InvalidArgument("test".to_string()).is_retryable());
        assert!(!SqlWeaveError::Query("test".to_string()).is_retryable());
    }

    #[test]
    fn test_is_constraint_violation() {
        assert!(SqlWeaveError::Conflict("test".to_string()).is_constraint_violation());
        assert!(SqlWeaveError::ForeignKey("test".to_string()).is_constraint_violation());
        assert!(!SqlWeaveError::Deadlock("test".to_string()).is_constraint_violation());
        assert!(!SqlWeaveError::Query("test".to_string()).is_constraint_violation());
    }
}
