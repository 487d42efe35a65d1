//! `QueryExecutor` Module
//!
//! The execution facility the query builder delegates to. Implementations own
//! the driver, connections and statement preparation; the builder only hands
//! over SQL text with `?` placeholders and the positional bind values.

use crate::row::Row;
use sea_query::Value;
use std::fmt;

/// Error reported by an executor or while mapping its rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Error returned by the database driver
    Database(String),
    /// Row → entity conversion failed
    Mapping(String),
    /// Other execution errors
    Other(String),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Database(s) => write!(f, "Database error: {s}"),
            ExecutionError::Mapping(s) => write!(f, "Mapping error: {s}"),
            ExecutionError::Other(s) => write!(f, "Execution error: {s}"),
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Trait for executing SELECT statements
///
/// Parameters bind strictly by position: `params[0]` fills the first `?`
/// of `sql`, `params[1]` the second, and so on.
///
/// # Examples
///
/// ```
/// use querychain::{ExecutionError, QueryExecutor, Row};
/// use sea_query::Value;
///
/// struct Empty;
///
/// impl QueryExecutor for Empty {
///     fn query_all(&self, _sql: &str, _params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
///         Ok(Vec::new())
///     }
/// }
///
/// assert_eq!(Empty.query_scalar("SELECT COUNT(*) FROM people", &[]).unwrap(), None);
/// ```
pub trait QueryExecutor {
    /// Execute a query and return all rows in result-set order
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` if the query execution fails.
    fn query_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError>;

    /// Execute a query and return the first column of the first row
    ///
    /// Returns `Ok(None)` when the result set is empty.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError` if the query execution fails.
    fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<Value>, ExecutionError> {
        let rows = self.query_all(sql, params)?;
        Ok(rows.into_iter().next().and_then(|row| row.into_values().into_iter().next()))
    }
}

impl<X: QueryExecutor + ?Sized> QueryExecutor for &X {
    fn query_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
        (**self).query_all(sql, params)
    }

    fn query_scalar(&self, sql: &str, params: &[Value]) -> Result<Option<Value>, ExecutionError> {
        (**self).query_scalar(sql, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Row>);

    impl QueryExecutor for Fixed {
        fn query_all(&self, _sql: &str, _params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_execution_error_display() {
        let err = ExecutionError::Database("deadlock".to_string());
        assert!(err.to_string().contains("Database error"));
        assert!(err.to_string().contains("deadlock"));

        let err = ExecutionError::Mapping("bad column".to_string());
        assert!(err.to_string().contains("Mapping error"));

        let err = ExecutionError::Other("x".to_string());
        assert!(err.to_string().contains("Execution error"));
    }

    #[test]
    fn test_default_scalar_takes_first_column_of_first_row() {
        let exec = Fixed(vec![
            Row::new(
                vec!["n".to_string(), "m".to_string()],
                vec![Value::from(7i64), Value::from(8i64)],
            ),
            Row::new(
                vec!["n".to_string(), "m".to_string()],
                vec![Value::from(9i64), Value::from(1i64)],
            ),
        ]);
        assert_eq!(exec.query_scalar("SELECT", &[]).unwrap(), Some(Value::from(7i64)));
    }

    #[test]
    fn test_default_scalar_on_empty_result() {
        let exec = Fixed(Vec::new());
        assert_eq!(exec.query_scalar("SELECT", &[]).unwrap(), None);
    }
}
