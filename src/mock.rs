//! In-memory executor for tests.
//!
//! [`MockExecutor`] answers each call with the next queued result set and
//! records every statement it receives. Available under the `mock` feature.
//!
//! ```
//! use querychain::mock::MockExecutor;
//! use querychain::QueryExecutor;
//! use serde_json::json;
//!
//! let exec = MockExecutor::new().with_json_rows(vec![json!({"id": 1})]);
//! let rows = exec.query_all("SELECT id FROM people", &[]).unwrap();
//! assert_eq!(rows.len(), 1);
//! assert_eq!(exec.statements()[0].sql, "SELECT id FROM people");
//! ```

use crate::executor::{ExecutionError, QueryExecutor};
use crate::query::Statement;
use crate::row::Row;
use sea_query::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

/// Recording executor returning queued results
///
/// When the queue is empty every query returns zero rows.
#[derive(Debug, Default)]
pub struct MockExecutor {
    results: RefCell<VecDeque<Result<Vec<Row>, ExecutionError>>>,
    statements: RefCell<Vec<Statement>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result set
    pub fn with_rows(self, rows: Vec<Row>) -> Self {
        self.results.borrow_mut().push_back(Ok(rows));
        self
    }

    /// Queue a result set built from JSON objects
    ///
    /// A value that is not an object queues a mapping error instead.
    pub fn with_json_rows(self, rows: Vec<serde_json::Value>) -> Self {
        let rows = rows.into_iter().map(Row::from_json).collect();
        self.results.borrow_mut().push_back(rows);
        self
    }

    /// Queue a single-value result, as returned for `COUNT(*)`
    pub fn with_scalar(self, value: impl Into<Value>) -> Self {
        let row = Row::new(vec!["COUNT(*)".to_string()], vec![value.into()]);
        self.with_rows(vec![row])
    }

    /// Queue a failure
    pub fn with_error(self, error: ExecutionError) -> Self {
        self.results.borrow_mut().push_back(Err(error));
        self
    }

    /// Statements received so far, oldest first
    pub fn statements(&self) -> Vec<Statement> {
        self.statements.borrow().clone()
    }

    pub fn last_statement(&self) -> Option<Statement> {
        self.statements.borrow().last().cloned()
    }
}

impl QueryExecutor for MockExecutor {
    fn query_all(&self, sql: &str, params: &[Value]) -> Result<Vec<Row>, ExecutionError> {
        self.statements.borrow_mut().push(Statement {
            sql: sql.to_string(),
            params: params.to_vec(),
        });
        self.results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_are_returned_in_queue_order() {
        let exec = MockExecutor::new()
            .with_scalar(3i64)
            .with_error(ExecutionError::Database("gone".to_string()));

        assert_eq!(
            exec.query_scalar("SELECT COUNT(*) FROM t", &[]).unwrap(),
            Some(Value::from(3i64))
        );
        assert!(exec.query_all("SELECT * FROM t", &[]).is_err());
        assert!(exec.query_all("SELECT * FROM t", &[]).unwrap().is_empty());
        assert_eq!(exec.statements().len(), 3);
    }

    #[test]
    fn test_records_params() {
        let exec = MockExecutor::new();
        exec.query_all("SELECT * FROM t WHERE (a = ? )", &[Value::from("x")])
            .unwrap();
        let stmt = exec.last_statement().unwrap();
        assert_eq!(stmt.params, vec![Value::from("x")]);
    }

    #[test]
    fn test_non_object_json_row_queues_error() {
        let exec = MockExecutor::new().with_json_rows(vec![serde_json::json!(1)]);
        assert!(matches!(
            exec.query_all("SELECT", &[]),
            Err(ExecutionError::Mapping(_))
        ));
    }
}
