//! Error types for query construction and execution.
//!
//! Configuration mistakes (a missing table declaration, an accessor that does
//! not name a declared field) surface synchronously from the builder call that
//! first needs the metadata. They are never retried.

use crate::executor::ExecutionError;
use std::fmt;

/// Errors raised while building or running a [`QueryChain`](crate::QueryChain)
#[derive(Debug)]
pub enum QueryError {
    /// The entity declares no table name
    MissingTable {
        /// Type name of the entity
        entity: &'static str,
    },
    /// An accessor names a field the entity (and its base) does not declare
    FieldNotFound {
        /// Candidate field name derived from the accessor
        field: String,
        /// Type name of the entity
        entity: &'static str,
    },
    /// The accessor's method name does not yield a field name
    InvalidAccessor {
        method: &'static str,
        entity: &'static str,
    },
    /// Accessor resolution failed; `source` holds the original cause
    Resolution {
        accessor: &'static str,
        entity: &'static str,
        source: Box<QueryError>,
    },
    /// The execution facility failed, or a row could not be mapped
    Execution(ExecutionError),
}

impl QueryError {
    /// Returns `true` for errors caused by entity or accessor declarations
    /// rather than by the database.
    pub fn is_configuration(&self) -> bool {
        match self {
            QueryError::MissingTable { .. }
            | QueryError::FieldNotFound { .. }
            | QueryError::InvalidAccessor { .. } => true,
            QueryError::Resolution { source, .. } => source.is_configuration(),
            QueryError::Execution(_) => false,
        }
    }

    /// Innermost cause, unwrapping any `Resolution` layers
    pub fn root_cause(&self) -> &QueryError {
        match self {
            QueryError::Resolution { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryError::MissingTable { entity } => {
                write!(f, "Entity {entity} has no table name; add #[table_name = \"...\"]")
            }
            QueryError::FieldNotFound { field, entity } => write!(
                f,
                "Field not found: {field} in entity {entity}; check that the accessor follows the get_/is_ naming convention"
            ),
            QueryError::InvalidAccessor { method, entity } => write!(
                f,
                "Accessor method '{method}' on {entity} does not name a field"
            ),
            QueryError::Resolution {
                accessor,
                entity,
                source,
            } => write!(
                f,
                "Failed to resolve column for accessor '{accessor}' on {entity}: {source}"
            ),
            QueryError::Execution(e) => write!(f, "Execution error: {e}"),
        }
    }
}

impl std::error::Error for QueryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            QueryError::Resolution { source, .. } => Some(source.as_ref()),
            QueryError::Execution(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ExecutionError> for QueryError {
    fn from(err: ExecutionError) -> Self {
        QueryError::Execution(err)
    }
}
