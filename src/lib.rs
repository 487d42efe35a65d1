//! # querychain
//!
//! Typed fluent SELECT builder over a pluggable SQL executor.
//!
//! Entities declare their table and columns with `#[derive(Entity)]`; queries
//! reference fields through generated [`Accessor`] constants instead of
//! column strings, and rows come back as entity values.

extern crate self as querychain;

pub mod config;
pub mod entity;
pub mod error;
pub mod executor;
pub mod metrics;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod query;
pub mod row;

pub use config::QueryConfig;
pub use entity::{
    field_name_from_method, to_snake_case, Accessor, Entity, EntityDescriptor, EntityMetadata,
    FieldDescriptor, MetadataCache,
};
pub use error::QueryError;
pub use executor::{ExecutionError, QueryExecutor};
pub use query::{ComparisonOp, QueryChain, QueryContext, QueryState, Statement};
pub use row::{FromRow, FromValue, Row, ValueError};

/// Derive `Entity`, `FromRow` and one `Accessor` constant per field
///
/// See the `querychain-derive` crate for the supported attributes.
pub use querychain_derive::Entity;
