//! Query building and execution for entities.
//!
//! # Architecture
//!
//! - **State**: accumulated clauses and parameters, SQL assembly (`QueryState`)
//! - **Chain**: the fluent builder and its terminal operations (`QueryChain`)
//! - **Context**: composition root owning executor, cache and config (`QueryContext`)
//!
//! # Examples
//!
//! ```
//! use querychain::mock::MockExecutor;
//! use querychain::{Entity, QueryContext};
//!
//! #[derive(Entity)]
//! #[table_name = "people"]
//! struct Person {
//!     id: i64,
//!     active: bool,
//! }
//!
//! # fn main() -> Result<(), querychain::QueryError> {
//! let ctx = QueryContext::new(MockExecutor::new().with_scalar(3i64));
//! let active = ctx.query::<Person>()?.eq(Person::ACTIVE, true)?.count()?;
//! assert_eq!(active, 3);
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod context;
pub mod state;

#[doc(inline)]
pub use chain::QueryChain;
#[doc(inline)]
pub use context::QueryContext;
#[doc(inline)]
pub use state::{ComparisonOp, QueryState, Statement};
