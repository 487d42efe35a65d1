//! Fluent SELECT builder bound to one entity type.

use super::state::{ComparisonOp, QueryState, Statement};
use crate::config::QueryConfig;
use crate::entity::{Accessor, Entity, MetadataCache};
use crate::error::QueryError;
use crate::executor::{ExecutionError, QueryExecutor};
use crate::row::{FromRow, FromValue};
use sea_query::Value;
use std::marker::PhantomData;

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;
#[cfg(feature = "tracing")]
use crate::metrics::tracing_helpers;

/// Query builder for selecting `E` records
///
/// Mutators take and return the builder so calls chain; those that resolve
/// an accessor return `Result` and fail on the call that names the bad field.
/// A builder is single-writer state: keep it on one thread and build one
/// query with it.
///
/// # Example
///
/// ```
/// use querychain::mock::MockExecutor;
/// use querychain::{Entity, QueryChain};
/// use sea_query::Value;
///
/// #[derive(Entity, Debug)]
/// #[table_name = "people"]
/// struct Person {
///     id: i64,
///     #[column_name = "user_name"]
///     user_name: String,
/// }
///
/// # fn main() -> Result<(), querychain::QueryError> {
/// let exec = MockExecutor::new();
/// let people = QueryChain::<Person>::of(&exec)?
///     .eq(Person::USER_NAME, "bob")?
///     .order_by("id")
///     .limit(0, 10)
///     .list()?;
/// assert!(people.is_empty());
///
/// let stmt = exec.last_statement().unwrap();
/// assert_eq!(
///     stmt.sql,
///     "SELECT id, user_name FROM people WHERE (user_name = ? ) ORDER BY id LIMIT 0, 10"
/// );
/// assert_eq!(stmt.params, vec![Value::from("bob")]);
/// # Ok(())
/// # }
/// ```
pub struct QueryChain<'a, E> {
    executor: &'a dyn QueryExecutor,
    cache: &'a MetadataCache,
    log_params: bool,
    state: QueryState,
    _entity: PhantomData<fn() -> E>,
}

impl<'a, E: Entity> QueryChain<'a, E> {
    /// Create a builder using the process-wide cache and default config
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingTable` if `E` declares no table name.
    pub fn of(executor: &'a dyn QueryExecutor) -> Result<Self, QueryError> {
        Self::with_cache(executor, MetadataCache::global(), &QueryConfig::default())
    }

    /// Create a builder with an explicit cache and config
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingTable` if `E` declares no table name.
    pub fn with_cache(
        executor: &'a dyn QueryExecutor,
        cache: &'a MetadataCache,
        config: &QueryConfig,
    ) -> Result<Self, QueryError> {
        let meta = cache.metadata::<E>()?;
        Ok(Self {
            executor,
            cache,
            log_params: config.log_params,
            state: QueryState::new(
                meta.table_name(),
                meta.columns().to_vec(),
                config.default_offset,
                config.default_limit,
            ),
            _entity: PhantomData,
        })
    }

    /// Replace the select list; an empty list selects `*`
    pub fn select<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.set_select(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Add a raw predicate with its positional values
    ///
    /// Predicates are AND-ed in call order. The fragment is wrapped in
    /// parentheses and otherwise used verbatim.
    ///
    /// ```
    /// # use querychain::{mock::MockExecutor, Entity, QueryChain};
    /// # use sea_query::Value;
    /// # #[derive(Entity)]
    /// # #[table_name = "people"]
    /// # struct Person { id: i64 }
    /// # let exec = MockExecutor::new();
    /// let q = QueryChain::<Person>::of(&exec)
    ///     .unwrap()
    ///     .and_where("id BETWEEN ? AND ?", [Value::from(1), Value::from(9)]);
    /// assert!(q.statement().sql.contains("WHERE (id BETWEEN ? AND ?)"));
    /// ```
    pub fn and_where<I>(mut self, sql: &str, params: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.state.push_where(sql, params.into_iter().map(Into::into));
        self
    }

    /// `(column = ? )`
    pub fn eq<V: ?Sized>(
        self,
        accessor: Accessor<E, V>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        self.compare(accessor, ComparisonOp::Eq, value.into())
    }

    /// `(column <> ? )`
    pub fn ne<V: ?Sized>(
        self,
        accessor: Accessor<E, V>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        self.compare(accessor, ComparisonOp::Ne, value.into())
    }

    /// `(column > ? )`
    pub fn gt<V: ?Sized>(
        self,
        accessor: Accessor<E, V>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        self.compare(accessor, ComparisonOp::Gt, value.into())
    }

    /// `(column >= ? )`
    pub fn ge<V: ?Sized>(
        self,
        accessor: Accessor<E, V>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        self.compare(accessor, ComparisonOp::Ge, value.into())
    }

    /// `(column < ? )`
    pub fn lt<V: ?Sized>(
        self,
        accessor: Accessor<E, V>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        self.compare(accessor, ComparisonOp::Lt, value.into())
    }

    /// `(column <= ? )`
    pub fn le<V: ?Sized>(
        self,
        accessor: Accessor<E, V>,
        value: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        self.compare(accessor, ComparisonOp::Le, value.into())
    }

    fn compare<V: ?Sized>(
        mut self,
        accessor: Accessor<E, V>,
        op: ComparisonOp,
        value: Value,
    ) -> Result<Self, QueryError> {
        let column = self.cache.column(&accessor)?;
        self.state.push_where(&format!("{column} {op} ? "), [value]);
        Ok(self)
    }

    /// `(column IN (?, ?, …))`, one placeholder per value
    ///
    /// An empty `values` adds nothing and does not resolve the accessor,
    /// since `IN ()` is not valid SQL.
    pub fn is_in<V, I>(mut self, accessor: Accessor<E, V>, values: I) -> Result<Self, QueryError>
    where
        V: ?Sized,
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Ok(self);
        }
        let column = self.cache.column(&accessor)?;
        let placeholders = vec!["?"; values.len()].join(", ");
        self.state.push_where(&format!("{column} IN ({placeholders})"), values);
        Ok(self)
    }

    /// `(column LIKE ? )`; the pattern is bound as-is
    pub fn like<V: ?Sized>(
        mut self,
        accessor: Accessor<E, V>,
        pattern: impl Into<Value>,
    ) -> Result<Self, QueryError> {
        let column = self.cache.column(&accessor)?;
        self.state.push_where(&format!("{column} LIKE ? "), [pattern.into()]);
        Ok(self)
    }

    /// `INNER JOIN <table_expr> ON <on>`, verbatim
    pub fn inner_join(mut self, table_expr: &str, on: &str) -> Self {
        self.state.push_join("INNER", table_expr, on);
        self
    }

    /// `LEFT JOIN <table_expr> ON <on>`, verbatim
    pub fn left_join(mut self, table_expr: &str, on: &str) -> Self {
        self.state.push_join("LEFT", table_expr, on);
        self
    }

    /// `RIGHT JOIN <table_expr> ON <on>`, verbatim
    pub fn right_join(mut self, table_expr: &str, on: &str) -> Self {
        self.state.push_join("RIGHT", table_expr, on);
        self
    }

    /// Set GROUP BY; a later call replaces an earlier one
    pub fn group_by(mut self, expr: impl Into<String>) -> Self {
        self.state.set_group_by(expr.into());
        self
    }

    /// Set HAVING; a later call replaces an earlier one
    pub fn having(mut self, expr: impl Into<String>) -> Self {
        self.state.set_having(expr.into());
        self
    }

    /// Set ORDER BY; a later call replaces an earlier one
    pub fn order_by(mut self, expr: impl Into<String>) -> Self {
        self.state.set_order_by(expr.into());
        self
    }

    /// Rendered as `LIMIT <offset>, <limit>`
    pub fn limit(mut self, offset: u64, limit: u64) -> Self {
        self.state.set_page(offset, limit);
        self
    }

    /// Accumulated state
    pub fn state(&self) -> &QueryState {
        &self.state
    }

    /// The SELECT statement `list` would run
    pub fn statement(&self) -> Statement {
        self.state.statement(false)
    }

    /// The `SELECT COUNT(*)` statement `count` would run
    pub fn count_statement(&self) -> Statement {
        self.state.statement(true)
    }

    /// Number of rows matching the filters, ignoring ORDER BY and LIMIT
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Execution` if the executor fails or the count is
    /// not an integer.
    pub fn count(&self) -> Result<u64, QueryError> {
        let sql = self.state.build_sql(true);
        let scalar = self.run(&sql, "count", |exec, sql, params| exec.query_scalar(sql, params))?;
        let count = match scalar {
            Some(value) => Option::<u64>::from_value(value)
                .map_err(|e| ExecutionError::Mapping(format!("COUNT(*) result: {e}")))?,
            None => None,
        };
        Ok(count.unwrap_or(0))
    }

    fn run<R>(
        &self,
        sql: &str,
        kind: &'static str,
        f: impl FnOnce(&dyn QueryExecutor, &str, &[Value]) -> Result<R, ExecutionError>,
    ) -> Result<R, QueryError> {
        let params = self.state.params();
        if self.log_params {
            log::info!("Executing SQL: {sql}; params: {params:?}");
        } else {
            log::info!("Executing SQL: {sql}; {} param(s)", params.len());
        }

        #[cfg(feature = "tracing")]
        let _span = tracing_helpers::execute_query_span(sql, kind).entered();
        #[cfg(not(feature = "tracing"))]
        let _ = kind;

        #[cfg(feature = "metrics")]
        let start = std::time::Instant::now();

        let result = f(self.executor, sql, params);

        #[cfg(feature = "metrics")]
        {
            METRICS.record_query(kind, start.elapsed());
            if result.is_err() {
                METRICS.record_query_error(kind);
            }
        }

        result.map_err(QueryError::from)
    }
}

impl<'a, E: Entity + FromRow> QueryChain<'a, E> {
    /// Run the query and map every row, in result-set order
    ///
    /// Zero matching rows is an empty `Vec`, not an error.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Execution` if the executor fails or a row cannot
    /// be mapped into `E`.
    pub fn list(&self) -> Result<Vec<E>, QueryError> {
        let sql = self.state.build_sql(false);
        let rows = self.run(&sql, "list", |exec, sql, params| exec.query_all(sql, params))?;
        rows.iter()
            .map(E::from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(QueryError::from)
    }

    /// Run the query for at most one row
    ///
    /// This sets the builder's limit to 1 before running, and the change
    /// stays: a later `list` on the same builder also returns at most one
    /// row. The offset is left as configured.
    ///
    /// # Errors
    ///
    /// Same as [`list`](Self::list).
    pub fn one(&mut self) -> Result<Option<E>, QueryError> {
        self.state.set_limit(1);
        Ok(self.list()?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityDescriptor, FieldDescriptor};
    use crate::mock::MockExecutor;
    use crate::row::Row;

    #[derive(Debug, PartialEq)]
    struct Person {
        id: i64,
        user_name: String,
    }

    impl Entity for Person {
        fn descriptor() -> &'static EntityDescriptor {
            static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
                type_name: "Person",
                table_name: Some("people"),
                fields: &[FieldDescriptor::new("id"), FieldDescriptor::new("userName")],
                base: None,
            };
            &DESCRIPTOR
        }
    }

    impl FromRow for Person {
        fn from_row(row: &Row) -> Result<Self, ExecutionError> {
            Ok(Self {
                id: row.try_get("id")?,
                user_name: row.try_get("user_name")?,
            })
        }
    }

    const ID: Accessor<Person, i64> = Accessor::new("getId", |p| &p.id);
    const USER_NAME: Accessor<Person, String> = Accessor::new("getUserName", |p| &p.user_name);

    fn chain<'a>(exec: &'a MockExecutor, cache: &'a MetadataCache) -> QueryChain<'a, Person> {
        QueryChain::with_cache(exec, cache, &QueryConfig::default()).unwrap()
    }

    #[test]
    fn test_reference_statement() {
        let exec = MockExecutor::new();
        let cache = MetadataCache::new();
        let stmt = chain(&exec, &cache)
            .eq(USER_NAME, "bob")
            .unwrap()
            .order_by("id")
            .limit(0, 10)
            .statement();
        assert_eq!(
            stmt.sql,
            "SELECT id, user_name FROM people WHERE (user_name = ? ) ORDER BY id LIMIT 0, 10"
        );
        assert_eq!(stmt.params, vec![Value::from("bob")]);
    }

    #[test]
    fn test_one_pins_limit() {
        let exec = MockExecutor::new()
            .with_json_rows(vec![serde_json::json!({"id": 4, "user_name": "al"})]);
        let cache = MetadataCache::new();
        let mut q = chain(&exec, &cache).limit(30, 50).gt(ID, 3).unwrap();
        let found = q.one().unwrap();
        assert_eq!(
            found,
            Some(Person {
                id: 4,
                user_name: "al".to_string()
            })
        );
        assert_eq!(q.state().limit(), Some(1));
        assert_eq!(q.state().offset(), 30);
        assert!(exec.last_statement().unwrap().sql.ends_with("LIMIT 30, 1"));
    }

    #[test]
    fn test_count_reads_integer() {
        let exec = MockExecutor::new().with_scalar(12i64);
        let cache = MetadataCache::new();
        assert_eq!(chain(&exec, &cache).count().unwrap(), 12);
    }

    #[test]
    fn test_count_empty_result_is_zero() {
        let exec = MockExecutor::new();
        let cache = MetadataCache::new();
        assert_eq!(chain(&exec, &cache).count().unwrap(), 0);
    }

    #[test]
    fn test_count_rejects_non_integer() {
        let exec = MockExecutor::new().with_scalar("many");
        let cache = MetadataCache::new();
        let err = chain(&exec, &cache).count().unwrap_err();
        assert!(matches!(err, QueryError::Execution(ExecutionError::Mapping(_))));
    }

    #[test]
    fn test_config_defaults_seed_pagination() {
        let exec = MockExecutor::new();
        let cache = MetadataCache::new();
        let config = QueryConfig {
            default_offset: 5,
            default_limit: 25,
            log_params: false,
        };
        let q = QueryChain::<Person>::with_cache(&exec, &cache, &config).unwrap();
        assert_eq!(q.statement().sql, "SELECT id, user_name FROM people LIMIT 5, 25");
    }
}
