//! Integration tests for the fluent builder against a recording executor

use fake::faker::internet::en::Username;
use fake::faker::name::en::Name;
use fake::Fake;
use querychain::executor::ExecutionError;
use querychain::mock::MockExecutor;
use querychain::{
    accessor, Accessor, Entity, MetadataCache, QueryChain, QueryConfig, QueryContext, QueryError,
};
use sea_query::Value;
use serde_json::json;

#[derive(Entity, Debug, Clone, PartialEq)]
#[table_name = "users"]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub age: i32,
    pub active: bool,
    pub email: Option<String>,
}

fn users<'a>(exec: &'a MockExecutor, cache: &'a MetadataCache) -> QueryChain<'a, User> {
    QueryChain::with_cache(exec, cache, &QueryConfig::default()).unwrap()
}

fn user_row(id: i64, name: &str) -> serde_json::Value {
    json!({"id": id, "user_name": name, "age": 30, "active": true, "email": null})
}

#[test]
fn test_predicates_keep_call_order_and_params() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let stmt = users(&exec, &cache)
        .eq(User::ID, 5)
        .unwrap()
        .eq(User::USER_NAME, "a")
        .unwrap()
        .statement();
    assert_eq!(
        stmt.sql,
        "SELECT id, user_name, age, active, email FROM users WHERE (id = ? ) AND (user_name = ? ) LIMIT 0, 10"
    );
    assert_eq!(stmt.params, vec![Value::from(5), Value::from("a")]);
}

#[test]
fn test_every_comparison_operator() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let stmt = users(&exec, &cache)
        .ne(User::AGE, 1)
        .unwrap()
        .gt(User::AGE, 2)
        .unwrap()
        .ge(User::AGE, 3)
        .unwrap()
        .lt(User::AGE, 4)
        .unwrap()
        .le(User::AGE, 5)
        .unwrap()
        .statement();
    assert!(stmt.sql.contains(
        "WHERE (age <> ? ) AND (age > ? ) AND (age >= ? ) AND (age < ? ) AND (age <= ? )"
    ));
    assert_eq!(stmt.params.len(), 5);
}

#[test]
fn test_in_and_like() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let stmt = users(&exec, &cache)
        .is_in(User::ID, [1i64, 2, 3])
        .unwrap()
        .like(User::USER_NAME, "jo%")
        .unwrap()
        .statement();
    assert!(stmt
        .sql
        .contains("WHERE (id IN (?, ?, ?)) AND (user_name LIKE ? )"));
    assert_eq!(
        stmt.params,
        vec![Value::from(1i64), Value::from(2i64), Value::from(3i64), Value::from("jo%")]
    );
}

#[test]
fn test_empty_in_is_a_no_op() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let before = users(&exec, &cache).statement();
    let after = users(&exec, &cache)
        .is_in(User::ID, Vec::<i64>::new())
        .unwrap()
        .statement();
    assert_eq!(before, after);
    assert!(!after.sql.contains("WHERE"));
}

#[test]
fn test_empty_in_skips_resolution() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let bogus: Accessor<User, i64> = Accessor::new("get_nothing", |u| &u.id);
    assert!(users(&exec, &cache).is_in(bogus, Vec::<i64>::new()).is_ok());
    assert_eq!(cache.accessor_count(), 0);
}

#[test]
fn test_joins_grouping_and_raw_where() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let stmt = users(&exec, &cache)
        .select(["users.id", "COUNT(o.id) AS orders"])
        .left_join("orders o", "o.user_id = users.id")
        .inner_join("teams t", "t.id = users.team_id")
        .and_where("t.name = ?", ["core"])
        .group_by("users.id")
        .having("COUNT(o.id) > 2")
        .order_by("orders DESC")
        .limit(20, 5)
        .statement();
    assert_eq!(
        stmt.sql,
        "SELECT users.id, COUNT(o.id) AS orders FROM users \
         LEFT JOIN orders o ON o.user_id = users.id \
         INNER JOIN teams t ON t.id = users.team_id \
         WHERE (t.name = ?) GROUP BY users.id HAVING COUNT(o.id) > 2 \
         ORDER BY orders DESC LIMIT 20, 5"
    );
    assert_eq!(stmt.params, vec![Value::from("core")]);
}

#[test]
fn test_empty_select_renders_star() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let stmt = users(&exec, &cache)
        .select(Vec::<String>::new())
        .right_join("teams t", "t.id = users.team_id")
        .statement();
    assert_eq!(
        stmt.sql,
        "SELECT * FROM users RIGHT JOIN teams t ON t.id = users.team_id LIMIT 0, 10"
    );
}

#[test]
fn test_later_clauses_replace_earlier() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let stmt = users(&exec, &cache)
        .order_by("id")
        .order_by("age DESC")
        .limit(0, 10)
        .limit(40, 20)
        .statement();
    assert!(stmt.sql.ends_with("ORDER BY age DESC LIMIT 40, 20"));
}

#[test]
fn test_list_maps_rows_in_order() {
    let first: String = Username().fake();
    let second: String = Name().fake();
    let exec = MockExecutor::new().with_json_rows(vec![user_row(1, &first), user_row(2, &second)]);
    let cache = MetadataCache::new();
    let found = users(&exec, &cache).gt(User::AGE, 18).unwrap().list().unwrap();
    assert_eq!(found.len(), 2);
    assert_eq!(found[0].user_name, first);
    assert_eq!(found[1].user_name, second);
    assert_eq!(found[1].email, None);
    assert_eq!(exec.statements().len(), 1);
    assert_eq!(exec.last_statement().unwrap().params, vec![Value::from(18)]);
}

#[test]
fn test_list_with_no_rows_is_empty() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    assert!(users(&exec, &cache).list().unwrap().is_empty());
}

#[test]
fn test_one_forces_limit_and_returns_none_when_empty() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let mut q = users(&exec, &cache).limit(10, 50);
    assert_eq!(q.one().unwrap(), None);
    assert!(exec
        .last_statement()
        .unwrap()
        .sql
        .ends_with("LIMIT 10, 1"));

    // The forced limit stays on the builder
    q.list().unwrap();
    assert!(exec.last_statement().unwrap().sql.ends_with("LIMIT 10, 1"));
}

#[test]
fn test_one_returns_first_row() {
    let exec = MockExecutor::new().with_json_rows(vec![user_row(7, "kim"), user_row(8, "lee")]);
    let cache = MetadataCache::new();
    let found = users(&exec, &cache).one().unwrap().unwrap();
    assert_eq!(found.id, 7);
}

#[test]
fn test_count_omits_order_and_limit() {
    let exec = MockExecutor::new().with_scalar(42i64);
    let cache = MetadataCache::new();
    let q = users(&exec, &cache)
        .eq(User::ACTIVE, true)
        .unwrap()
        .order_by("id")
        .limit(5, 5);
    assert_eq!(q.count().unwrap(), 42);
    let stmt = exec.last_statement().unwrap();
    assert_eq!(stmt.sql, "SELECT COUNT(*) FROM users WHERE (active = ? )");
    assert_eq!(stmt.params, vec![Value::from(true)]);
    assert_eq!(q.count_statement(), stmt);
}

#[test]
fn test_count_keeps_grouping() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let stmt = users(&exec, &cache)
        .group_by("age")
        .having("COUNT(*) > 1")
        .count_statement();
    assert_eq!(
        stmt.sql,
        "SELECT COUNT(*) FROM users GROUP BY age HAVING COUNT(*) > 1"
    );
}

#[test]
fn test_unknown_field_names_field_and_entity() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let nickname: Accessor<User, String> = Accessor::new("get_nickname", |u| &u.user_name);
    let err = users(&exec, &cache).eq(nickname, "x").err().unwrap();
    assert!(err.is_configuration());
    match err.root_cause() {
        QueryError::FieldNotFound { field, entity } => {
            assert_eq!(field, "nickname");
            assert_eq!(*entity, "User");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("nickname"));
    assert!(message.contains("User"));
    assert!(exec.statements().is_empty());
}

#[test]
fn test_camel_case_getter_resolves() {
    let exec = MockExecutor::new();
    let cache = MetadataCache::new();
    let by_getter = accessor!(User, getAge => age);
    let stmt = users(&exec, &cache).eq(by_getter, 30).unwrap().statement();
    assert!(stmt.sql.contains("(age = ? )"));

    // getUserName reads the field userName, which User declares as user_name
    let camel = accessor!(User, getUserName => user_name);
    let err = users(&exec, &cache).eq(camel, "x").err().unwrap();
    assert!(matches!(
        err.root_cause(),
        QueryError::FieldNotFound { field, .. } if field == "userName"
    ));
}

#[test]
fn test_executor_failure_propagates() {
    let exec = MockExecutor::new().with_error(ExecutionError::Database("connection reset".into()));
    let cache = MetadataCache::new();
    let err = users(&exec, &cache).list().unwrap_err();
    assert!(matches!(err, QueryError::Execution(ExecutionError::Database(_))));
    assert!(!err.is_configuration());
}

#[test]
fn test_row_mapping_failure_is_execution_error() {
    let exec = MockExecutor::new().with_json_rows(vec![json!({"id": "not a number"})]);
    let cache = MetadataCache::new();
    let err = users(&exec, &cache).list().unwrap_err();
    assert!(matches!(err, QueryError::Execution(ExecutionError::Mapping(_))));
}

#[test]
fn test_context_builds_with_its_config() {
    let ctx = QueryContext::new(MockExecutor::new().with_scalar(3i64)).with_config(QueryConfig {
        default_offset: 0,
        default_limit: 100,
        log_params: false,
    });
    let q = ctx.query::<User>().unwrap();
    assert!(q.statement().sql.ends_with("LIMIT 0, 100"));
    assert_eq!(q.count().unwrap(), 3);
    assert_eq!(ctx.executor().statements().len(), 1);
}

#[test]
fn test_global_cache_builder() {
    let exec = MockExecutor::new();
    let stmt = QueryChain::<User>::of(&exec)
        .unwrap()
        .eq(User::USER_NAME, "bob")
        .unwrap()
        .order_by("id")
        .limit(0, 10)
        .statement();
    assert_eq!(
        stmt.sql,
        "SELECT id, user_name, age, active, email FROM users WHERE (user_name = ? ) ORDER BY id LIMIT 0, 10"
    );
    assert!(MetadataCache::global().entity_count() >= 1);
}
