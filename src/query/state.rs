//! Accumulated query state and SQL assembly.

use sea_query::Value;
use std::fmt;

/// Binary comparison emitted by the accessor helpers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl ComparisonOp {
    pub fn as_sql(self) -> &'static str {
        match self {
            ComparisonOp::Eq => "=",
            ComparisonOp::Ne => "<>",
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
        }
    }
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// SQL text plus its positional bind values
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<Value>,
}

/// Everything a [`QueryChain`](crate::QueryChain) has accumulated
///
/// `params` lines up with the `?` placeholders of `where_clauses`, in the
/// order the clauses were added. Nothing checks this; raw `and_where`
/// fragments are trusted to carry as many placeholders as values.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryState {
    table: String,
    select_columns: Vec<String>,
    join_clauses: Vec<String>,
    where_clauses: Vec<String>,
    params: Vec<Value>,
    group_by: Option<String>,
    having: Option<String>,
    order_by: Option<String>,
    offset: u64,
    limit: Option<u64>,
}

impl QueryState {
    pub fn new(table: impl Into<String>, columns: Vec<String>, offset: u64, limit: u64) -> Self {
        Self {
            table: table.into(),
            select_columns: columns,
            join_clauses: Vec::new(),
            where_clauses: Vec::new(),
            params: Vec::new(),
            group_by: None,
            having: None,
            order_by: None,
            offset,
            limit: Some(limit),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn select_columns(&self) -> &[String] {
        &self.select_columns
    }

    pub fn join_clauses(&self) -> &[String] {
        &self.join_clauses
    }

    pub fn where_clauses(&self) -> &[String] {
        &self.where_clauses
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    pub fn group_by(&self) -> Option<&str> {
        self.group_by.as_deref()
    }

    pub fn having(&self) -> Option<&str> {
        self.having.as_deref()
    }

    pub fn order_by(&self) -> Option<&str> {
        self.order_by.as_deref()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn limit(&self) -> Option<u64> {
        self.limit
    }

    pub(crate) fn set_select(&mut self, columns: Vec<String>) {
        self.select_columns = columns;
    }

    pub(crate) fn push_join(&mut self, kind: &str, table_expr: &str, on: &str) {
        self.join_clauses
            .push(format!("{kind} JOIN {table_expr} ON {on}"));
    }

    /// Append `(fragment)` and its bind values
    pub(crate) fn push_where(&mut self, fragment: &str, params: impl IntoIterator<Item = Value>) {
        self.where_clauses.push(format!("({fragment})"));
        self.params.extend(params);
    }

    pub(crate) fn set_group_by(&mut self, expr: String) {
        self.group_by = Some(expr);
    }

    pub(crate) fn set_having(&mut self, expr: String) {
        self.having = Some(expr);
    }

    pub(crate) fn set_order_by(&mut self, expr: String) {
        self.order_by = Some(expr);
    }

    pub(crate) fn set_page(&mut self, offset: u64, limit: u64) {
        self.offset = offset;
        self.limit = Some(limit);
    }

    pub(crate) fn set_limit(&mut self, limit: u64) {
        self.limit = Some(limit);
    }

    /// Assemble the SELECT (or `SELECT COUNT(*)`) text
    ///
    /// The count form keeps FROM, JOIN, WHERE, GROUP BY and HAVING and drops
    /// ORDER BY and LIMIT.
    pub fn build_sql(&self, count: bool) -> String {
        let mut sql = String::with_capacity(256);
        sql.push_str("SELECT ");
        if count {
            sql.push_str("COUNT(*)");
        } else if self.select_columns.is_empty() {
            sql.push('*');
        } else {
            sql.push_str(&self.select_columns.join(", "));
        }
        sql.push_str(" FROM ");
        sql.push_str(&self.table);

        if !self.join_clauses.is_empty() {
            sql.push(' ');
            sql.push_str(&self.join_clauses.join(" "));
        }

        if !self.where_clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.where_clauses.join(" AND "));
        }

        if let Some(group_by) = &self.group_by {
            sql.push_str(" GROUP BY ");
            sql.push_str(group_by);
        }

        if let Some(having) = &self.having {
            sql.push_str(" HAVING ");
            sql.push_str(having);
        }

        if !count {
            if let Some(order_by) = &self.order_by {
                sql.push_str(" ORDER BY ");
                sql.push_str(order_by);
            }
            if let Some(limit) = self.limit {
                sql.push_str(&format!(" LIMIT {}, {}", self.offset, limit));
            }
        }

        log::debug!("Built SQL: {sql}");
        sql
    }

    /// SQL and a copy of the bind values
    pub fn statement(&self, count: bool) -> Statement {
        Statement {
            sql: self.build_sql(count),
            params: self.params.clone(),
        }
    }
}
