//! Result rows and their mapping into entities.

mod value;

pub use value::{is_null, FromValue, ValueError};

use crate::executor::ExecutionError;
use sea_query::Value;
use std::sync::Arc;

/// Convert a [`Row`] into an entity value
///
/// `#[derive(Entity)]` implements this by reading every persisted field from
/// the column it resolves to.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> Result<Self, ExecutionError>;
}

/// One result-set row: column labels and their values, in select order
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    /// Build a row from parallel column and value lists
    ///
    /// Missing trailing values read as absent columns.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self {
            columns: columns.into(),
            values,
        }
    }

    /// Build a row from a JSON object, one column per key
    ///
    /// Columns follow the map's iteration order, so lookups should go through
    /// [`Row::value`] / [`Row::try_get`] rather than positions.
    ///
    /// Numbers become `BigInt`/`BigUnsigned`/`Double`, strings `String`,
    /// booleans `Bool`, `null` a null `Json`, and arrays or objects `Json`.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Mapping` if `object` is not a JSON object.
    pub fn from_json(object: serde_json::Value) -> Result<Self, ExecutionError> {
        let serde_json::Value::Object(map) = object else {
            return Err(ExecutionError::Mapping(format!(
                "row must be a JSON object, got {object}"
            )));
        };
        let mut columns = Vec::with_capacity(map.len());
        let mut values = Vec::with_capacity(map.len());
        for (key, v) in map {
            columns.push(key);
            values.push(json_to_value(v));
        }
        Ok(Self::new(columns, values))
    }

    /// Column labels in select order
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Value at a column position
    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Value under a column label (first match, ASCII case-insensitive)
    pub fn value(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(column))
            .and_then(|i| self.values.get(i))
    }

    /// Read and convert the value of `column`
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Mapping` if the column is absent or its value
    /// cannot be converted to `T`.
    pub fn try_get<T: FromValue>(&self, column: &str) -> Result<T, ExecutionError> {
        let value = self.value(column).ok_or_else(|| {
            ExecutionError::Mapping(format!("column '{column}' not present in row"))
        })?;
        T::from_value(value.clone())
            .map_err(|e| ExecutionError::Mapping(format!("column '{column}': {e}")))
    }

    /// Consume the row, returning its values
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

fn json_to_value(v: serde_json::Value) -> Value {
    match v {
        serde_json::Value::Null => Value::Json(None),
        serde_json::Value::Bool(b) => Value::from(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::from(i)
            } else if let Some(u) = n.as_u64() {
                Value::from(u)
            } else {
                Value::from(n.as_f64().unwrap_or(f64::NAN))
            }
        }
        serde_json::Value::String(s) => Value::from(s),
        other => Value::from(other),
    }
}
