//! Table and column names derived from an [`EntityDescriptor`].

use super::descriptor::EntityDescriptor;
use crate::error::QueryError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new("([a-z])([A-Z])").expect("static regex is valid"));

/// Convert a camelCase field name to its snake_case column name
///
/// Inserts `_` between a lowercase letter and a following uppercase letter,
/// then lowercases everything. Names already in snake_case are unchanged.
///
/// ```
/// use querychain::to_snake_case;
///
/// assert_eq!(to_snake_case("userName"), "user_name");
/// assert_eq!(to_snake_case("user_name"), "user_name");
/// assert_eq!(to_snake_case("URL"), "url");
/// ```
pub fn to_snake_case(camel: &str) -> String {
    CAMEL_BOUNDARY.replace_all(camel, "${1}_${2}").to_lowercase()
}

/// Resolved table and column names for one entity type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    entity: &'static str,
    table_name: String,
    columns: Vec<String>,
    field_to_column: HashMap<String, String>,
}

impl EntityMetadata {
    /// Walk `descriptor` and its base chain, resolving every persisted field
    ///
    /// Own fields come first, then the base entity's, each in declaration
    /// order. When a base field shares a name with an own field, the own
    /// field's column is the one accessors resolve to; the base field's column
    /// is still selected (once) so the base entity can be read back.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingTable` if the descriptor declares no
    /// (or a blank) table name.
    pub fn from_descriptor(descriptor: &'static EntityDescriptor) -> Result<Self, QueryError> {
        let table_name = descriptor
            .table_name
            .filter(|t| !t.trim().is_empty())
            .ok_or(QueryError::MissingTable {
                entity: descriptor.type_name,
            })?;

        let mut columns = Vec::new();
        let mut field_to_column = HashMap::new();

        let mut current = Some(descriptor);
        while let Some(desc) = current {
            for field in desc.fields.iter().filter(|f| !f.ignored) {
                let column = match field.column_name {
                    Some(c) if !c.trim().is_empty() => c.to_string(),
                    _ => to_snake_case(field.name),
                };
                field_to_column
                    .entry(field.name.to_string())
                    .or_insert_with(|| column.clone());
                if !columns.contains(&column) {
                    columns.push(column);
                }
            }
            current = desc.base.map(|base| base());
        }

        Ok(Self {
            entity: descriptor.type_name,
            table_name: table_name.to_string(),
            columns,
            field_to_column,
        })
    }

    /// Type name of the entity this metadata describes
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// All columns, own fields first, then inherited ones
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Column for a declared field name
    pub fn column(&self, field: &str) -> Option<&str> {
        self.field_to_column.get(field).map(String::as_str)
    }
}
