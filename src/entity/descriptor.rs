//! Declarative entity metadata.
//!
//! `#[derive(Entity)]` emits a `static` [`EntityDescriptor`] per struct.
//! Hand-written implementations are equally valid:
//!
//! ```
//! use querychain::{Entity, EntityDescriptor, FieldDescriptor};
//!
//! struct Tag {
//!     id: i64,
//!     label: String,
//! }
//!
//! impl Entity for Tag {
//!     fn descriptor() -> &'static EntityDescriptor {
//!         static DESCRIPTOR: EntityDescriptor = EntityDescriptor {
//!             type_name: "Tag",
//!             table_name: Some("tags"),
//!             fields: &[
//!                 FieldDescriptor::new("id"),
//!                 FieldDescriptor::new("label").with_column("tag_label"),
//!             ],
//!             base: None,
//!         };
//!         &DESCRIPTOR
//!     }
//! }
//! # let _ = Tag { id: 1, label: String::new() };
//! ```

/// A record type whose instances correspond to rows of one table
pub trait Entity: 'static {
    /// Static description of the table and its fields
    fn descriptor() -> &'static EntityDescriptor;
}

/// Table-level metadata for one entity type
#[derive(Debug)]
pub struct EntityDescriptor {
    /// Rust type name, used in error messages
    pub type_name: &'static str,
    /// Declared table name; `None` is a configuration error at first use
    pub table_name: Option<&'static str>,
    /// Own fields in declaration order
    pub fields: &'static [FieldDescriptor],
    /// Entity whose fields this one inherits, appended after `fields`
    pub base: Option<fn() -> &'static EntityDescriptor>,
}

/// Field-level metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field name as declared on the struct
    pub name: &'static str,
    /// Explicit column name; blank values fall back to the naming convention
    pub column_name: Option<&'static str>,
    /// Not persisted; excluded from the column list
    pub ignored: bool,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column_name: None,
            ignored: false,
        }
    }

    pub const fn with_column(mut self, column: &'static str) -> Self {
        self.column_name = Some(column);
        self
    }

    pub const fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }
}
