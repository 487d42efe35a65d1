//! Procedural macros for querychain
//!
//! This crate provides `#[derive(Entity)]`. Use it through the re-export in
//! `querychain`; the generated code refers to `::querychain` paths.

mod attributes;
mod macros;
mod utils;

use proc_macro::TokenStream;

/// Derive macro for `Entity` - generates entity metadata, `FromRow` and field accessors
///
/// This macro generates:
/// - `Entity` implementation backed by a `static` descriptor
/// - `FromRow` implementation reading each persisted field by column name
/// - one `Accessor` constant per persisted field, named after the field in
///   upper snake case (`user_name` becomes `Person::USER_NAME`)
///
/// # Attributes
///
/// - `#[table_name = "..."]` on the struct. Without it the struct still
///   compiles, but building a query for it fails at runtime.
/// - `#[column_name = "..."]` on a field overrides the snake_case column.
/// - `#[ignore]` (or `#[skip]`) excludes a field; `FromRow` fills it with
///   `Default::default()`.
/// - `#[base]` on at most one field whose type is itself an entity. Its
///   columns follow this struct's own columns.
///
/// # Example
///
/// ```ignore
/// use querychain::Entity;
///
/// #[derive(Entity)]
/// #[table_name = "people"]
/// pub struct Person {
///     pub id: i64,
///     pub user_name: String,
///     pub active: bool,
/// }
///
/// assert_eq!(Person::USER_NAME.method(), "get_user_name");
/// assert_eq!(Person::ACTIVE.method(), "is_active");
/// ```
#[proc_macro_derive(Entity, attributes(table_name, column_name, ignore, skip, base))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    macros::derive_entity(input)
}
