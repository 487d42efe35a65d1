//! Entity metadata and field-accessor resolution.
//!
//! - **Descriptor**: declarative table/field metadata (`Entity`, usually derived)
//! - **Metadata**: resolved table and column names (`EntityMetadata`)
//! - **Accessor**: typed getters that name the field they read (`Accessor`)
//! - **Cache**: memoised resolution of both (`MetadataCache`)

pub mod accessor;
pub mod cache;
pub mod descriptor;
pub mod metadata;

#[doc(inline)]
pub use accessor::{field_name_from_method, Accessor};
#[doc(inline)]
pub use cache::MetadataCache;
#[doc(inline)]
pub use descriptor::{Entity, EntityDescriptor, FieldDescriptor};
#[doc(inline)]
pub use metadata::{to_snake_case, EntityMetadata};
