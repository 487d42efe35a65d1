//! Typed field accessors.
//!
//! An [`Accessor`] pairs a getter with the name of the method it stands for.
//! The name is what column resolution works from: `get_user_name` reads the
//! field `user_name`, `is_active` reads `active`, `getUserName` reads
//! `userName`. `#[derive(Entity)]` generates one accessor constant per field;
//! [`accessor!`](crate::accessor) builds one from an existing getter method.

use std::fmt;
use std::marker::PhantomData;

/// A getter for one field of `E`, carrying its implementation method name
pub struct Accessor<E, V: ?Sized> {
    method: &'static str,
    get: fn(&E) -> &V,
    _entity: PhantomData<fn(&E)>,
}

impl<E, V: ?Sized> Accessor<E, V> {
    /// Wrap `get`, recording `method` as its implementation name
    pub const fn new(method: &'static str, get: fn(&E) -> &V) -> Self {
        Self {
            method,
            get,
            _entity: PhantomData,
        }
    }

    /// Implementation method name, e.g. `get_user_name`
    pub fn method(&self) -> &'static str {
        self.method
    }

    /// Read the field from `entity`
    pub fn get<'e>(&self, entity: &'e E) -> &'e V {
        (self.get)(entity)
    }

    /// Field name this accessor reads, or `None` if the method name is empty
    /// once its prefix is stripped
    pub fn field_name(&self) -> Option<String> {
        field_name_from_method(self.method)
    }
}

impl<E, V: ?Sized> Clone for Accessor<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V: ?Sized> Copy for Accessor<E, V> {}

impl<E, V: ?Sized> fmt::Debug for Accessor<E, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Accessor")
            .field("entity", &std::any::type_name::<E>())
            .field("method", &self.method)
            .finish()
    }
}

/// Derive the field name a getter method reads
///
/// `get_`/`is_` prefixes are stripped as-is; camel `get`/`is` prefixes are
/// stripped when followed by an uppercase letter, and that letter is
/// lowercased. Any other name is returned unchanged.
///
/// ```
/// use querychain::field_name_from_method;
///
/// assert_eq!(field_name_from_method("get_user_name").as_deref(), Some("user_name"));
/// assert_eq!(field_name_from_method("isActive").as_deref(), Some("active"));
/// assert_eq!(field_name_from_method("island").as_deref(), Some("island"));
/// assert_eq!(field_name_from_method("get_"), None);
/// ```
pub fn field_name_from_method(method: &str) -> Option<String> {
    let name = if let Some(rest) = method.strip_prefix("get_") {
        rest.to_string()
    } else if let Some(rest) = method.strip_prefix("is_") {
        rest.to_string()
    } else if let Some(rest) = strip_camel_prefix(method, "get") {
        lower_first(rest)
    } else if let Some(rest) = strip_camel_prefix(method, "is") {
        lower_first(rest)
    } else {
        method.to_string()
    };
    (!name.is_empty()).then_some(name)
}

fn strip_camel_prefix<'a>(method: &'a str, prefix: &str) -> Option<&'a str> {
    method
        .strip_prefix(prefix)
        .filter(|rest| rest.chars().next().is_some_and(char::is_uppercase))
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Build an [`Accessor`] from a getter method or a field path
///
/// ```
/// use querychain::{accessor, Accessor};
///
/// struct Audit {
///     created_by: String,
/// }
///
/// struct Person {
///     name: String,
///     audit: Audit,
/// }
///
/// impl Person {
///     fn get_name(&self) -> &String {
///         &self.name
///     }
/// }
///
/// let name: Accessor<Person, String> = accessor!(Person, get_name);
/// let created_by = accessor!(Person, get_created_by => audit.created_by);
///
/// let p = Person { name: "bob".into(), audit: Audit { created_by: "ops".into() } };
/// assert_eq!(name.get(&p), "bob");
/// assert_eq!(created_by.get(&p), "ops");
/// assert_eq!(created_by.method(), "get_created_by");
/// ```
#[macro_export]
macro_rules! accessor {
    ($entity:ty, $method:ident) => {
        $crate::Accessor::<$entity, _>::new(stringify!($method), <$entity>::$method)
    };
    ($entity:ty, $method:ident => $($path:ident).+) => {
        $crate::Accessor::<$entity, _>::new(stringify!($method), |e: &$entity| &e.$($path).+)
    };
}
