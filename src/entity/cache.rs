//! Memoised entity metadata and accessor → column resolution.
//!
//! Both maps are filled lazily and never evicted: entity declarations are
//! static, so an entry stays valid for the life of the cache. Concurrent
//! first-time resolution of the same key may compute twice; the first
//! insert wins and later results are dropped.

use super::accessor::Accessor;
use super::descriptor::Entity;
use super::metadata::EntityMetadata;
use crate::error::QueryError;
use once_cell::sync::Lazy;
use std::any::{type_name, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

#[cfg(feature = "metrics")]
use crate::metrics::METRICS;

static GLOBAL: Lazy<MetadataCache> = Lazy::new(MetadataCache::new);

/// Identity of an accessor: owning entity plus implementation method name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct AccessorKey {
    entity: TypeId,
    method: &'static str,
}

/// Entity metadata and accessor column cache
///
/// Construct one per composition root (see [`QueryContext`](crate::QueryContext)),
/// or share the process-wide instance from [`MetadataCache::global`].
#[derive(Debug, Default)]
pub struct MetadataCache {
    entities: RwLock<HashMap<TypeId, Arc<EntityMetadata>>>,
    columns: RwLock<HashMap<AccessorKey, Arc<str>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide cache used by [`QueryChain::of`](crate::QueryChain::of)
    pub fn global() -> &'static MetadataCache {
        &GLOBAL
    }

    /// Metadata for `E`, built on first use
    ///
    /// Repeated calls return the same `Arc`.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::MissingTable` if `E` declares no table name.
    /// Failures are not cached.
    pub fn metadata<E: Entity>(&self) -> Result<Arc<EntityMetadata>, QueryError> {
        let key = TypeId::of::<E>();
        if let Some(meta) = self
            .entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(meta));
        }

        log::trace!("Resolving entity metadata for {}", type_name::<E>());
        #[cfg(feature = "metrics")]
        METRICS.record_cache_miss("entity");

        let built = Arc::new(EntityMetadata::from_descriptor(E::descriptor())?);
        let mut entities = self
            .entities
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(entities.entry(key).or_insert(built)))
    }

    /// Column read by `accessor` on `E`
    ///
    /// # Errors
    ///
    /// Returns `QueryError::Resolution` wrapping the cause: `InvalidAccessor`
    /// when the method name yields no field, `FieldNotFound` when the field is
    /// not declared on `E` or its base, or `MissingTable`.
    pub fn column<E: Entity, V: ?Sized>(
        &self,
        accessor: &Accessor<E, V>,
    ) -> Result<Arc<str>, QueryError> {
        let key = AccessorKey {
            entity: TypeId::of::<E>(),
            method: accessor.method(),
        };
        if let Some(column) = self
            .columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(Arc::clone(column));
        }

        log::trace!(
            "Resolving column for accessor {} on {}",
            accessor.method(),
            type_name::<E>()
        );
        #[cfg(feature = "metrics")]
        METRICS.record_cache_miss("accessor");

        let resolved: Arc<str> =
            self.resolve_column(accessor)
                .map_err(|source| QueryError::Resolution {
                    accessor: accessor.method(),
                    entity: E::descriptor().type_name,
                    source: Box::new(source),
                })?
                .into();

        let mut columns = self.columns.write().unwrap_or_else(PoisonError::into_inner);
        Ok(Arc::clone(columns.entry(key).or_insert(resolved)))
    }

    fn resolve_column<E: Entity, V: ?Sized>(
        &self,
        accessor: &Accessor<E, V>,
    ) -> Result<String, QueryError> {
        let entity = E::descriptor().type_name;
        let field = accessor.field_name().ok_or(QueryError::InvalidAccessor {
            method: accessor.method(),
            entity,
        })?;
        let meta = self.metadata::<E>()?;
        meta.column(&field)
            .map(str::to_string)
            .ok_or(QueryError::FieldNotFound { field, entity })
    }

    /// Number of cached entity metadata entries
    pub fn entity_count(&self) -> usize {
        self.entities
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Number of cached accessor → column entries
    pub fn accessor_count(&self) -> usize {
        self.columns
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}
