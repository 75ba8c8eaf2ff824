//! Reference resolver
//!
//! Translates between an in-memory reference to a primary entity and the
//! positional surrogate key stored on disk.
//!
//! The key is the entity's index in the primary store at save time. It is
//! not a stable identifier: inserting, removing or reordering primary
//! entities between a save and the next load makes stored keys point at a
//! different entity, or at none.

use crate::entity::Entity;
use crate::store::EntityStore;

/// Stored key for a reference that did not resolve
pub const NOT_FOUND: i32 = -1;

/// Resolver over a borrowed primary store
pub struct ReferenceResolver<'a, E: Entity> {
    primary: &'a EntityStore<E>,
}

impl<'a, E: Entity> ReferenceResolver<'a, E> {
    /// Resolve against `primary`
    pub fn new(primary: &'a EntityStore<E>) -> Self {
        ReferenceResolver { primary }
    }

    /// Surrogate key of `entity`, or [`NOT_FOUND`] if it is not in the store
    ///
    /// An unresolvable reference is saved as the sentinel rather than
    /// failing the save.
    pub fn to_surrogate(&self, entity: &E) -> i32 {
        self.primary
            .index_of(entity)
            .and_then(|index| i32::try_from(index).ok())
            .unwrap_or(NOT_FOUND)
    }

    /// Surrogate key of an optional reference; `None` maps to [`NOT_FOUND`]
    pub fn key_for(&self, entity: Option<&E>) -> i32 {
        entity.map_or(NOT_FOUND, |entity| self.to_surrogate(entity))
    }

    /// Entity at `key`, or `None` for a negative or out-of-range key
    pub fn from_surrogate(&self, key: i32) -> Option<&'a E> {
        let index = usize::try_from(key).ok()?;
        self.primary.get_by_index(index)
    }
}
