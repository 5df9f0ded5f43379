use cellar_types::{ClassId, ObjectIdentifier};

use crate::error::{StoreError, StoreResult};
use crate::object::SharedObject;

/// Read and enumeration contract of the shared object store.
///
/// This is everything a typed repository needs from the store. All
/// implementations must satisfy these invariants:
/// - A key resolves to at most one live object.
/// - `all_of_class` returns exact class-tag matches; order is
///   implementation-defined.
/// - `count_of_class` equals `all_of_class(..).len()` when no writer
///   intervenes.
/// - Reads never mutate the store.
pub trait ObjectReader: Send + Sync {
    /// Resolve a key that may be absent. Never fails.
    fn try_resolve(&self, key: &ObjectIdentifier) -> Option<SharedObject>;

    /// Every live object tagged with `class`.
    fn all_of_class(&self, class: ClassId) -> Vec<SharedObject>;

    /// Number of live objects tagged with `class`.
    fn count_of_class(&self, class: ClassId) -> usize;

    /// Resolve a key that must exist.
    ///
    /// Returns `Err(StoreError::NotFound)` when nothing lives at `key`.
    fn resolve(&self, key: &ObjectIdentifier) -> StoreResult<SharedObject> {
        self.try_resolve(key).ok_or(StoreError::NotFound(*key))
    }

    /// Check whether a live object exists at `key`.
    fn contains(&self, key: &ObjectIdentifier) -> bool {
        self.try_resolve(key).is_some()
    }
}
