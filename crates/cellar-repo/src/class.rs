use std::sync::Arc;

use cellar_store::{DomainObject, SharedObject};
use cellar_types::ClassId;

/// A concrete domain type that can be served by a [`TypedRepository`].
///
/// Every implementor registers one stable class tag. Narrowing a shared
/// object to `Self` first compares tags, then downcasts; an object whose tag
/// matches but whose Rust type does not is treated as a mismatch.
///
/// [`TypedRepository`]: crate::TypedRepository
pub trait ObjectClass: DomainObject + Sized {
    const CLASS_ID: ClassId;

    /// Human-readable type name used in errors and logs.
    const CLASS_NAME: &'static str;
}

/// Narrow a polymorphic object to `T`, handing back the actual class tag on
/// failure.
pub(crate) fn narrow<T: ObjectClass>(object: SharedObject) -> Result<Arc<T>, ClassId> {
    let actual = object.class_id();
    if actual != T::CLASS_ID {
        return Err(actual);
    }
    object.into_any().downcast::<T>().map_err(|_| actual)
}
