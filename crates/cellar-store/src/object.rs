use std::any::Any;
use std::fmt;
use std::sync::Arc;

use cellar_types::{ClassId, DurableId, ObjectIdentifier, SessionHandle};

/// Upcast to [`Any`] so a shared domain object can be narrowed to its
/// concrete type. Implemented for every `'static + Send + Sync` type.
pub trait AsAny: Any + Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Any + Send + Sync> AsAny for T {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// The capability set common to every object in the store.
///
/// The store sees objects only through this trait: an identity triple and
/// nothing else. Narrowing to a concrete type happens in the typed
/// repositories.
pub trait DomainObject: AsAny + fmt::Debug {
    /// Durable identity, stable across sessions.
    fn durable_id(&self) -> DurableId;

    /// Session-local surrogate key.
    fn handle(&self) -> SessionHandle;

    /// Tag of the concrete runtime type.
    fn class_id(&self) -> ClassId;

    /// The durable id wrapped as an opaque identifier.
    fn identifier(&self) -> ObjectIdentifier {
        ObjectIdentifier::Durable(self.durable_id())
    }
}

/// A polymorphic, shared reference to a stored object.
pub type SharedObject = Arc<dyn DomainObject>;
