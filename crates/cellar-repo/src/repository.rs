use std::marker::PhantomData;
use std::sync::{Arc, Mutex, Weak};

use cellar_store::{ObjectReader, SharedObject};
use cellar_types::{ClassId, ObjectIdentifier};
use tracing::{trace, warn};

use crate::class::{narrow, ObjectClass};
use crate::error::{RepoError, RepoResult};
use crate::session::SessionState;

/// Per-type view over the shared object store.
///
/// Holds no objects itself: every call goes to the store with `T`'s class
/// tag and the result is narrowed to `T`. The class tag is bound once, at
/// construction.
///
/// Every operation checks the owning session first. After disposal, strict
/// operations fail with [`RepoError::Disposed`] and [`try_get`] returns
/// `None`; nothing reaches the store.
///
/// [`try_get`]: TypedRepository::try_get
pub struct TypedRepository<T: ObjectClass> {
    reader: Arc<dyn ObjectReader>,
    session: Weak<SessionState>,
    class_id: ClassId,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ObjectClass> TypedRepository<T> {
    pub(crate) fn new(reader: Arc<dyn ObjectReader>, session: Weak<SessionState>) -> Self {
        Self {
            reader,
            session,
            class_id: T::CLASS_ID,
            _marker: PhantomData,
        }
    }

    /// The class tag this repository serves.
    pub fn class_id(&self) -> ClassId {
        self.class_id
    }

    /// The owning session's state, if it is still alive.
    pub fn session(&self) -> Option<Arc<SessionState>> {
        self.session.upgrade()
    }

    /// `true` once the owning session is dropped or disposed.
    pub fn is_disposed(&self) -> bool {
        self.session.upgrade().map_or(true, |s| s.is_disposed())
    }

    /// The session's coordination lock. Not acquired by any operation here.
    pub fn sync_root(&self) -> Option<Arc<Mutex<()>>> {
        self.session.upgrade().map(|s| Arc::clone(s.sync_root()))
    }

    /// Fetch the object at `key`, which must exist and be a `T`.
    ///
    /// `key` may be a [`DurableId`](cellar_types::DurableId), a
    /// [`SessionHandle`](cellar_types::SessionHandle) or an
    /// [`ObjectIdentifier`].
    ///
    /// # Errors
    ///
    /// `NotFound` if nothing lives at `key`, `TypeMismatch` if the object is
    /// of another class, `Disposed` if the session is gone.
    pub fn get(&self, key: impl Into<ObjectIdentifier>) -> RepoResult<Arc<T>> {
        let key = key.into();
        self.live_session()?;
        trace!(class = T::CLASS_NAME, %key, "get");

        let object = self.reader.resolve(&key)?;
        narrow::<T>(object).map_err(|actual| {
            warn!(class = T::CLASS_NAME, %key, actual = actual.get(), "type mismatch on strict lookup");
            RepoError::TypeMismatch {
                key,
                expected: T::CLASS_NAME,
                actual,
            }
        })
    }

    /// Fetch the object at `key` if it exists and is a `T`.
    ///
    /// Absence and a type mismatch both yield `None`; so does a disposed
    /// session.
    pub fn try_get(&self, key: impl Into<ObjectIdentifier>) -> Option<Arc<T>> {
        let key = key.into();
        if self.is_disposed() {
            return None;
        }
        trace!(class = T::CLASS_NAME, %key, "try_get");
        self.reader
            .try_resolve(&key)
            .and_then(|object| narrow::<T>(object).ok())
    }

    /// Every live `T` in the store.
    pub fn all_instances(&self) -> RepoResult<Vec<Arc<T>>> {
        let session = self.live_session()?;
        let instances = session.watch().time("all_instances", || {
            self.reader
                .all_of_class(self.class_id)
                .into_iter()
                .filter_map(|object| narrow::<T>(object).ok())
                .collect::<Vec<_>>()
        });
        trace!(class = T::CLASS_NAME, count = instances.len(), "all_instances");
        Ok(instances)
    }

    /// Every live object tagged `class`, without narrowing.
    ///
    /// Lets any repository reach instances of another type.
    pub fn all_instances_of(&self, class: ClassId) -> RepoResult<Vec<SharedObject>> {
        self.live_session()?;
        Ok(self.reader.all_of_class(class))
    }

    /// Number of live `T` instances. Always equal to the length of
    /// [`all_instances`](Self::all_instances).
    pub fn count(&self) -> RepoResult<usize> {
        let session = self.live_session()?;
        Ok(session.watch().time("count", || {
            self.reader
                .all_of_class(self.class_id)
                .into_iter()
                .filter(|object| narrow::<T>(Arc::clone(object)).is_ok())
                .count()
        }))
    }

    fn live_session(&self) -> RepoResult<Arc<SessionState>> {
        match self.session.upgrade() {
            Some(session) if !session.is_disposed() => Ok(session),
            _ => Err(RepoError::Disposed),
        }
    }
}

impl<T: ObjectClass> Clone for TypedRepository<T> {
    fn clone(&self) -> Self {
        Self {
            reader: Arc::clone(&self.reader),
            session: Weak::clone(&self.session),
            class_id: self.class_id,
            _marker: PhantomData,
        }
    }
}

impl<T: ObjectClass> std::fmt::Debug for TypedRepository<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedRepository")
            .field("class", &T::CLASS_NAME)
            .field("class_id", &self.class_id)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
