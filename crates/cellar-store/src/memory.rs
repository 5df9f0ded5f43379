use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::RwLock;

use cellar_types::{ClassId, DurableId, ObjectIdentifier, SessionHandle};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::object::SharedObject;
use crate::traits::ObjectReader;

/// In-memory identity map for one session.
///
/// Objects are indexed by session handle (the primary map), by durable id,
/// and by class tag. All three indexes live behind one `RwLock` so they are
/// always observed in a consistent state. Enumeration yields ascending
/// handle order.
pub struct InMemoryObjectStore {
    inner: RwLock<StoreState>,
}

struct StoreState {
    by_handle: BTreeMap<SessionHandle, SharedObject>,
    by_durable: HashMap<DurableId, SessionHandle>,
    by_class: HashMap<ClassId, BTreeSet<SessionHandle>>,
    /// `None` once the handle space is exhausted.
    next_handle: Option<SessionHandle>,
}

impl StoreState {
    fn new(first_handle: SessionHandle) -> Self {
        Self {
            by_handle: BTreeMap::new(),
            by_durable: HashMap::new(),
            by_class: HashMap::new(),
            next_handle: Some(first_handle),
        }
    }

    fn handle_for(&self, key: &ObjectIdentifier) -> Option<SessionHandle> {
        match key {
            ObjectIdentifier::Handle(h) => self.by_handle.contains_key(h).then_some(*h),
            ObjectIdentifier::Durable(id) => self.by_durable.get(id).copied(),
        }
    }
}

impl InMemoryObjectStore {
    /// Create an empty store whose first allocated handle is 1.
    pub fn new() -> Self {
        Self::with_first_handle(SessionHandle::FIRST)
    }

    /// Create an empty store that starts allocating at `first`.
    pub fn with_first_handle(first: SessionHandle) -> Self {
        Self {
            inner: RwLock::new(StoreState::new(first)),
        }
    }

    /// Hand out the next unused session handle.
    ///
    /// Handles are never reused within a store, even after removal.
    pub fn allocate_handle(&self) -> StoreResult<SessionHandle> {
        let mut state = self.inner.write().expect("lock poisoned");
        loop {
            let handle = state.next_handle.ok_or(StoreError::HandlesExhausted)?;
            state.next_handle = handle.next();
            // Explicitly inserted objects may already sit on this handle.
            if !state.by_handle.contains_key(&handle) {
                return Ok(handle);
            }
        }
    }

    /// Add an object to the identity map.
    ///
    /// Fails if the durable id is nil, or if either the durable id or the
    /// handle is already owned by a live object. A handle at or beyond the
    /// allocator position advances the allocator past it.
    pub fn insert(&self, object: SharedObject) -> StoreResult<()> {
        let id = object.durable_id();
        let handle = object.handle();
        let class = object.class_id();
        if id.is_nil() {
            return Err(StoreError::NullDurableId);
        }

        let mut state = self.inner.write().expect("lock poisoned");
        if state.by_durable.contains_key(&id) {
            return Err(StoreError::DuplicateDurableId(id));
        }
        if state.by_handle.contains_key(&handle) {
            return Err(StoreError::DuplicateHandle(handle));
        }

        if let Some(next) = state.next_handle {
            if handle >= next {
                state.next_handle = handle.next();
            }
        }
        state.by_durable.insert(id, handle);
        state.by_class.entry(class).or_default().insert(handle);
        state.by_handle.insert(handle, object);

        debug!(durable_id = %id, handle = %handle, class = class.get(), "object inserted");
        Ok(())
    }

    /// Remove an object from every index and return it.
    pub fn remove(&self, key: &ObjectIdentifier) -> StoreResult<SharedObject> {
        let mut state = self.inner.write().expect("lock poisoned");
        let handle = state.handle_for(key).ok_or(StoreError::NotFound(*key))?;
        let object = state
            .by_handle
            .remove(&handle)
            .ok_or(StoreError::NotFound(*key))?;

        let class = object.class_id();
        state.by_durable.remove(&object.durable_id());
        if let Some(members) = state.by_class.get_mut(&class) {
            members.remove(&handle);
            if members.is_empty() {
                state.by_class.remove(&class);
            }
        }

        debug!(durable_id = %object.durable_id(), handle = %handle, "object removed");
        Ok(object)
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").by_handle.len()
    }

    /// Returns `true` if the store holds no objects.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").by_handle.is_empty()
    }

    /// Drop every object. The handle allocator keeps its position.
    pub fn clear(&self) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.by_handle.clear();
        state.by_durable.clear();
        state.by_class.clear();
    }

    /// Sorted list of the class tags that currently have live instances.
    pub fn classes(&self) -> Vec<ClassId> {
        let state = self.inner.read().expect("lock poisoned");
        let mut classes: Vec<ClassId> = state.by_class.keys().copied().collect();
        classes.sort();
        classes
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectReader for InMemoryObjectStore {
    fn try_resolve(&self, key: &ObjectIdentifier) -> Option<SharedObject> {
        let state = self.inner.read().expect("lock poisoned");
        let handle = state.handle_for(key)?;
        state.by_handle.get(&handle).cloned()
    }

    fn all_of_class(&self, class: ClassId) -> Vec<SharedObject> {
        let state = self.inner.read().expect("lock poisoned");
        state
            .by_class
            .get(&class)
            .map(|members| {
                members
                    .iter()
                    .filter_map(|h| state.by_handle.get(h).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    fn count_of_class(&self, class: ClassId) -> usize {
        let state = self.inner.read().expect("lock poisoned");
        state.by_class.get(&class).map_or(0, BTreeSet::len)
    }

    fn contains(&self, key: &ObjectIdentifier) -> bool {
        self.inner
            .read()
            .expect("lock poisoned")
            .handle_for(key)
            .is_some()
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryObjectStore")
            .field("object_count", &count)
            .finish()
    }
}
