use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use cellar_store::{InMemoryObjectStore, ObjectReader};
use tracing::{debug, info};

use crate::class::ObjectClass;
use crate::config::SessionConfig;
use crate::error::{RepoError, RepoResult};
use crate::repository::TypedRepository;
use crate::watch::Watch;

/// Liveness state shared between a session and the repositories it created.
///
/// Repositories hold this weakly. A repository is disposed when the state is
/// gone (session dropped) or when it reports disposed.
#[derive(Debug)]
pub struct SessionState {
    name: String,
    disposed: AtomicBool,
    sync_root: Arc<Mutex<()>>,
    watch: Watch,
}

impl SessionState {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub fn watch(&self) -> &Watch {
        &self.watch
    }

    pub fn sync_root(&self) -> &Arc<Mutex<()>> {
        &self.sync_root
    }
}

/// Owner of a shared object store and of the disposal state every derived
/// repository observes.
///
/// Dropping a session disposes it.
pub struct Session<S: ObjectReader + 'static = InMemoryObjectStore> {
    state: Arc<SessionState>,
    store: Arc<S>,
    config: SessionConfig,
}

impl Session<InMemoryObjectStore> {
    /// Open a session over a fresh in-memory store.
    pub fn open(config: SessionConfig) -> RepoResult<Self> {
        let first = config.first_handle_checked()?;
        let store = Arc::new(InMemoryObjectStore::with_first_handle(first));
        Self::with_store(store, config)
    }
}

impl<S: ObjectReader + 'static> Session<S> {
    /// Open a session over an existing store.
    pub fn with_store(store: Arc<S>, config: SessionConfig) -> RepoResult<Self> {
        config.validate()?;
        let state = Arc::new(SessionState {
            name: config.name.clone(),
            disposed: AtomicBool::new(false),
            sync_root: Arc::new(Mutex::new(())),
            watch: Watch::new(config.timing),
        });
        debug!(session = %config.name, timing = config.timing, "session opened");
        Ok(Self {
            state,
            store,
            config,
        })
    }

    /// Create the typed repository for `T`.
    pub fn repository<T: ObjectClass>(&self) -> RepoResult<TypedRepository<T>> {
        if self.is_disposed() {
            return Err(RepoError::Disposed);
        }
        let reader: Arc<dyn ObjectReader> = Arc::clone(&self.store) as Arc<dyn ObjectReader>;
        debug!(session = %self.state.name, class = T::CLASS_NAME, "repository created");
        Ok(TypedRepository::new(reader, Arc::downgrade(&self.state)))
    }

    /// Mark the session disposed. Idempotent.
    pub fn dispose(&self) {
        if !self.state.disposed.swap(true, Ordering::AcqRel) {
            info!(session = %self.state.name, "session disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_disposed()
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn state(&self) -> &Arc<SessionState> {
        &self.state
    }

    pub fn watch(&self) -> &Watch {
        &self.state.watch
    }

    /// Lock for callers coordinating read/modify sequences. Nothing in this
    /// crate acquires it.
    pub fn sync_root(&self) -> &Arc<Mutex<()>> {
        &self.state.sync_root
    }
}

impl<S: ObjectReader + 'static> Drop for Session<S> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<S: ObjectReader + 'static> std::fmt::Debug for Session<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("name", &self.state.name)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{handle, note, Note};

    #[test]
    fn open_uses_configured_first_handle() {
        let config = SessionConfig {
            first_handle: 100,
            ..Default::default()
        };
        let session = Session::open(config).unwrap();
        assert_eq!(session.store().allocate_handle().unwrap(), handle(100));
    }

    #[test]
    fn open_rejects_zero_first_handle() {
        let config = SessionConfig {
            first_handle: 0,
            ..Default::default()
        };
        assert!(matches!(Session::open(config), Err(RepoError::Config(_))));
    }

    #[test]
    fn dispose_is_idempotent() {
        let session = Session::open(SessionConfig::default()).unwrap();
        assert!(!session.is_disposed());
        session.dispose();
        session.dispose();
        assert!(session.is_disposed());
    }

    #[test]
    fn repository_refused_after_dispose() {
        let session = Session::open(SessionConfig::default()).unwrap();
        session.dispose();
        assert!(matches!(
            session.repository::<Note>(),
            Err(RepoError::Disposed)
        ));
    }

    #[test]
    fn with_store_shares_the_given_store() {
        let store = Arc::new(InMemoryObjectStore::new());
        store.insert(note(1, 1, "shared")).unwrap();
        let session = Session::with_store(Arc::clone(&store), SessionConfig::default()).unwrap();
        let notes = session.repository::<Note>().unwrap();
        assert_eq!(notes.count().unwrap(), 1);
        assert!(Arc::ptr_eq(session.store(), &store));
    }

    #[test]
    fn state_exposes_name_and_watch() {
        let config = SessionConfig::default().with_name("lexicon").with_timing(true);
        let session = Session::open(config).unwrap();
        assert_eq!(session.state().name(), "lexicon");
        assert!(session.watch().is_enabled());
        assert_eq!(session.config().name, "lexicon");
    }

    #[test]
    fn debug_format() {
        let session = Session::open(SessionConfig::default()).unwrap();
        let debug = format!("{session:?}");
        assert!(debug.contains("Session"));
        assert!(debug.contains("disposed: false"));
    }
}
