//! Typed repositories over the Cellar shared object store.
//!
//! A [`Session`] owns the store handle and the disposal state. Each
//! [`TypedRepository<T>`] it hands out is a thin per-type view: lookups go
//! straight to the store with `T`'s class tag, and results are narrowed to
//! `T` before they reach the caller.
//!
//! Strict lookups ([`TypedRepository::get`]) report absence and type
//! mismatch as distinct errors. Tolerant lookups ([`TypedRepository::try_get`])
//! fold both into `None`.
//!
//! Once the session is disposed or dropped, every repository derived from
//! it refuses further work: fallible operations fail with
//! [`RepoError::Disposed`] and `try_get` yields `None`.

pub mod class;
pub mod config;
pub mod error;
pub mod repository;
pub mod session;
pub mod watch;

#[cfg(test)]
mod testing;

pub use class::ObjectClass;
pub use config::SessionConfig;
pub use error::{RepoError, RepoResult};
pub use repository::TypedRepository;
pub use session::{Session, SessionState};
pub use watch::Watch;

// Re-export key types
pub use cellar_store::{DomainObject, InMemoryObjectStore, ObjectReader, SharedObject, StoreError};
pub use cellar_types::{ClassId, DurableId, ObjectIdentifier, SessionHandle};
