//! Shared object store for a Cellar session.
//!
//! The store owns the single authoritative identity map for every domain
//! object type in a session. Typed repositories never hold objects of their
//! own; they read through the [`ObjectReader`] contract defined here and
//! narrow the polymorphic results to a concrete type.
//!
//! # Storage Backends
//!
//! - [`InMemoryObjectStore`] -- `RwLock`-guarded map for tests and embedding
//!
//! # Design Rules
//!
//! 1. One live object per durable id and one per session handle.
//! 2. Lookups by class tag return exact tag matches only.
//! 3. `count_of_class` agrees with `all_of_class` at the same instant.
//! 4. Concurrent reads are safe; the store serializes its own writers.
//! 5. The store never interprets object contents beyond the identity triple.

pub mod error;
pub mod memory;
pub mod object;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryObjectStore;
pub use object::{AsAny, DomainObject, SharedObject};
pub use traits::ObjectReader;

pub use cellar_types::{ClassId, DurableId, ObjectIdentifier, SessionHandle};
