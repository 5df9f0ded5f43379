//! Identifier types for the Cellar object repository.
//!
//! Every domain object in a session carries three identities, all defined
//! here so that the store and the typed repositories agree on them:
//!
//! - [`DurableId`] -- globally unique identity that survives across sessions
//! - [`SessionHandle`] -- compact integer key, valid only within one session
//! - [`ClassId`] -- stable tag naming the object's concrete runtime type
//!
//! [`ObjectIdentifier`] wraps either of the first two so a lookup can be
//! expressed without committing to a representation.

pub mod class;
pub mod error;
pub mod handle;
pub mod identity;
pub mod object;

pub use class::ClassId;
pub use error::TypeError;
pub use handle::SessionHandle;
pub use identity::DurableId;
pub use object::ObjectIdentifier;
