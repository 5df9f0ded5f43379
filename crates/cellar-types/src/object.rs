use std::fmt;

use serde::{Deserialize, Serialize};

use crate::handle::SessionHandle;
use crate::identity::DurableId;

/// Opaque key resolvable to a domain object.
///
/// Holds either of the two addressing schemes. Lookups accept
/// `impl Into<ObjectIdentifier>`, so callers pass a [`DurableId`], a
/// [`SessionHandle`] or an already-wrapped identifier interchangeably.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectIdentifier {
    Durable(DurableId),
    Handle(SessionHandle),
}

impl ObjectIdentifier {
    pub fn durable_id(&self) -> Option<DurableId> {
        match self {
            Self::Durable(id) => Some(*id),
            Self::Handle(_) => None,
        }
    }

    pub fn handle(&self) -> Option<SessionHandle> {
        match self {
            Self::Handle(h) => Some(*h),
            Self::Durable(_) => None,
        }
    }
}

impl From<DurableId> for ObjectIdentifier {
    fn from(id: DurableId) -> Self {
        Self::Durable(id)
    }
}

impl From<SessionHandle> for ObjectIdentifier {
    fn from(handle: SessionHandle) -> Self {
        Self::Handle(handle)
    }
}

impl From<&ObjectIdentifier> for ObjectIdentifier {
    fn from(key: &ObjectIdentifier) -> Self {
        *key
    }
}

impl fmt::Debug for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable(id) => write!(f, "{id:?}"),
            Self::Handle(h) => write!(f, "{h:?}"),
        }
    }
}

impl fmt::Display for ObjectIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Durable(id) => write!(f, "{id}"),
            Self::Handle(h) => write!(f, "{h}"),
        }
    }
}
