use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TypeError;

/// Durable, globally unique identity of a domain object.
///
/// A `DurableId` is assigned once when an object is first created and is
/// carried unchanged through every later session. Within one session at most
/// one live object exists per `DurableId`.
///
/// The nil UUID is reserved as "no object" and is never storable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurableId(Uuid);

impl DurableId {
    /// Generate a fresh, time-ordered durable id (UUID v7).
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an existing UUID.
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Build from raw bytes. Handy for deterministic fixtures.
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// The reserved "no object" id.
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }

    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Short representation (first 8 hex characters).
    pub fn short_id(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }

    /// Parse from any textual UUID form (hyphenated, simple, braced, urn).
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| TypeError::InvalidDurableId(format!("{s:?}: {e}")))
    }
}

impl FromStr for DurableId {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for DurableId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<DurableId> for Uuid {
    fn from(id: DurableId) -> Self {
        id.0
    }
}

impl fmt::Debug for DurableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DurableId({})", self.short_id())
    }
}

impl fmt::Display for DurableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}
