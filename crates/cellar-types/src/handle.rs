use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Session-local integer key of a domain object.
///
/// Handles are surrogate keys handed out by the store for the lifetime of one
/// in-memory session. They are unique within a session but may be reassigned
/// to a different object in the next one; persist a [`DurableId`] instead.
///
/// Zero means "no object" and can never be constructed.
///
/// [`DurableId`]: crate::DurableId
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct SessionHandle(NonZeroU32);

impl SessionHandle {
    /// The first handle a fresh store hands out.
    pub const FIRST: Self = Self(NonZeroU32::MIN);

    /// Create a handle, rejecting the reserved value 0.
    pub fn new(value: u32) -> Result<Self, TypeError> {
        NonZeroU32::new(value).map(Self).ok_or(TypeError::NullHandle)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// The handle after this one, or `None` once the space is exhausted.
    pub fn next(self) -> Option<Self> {
        self.0.checked_add(1).map(Self)
    }
}

impl TryFrom<u32> for SessionHandle {
    type Error = TypeError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SessionHandle> for u32 {
    fn from(handle: SessionHandle) -> Self {
        handle.get()
    }
}

impl FromStr for SessionHandle {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: u32 = s
            .trim()
            .parse()
            .map_err(|_| TypeError::InvalidHandle(s.to_string()))?;
        Self::new(value)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SessionHandle({})", self.0)
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
