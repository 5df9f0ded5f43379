use cellar_types::{DurableId, ObjectIdentifier, SessionHandle};

/// Errors from object store operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// No live object exists for the key.
    #[error("object not found: {0}")]
    NotFound(ObjectIdentifier),

    /// Another live object already owns this durable id.
    #[error("duplicate durable id: {0}")]
    DuplicateDurableId(DurableId),

    /// Another live object already owns this session handle.
    #[error("duplicate session handle: {0}")]
    DuplicateHandle(SessionHandle),

    /// Attempted to store an object with the nil durable id.
    #[error("cannot store object with nil durable id")]
    NullDurableId,

    /// Every session handle has been handed out.
    #[error("session handle space exhausted")]
    HandlesExhausted,
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
