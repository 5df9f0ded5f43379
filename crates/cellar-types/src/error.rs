use thiserror::Error;

/// Errors produced by identifier parsing and construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid durable id: {0}")]
    InvalidDurableId(String),

    #[error("session handle 0 is reserved for \"no object\"")]
    NullHandle,

    #[error("invalid session handle: {0}")]
    InvalidHandle(String),
}
