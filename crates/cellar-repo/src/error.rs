use cellar_store::StoreError;
use cellar_types::{ClassId, ObjectIdentifier};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("object not found: {0}")]
    NotFound(ObjectIdentifier),

    #[error("object {key} is {actual}, not a {expected}")]
    TypeMismatch {
        key: ObjectIdentifier,
        expected: &'static str,
        actual: ClassId,
    },

    #[error("session is disposed")]
    Disposed,

    #[error("store error: {0}")]
    Store(#[source] StoreError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Absence surfaces as one `NotFound` kind whichever layer detects it.
impl From<StoreError> for RepoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(key) => Self::NotFound(key),
            other => Self::Store(other),
        }
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_types::SessionHandle;

    #[test]
    fn store_not_found_maps_to_not_found() {
        let key = ObjectIdentifier::from(SessionHandle::FIRST);
        let err = RepoError::from(StoreError::NotFound(key));
        assert!(matches!(err, RepoError::NotFound(k) if k == key));
    }

    #[test]
    fn other_store_errors_are_wrapped() {
        let err = RepoError::from(StoreError::HandlesExhausted);
        assert!(matches!(err, RepoError::Store(StoreError::HandlesExhausted)));
    }

    #[test]
    fn type_mismatch_message() {
        let err = RepoError::TypeMismatch {
            key: SessionHandle::new(3).unwrap().into(),
            expected: "Note",
            actual: ClassId::new(7),
        };
        assert_eq!(err.to_string(), "object #3 is class 7, not a Note");
    }
}
