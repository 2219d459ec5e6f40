//! Error type shared by every container in the crate.
//!
//! All failures are reported synchronously to the caller. A failing
//! operation never leaves a container half-modified: validation happens
//! before the first structural change.

use thiserror::Error;

/// Errors raised by container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectionError {
    /// A key was rejected by the container's key contract, or has no
    /// identity representation at all.
    #[error("invalid key type: {0}")]
    InvalidKeyType(String),

    /// A value was rejected by the container's value contract.
    #[error("invalid value type: {0}")]
    InvalidValueType(String),

    /// Retrieval from an empty queue or stack.
    #[error("{0} is empty")]
    EmptyContainer(&'static str),

    /// Positional access outside `[0, len)`.
    #[error("index {index} out of bounds for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// A capacity of zero was requested.
    #[error("size must be greater than zero, {0} given")]
    InvalidCapacity(usize),
}

pub type Result<T> = std::result::Result<T, CollectionError>;

impl CollectionError {
    pub(crate) fn key(msg: impl Into<String>) -> Self {
        Self::InvalidKeyType(msg.into())
    }

    pub(crate) fn value(msg: impl Into<String>) -> Self {
        Self::InvalidValueType(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_message_names_given_size() {
        let err = CollectionError::InvalidCapacity(0);
        assert_eq!(err.to_string(), "size must be greater than zero, 0 given");
    }

    #[test]
    fn index_message_includes_bounds() {
        let err = CollectionError::IndexOutOfRange { index: 4, len: 2 };
        assert_eq!(err.to_string(), "index 4 out of bounds for length 2");
    }

    #[test]
    fn empty_container_names_container() {
        assert_eq!(
            CollectionError::EmptyContainer("Queue").to_string(),
            "Queue is empty"
        );
    }

    #[test]
    fn helpers_build_matching_variants() {
        assert!(matches!(
            CollectionError::key("x"),
            CollectionError::InvalidKeyType(_)
        ));
        assert!(matches!(
            CollectionError::value("x"),
            CollectionError::InvalidValueType(_)
        ));
    }

    #[test]
    fn implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<CollectionError>();
    }
}
