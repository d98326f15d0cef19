//! Error type for operations that can fail to allocate.

use std::collections::TryReserveError;
use thiserror::Error;

/// Allocation failure raised by table creation, insert, remove or resize.
///
/// When an operation returns one of these the table is left exactly as it
/// was before the call.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("failed to allocate a bucket array of {capacity} chains")]
    BucketArray {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
    #[error("failed to allocate storage for a {len}-byte key")]
    Key {
        len: usize,
        #[source]
        source: TryReserveError,
    },
}

impl TableError {
    /// Every variant is an allocation failure; kept as a predicate so callers
    /// do not match on the variant list.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, TableError::BucketArray { .. } | TableError::Key { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserve_error() -> TryReserveError {
        let mut v: Vec<u8> = Vec::new();
        v.try_reserve(usize::MAX).unwrap_err()
    }

    #[test]
    fn messages_name_the_failed_allocation() {
        let e = TableError::BucketArray {
            capacity: 64,
            source: reserve_error(),
        };
        assert_eq!(e.to_string(), "failed to allocate a bucket array of 64 chains");
        assert!(e.is_allocation_failure());

        let e = TableError::Key {
            len: 3,
            source: reserve_error(),
        };
        assert_eq!(e.to_string(), "failed to allocate storage for a 3-byte key");
        assert!(std::error::Error::source(&e).is_some());
    }
}
