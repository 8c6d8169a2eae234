use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::StoreError;

/// Result of reading a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Key exists. Directory nodes and valueless keys read as an empty string.
    Found(String),
    /// Key does not exist. Not an error.
    NotFound,
}

/// Result of a create-if-absent write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The key was created with the given value.
    Created,
    /// The key already existed; nothing was written.
    AlreadyExists,
}

/// Minimal key/value surface of the coordination store.
///
/// Implementations know nothing about slots or machines, only keys and values.
/// `create_if_absent` must be atomic on the store side: of any number of concurrent
/// callers for the same key, exactly one observes [`CreateOutcome::Created`].
#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Read the current value of `key`.
    async fn read(&self, key: &str) -> Result<ReadOutcome, StoreError>;

    /// Create `key` with `value` only if it does not exist yet.
    async fn create_if_absent(&self, key: &str, value: &str) -> Result<CreateOutcome, StoreError>;
}

#[async_trait]
impl<T> SlotStore for Arc<T>
where
    T: SlotStore + ?Sized,
{
    async fn read(&self, key: &str) -> Result<ReadOutcome, StoreError> {
        (**self).read(key).await
    }

    async fn create_if_absent(&self, key: &str, value: &str) -> Result<CreateOutcome, StoreError> {
        (**self).create_if_absent(key, value).await
    }
}
