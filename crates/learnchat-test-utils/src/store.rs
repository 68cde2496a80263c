use learnchat_store::{KeyValueStore, MemoryStore, StoreError};
use std::io;

/// Store whose reads succeed and whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryStore,
}

impl FailingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for FailingStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.inner.get(key)
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(io::Error::other("disk full")))
    }

    fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Io(io::Error::other("read-only store")))
    }
}
