//! Local key/value storage.
//!
//! The cart persists through this port so any durable text store can back it.

use std::io;

use mockall::automock;
use thiserror::Error;

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors raised by a [`KeyValueStore`].
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing medium could not be read or written.
    #[error("storage i/o failed")]
    Io(#[from] io::Error),

    /// A value could not be serialized for writing.
    #[error("failed to serialize stored value")]
    Serialization(#[from] serde_json::Error),

    /// The key is not usable by this store.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// A previous writer panicked while holding the store.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Text values stored under string keys.
#[automock]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store could not be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store could not be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the store could not be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
