pub mod json_backend;
pub mod memory;
pub mod sync;

use std::fmt;

use crate::errors::Result;

/// Logical entries mirrored to durable storage. Each is serialized on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    User,
    Settings,
    Expenses,
    Budgets,
}

impl StorageKey {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::User => "user",
            StorageKey::Settings => "settings",
            StorageKey::Expenses => "expenses",
            StorageKey::Budgets => "budgets",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durable string-valued key/value medium.
pub trait KeyValueStore: Send + Sync {
    /// Returns `None` when nothing is stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
pub use sync::{LoadedState, PersistenceSync};
