use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::core::utils::{ensure_dir, replace_file, PathResolver};

use super::{KeyValueStore, Result};

const FILE_EXTENSION: &str = "json";

/// Stores each key as `<root>/<key>.json`, replacing files atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Opens (and creates) the store directory. `None` resolves to the
    /// default application directory.
    pub fn new(base: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(base);
        let root = PathResolver::store_dir_in(&base);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_key(key), FILE_EXTENSION))
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        replace_file(&self.path_for(key), value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps keys usable as file names.
fn canonical_key(key: &str) -> String {
    let mut slug = String::with_capacity(key.len());
    for ch in key.trim().chars() {
        if ch.is_ascii_alphanumeric() || matches!(ch, '_' | '-') {
            slug.push(ch.to_ascii_lowercase());
        } else {
            slug.push('_');
        }
    }
    if slug.is_empty() {
        "unnamed".into()
    } else {
        slug
    }
}
