use dirs::home_dir;
use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".smarty";
const HOME_ENV: &str = "SMARTY_HOME";
const STORE_DIR: &str = "store";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Resolves where tracker data lives on disk.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory: `$SMARTY_HOME`, else `~/.smarty`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    /// Directory holding one JSON file per persisted key.
    pub fn store_dir_in(base: &Path) -> PathBuf {
        base.join(STORE_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR).join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Replaces `path` by staging `data` in a sibling temp file and renaming it.
/// On failure the previous file is left untouched.
pub fn replace_file(path: &Path, data: &str) -> Result<()> {
    let tmp = tmp_path(path);
    write_atomic(&tmp, data)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_base_wins_over_environment() {
        let base = PathBuf::from("/tmp/smarty-explicit");
        assert_eq!(PathResolver::resolve_base(Some(base.clone())), base);
        assert_eq!(PathResolver::store_dir_in(&base), base.join("store"));
        assert_eq!(
            PathResolver::config_file_in(&base),
            base.join("config").join("config.json")
        );
    }

    #[test]
    fn tmp_path_appends_suffix_to_extension() {
        assert_eq!(
            tmp_path(Path::new("/data/budgets.json")),
            PathBuf::from("/data/budgets.json.tmp")
        );
        assert_eq!(tmp_path(Path::new("/data/raw")), PathBuf::from("/data/raw.tmp"));
    }
}
