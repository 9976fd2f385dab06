use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AppError;

/// String key-value store used as the fallback display source and
/// write-through mirror for profile values and the session token.
pub trait LocalCache: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove(&self, key: &str) -> Result<(), AppError>;
}

pub struct LocalStorage {
    base_dir: PathBuf,
}

impl LocalStorage {
    pub fn new() -> Result<Self, AppError> {
        Self::with_dir(default_data_dir())
    }

    pub fn with_dir(base_dir: PathBuf) -> Result<Self, AppError> {
        fs::create_dir_all(&base_dir)
            .map_err(|e| AppError::StorageError(format!("Cannot create data directory: {e}")))?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn cache_path(&self) -> PathBuf {
        self.base_dir.join("cache.json")
    }

    pub fn settings_path(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }

    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T, AppError> {
        let content = fs::read_to_string(path)
            .map_err(|e| AppError::StorageError(format!("Failed to read {}: {e}", path.display())))?;
        serde_json::from_str(&content)
            .map_err(|e| AppError::StorageError(format!("Failed to parse {}: {e}", path.display())))
    }

    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<(), AppError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::StorageError(format!("Cannot create directory: {e}")))?;
        }

        let content = serde_json::to_string_pretty(data)
            .map_err(|e| AppError::StorageError(format!("Failed to serialize: {e}")))?;

        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &content)
            .map_err(|e| AppError::StorageError(format!("Failed to write: {e}")))?;

        fs::rename(&tmp_path, path)
            .map_err(|e| AppError::StorageError(format!("Failed to commit write: {e}")))?;

        set_restrictive_permissions(path)?;
        Ok(())
    }

    fn read_entries(&self) -> BTreeMap<String, String> {
        let path = self.cache_path();
        if !path.exists() {
            return BTreeMap::new();
        }
        match self.read_json(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring unreadable cache file");
                BTreeMap::new()
            }
        }
    }
}

impl LocalCache for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_entries().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), value.to_string());
        self.write_json(&self.cache_path(), &entries)
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.read_entries();
        if entries.remove(key).is_some() {
            self.write_json(&self.cache_path(), &entries)?;
        }
        Ok(())
    }
}

/// In-process cache with no backing file.
#[derive(Default)]
pub struct MemoryCache {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .ok()
            .and_then(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::StorageError("Cache lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::StorageError("Cache lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }
}

fn default_data_dir() -> PathBuf {
    if let Some(proj_dirs) = directories::ProjectDirs::from("com", "maxx", "maxx-account") {
        proj_dirs.data_dir().to_path_buf()
    } else {
        dirs_fallback()
    }
}

fn dirs_fallback() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".into());
    PathBuf::from(home).join(".maxx")
}

#[cfg(unix)]
fn set_restrictive_permissions(path: &Path) -> Result<(), AppError> {
    use std::os::unix::fs::PermissionsExt;
    let perms = fs::Permissions::from_mode(0o600);
    fs::set_permissions(path, perms)
        .map_err(|e| AppError::StorageError(format!("Failed to set file permissions: {e}")))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_restrictive_permissions(_path: &Path) -> Result<(), AppError> {
    Ok(())
}
