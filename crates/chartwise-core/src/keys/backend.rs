//! Persistence backends for the key store.

use crate::error::KeyError;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use toml_edit::DocumentMut;

/// Table holding the credentials in the TOML file.
const KEYS_TABLE: &str = "keys";

/// Storage primitive behind [`super::KeyStore`].
///
/// Each call reads or writes a single named value atomically.
pub trait KeyBackend: Send + Sync {
    /// Read a stored value, `Ok(None)` if absent.
    fn load(&self, name: &str) -> Result<Option<String>, KeyError>;

    /// Persist a value, replacing any previous one.
    fn store(&self, name: &str, value: &str) -> Result<(), KeyError>;

    /// Remove a value. Removing an absent value succeeds.
    fn remove(&self, name: &str) -> Result<(), KeyError>;

    /// Where values are persisted, if on disk.
    fn location(&self) -> Option<&Path> {
        None
    }
}

/// TOML credentials file, edited in place so user comments survive.
///
/// ```toml
/// [keys]
/// gemini_api_key = "AIza..."
/// perplexity_api_key = "pplx-..."
/// ```
pub struct FileBackend {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn read_content(&self) -> Result<Option<String>, KeyError> {
        if !self.path.exists() {
            return Ok(None);
        }
        std::fs::read_to_string(&self.path)
            .map(Some)
            .map_err(|e| KeyError::Storage(format!("{}: {e}", self.path.display())))
    }

    fn read_document(&self) -> Result<DocumentMut, KeyError> {
        match self.read_content()? {
            Some(content) => content
                .parse()
                .map_err(|e| KeyError::Storage(format!("{}: {e}", self.path.display()))),
            None => Ok(DocumentMut::new()),
        }
    }

    fn write_document(&self, doc: &DocumentMut) -> Result<(), KeyError> {
        let storage_err =
            |e: std::io::Error| KeyError::Storage(format!("{}: {e}", self.path.display()));

        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir).map_err(storage_err)?;

        // Uniquely named sibling, created 0600, renamed over the target
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(storage_err)?;
        restrict_permissions(tmp.path()).map_err(storage_err)?;
        tmp.write_all(doc.to_string().as_bytes()).map_err(storage_err)?;
        tmp.as_file().sync_all().map_err(storage_err)?;
        tmp.persist(&self.path).map_err(|e| storage_err(e.error))?;
        Ok(())
    }
}

impl KeyBackend for FileBackend {
    fn load(&self, name: &str) -> Result<Option<String>, KeyError> {
        let doc = self.read_document()?;
        Ok(doc
            .get(KEYS_TABLE)
            .and_then(|table| table.get(name))
            .and_then(|item| item.as_str())
            .filter(|value| !value.is_empty())
            .map(String::from))
    }

    fn store(&self, name: &str, value: &str) -> Result<(), KeyError> {
        let _guard = self.lock();
        let mut doc = self.read_document()?;

        // Inline `keys = { ... }` tables are edited in place
        let keys = doc.entry(KEYS_TABLE).or_insert(toml_edit::table());
        if keys.as_table_like().is_none() {
            *keys = toml_edit::table();
        }
        if let Some(table) = keys.as_table_like_mut() {
            table.insert(name, toml_edit::value(value));
        }

        self.write_document(&doc)
    }

    fn remove(&self, name: &str) -> Result<(), KeyError> {
        let _guard = self.lock();
        let Some(content) = self.read_content()? else {
            return Ok(());
        };
        let mut doc: DocumentMut = match content.parse() {
            Ok(doc) => doc,
            Err(e) => {
                tracing::warn!(
                    "Resetting unparsable credentials file {}: {e}",
                    self.path.display()
                );
                return self.write_document(&DocumentMut::new());
            }
        };
        let removed = doc
            .get_mut(KEYS_TABLE)
            .and_then(|item| item.as_table_like_mut())
            .and_then(|table| table.remove(name))
            .is_some();
        if removed {
            self.write_document(&doc)?;
        }
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

/// In-process backend for tests and session-only keys.
#[derive(Default)]
pub struct MemoryBackend {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyBackend for MemoryBackend {
    fn load(&self, name: &str) -> Result<Option<String>, KeyError> {
        let values = self
            .values
            .lock()
            .map_err(|_| KeyError::Storage("memory backend poisoned".to_string()))?;
        Ok(values.get(name).cloned())
    }

    fn store(&self, name: &str, value: &str) -> Result<(), KeyError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| KeyError::Storage("memory backend poisoned".to_string()))?;
        values.insert(name.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), KeyError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| KeyError::Storage("memory backend poisoned".to_string()))?;
        values.remove(name);
        Ok(())
    }
}
