//! File-backed session storage.
//!
//! Stores every entry in one JSON document. This is the desktop / CLI
//! stand-in for a browser cookie jar: the token written at login is still
//! there the next time the program starts.

use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use tempfile::NamedTempFile;

use crate::{CookieOptions, SessionStore, StoreError, StoredEntry};

/// A store persisted as a JSON file.
///
/// Every operation reads the file, and writes re-serialize the whole
/// document. A missing file is an empty store.
///
/// Writes go to a temporary file in the same directory which then replaces
/// the document, so a crash mid-write leaves the previous document intact.
/// The file is readable by its owner only. A document that doesn't parse
/// fails reads with [`StoreError::Corrupt`] and is replaced by the next
/// write.
///
/// # Example
///
/// ```rust,no_run
/// use silex_store::{CookieOptions, FileStore, SessionStore};
///
/// let store = FileStore::new("/home/me/.config/silex/session.json")?;
/// store.set("opensilex-token", "eyJ...", &CookieOptions::default())?;
/// # Ok::<(), silex_store::StoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by `path`.
    ///
    /// Creates the parent directory if it doesn't exist. The file itself is
    /// created on the first write.
    ///
    /// # Errors
    /// Returns [`StoreError::Io`] if the parent directory can't be created.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(StoreError::Io)?;
            }
        }
        Ok(Self { path })
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, StoredEntry>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(content) => {
                serde_json::from_str(&content).map_err(StoreError::Corrupt)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(StoreError::Io(e)),
        }
    }

    /// Loads the document a write starts from. A corrupt document is
    /// discarded; the flag tells the caller it must be rewritten.
    fn load_for_write(
        &self,
    ) -> Result<(BTreeMap<String, StoredEntry>, bool), StoreError> {
        match self.load() {
            Ok(entries) => Ok((entries, false)),
            Err(StoreError::Corrupt(e)) => {
                tracing::warn!(
                    error = %e,
                    path = %self.path.display(),
                    "replacing corrupt store document"
                );
                Ok((BTreeMap::new(), true))
            }
            Err(e) => Err(e),
        }
    }

    fn save(
        &self,
        entries: &BTreeMap<String, StoredEntry>,
    ) -> Result<(), StoreError> {
        let content =
            serde_json::to_vec_pretty(entries).map_err(StoreError::Encode)?;

        let dir = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        let mut file = NamedTempFile::new_in(dir).map_err(StoreError::Io)?;
        restrict_to_owner(file.as_file())?;
        file.write_all(&content).map_err(StoreError::Io)?;
        file.as_file().sync_all().map_err(StoreError::Io)?;
        file.persist(&self.path)
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_to_owner(file: &std::fs::File) -> Result<(), StoreError> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(std::fs::Permissions::from_mode(0o600))
        .map_err(StoreError::Io)
}

#[cfg(not(unix))]
fn restrict_to_owner(_file: &std::fs::File) -> Result<(), StoreError> {
    Ok(())
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let now = Utc::now();
        let mut entries = self.load()?;

        match entries.get(key) {
            None => Ok(None),
            Some(entry) if !entry.is_expired(now) => Ok(Some(entry.value.clone())),
            Some(_) => {
                entries.remove(key);
                self.save(&entries)?;
                tracing::debug!(key, path = %self.path.display(), "evicted expired entry");
                Ok(None)
            }
        }
    }

    fn set(
        &self,
        key: &str,
        value: &str,
        options: &CookieOptions,
    ) -> Result<(), StoreError> {
        let (mut entries, _) = self.load_for_write()?;
        entries.insert(key.to_string(), StoredEntry::new(value, options, Utc::now()));
        self.save(&entries)?;
        tracing::debug!(key, path = %self.path.display(), "entry stored");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let (mut entries, discarded) = self.load_for_write()?;
        if entries.remove(key).is_some() || discarded {
            self.save(&entries)?;
            tracing::debug!(key, path = %self.path.display(), "entry removed");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_without_file_returns_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json")).unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert!(!store.path().exists(), "reads must not create the file");
    }

    #[test]
    fn test_new_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("session.json");

        FileStore::new(&path).unwrap();

        assert!(path.parent().unwrap().is_dir());
    }

    #[test]
    fn test_get_corrupt_file_returns_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileStore::new(&path).unwrap();

        assert!(matches!(store.get("k"), Err(StoreError::Corrupt(_))));
    }

    #[test]
    fn test_set_over_corrupt_file_replaces_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileStore::new(&path).unwrap();

        store.set("k", "v", &CookieOptions::default()).unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_remove_over_corrupt_file_resets_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = FileStore::new(&path).unwrap();

        store.remove("k").unwrap();

        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn test_set_leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json")).unwrap();

        store.set("a", "1", &CookieOptions::default()).unwrap();
        store.set("b", "2", &CookieOptions::default()).unwrap();

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, ["session.json"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_set_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json")).unwrap();

        store.set("k", "v", &CookieOptions::default()).unwrap();

        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_remove_missing_key_leaves_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("session.json")).unwrap();

        store.remove("k").unwrap();

        assert!(!store.path().exists());
    }
}
