//! Filesystem key-value store: one file per key under a directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Stores each key as `<dir>/<escaped key>.json`.
///
/// Writes go to a sibling `.tmp` file first and are renamed into place, so a
/// crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Root directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `key`.
    ///
    /// ASCII letters, digits, `.` and `-` are kept; every other byte becomes
    /// `_` plus two hex digits. Distinct keys always get distinct files:
    /// `skill-tree:v1` is `skill-tree_3av1.json`, `skill-tree_v1` is
    /// `skill-tree_5fv1.json`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let mut name = String::with_capacity(key.len() + 5);
        for byte in key.bytes() {
            if byte.is_ascii_alphanumeric() || matches!(byte, b'.' | b'-') {
                name.push(char::from(byte));
            } else {
                name.push_str(&format!("_{byte:02x}"));
            }
        }
        name.push_str(".json");
        self.dir.join(name)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            // Leave no partial file behind
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.get("skill-tree:v1").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested"));
        store.set("skill-tree:v1", "{\"v\":1}").unwrap();
        store.set("skill-tree:v1", "{\"v\":2}").unwrap();

        assert_eq!(store.get("skill-tree:v1").unwrap().as_deref(), Some("{\"v\":2}"));
        assert!(store.path_for("skill-tree:v1").ends_with("skill-tree_3av1.json"));
        assert!(!store.path_for("skill-tree:v1").with_extension("json.tmp").exists());
    }

    #[test]
    fn test_similar_keys_do_not_share_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_ne!(store.path_for("skill-tree:v1"), store.path_for("skill-tree_v1"));
        assert!(store.path_for("a/../b").ends_with("a_2f.._2fb.json"));

        store.set("skill-tree:v1", "colon").unwrap();
        store.set("skill-tree_v1", "underscore").unwrap();
        assert_eq!(store.get("skill-tree:v1").unwrap().as_deref(), Some("colon"));
        assert_eq!(store.get("skill-tree_v1").unwrap().as_deref(), Some("underscore"));
    }

    #[test]
    fn test_failed_rename_removes_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        // A non-empty directory where the target file should go
        let target = store.path_for("k");
        fs::create_dir_all(target.join("occupied")).unwrap();

        assert!(store.set("k", "value").is_err());
        assert!(!target.with_extension("json.tmp").exists());
    }
}
