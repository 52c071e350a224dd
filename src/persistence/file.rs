//! Directory-backed store for the native build

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::KeyValueStore;
use crate::error::StorageError;

/// Each key is a `<key>.json` file inside `dir`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates `dir` if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::debug!("File store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::Unavailable(format!("invalid key {key:?}")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)?) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        // Write then rename so a crash never leaves a half-written file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)?) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir(tag: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("sky-striker-{tag}-{}-{nanos}", std::process::id()))
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let mut store = FileStore::new(&dir).unwrap();
        assert_eq!(store.get("scores").unwrap(), None);

        store.set("scores", "[1,2,3]").unwrap();
        assert_eq!(store.get("scores").unwrap().as_deref(), Some("[1,2,3]"));

        // A second handle sees the same data
        let other = FileStore::new(&dir).unwrap();
        assert_eq!(other.get("scores").unwrap().as_deref(), Some("[1,2,3]"));

        store.remove("scores").unwrap();
        assert_eq!(store.get("scores").unwrap(), None);
        store.remove("scores").unwrap();

        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = scratch_dir("keys");
        let mut store = FileStore::new(&dir).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StorageError::Unavailable(_))
        ));
        assert!(store.get("").is_err());
        let _ = fs::remove_dir_all(dir);
    }
}
