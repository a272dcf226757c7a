//! File-backed key-value store.
//!
//! Each key is one `<key>.json` file in the data directory. Writes go to a
//! temporary file first and are renamed into place so a crash never leaves a
//! half-written document behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use nexus_pos_core::{KeyValueStore, StorageError};

const EXTENSION: &str = "json";

/// Store rooted at a directory, created on first write.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(key).with_extension(EXTENSION)
    }
}

fn backend(action: &str, path: &Path, e: &std::io::Error) -> StorageError {
    StorageError::Backend(format!("failed to {action} {}: {e}", path.display()))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(backend("read", &path, &e)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| backend("create", &self.dir, &e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| backend("write", &tmp, &e))?;
        fs::rename(&tmp, &path).map_err(|e| backend("replace", &path, &e))?;
        tracing::debug!(key, path = %path.display(), "Saved");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StorageError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => return Err(backend("list", &self.dir, &e)),
        };

        for entry in entries {
            let path = entry.map_err(|e| backend("list", &self.dir, &e))?.path();
            if path.extension().is_some_and(|ext| ext == EXTENSION) {
                fs::remove_file(&path).map_err(|e| backend("remove", &path, &e))?;
            }
        }
        Ok(())
    }
}
