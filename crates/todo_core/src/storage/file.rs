//! Directory-backed key-value storage.
//!
//! # Invariants
//! - Each key maps to one file `<dir>/<key>.kv`.
//! - Writes go to a temp file in the same directory and are renamed over the
//!   target, so a crash leaves either the old or the new value.

use super::{KvError, KvResult, KvStore};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const VALUE_FILE_EXTENSION: &str = "kv";

/// Key-value store keeping one file per key.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Opens (and creates when missing) the storage directory.
    pub fn open(dir: impl AsRef<Path>) -> KvResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|source| KvError::Io {
            key: dir.display().to_string(),
            source,
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn value_path(&self, key: &str) -> KvResult<PathBuf> {
        if !is_valid_file_key(key) {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.{VALUE_FILE_EXTENSION}")))
    }
}

impl KvStore for FileKvStore {
    fn get(&self, key: &str) -> KvResult<Option<Vec<u8>>> {
        let path = self.value_path(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(KvError::Io {
                key: key.to_string(),
                source,
            }),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> KvResult<()> {
        let path = self.value_path(key)?;
        let io_error = |source| KvError::Io {
            key: key.to_string(),
            source,
        };

        let mut temp = NamedTempFile::new_in(&self.dir).map_err(io_error)?;
        temp.write_all(value).map_err(io_error)?;
        temp.as_file().sync_all().map_err(io_error)?;
        temp.persist(&path).map_err(|err| io_error(err.error))?;
        Ok(())
    }
}

fn is_valid_file_key(key: &str) -> bool {
    !key.is_empty()
        && key != "."
        && key != ".."
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '@' | '_' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::{is_valid_file_key, FileKvStore};
    use crate::storage::{KvError, KvStore};

    #[test]
    fn file_keys_reject_path_separators() {
        assert!(is_valid_file_key("@toDos"));
        assert!(!is_valid_file_key("../escape"));
        assert!(!is_valid_file_key(""));
        assert!(!is_valid_file_key(".."));
    }

    #[test]
    fn set_replaces_value_and_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();

        store.set("@mode", b"\"work\"").unwrap();
        store.set("@mode", b"\"travel\"").unwrap();

        assert_eq!(store.get("@mode").unwrap().unwrap(), b"\"travel\"");
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn invalid_key_is_rejected_before_touching_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::open(dir.path()).unwrap();

        let err = store.set("a/b", b"x").unwrap_err();
        assert!(matches!(err, KvError::InvalidKey(key) if key == "a/b"));
    }
}
