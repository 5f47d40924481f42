//! Durable key-value storage for session state.

use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};

/// A string-to-string store that outlives a single request.
///
/// Each call is atomic with respect to other calls on the same store.
pub trait Storage: Debug + Send + Sync {
    /// Look up a value, returning `None` if it was never set.
    fn get(&self, key: &str) -> Option<String>;

    /// Store a value, replacing whatever was there before.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Forget a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Store several values at once.
    ///
    /// Implementations should apply the whole batch or none of it. The
    /// default just calls [`Storage::set()`] for each entry.
    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        for (key, value) in entries {
            self.set(key, value)?;
        }

        Ok(())
    }
}

/// Errors that may occur while reading or writing a [`Storage`].
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Unable to access the storage file")]
    Io(#[from] io::Error),
    #[error("The storage file doesn't contain a valid JSON object")]
    Corrupt(#[from] serde_json::Error),
}

type Entries = BTreeMap<String, String>;

/// Storage which only lives as long as the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<Entries>,
}

impl MemoryStorage {
    pub fn new() -> Self { MemoryStorage::default() }

    fn entries(&self) -> MutexGuard<'_, Entries> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries().remove(key);
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut stored = self.entries();
        for (key, value) in entries {
            stored.insert(key.to_string(), value.to_string());
        }

        Ok(())
    }
}

/// Storage backed by a flat JSON object on disk.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStorage {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path { &self.path }

    fn read(&self) -> Result<Entries, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Entries::new())
            },
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text).map_err(StorageError::from)
    }

    /// Read the entries for a write, starting over if the file is corrupt.
    fn read_for_update(&self) -> Result<Entries, StorageError> {
        match self.read() {
            Err(StorageError::Corrupt(e)) => {
                log::warn!(
                    "Discarding the corrupt storage file at {}: {}",
                    self.path.display(),
                    e
                );
                Ok(Entries::new())
            },
            other => other,
        }
    }

    fn write(&self, entries: &Entries) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let text = serde_json::to_string_pretty(entries)?;
        let scratch = self.path.with_extension("tmp");
        write_private(&scratch, text.as_bytes())?;
        fs::rename(&scratch, &self.path)?;

        log::trace!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut Entries),
    {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.read_for_update()?;
        mutate(&mut entries);
        self.write(&entries)
    }
}

/// Write a file only the current user can read.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;

    // the mode only applies to new files, so fix up a leftover scratch file
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(contents)?;
    file.sync_all()
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());

        match self.read() {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                log::warn!(
                    "Unable to read {} from {}: {}",
                    key,
                    self.path.display(),
                    e
                );
                None
            },
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }

    fn set_many(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|stored| {
            for (key, value) in entries {
                stored.insert(key.to_string(), value.to_string());
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("token"), None);

        storage.set("token", "abc").unwrap();
        assert_eq!(storage.get("token"), Some(String::from("abc")));

        storage.set("token", "def").unwrap();
        assert_eq!(storage.get("token"), Some(String::from("def")));

        storage.remove("token").unwrap();
        assert_eq!(storage.get("token"), None);
    }

    #[test]
    fn removing_a_missing_key_is_fine() {
        let storage = MemoryStorage::new();

        storage.remove("nothing-here").unwrap();
    }

    #[test]
    fn file_storage_survives_reopening() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        FileStorage::new(&path).set("token", "abc").unwrap();
        let reopened = FileStorage::new(&path);

        assert_eq!(reopened.get("token"), Some(String::from("abc")));
        assert_eq!(reopened.get("user"), None);
    }

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("session.json"));

        assert_eq!(storage.get("token"), None);
        storage.remove("token").unwrap();
    }

    #[test]
    fn corrupt_file_is_replaced_on_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{bad").unwrap();
        let storage = FileStorage::new(&path);

        assert_eq!(storage.get("token"), None);

        storage.set("token", "abc").unwrap();

        assert_eq!(storage.get("token"), Some(String::from("abc")));
        let on_disk: Entries =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.len(), 1);
    }

    #[test]
    fn set_many_writes_every_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let storage = FileStorage::new(&path);
        storage.set("stale", "yes").unwrap();

        storage
            .set_many(&[("token", "abc"), ("user", r#"{"id":1}"#)])
            .unwrap();

        let on_disk: Entries =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let keys: Vec<_> = on_disk.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["stale", "token", "user"]);
        assert_eq!(on_disk["user"], r#"{"id":1}"#);

        let memory = MemoryStorage::new();
        memory.set_many(&[("token", "abc"), ("user", "{}")]).unwrap();
        assert_eq!(memory.get("token"), Some(String::from("abc")));
        assert_eq!(memory.get("user"), Some(String::from("{}")));
    }

    #[cfg(unix)]
    #[test]
    fn session_files_are_only_readable_by_their_owner() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        let scratch = path.with_extension("tmp");
        fs::write(&scratch, "left over").unwrap();
        fs::set_permissions(&scratch, fs::Permissions::from_mode(0o666)).unwrap();

        FileStorage::new(&path).set("token", "abc").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert!(!scratch.exists());
    }
}
