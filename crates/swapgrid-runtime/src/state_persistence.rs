#![forbid(unsafe_code)]

//! Preference persistence.
//!
//! A [`StateRegistry`] caches small versioned preference entries (the theme,
//! a saved tile order, ...) and writes them through a pluggable
//! [`StorageBackend`]:
//!
//! ```text
//!   ThemeStore / app code
//!          │  get / set            (in-memory, marks dirty)
//!          ▼
//!   StateRegistry ── flush ──▶ StorageBackend
//!                               ├─ MemoryStorage  (tests, --no-persist)
//!                               └─ FileStorage    (JSON file, feature `state-persistence`)
//! ```
//!
//! Entry payloads are JSON documents encoded as bytes. The file backend
//! stores them inline, so the state file stays human-readable.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returned, cache unaffected |
//! | `StorageError::Serialization` | Entry payload is not JSON | Save refused, nothing written |
//! | `StorageError::Corruption` | State file unreadable, lock poisoned | Returned; callers fall back to defaults |
//! | Format version mismatch | File written by another release | Stored state ignored, logged |
//! | Missing entry | First run | Caller's default used |

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors from preference storage.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// An entry could not be encoded or decoded.
    Serialization(String),
    /// Stored data is unreadable, or internal state was poisoned.
    Corruption(String),
    /// The backend cannot be used here.
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Serialization(msg) => write!(f, "serialization error: {msg}"),
            Self::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            Self::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Serialization(_) | Self::Corruption(_) | Self::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Entries and backends
// ─────────────────────────────────────────────────────────────────────────────

/// One stored preference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredEntry {
    pub key: String,
    /// Schema version of `data`, chosen by the writer.
    pub version: u32,
    /// JSON document bytes.
    pub data: Vec<u8>,
}

impl StoredEntry {
    /// The payload as text, if it is UTF-8.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.data).ok()
    }
}

/// Where preferences live between runs.
///
/// Backends are shared by process-wide stores, hence `Send + Sync`.
pub trait StorageBackend: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Load every stored entry. An absent store is an empty map, not an error.
    fn load_all(&self) -> StorageResult<HashMap<String, StoredEntry>>;

    /// Replace the stored entries with `entries`.
    fn save_all(&self, entries: &HashMap<String, StoredEntry>) -> StorageResult<()>;

    /// Remove everything stored.
    fn clear(&self) -> StorageResult<()>;

    fn is_available(&self) -> bool {
        true
    }
}

fn poisoned(what: &str) -> StorageError {
    StorageError::Corruption(format!("{what} lock poisoned"))
}

/// Process-local backend. Nothing survives the process.
#[derive(Default)]
pub struct MemoryStorage {
    data: Mutex<HashMap<String, StoredEntry>>,
    saves: Mutex<usize>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `entries` already stored.
    #[must_use]
    pub fn with_entries(entries: HashMap<String, StoredEntry>) -> Self {
        Self {
            data: Mutex::new(entries),
            saves: Mutex::new(0),
        }
    }

    /// Number of successful `save_all` calls.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl StorageBackend for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn load_all(&self) -> StorageResult<HashMap<String, StoredEntry>> {
        Ok(self.data.lock().map_err(|_| poisoned("memory"))?.clone())
    }

    fn save_all(&self, entries: &HashMap<String, StoredEntry>) -> StorageResult<()> {
        *self.data.lock().map_err(|_| poisoned("memory"))? = entries.clone();
        *self.saves.lock().map_err(|_| poisoned("memory"))? += 1;
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.data.lock().map_err(|_| poisoned("memory"))?.clear();
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.data.lock().map(|g| g.len()).unwrap_or(0);
        f.debug_struct("MemoryStorage").field("entries", &count).finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File storage (feature `state-persistence`)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::BTreeMap;
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    #[derive(Serialize, Deserialize)]
    struct PrefsFile {
        format_version: u32,
        entries: BTreeMap<String, FileEntry>,
    }

    #[derive(Serialize, Deserialize)]
    struct FileEntry {
        version: u32,
        value: serde_json::Value,
    }

    impl PrefsFile {
        const FORMAT_VERSION: u32 = 1;
    }

    /// JSON file backend with atomic replacement.
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "theme": { "version": 1, "value": "light" },
    ///     "tile-order": { "version": 1, "value": ["kes", "gen3", "sy3"] }
    ///   }
    /// }
    /// ```
    ///
    /// Saves write `{file}.tmp`, sync it, then rename it over the target, so a
    /// crash mid-save leaves the previous file intact.
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// Storage at `path`. The file is created on first save.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// `$XDG_STATE_HOME/swapgrid/{app_name}/prefs.json`, falling back to
        /// `~/.local/state` and then the working directory.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = std::env::var_os("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|| {
                    std::env::var_os("HOME")
                        .map(|home| PathBuf::from(home).join(".local").join("state"))
                })
                .unwrap_or_else(|| PathBuf::from("."));
            Self::new(base.join("swapgrid").join(app_name).join("prefs.json"))
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut name = self.path.file_name().unwrap_or_default().to_os_string();
            name.push(".tmp");
            self.path.with_file_name(name)
        }
    }

    impl StorageBackend for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn load_all(&self) -> StorageResult<HashMap<String, StoredEntry>> {
            if !self.path.exists() {
                return Ok(HashMap::new());
            }

            let reader = BufReader::new(File::open(&self.path)?);
            let file: PrefsFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Corruption(format!("{}: {e}", self.path.display()))
            })?;

            if file.format_version != PrefsFile::FORMAT_VERSION {
                tracing::warn!(
                    path = %self.path.display(),
                    stored = file.format_version,
                    expected = PrefsFile::FORMAT_VERSION,
                    "preference file format mismatch, ignoring stored preferences"
                );
                return Ok(HashMap::new());
            }

            let mut entries = HashMap::with_capacity(file.entries.len());
            for (key, entry) in file.entries {
                let data = serde_json::to_vec(&entry.value)
                    .map_err(|e| StorageError::Serialization(format!("{key}: {e}")))?;
                entries.insert(
                    key.clone(),
                    StoredEntry {
                        key,
                        version: entry.version,
                        data,
                    },
                );
            }
            Ok(entries)
        }

        fn save_all(&self, entries: &HashMap<String, StoredEntry>) -> StorageResult<()> {
            let mut file = PrefsFile {
                format_version: PrefsFile::FORMAT_VERSION,
                entries: BTreeMap::new(),
            };
            for (key, entry) in entries {
                let value = serde_json::from_slice(&entry.data).map_err(|e| {
                    StorageError::Serialization(format!("entry {key:?} is not JSON: {e}"))
                })?;
                file.entries.insert(
                    key.clone(),
                    FileEntry {
                        version: entry.version,
                        value,
                    },
                );
            }

            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }

            let tmp = self.temp_path();
            {
                let mut writer = BufWriter::new(File::create(&tmp)?);
                serde_json::to_writer_pretty(&mut writer, &file)
                    .map_err(|e| StorageError::Serialization(e.to_string()))?;
                writer.write_all(b"\n")?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                entries = entries.len(),
                "saved preferences"
            );
            Ok(())
        }

        fn clear(&self) -> StorageResult<()> {
            match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(e.into()),
            }
        }

        fn is_available(&self) -> bool {
            let Some(parent) = self.path.parent() else {
                return false;
            };
            let dir = if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            };
            if fs::create_dir_all(dir).is_err() {
                return false;
            }
            fs::metadata(dir)
                .map(|m| !m.permissions().readonly())
                .unwrap_or(false)
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage").field("path", &self.path).finish()
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;

// ─────────────────────────────────────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Default)]
struct Cache {
    entries: HashMap<String, StoredEntry>,
    dirty: bool,
}

/// Cached preferences over a [`StorageBackend`].
///
/// `set` and `remove` only touch the cache and mark it dirty;
/// [`flush`](Self::flush) writes through. `Send + Sync`.
pub struct StateRegistry {
    backend: Box<dyn StorageBackend>,
    cache: Mutex<Cache>,
}

impl StateRegistry {
    /// Registry over `backend`. Call [`load`](Self::load) to read what is stored.
    #[must_use]
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            cache: Mutex::new(Cache::default()),
        }
    }

    /// Ephemeral registry.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryStorage::new()))
    }

    /// Registry persisted to a JSON file.
    #[cfg(feature = "state-persistence")]
    #[must_use]
    pub fn with_file(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(Box::new(FileStorage::new(path)))
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Cache>> {
        self.cache.lock().map_err(|_| poisoned("registry"))
    }

    /// Replace the cache with the stored entries. Returns how many were loaded.
    pub fn load(&self) -> StorageResult<usize> {
        let entries = self.backend.load_all()?;
        let count = entries.len();
        let mut cache = self.lock()?;
        cache.entries = entries;
        cache.dirty = false;
        tracing::debug!(backend = self.backend.name(), count, "loaded preferences");
        Ok(count)
    }

    /// Write the cache through if it changed. Returns whether anything was written.
    pub fn flush(&self) -> StorageResult<bool> {
        let mut cache = self.lock()?;
        if !cache.dirty {
            return Ok(false);
        }
        self.backend.save_all(&cache.entries)?;
        cache.dirty = false;
        Ok(true)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<StoredEntry> {
        self.lock().ok()?.entries.get(key).cloned()
    }

    /// Store `data` under `key`. Setting an identical entry is not a change.
    pub fn set(&self, key: impl Into<String>, version: u32, data: Vec<u8>) {
        let key = key.into();
        let Ok(mut cache) = self.lock() else {
            return;
        };
        let unchanged = cache
            .entries
            .get(&key)
            .is_some_and(|e| e.version == version && e.data == data);
        if unchanged {
            return;
        }
        cache
            .entries
            .insert(key.clone(), StoredEntry { key, version, data });
        cache.dirty = true;
    }

    pub fn remove(&self, key: &str) -> Option<StoredEntry> {
        let mut cache = self.lock().ok()?;
        let removed = cache.entries.remove(key);
        if removed.is_some() {
            cache.dirty = true;
        }
        removed
    }

    /// Clear the cache and the backend.
    pub fn clear(&self) -> StorageResult<()> {
        self.backend.clear()?;
        let mut cache = self.lock()?;
        cache.entries.clear();
        cache.dirty = false;
        Ok(())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().map(|c| c.entries.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether there are unsaved changes.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.lock().map(|c| c.dirty).unwrap_or(false)
    }

    #[must_use]
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    #[must_use]
    pub fn is_available(&self) -> bool {
        self.backend.is_available()
    }

    /// Cached keys, sorted.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .lock()
            .map(|c| c.entries.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();
        keys
    }

    /// Wrap in an `Arc` for sharing with process-wide stores.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(feature = "state-persistence")]
impl StateRegistry {
    /// Decode the entry under `key`. Missing or undecodable entries are `None`.
    #[must_use]
    pub fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.get(key)?;
        match serde_json::from_slice(&entry.data) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored preference does not decode, ignoring");
                None
            }
        }
    }

    /// Encode `value` as JSON and store it under `key`.
    pub fn set_json<T: serde::Serialize + ?Sized>(
        &self,
        key: impl Into<String>,
        version: u32,
        value: &T,
    ) -> StorageResult<()> {
        let data =
            serde_json::to_vec(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.set(key, version, data);
        Ok(())
    }
}

impl fmt::Debug for StateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("backend", &self.backend.name())
            .field("entries", &self.len())
            .field("dirty", &self.is_dirty())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, version: u32, data: &[u8]) -> StoredEntry {
        StoredEntry {
            key: key.to_string(),
            version,
            data: data.to_vec(),
        }
    }

    #[test]
    fn memory_storage_replaces_on_save() {
        let storage = MemoryStorage::new();
        assert!(storage.load_all().unwrap().is_empty());

        let mut first = HashMap::new();
        first.insert("a".to_string(), entry("a", 1, b"1"));
        first.insert("b".to_string(), entry("b", 1, b"2"));
        storage.save_all(&first).unwrap();

        let mut second = HashMap::new();
        second.insert("c".to_string(), entry("c", 1, b"3"));
        storage.save_all(&second).unwrap();

        let loaded = storage.load_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded.contains_key("c"));
        assert_eq!(storage.save_count(), 2);

        storage.clear().unwrap();
        assert!(storage.load_all().unwrap().is_empty());
    }

    #[test]
    fn registry_tracks_dirty_state() {
        let registry = StateRegistry::in_memory();
        assert!(registry.is_empty());
        assert!(!registry.is_dirty());

        registry.set("theme", 1, b"\"light\"".to_vec());
        assert!(registry.is_dirty());
        assert_eq!(registry.get("theme").unwrap().text(), Some("\"light\""));

        assert!(registry.flush().unwrap());
        assert!(!registry.is_dirty());
        assert!(!registry.flush().unwrap());

        // Same value again is not a change.
        registry.set("theme", 1, b"\"light\"".to_vec());
        assert!(!registry.is_dirty());

        // A new version is.
        registry.set("theme", 2, b"\"light\"".to_vec());
        assert!(registry.is_dirty());
    }

    #[test]
    fn registry_load_replaces_cache() {
        let mut stored = HashMap::new();
        stored.insert("tile-order".to_string(), entry("tile-order", 1, b"[\"kes\"]"));
        let registry = StateRegistry::new(Box::new(MemoryStorage::with_entries(stored)));

        registry.set("scratch", 1, b"0".to_vec());
        assert_eq!(registry.load().unwrap(), 1);
        assert!(!registry.is_dirty());
        assert!(registry.get("scratch").is_none());
        assert_eq!(registry.get("tile-order").unwrap().version, 1);
    }

    #[test]
    fn registry_remove_and_clear() {
        let registry = StateRegistry::in_memory();
        registry.set("a", 1, b"1".to_vec());
        registry.set("b", 1, b"2".to_vec());
        registry.flush().unwrap();

        assert!(registry.remove("zz").is_none());
        assert!(!registry.is_dirty());
        assert_eq!(registry.remove("a").unwrap().data, b"1");
        assert!(registry.is_dirty());
        assert_eq!(registry.keys(), vec!["b".to_string()]);

        registry.clear().unwrap();
        assert!(registry.is_empty());
        assert!(!registry.is_dirty());
    }

    #[test]
    fn registry_is_shareable() {
        let registry = StateRegistry::in_memory().shared();
        let other = Arc::clone(&registry);
        std::thread::spawn(move || other.set("k", 1, b"true".to_vec()))
            .join()
            .unwrap();
        assert_eq!(registry.get("k").unwrap().data, b"true");
    }

    #[test]
    fn debug_shows_backend_and_counts() {
        let registry = StateRegistry::in_memory();
        registry.set("k", 1, b"1".to_vec());
        let dbg = format!("{registry:?}");
        assert!(dbg.contains("MemoryStorage"));
        assert!(dbg.contains("dirty: true"));
    }

    #[test]
    fn storage_error_display_and_source() {
        use std::error::Error;

        let io = StorageError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(io.to_string().contains("I/O error"));
        assert!(io.source().is_some());

        let corrupt = StorageError::Corruption("bad data".into());
        assert!(corrupt.to_string().contains("corruption"));
        assert!(corrupt.source().is_none());

        let ser = StorageError::Serialization("nope".into());
        assert!(ser.to_string().contains("serialization"));
    }
}
