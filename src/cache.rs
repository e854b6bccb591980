use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{RwLock, TryLockError};

use crate::error::CacheError;

/// Minimal string key/value store shared by the turn handler (reader) and the
/// leaderboard service (writer).
pub trait LeaderboardCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    fn set(&self, key: &str, value: String) -> Result<(), CacheError>;
}

/// In-process cache. Reads never wait for a writer; a held write lock reports
/// [`CacheError::Busy`].
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeaderboardCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self.entries.try_read() {
            Ok(guard) => Ok(guard.get(key).cloned()),
            Err(TryLockError::WouldBlock) => Err(CacheError::Busy),
            Err(TryLockError::Poisoned(_)) => Err(CacheError::Poisoned),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let mut guard = self.entries.write().map_err(|_| CacheError::Poisoned)?;
        guard.insert(key.to_string(), value);
        Ok(())
    }
}

/// One `<key>.json` file per key under `dir`. Writes go through a temp file and
/// a rename so readers never observe a partial document.
#[derive(Clone, Debug)]
pub struct FileCache {
    dir: PathBuf,
}

impl FileCache {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl LeaderboardCache for FileCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&staging, value)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn temp_dir(name: &str) -> PathBuf {
        let unique = format!("{}-{}-{}", name, std::process::id(), rand::random::<u32>());
        std::env::temp_dir().join(unique)
    }

    #[test]
    fn memory_cache_round_trips_values() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("leaderboard").expect("get"), None);
        cache.set("leaderboard", "[]".to_string()).expect("set");
        assert_eq!(cache.get("leaderboard").expect("get").as_deref(), Some("[]"));
    }

    #[test]
    fn memory_cache_read_does_not_wait_for_writer() {
        let cache = MemoryCache::new();
        let _writer = cache.entries.write().expect("lock");
        assert!(matches!(cache.get("leaderboard"), Err(CacheError::Busy)));
    }

    #[test]
    fn file_cache_missing_key_is_none() {
        let cache = FileCache::new(temp_dir("file-cache-missing"));
        assert_eq!(cache.get("leaderboard").expect("get"), None);
    }

    #[test]
    fn file_cache_overwrites_value() {
        let dir = temp_dir("file-cache-write");
        let cache = FileCache::new(dir.clone());
        cache.set("leaderboard", "first".to_string()).expect("set");
        cache.set("leaderboard", "second".to_string()).expect("set");
        assert_eq!(
            cache.get("leaderboard").expect("get").as_deref(),
            Some("second")
        );
        assert!(!dir.join(".leaderboard.json.tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
