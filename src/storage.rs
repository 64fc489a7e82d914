use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const STORE_VERSION: u32 = 1;
const STORE_DIR: &str = "matchday_terminal";
const STORE_FILE: &str = "kv_store.json";

/// Local string key-value store, the app's analogue of an origin-scoped
/// web store. All reads and writes are synchronous; persistence is a single
/// versioned JSON file swapped atomically on every write.
#[derive(Debug)]
pub struct KvStore {
    entries: HashMap<String, String>,
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: HashMap<String, String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TtlEnvelope<T> {
    value: T,
    expires_at_ms: i64,
}

pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

impl KvStore {
    /// Store backed by the default cache file (XDG cache dir, best effort).
    pub fn open() -> Self {
        match store_path() {
            Some(path) => Self::open_at(path),
            None => Self::in_memory(),
        }
    }

    pub fn open_at(path: PathBuf) -> Self {
        let entries = load_store_file(&path);
        Self {
            entries,
            path: Some(path),
        }
    }

    /// Volatile store with no backing file.
    pub fn in_memory() -> Self {
        Self {
            entries: HashMap::new(),
            path: None,
        }
    }

    pub fn set_with_ttl<T: Serialize>(&mut self, key: &str, value: &T, ttl_ms: i64) -> Result<()> {
        self.set_with_ttl_at(key, value, ttl_ms, now_ms())
    }

    pub fn set_with_ttl_at<T: Serialize>(
        &mut self,
        key: &str,
        value: &T,
        ttl_ms: i64,
        now_ms: i64,
    ) -> Result<()> {
        let envelope = TtlEnvelope {
            value,
            expires_at_ms: now_ms + ttl_ms,
        };
        let raw = serde_json::to_string(&envelope).context("serialize ttl envelope")?;
        self.entries.insert(key.to_string(), raw);
        self.persist()
    }

    /// Returns the stored value while `now < expires_at`. Missing, corrupt,
    /// or expired entries all read as `None`; expiry removes the key.
    pub fn get_with_ttl<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        self.get_with_ttl_at(key, now_ms())
    }

    pub fn get_with_ttl_at<T: DeserializeOwned>(&mut self, key: &str, now_ms: i64) -> Option<T> {
        let raw = self.entries.get(key)?;
        let Ok(envelope) = serde_json::from_str::<TtlEnvelope<T>>(raw) else {
            return None;
        };
        if now_ms >= envelope.expires_at_ms {
            self.entries.remove(key);
            let _ = self.persist();
            return None;
        }
        Some(envelope.value)
    }

    pub fn set_json<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value).context("serialize store value")?;
        self.entries.insert(key.to_string(), raw);
        self.persist()
    }

    /// TTL-less read; `fallback` on missing-or-unparsable, never an error.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let Some(raw) = self.entries.get(key) else {
            return fallback;
        };
        serde_json::from_str(raw).unwrap_or(fallback)
    }

    pub fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            let _ = self.persist();
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).ok();
        }
        let file = StoreFile {
            version: STORE_VERSION,
            entries: self.entries.clone(),
        };
        let json = serde_json::to_string(&file).context("serialize kv store")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write kv store")?;
        fs::rename(&tmp, path).context("swap kv store")?;
        Ok(())
    }
}

fn load_store_file(path: &PathBuf) -> HashMap<String, String> {
    let Ok(raw) = fs::read_to_string(path) else {
        return HashMap::new();
    };
    let file = serde_json::from_str::<StoreFile>(&raw).unwrap_or_default();
    if file.version != STORE_VERSION {
        return HashMap::new();
    }
    file.entries
}

fn store_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(STORE_DIR).join(STORE_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(STORE_DIR)
            .join(STORE_FILE),
    )
}
