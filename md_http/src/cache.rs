use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use time::OffsetDateTime;
use tracing::debug;
use tracing::warn;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid cache key: {0:?}")]
    InvalidKey(String),
}

/// On-disk layout of one entry: `{"data": ..., "timestamp": <unix ms>}`
#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    timestamp: i64,
}

/// Small key-value cache of JSON documents with a per-read expiry
///
/// Each key maps to one file in the cache directory. Entries older than the
/// `ttl` given at read time, unreadable or undecodable ones count as misses.
#[derive(Debug, Clone)]
pub struct JsonCache {
    dir: PathBuf,
}

impl JsonCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        self.get_at(key, ttl, now_millis())
    }

    pub fn put<T: Serialize>(&self, key: &str, data: &T) -> Result<(), CacheError> {
        self.put_at(key, data, now_millis())
    }

    pub fn remove(&self, key: &str) -> Result<(), CacheError> {
        match fs::remove_file(self.path(key)?) {
            Err(err) if err.kind() != std::io::ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }

    fn get_at<T: DeserializeOwned>(&self, key: &str, ttl: Duration, now_ms: i64) -> Option<T> {
        let path = self.path(key).ok()?;
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!(key, "cache miss");
                return None;
            }
        };

        let envelope: Envelope<T> = match serde_json::from_slice(&raw) {
            Ok(envelope) => envelope,
            Err(err) => {
                warn!(key, "discarding unreadable cache entry: {err}");
                return None;
            }
        };

        let age_ms = now_ms.saturating_sub(envelope.timestamp);
        if age_ms < 0 || age_ms as u128 >= ttl.as_millis() {
            debug!(key, age_ms, "cache entry expired");
            return None;
        }

        debug!(key, age_ms, "cache hit");
        Some(envelope.data)
    }

    fn put_at<T: Serialize>(&self, key: &str, data: &T, now_ms: i64) -> Result<(), CacheError> {
        let path = self.path(key)?;
        fs::create_dir_all(&self.dir)?;

        // Write-then-rename so a concurrent reader never sees a torn file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(&Envelope { data, timestamp: now_ms })?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn path(&self, key: &str) -> Result<PathBuf, CacheError> {
        let valid = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(CacheError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn now_millis() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
