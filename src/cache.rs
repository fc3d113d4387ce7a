use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Key format for generated reports: UTC time down to microseconds.
pub const KEY_FORMAT: &str = "%Y%m%d%H%M%S%6f";

/// Largest TTL `chrono::Duration::seconds` accepts without panicking.
pub const MAX_TTL_SECS: i64 = i64::MAX / 1000;

/// Configured TTL in seconds, clamped to what `Duration` can hold.
pub fn ttl_from_secs(secs: u64) -> Duration {
    let secs = i64::try_from(secs).unwrap_or(i64::MAX).min(MAX_TTL_SECS);
    Duration::seconds(secs)
}

struct CachedReport {
    bytes: Vec<u8>,
    created_at: DateTime<Utc>,
}

/// Generated workbooks kept in memory for a limited time, keyed by the
/// moment they were stored.
pub struct ReportCache {
    ttl: Duration,
    entries: HashMap<String, CachedReport>,
}

impl ReportCache {
    pub fn new(ttl: Duration) -> Self {
        ReportCache {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn insert(&mut self, bytes: Vec<u8>) -> String {
        self.insert_at(bytes, Utc::now())
    }

    /// Store `bytes` and return their key. Keys colliding within the same
    /// microsecond get a numeric suffix.
    pub fn insert_at(&mut self, bytes: Vec<u8>, now: DateTime<Utc>) -> String {
        let base = now.format(KEY_FORMAT).to_string();
        let mut key = base.clone();
        let mut n = 1;
        while self.entries.contains_key(&key) {
            key = format!("{}-{}", base, n);
            n += 1;
        }
        debug!(key = %key, size = bytes.len(), "cached report");
        self.entries.insert(
            key.clone(),
            CachedReport {
                bytes,
                created_at: now,
            },
        );
        key
    }

    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.get_at(key, Utc::now())
    }

    /// Bytes for `key`, or `None` when unknown or older than the TTL.
    pub fn get_at(&self, key: &str, now: DateTime<Utc>) -> Option<&[u8]> {
        self.entries
            .get(key)
            .filter(|entry| now - entry.created_at <= self.ttl)
            .map(|entry| entry.bytes.as_slice())
    }

    /// Drop expired entries, returning how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.created_at <= ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// File name offered when a cached report is downloaded.
pub fn report_file_name(key: &str) -> String {
    format!("summary_{}.xlsx", key)
}
