//! Registry cache: per-user ranked action lists with TTL expiry
//!
//! Cache-aside. The engine reads, falls through to the corpus service on a
//! miss and writes back. When the corpus service is down, the
//! [`StalePolicy`] decides whether an expired entry may still be served.

use crate::types::{ActionMode, RankedAction};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub user_id: String,
    pub mode: ActionMode,
    pub window_days: u32,
}

impl CacheKey {
    pub fn new(user_id: impl Into<String>, mode: ActionMode, window_days: u32) -> Self {
        Self {
            user_id: user_id.into(),
            mode,
            window_days,
        }
    }
}

/// A ranked list together with the corpus facts it was computed from
#[derive(Debug, Clone)]
pub struct CachedRegistry {
    pub actions: Vec<RankedAction>,
    pub corpus_size: u64,
    pub actions_filtered: usize,
    pub personalization_applied: bool,
    pub created_at: Instant,
}

impl CachedRegistry {
    pub fn new(
        actions: Vec<RankedAction>,
        corpus_size: u64,
        actions_filtered: usize,
        personalization_applied: bool,
    ) -> Self {
        Self {
            actions,
            corpus_size,
            actions_filtered,
            personalization_applied,
            created_at: Instant::now(),
        }
    }

    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}

/// What to do with expired entries when the corpus service can't be reached
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalePolicy {
    /// Expired entries are never served
    Never,
    /// Expired entries younger than this may be served on upstream failure
    ServeStaleFor(Duration),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub stale_served: u64,
    pub ttl_secs: u64,
}

pub struct RegistryCache {
    entries: RwLock<HashMap<CacheKey, CachedRegistry>>,
    ttl: Duration,
    stale_policy: StalePolicy,
    hits: AtomicU64,
    misses: AtomicU64,
    invalidations: AtomicU64,
    stale_served: AtomicU64,
}

impl RegistryCache {
    pub fn new(ttl: Duration, stale_policy: StalePolicy) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            stale_policy,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            invalidations: AtomicU64::new(0),
            stale_served: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // A poisoned lock only means a writer panicked mid-insert; the map itself is still usable.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CachedRegistry>> {
        self.entries.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CachedRegistry>> {
        self.entries.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Fresh entry for the key, if any
    pub fn get(&self, key: &CacheKey) -> Option<CachedRegistry> {
        let found = self.read().get(key).filter(|entry| entry.age() < self.ttl).cloned();
        match found {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!("Registry cache hit for {} ({:?})", key.user_id, key.mode);
                Some(entry)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Expired-but-tolerable entry, for use when the corpus service failed
    pub fn get_stale(&self, key: &CacheKey) -> Option<CachedRegistry> {
        let StalePolicy::ServeStaleFor(max_stale) = self.stale_policy else {
            return None;
        };
        let found = self.read().get(key).filter(|entry| entry.age() < max_stale).cloned();
        if found.is_some() {
            self.stale_served.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Store an entry (last write wins) and drop entries past any useful age
    pub fn insert(&self, key: CacheKey, value: CachedRegistry) {
        let retention = match self.stale_policy {
            StalePolicy::Never => self.ttl,
            StalePolicy::ServeStaleFor(max_stale) => max_stale.max(self.ttl),
        };
        let mut entries = self.write();
        entries.retain(|_, entry| entry.age() < retention);
        entries.insert(key, value);
    }

    /// Remove every entry of one user, across modes and windows
    pub fn invalidate_user(&self, user_id: &str) -> usize {
        let mut entries = self.write();
        let before = entries.len();
        entries.retain(|key, _| key.user_id != user_id);
        let removed = before - entries.len();
        self.invalidations.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn clear(&self) -> usize {
        let mut entries = self.write();
        let removed = entries.len();
        entries.clear();
        self.invalidations.fetch_add(removed as u64, Ordering::Relaxed);
        removed
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.read().len(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
            stale_served: self.stale_served.load(Ordering::Relaxed),
            ttl_secs: self.ttl.as_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(corpus_size: u64) -> CachedRegistry {
        CachedRegistry::new(vec![], corpus_size, 0, true)
    }

    fn key(user: &str) -> CacheKey {
        CacheKey::new(user, ActionMode::Mail, 30)
    }

    #[test]
    fn test_hit_after_insert() {
        let cache = RegistryCache::new(Duration::from_secs(60), StalePolicy::Never);
        assert!(cache.get(&key("u1")).is_none());
        cache.insert(key("u1"), entry(42));
        assert_eq!(cache.get(&key("u1")).unwrap().corpus_size, 42);
        assert_eq!(cache.get(&key("u1")).unwrap().corpus_size, 42);

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.entries), (2, 1, 1));
    }

    #[test]
    fn test_key_includes_mode_and_window() {
        let cache = RegistryCache::new(Duration::from_secs(60), StalePolicy::Never);
        cache.insert(key("u1"), entry(1));
        assert!(cache.get(&CacheKey::new("u1", ActionMode::Ads, 30)).is_none());
        assert!(cache.get(&CacheKey::new("u1", ActionMode::Mail, 7)).is_none());
    }

    #[test]
    fn test_expired_entries_are_not_served() {
        let cache = RegistryCache::new(Duration::ZERO, StalePolicy::Never);
        cache.insert(key("u1"), entry(1));
        assert!(cache.get(&key("u1")).is_none());
        assert!(cache.get_stale(&key("u1")).is_none());
    }

    #[test]
    fn test_stale_entry_served_within_policy() {
        let policy = StalePolicy::ServeStaleFor(Duration::from_secs(60));
        let cache = RegistryCache::new(Duration::ZERO, policy);
        cache.insert(key("u1"), entry(7));
        assert!(cache.get(&key("u1")).is_none());
        assert_eq!(cache.get_stale(&key("u1")).unwrap().corpus_size, 7);
        assert_eq!(cache.stats().stale_served, 1);
    }

    #[test]
    fn test_invalidate_user_removes_all_modes() {
        let cache = RegistryCache::new(Duration::from_secs(60), StalePolicy::Never);
        cache.insert(key("u1"), entry(1));
        cache.insert(CacheKey::new("u1", ActionMode::Ads, 30), entry(1));
        cache.insert(key("u2"), entry(2));

        assert_eq!(cache.invalidate_user("u1"), 2);
        assert!(cache.get(&key("u1")).is_none());
        assert!(cache.get(&key("u2")).is_some());
        assert_eq!(cache.clear(), 1);
        assert_eq!(cache.stats().entries, 0);
        assert_eq!(cache.stats().invalidations, 3);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = RegistryCache::new(Duration::from_secs(60), StalePolicy::Never);
        cache.insert(key("u1"), entry(1));
        cache.insert(key("u1"), entry(2));
        assert_eq!(cache.get(&key("u1")).unwrap().corpus_size, 2);
        assert_eq!(cache.stats().entries, 1);
    }
}
