//! Time-to-live cache with an injectable clock.
//!
//! Entries expire `ttl` after insertion. Time comes from a [`Clock`] so tests
//! can drive expiry with [`ManualClock`] instead of sleeping.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Monotonic time source.
pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary fixed origin.
    fn now(&self) -> Duration;
}

/// Wall-clock time measured from construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Starts a clock at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Hand-advanced clock for tests.
#[derive(Debug, Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    /// Creates a clock at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let millis = u64::try_from(by.as_millis()).unwrap_or(u64::MAX);
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    inserted_at: Duration,
}

/// Keyed cache whose entries expire after a fixed time-to-live.
pub struct TtlCache<K, V, C: Clock = SystemClock> {
    ttl: Duration,
    clock: Arc<C>,
    entries: HashMap<K, Entry<V>>,
}

impl<K, V, C> TtlCache<K, V, C>
where
    K: Eq + Hash,
    V: Clone,
    C: Clock,
{
    /// Creates an empty cache reading time from `clock`.
    pub fn new(ttl: Duration, clock: Arc<C>) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Time-to-live applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a fresh entry, or `None` when missing or expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let entry = self.entries.get(key)?;
        self.is_fresh(entry).then(|| entry.value.clone())
    }

    /// Stores a value, replacing any previous entry for the key.
    pub fn insert(&mut self, key: K, value: V) {
        let inserted_at = self.clock.now();
        self.entries.insert(key, Entry { value, inserted_at });
    }

    /// Returns the cached value or computes, stores and returns a new one.
    ///
    /// A failed computation leaves the cache unchanged.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: K, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drops one entry.
    pub fn invalidate(&mut self, key: &K) {
        self.entries.remove(key);
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drops expired entries.
    pub fn purge_expired(&mut self) {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, entry| now.saturating_sub(entry.inserted_at) < ttl);
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn is_fresh(&self, entry: &Entry<V>) -> bool {
        self.clock.now().saturating_sub(entry.inserted_at) < self.ttl
    }
}

impl<K, V, C: Clock> std::fmt::Debug for TtlCache<K, V, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(ttl_secs: u64) -> (TtlCache<&'static str, u32, ManualClock>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        (
            TtlCache::new(Duration::from_secs(ttl_secs), Arc::clone(&clock)),
            clock,
        )
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (mut cache, clock) = cache(900);
        cache.insert("curve", 1);

        clock.advance(Duration::from_secs(899));
        assert_eq!(cache.get(&"curve"), Some(1));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get(&"curve"), None);
    }

    #[test]
    fn test_get_or_try_insert_with_computes_once() {
        let (mut cache, clock) = cache(60);
        let mut calls = 0;

        for _ in 0..3 {
            let value: Result<u32, ()> = cache.get_or_try_insert_with("k", || {
                calls += 1;
                Ok(7)
            });
            assert_eq!(value, Ok(7));
        }
        assert_eq!(calls, 1);

        clock.advance(Duration::from_secs(61));
        let _ = cache.get_or_try_insert_with("k", || -> Result<u32, ()> {
            calls += 1;
            Ok(8)
        });
        assert_eq!(calls, 2);
        assert_eq!(cache.get(&"k"), Some(8));
    }

    #[test]
    fn test_failed_compute_is_not_cached() {
        let (mut cache, _clock) = cache(60);
        let result: Result<u32, &str> = cache.get_or_try_insert_with("k", || Err("boom"));
        assert_eq!(result, Err("boom"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_invalidate_and_purge() {
        let (mut cache, clock) = cache(10);
        cache.insert("a", 1);
        clock.advance(Duration::from_secs(5));
        cache.insert("b", 2);

        cache.invalidate(&"b");
        assert_eq!(cache.len(), 1);

        cache.insert("b", 2);
        clock.advance(Duration::from_secs(6));
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"b"), Some(2));

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
