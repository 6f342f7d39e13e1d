//! Process-local caches with whole-cache invalidation.

use std::hash::Hash;
use std::sync::{PoisonError, RwLock};

use moka::sync::Cache;

/// A bounded `moka` cache that can be emptied in one step.
///
/// `clear` swaps in a fresh cache generation; readers holding the previous
/// generation finish against it, and every lookup after `clear` returns
/// sees the new, empty one.
///
/// Without a weigher `capacity` counts entries. With one it bounds the sum
/// of entry weights.
pub struct ClearableCache<K, V> {
    capacity: u64,
    weigher: Option<fn(&K, &V) -> u32>,
    generation: RwLock<Cache<K, V>>,
}

impl<K, V> ClearableCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new(capacity: u64) -> Self {
        Self {
            capacity,
            weigher: None,
            generation: RwLock::new(Self::build(capacity, None)),
        }
    }

    /// A cache whose total entry weight stays within `max_weight`.
    pub fn weighted(max_weight: u64, weigher: fn(&K, &V) -> u32) -> Self {
        Self {
            capacity: max_weight,
            weigher: Some(weigher),
            generation: RwLock::new(Self::build(max_weight, Some(weigher))),
        }
    }

    fn build(capacity: u64, weigher: Option<fn(&K, &V) -> u32>) -> Cache<K, V> {
        let builder = Cache::builder().max_capacity(capacity);
        match weigher {
            Some(weigher) => builder.weigher(weigher).build(),
            None => builder.build(),
        }
    }

    fn current(&self) -> Cache<K, V> {
        self.generation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.current().get(key)
    }

    pub fn insert(&self, key: K, value: V) {
        self.current().insert(key, value);
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.current().contains_key(key)
    }

    pub fn clear(&self) {
        *self.generation.write().unwrap_or_else(PoisonError::into_inner) =
            Self::build(self.capacity, self.weigher);
    }

    /// Sum of entry weights after pending evictions have run.
    pub fn weighted_size(&self) -> u64 {
        let cache = self.current();
        cache.run_pending_tasks();
        cache.weighted_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_is_immediately_visible() {
        let cache: ClearableCache<String, usize> = ClearableCache::new(8);
        cache.insert("a".into(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));
        cache.clear();
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(!cache.contains_key(&"a".to_string()));
    }

    #[test]
    fn weighted_cache_stays_within_budget_across_clear() {
        let cache: ClearableCache<u32, String> =
            ClearableCache::weighted(1_000, |_, v| v.len() as u32);
        for i in 0..20 {
            cache.insert(i, "x".repeat(200));
        }
        assert!(cache.weighted_size() <= 1_000);

        cache.clear();
        assert_eq!(cache.weighted_size(), 0);
        for i in 0..20 {
            cache.insert(i, "x".repeat(200));
        }
        assert!(cache.weighted_size() <= 1_000);
    }
}
