//! Token estimation via tiktoken's `cl100k_base`, with a length fallback.

use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

use crate::cache::ClearableCache;

static CL100K: LazyLock<Option<CoreBPE>> = LazyLock::new(|| match tiktoken_rs::cl100k_base() {
    Ok(bpe) => Some(bpe),
    Err(e) => {
        tracing::warn!(error = %e, "cl100k_base tokenizer unavailable, using length heuristic");
        None
    }
});

/// Deterministic fallback: one token per four characters, rounded up.
pub fn heuristic_tokens(text: &str) -> usize {
    text.chars().count().div_ceil(4)
}

/// Token counter preferring the subword tokenizer.
///
/// Accurate counts are cached per blake3 content hash.
pub struct TokenEstimator {
    accurate: bool,
    cache: ClearableCache<String, usize>,
}

impl TokenEstimator {
    pub fn new(accurate: bool, cache_capacity: u64) -> Self {
        Self {
            accurate,
            cache: ClearableCache::new(cache_capacity),
        }
    }

    pub fn estimate(&self, text: &str) -> usize {
        if text.is_empty() {
            return 0;
        }
        if self.accurate {
            if let Some(count) = self.count_accurate(text) {
                return count;
            }
        }
        heuristic_tokens(text)
    }

    fn count_accurate(&self, text: &str) -> Option<usize> {
        let bpe = CL100K.as_ref()?;
        let hash = blake3::hash(text.as_bytes()).to_hex().to_string();
        if let Some(hit) = self.cache.get(&hash) {
            return Some(hit);
        }
        let count = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            bpe.encode_ordinary(text).len()
        }))
        .ok()?;
        self.cache.insert(hash, count);
        Some(count)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }
}
