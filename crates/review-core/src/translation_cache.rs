use lru::LruCache;
use review_models::{LanguageCode, MovieId, TranslationCacheEntry};
use serde::Serialize;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// `(movie_id, reviewer_name, target_language)`
type CacheKey = (MovieId, String, LanguageCode);

#[derive(Debug, Clone)]
struct CachedTranslation {
    text: String,
    source_version: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub stale: u64,
    pub evictions: u64,
}

/// Translated review text keyed by review and target language.
///
/// An entry only counts as a hit while its `source_version` matches the
/// review version the caller passes in. Writes are unconditional
/// (last writer wins). When bounded, inserting past capacity evicts the
/// least recently used entry; hits refresh recency.
pub struct TranslationCache {
    entries: Mutex<LruCache<CacheKey, CachedTranslation>>,
    capacity: Option<NonZeroUsize>,
    hits: AtomicU64,
    misses: AtomicU64,
    stale: AtomicU64,
    evictions: AtomicU64,
}

impl TranslationCache {
    /// Capacity of 0 means unbounded
    pub fn new(capacity: usize) -> Self {
        match NonZeroUsize::new(capacity) {
            Some(capacity) => Self::bounded(capacity),
            None => Self::unbounded(),
        }
    }

    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self::with_lru(LruCache::new(capacity), Some(capacity))
    }

    pub fn unbounded() -> Self {
        Self::with_lru(LruCache::unbounded(), None)
    }

    fn with_lru(lru: LruCache<CacheKey, CachedTranslation>, capacity: Option<NonZeroUsize>) -> Self {
        Self {
            entries: Mutex::new(lru),
            capacity,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            stale: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    pub fn capacity(&self) -> Option<NonZeroUsize> {
        self.capacity
    }

    /// Cached text for the review at `current_source_version`, if any.
    ///
    /// A stale entry (older source version) is dropped and reported as a miss.
    pub async fn get(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        target_language: &LanguageCode,
        current_source_version: u64,
    ) -> Option<String> {
        let key = (movie_id, reviewer_name.to_string(), target_language.clone());
        let mut entries = self.entries.lock().await;

        let cached_version = match entries.peek(&key) {
            Some(cached) => cached.source_version,
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                debug!("Translation cache miss: movie {} reviewer {:?} [{}]", movie_id, reviewer_name, target_language);
                return None;
            }
        };

        if cached_version != current_source_version {
            entries.pop(&key);
            self.stale.fetch_add(1, Ordering::Relaxed);
            self.misses.fetch_add(1, Ordering::Relaxed);
            debug!(
                "Translation cache stale: movie {} reviewer {:?} [{}] cached v{} current v{}",
                movie_id, reviewer_name, target_language, cached_version, current_source_version
            );
            return None;
        }

        self.hits.fetch_add(1, Ordering::Relaxed);
        debug!("Translation cache hit: movie {} reviewer {:?} [{}]", movie_id, reviewer_name, target_language);
        entries.get(&key).map(|cached| cached.text.clone())
    }

    /// Like `get`, but leaves counters, recency and stale entries untouched
    pub async fn peek(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        target_language: &LanguageCode,
        current_source_version: u64,
    ) -> Option<String> {
        let key = (movie_id, reviewer_name.to_string(), target_language.clone());
        let entries = self.entries.lock().await;
        entries
            .peek(&key)
            .filter(|cached| cached.source_version == current_source_version)
            .map(|cached| cached.text.clone())
    }

    pub async fn put(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        target_language: &LanguageCode,
        text: String,
        source_version: u64,
    ) {
        let key = (movie_id, reviewer_name.to_string(), target_language.clone());
        let mut entries = self.entries.lock().await;
        self.insert_locked(&mut entries, key, CachedTranslation { text, source_version });
    }

    fn insert_locked(
        &self,
        entries: &mut LruCache<CacheKey, CachedTranslation>,
        key: CacheKey,
        value: CachedTranslation,
    ) {
        // `push` hands back either the replaced value for this key or the evicted LRU entry
        if let Some((pushed_out, _)) = entries.push(key.clone(), value) {
            if pushed_out != key {
                self.evictions.fetch_add(1, Ordering::Relaxed);
                debug!(
                    "Translation cache evicted: movie {} reviewer {:?} [{}]",
                    pushed_out.0, pushed_out.1, pushed_out.2
                );
            }
        }
    }

    /// Drop every cached language of one review; returns how many were removed
    pub async fn remove_review(&self, movie_id: MovieId, reviewer_name: &str) -> usize {
        let mut entries = self.entries.lock().await;
        let keys: Vec<CacheKey> = entries
            .iter()
            .filter(|(key, _)| key.0 == movie_id && key.1 == reviewer_name)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &keys {
            entries.pop(key);
        }
        keys.len()
    }

    /// All entries from least to most recently used
    pub async fn entries(&self) -> Vec<TranslationCacheEntry> {
        let entries = self.entries.lock().await;
        let mut list: Vec<TranslationCacheEntry> = entries
            .iter()
            .map(|(key, cached)| TranslationCacheEntry {
                movie_id: key.0,
                reviewer_name: key.1.clone(),
                target_language: key.2.clone(),
                translated_text: cached.text.clone(),
                source_version: cached.source_version,
            })
            .collect();
        // `iter` walks most recent first
        list.reverse();
        list
    }

    /// Re-insert entries in the order given (least recently used first)
    pub async fn restore(&self, restored: Vec<TranslationCacheEntry>) -> usize {
        let mut entries = self.entries.lock().await;
        entries.clear();
        for entry in restored {
            let key = (entry.movie_id, entry.reviewer_name, entry.target_language);
            let value = CachedTranslation {
                text: entry.translated_text,
                source_version: entry.source_version,
            };
            self.insert_locked(&mut entries, key, value);
        }
        entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            stale: self.stale.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }
}
