use anyhow::{Context, Result};
use chrono::NaiveDate;
use review_config::{Config, PathManager};
use review_models::{LanguageCode, MovieId, Review, ReviewDraft, ReviewEdit, TranslationCacheEntry};
use review_translate::{create_provider, TranslationProvider};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use crate::error::ReviewResult;
use crate::query::{validate_movie_id, validate_reviewer_name, ReviewOrdering, ReviewQueryService};
use crate::seed::load_seed_file;
use crate::storage::SnapshotStorage;
use crate::store::{LoadReport, ReviewStore, SortOrder, StoreSnapshot};
use crate::translation::{Translation, TranslationService, TranslationSettings};
use crate::translation_cache::{CacheStats, TranslationCache};

/// Counts reported by [`ReviewApi::stats`]
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStats {
    pub reviews: usize,
    pub movies: usize,
    pub cached_translations: usize,
    pub cache_capacity: Option<usize>,
    pub cache: CacheStats,
}

struct Snapshots {
    reviews: SnapshotStorage,
    translations: SnapshotStorage,
}

/// Single entry point over the review store and the translation overlay.
///
/// Built in memory with [`ReviewApi::new`], or backed by snapshot files with
/// [`ReviewApi::open`]. Snapshots are read once on open and written only by
/// [`ReviewApi::persist`]. Cached translations whose review is missing or at
/// another version are dropped on open.
pub struct ReviewApi {
    queries: Arc<ReviewQueryService>,
    cache: Arc<TranslationCache>,
    translator: TranslationService,
    snapshots: Option<Snapshots>,
}

impl ReviewApi {
    pub fn new(
        provider: Arc<dyn TranslationProvider>,
        settings: TranslationSettings,
        cache_capacity: usize,
    ) -> Self {
        let store = Arc::new(ReviewStore::new());
        let queries = Arc::new(ReviewQueryService::new(store));
        let cache = Arc::new(TranslationCache::new(cache_capacity));
        let translator = TranslationService::new(queries.clone(), cache.clone(), provider, settings);
        Self {
            queries,
            cache,
            translator,
            snapshots: None,
        }
    }

    /// Build from config, creating the configured provider and restoring snapshots
    pub async fn open(config: &Config, paths: &PathManager) -> Result<Self> {
        let provider = create_provider(&config.translation)?;
        Self::open_with_provider(config, paths, provider).await
    }

    pub async fn open_with_provider(
        config: &Config,
        paths: &PathManager,
        provider: Arc<dyn TranslationProvider>,
    ) -> Result<Self> {
        let source_language = LanguageCode::parse(&config.translation.source_language).with_context(|| {
            format!("Invalid source language {:?}", config.translation.source_language)
        })?;
        let settings = TranslationSettings {
            timeout: config.translation.timeout(),
            source_language,
        };

        let mut api = Self::new(provider, settings, config.translation.cache_capacity);
        let snapshots = Snapshots {
            reviews: SnapshotStorage::new(&paths.reviews_snapshot()),
            translations: SnapshotStorage::new(&paths.translations_snapshot()),
        };

        let store_snapshot: StoreSnapshot = snapshots.reviews.load().context("Failed to load review snapshot")?;
        let entries: Vec<TranslationCacheEntry> = snapshots
            .translations
            .load()
            .context("Failed to load translation snapshot")?;
        let store = api.queries.store().clone();
        let review_count = store.restore(store_snapshot).await;
        let entries = matching_entries(&store, entries).await;
        let entry_count = api.cache.restore(entries).await;
        info!(
            "Opened review store: {} reviews, {} cached translations",
            review_count, entry_count
        );

        api.snapshots = Some(snapshots);
        Ok(api)
    }

    pub async fn list_reviews_for_movie(&self, movie_id: MovieId) -> ReviewResult<Vec<Review>> {
        self.queries.get_reviews_for_movie(movie_id).await
    }

    pub async fn get_review(&self, movie_id: MovieId, reviewer_name: &str) -> ReviewResult<Review> {
        self.queries.get_review_by_movie_and_reviewer(movie_id, reviewer_name).await
    }

    pub async fn list_reviews_by_reviewer(&self, reviewer_name: &str) -> ReviewResult<Vec<Review>> {
        self.queries.get_reviews_by_reviewer(reviewer_name).await
    }

    pub async fn translate_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        target_language: &str,
    ) -> ReviewResult<Translation> {
        self.translator.translate(movie_id, reviewer_name, target_language).await
    }

    pub async fn list_reviews_for_movie_since(
        &self,
        movie_id: MovieId,
        after_date: NaiveDate,
    ) -> ReviewResult<Vec<Review>> {
        self.queries.get_reviews_for_movie_since(movie_id, after_date).await
    }

    pub async fn list_reviews_for_movie_above_rating(
        &self,
        movie_id: MovieId,
        min_rating: u8,
    ) -> ReviewResult<Vec<Review>> {
        self.queries.get_reviews_for_movie_above_rating(movie_id, min_rating).await
    }

    pub async fn list_reviews_for_movie_in_year(&self, movie_id: MovieId, year: i32) -> ReviewResult<Vec<Review>> {
        self.queries.get_reviews_for_movie_in_year(movie_id, year).await
    }

    pub async fn list_reviews_for_movie_ordered(
        &self,
        movie_id: MovieId,
        ordering: ReviewOrdering,
        order: SortOrder,
    ) -> ReviewResult<Vec<Review>> {
        self.queries.get_reviews_for_movie_ordered(movie_id, ordering, order).await
    }

    pub async fn submit_review(&self, draft: ReviewDraft) -> ReviewResult<Review> {
        self.queries.submit_review(draft).await
    }

    pub async fn edit_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        edit: &ReviewEdit,
    ) -> ReviewResult<Review> {
        self.queries.edit_review(movie_id, reviewer_name, edit).await
    }

    /// Delete a review together with every cached translation of it
    pub async fn remove_review(&self, movie_id: MovieId, reviewer_name: &str) -> ReviewResult<Review> {
        validate_movie_id(movie_id)?;
        validate_reviewer_name(reviewer_name)?;
        let removed = self.queries.store().remove(movie_id, reviewer_name).await?;
        let dropped = self.cache.remove_review(movie_id, reviewer_name).await;
        if dropped > 0 {
            info!("Dropped {} cached translations of removed review", dropped);
        }
        Ok(removed)
    }

    pub async fn load_initial(&self, seeds: Vec<Review>) -> LoadReport {
        self.queries.store().load_initial(seeds).await
    }

    pub async fn load_seed_file(&self, path: &Path) -> ReviewResult<LoadReport> {
        let seeds = load_seed_file(path)?;
        Ok(self.load_initial(seeds).await)
    }

    /// Write both snapshots; a no-op for an in-memory api
    pub async fn persist(&self) -> ReviewResult<()> {
        let Some(snapshots) = &self.snapshots else {
            return Ok(());
        };
        let store_snapshot = self.queries.store().snapshot().await;
        snapshots.reviews.save(&store_snapshot)?;
        let entries = self.cache.entries().await;
        snapshots.translations.save(&entries)?;
        Ok(())
    }

    /// Empty the store and the cache, and delete snapshot files
    pub async fn clear(&self) -> ReviewResult<()> {
        self.queries.store().restore(StoreSnapshot::default()).await;
        self.cache.clear().await;
        if let Some(snapshots) = &self.snapshots {
            snapshots.reviews.clear()?;
            snapshots.translations.clear()?;
        }
        Ok(())
    }

    pub async fn stats(&self) -> ApiStats {
        let store = self.queries.store();
        ApiStats {
            reviews: store.len().await,
            movies: store.movie_count().await,
            cached_translations: self.cache.len().await,
            cache_capacity: self.cache.capacity().map(|c| c.get()),
            cache: self.cache.stats(),
        }
    }
}

/// Keep only entries translated from the version of the review now stored
async fn matching_entries(store: &ReviewStore, entries: Vec<TranslationCacheEntry>) -> Vec<TranslationCacheEntry> {
    let total = entries.len();
    let mut kept = Vec::with_capacity(total);
    for entry in entries {
        if store.current_version(entry.movie_id, &entry.reviewer_name).await == Some(entry.source_version) {
            kept.push(entry);
        }
    }
    if kept.len() < total {
        info!(
            "Dropped {} cached translations that no longer match a stored review",
            total - kept.len()
        );
    }
    kept
}
