use chrono::NaiveDate;
use review_models::{MovieId, Review, ReviewKey, SEED_VERSION};
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use crate::error::{ReviewError, ReviewResult};

/// Direction of an ordered listing.
///
/// `Descending` is the exact reverse of the ascending total order, tie-break included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }
}

/// Outcome of a bulk seed load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub inserted: usize,
    /// Key already stored (by an earlier load or a user edit), left untouched
    pub already_present: usize,
    /// Key repeated inside the same seed set; first occurrence wins
    pub duplicates: usize,
}

/// Last version a removed review reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetiredVersion {
    pub movie_id: MovieId,
    pub reviewer_name: String,
    pub version: u64,
}

/// Persistent image of the store: live reviews plus the version
/// high-water marks of removed keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub reviews: Vec<Review>,
    pub retired: Vec<RetiredVersion>,
}

/// All reviews of one movie, with its two local secondary orderings.
///
/// Every index points at the same `Arc<Review>` so a review is stored once.
#[derive(Default)]
struct MoviePartition {
    /// Primary ordering: reviewer name
    by_reviewer: BTreeMap<String, Arc<Review>>,
    by_date: BTreeMap<(NaiveDate, String), Arc<Review>>,
    by_rating: BTreeMap<(u8, String), Arc<Review>>,
}

impl MoviePartition {
    fn insert(&mut self, review: Arc<Review>) {
        let name = review.reviewer_name.clone();
        if let Some(previous) = self.by_reviewer.insert(name.clone(), review.clone()) {
            self.by_date.remove(&(previous.review_date, name.clone()));
            self.by_rating.remove(&(previous.rating, name.clone()));
        }
        self.by_date.insert((review.review_date, name.clone()), review.clone());
        self.by_rating.insert((review.rating, name), review);
    }

    fn remove(&mut self, reviewer_name: &str) -> Option<Arc<Review>> {
        let removed = self.by_reviewer.remove(reviewer_name)?;
        self.by_date.remove(&(removed.review_date, reviewer_name.to_string()));
        self.by_rating.remove(&(removed.rating, reviewer_name.to_string()));
        Some(removed)
    }

    fn is_empty(&self) -> bool {
        self.by_reviewer.is_empty()
    }
}

#[derive(Default)]
struct StoreIndexes {
    movies: BTreeMap<MovieId, MoviePartition>,
    /// Reviewer name -> movie id -> review
    by_reviewer: BTreeMap<String, BTreeMap<MovieId, Arc<Review>>>,
    /// Highest version of keys that were removed; a recreated review continues above it
    retired: BTreeMap<ReviewKey, u64>,
    len: usize,
}

impl StoreIndexes {
    fn get(&self, movie_id: MovieId, reviewer_name: &str) -> Option<&Arc<Review>> {
        self.movies.get(&movie_id)?.by_reviewer.get(reviewer_name)
    }

    /// Live version, or the high-water mark of a removed key
    fn latest_version(&self, movie_id: MovieId, reviewer_name: &str) -> Option<u64> {
        match self.get(movie_id, reviewer_name) {
            Some(review) => Some(review.version),
            None => self.retired.get(&(movie_id, reviewer_name.to_string())).copied(),
        }
    }

    /// Insert or replace without any version check
    fn insert(&mut self, review: Review) {
        self.retired.remove(&review.key());
        let review = Arc::new(review);
        let partition = self.movies.entry(review.movie_id).or_default();
        if !partition.by_reviewer.contains_key(&review.reviewer_name) {
            self.len += 1;
        }
        partition.insert(review.clone());
        self.by_reviewer
            .entry(review.reviewer_name.clone())
            .or_default()
            .insert(review.movie_id, review);
    }

    fn remove(&mut self, movie_id: MovieId, reviewer_name: &str) -> Option<Arc<Review>> {
        let partition = self.movies.get_mut(&movie_id)?;
        let removed = partition.remove(reviewer_name)?;
        if partition.is_empty() {
            self.movies.remove(&movie_id);
        }
        if let Entry::Occupied(mut movies) = self.by_reviewer.entry(reviewer_name.to_string()) {
            movies.get_mut().remove(&movie_id);
            if movies.get().is_empty() {
                movies.remove();
            }
        }
        self.len -= 1;
        let mark = self.retired.entry((movie_id, reviewer_name.to_string())).or_insert(0);
        *mark = (*mark).max(removed.version);
        Some(removed)
    }
}

/// In-memory review table keyed by `(movie_id, reviewer_name)` with by-date,
/// by-rating and by-reviewer orderings.
///
/// Reads share a read lock; every write (including the version comparison
/// that guards it) happens under the single write lock, so two writers can
/// never both install the same version of a review.
pub struct ReviewStore {
    inner: RwLock<StoreIndexes>,
}

impl ReviewStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreIndexes::default()),
        }
    }

    /// Insert or overwrite a review.
    ///
    /// The write needs a strictly greater `version` than the stored one (or
    /// than the last version of a removed key), otherwise it is rejected
    /// with `ReviewError::Conflict`.
    pub async fn put(&self, review: Review) -> ReviewResult<()> {
        let mut inner = self.inner.write().await;
        if let Some(latest) = inner.latest_version(review.movie_id, &review.reviewer_name) {
            if review.version <= latest {
                return Err(ReviewError::Conflict {
                    movie_id: review.movie_id,
                    reviewer_name: review.reviewer_name.clone(),
                    current_version: latest,
                    attempted_version: review.version,
                });
            }
        }
        debug!(
            "Store put: movie {} reviewer {:?} version {}",
            review.movie_id, review.reviewer_name, review.version
        );
        inner.insert(review);
        Ok(())
    }

    pub async fn get_by_key(&self, movie_id: MovieId, reviewer_name: &str) -> ReviewResult<Review> {
        let inner = self.inner.read().await;
        inner
            .get(movie_id, reviewer_name)
            .map(|review| (**review).clone())
            .ok_or_else(|| ReviewError::not_found(movie_id, reviewer_name))
    }

    /// Version of the live review, `None` when absent
    pub async fn current_version(&self, movie_id: MovieId, reviewer_name: &str) -> Option<u64> {
        let inner = self.inner.read().await;
        inner.get(movie_id, reviewer_name).map(|review| review.version)
    }

    /// Highest version the key has ever held, live or removed
    pub async fn latest_version(&self, movie_id: MovieId, reviewer_name: &str) -> Option<u64> {
        self.inner.read().await.latest_version(movie_id, reviewer_name)
    }

    /// Reviews of a movie in primary-key order (reviewer name)
    pub async fn list_by_movie(&self, movie_id: MovieId) -> Vec<Review> {
        let inner = self.inner.read().await;
        inner
            .movies
            .get(&movie_id)
            .map(|partition| collect(partition.by_reviewer.values(), SortOrder::Ascending))
            .unwrap_or_default()
    }

    /// Reviews of a movie ordered by review date, ties broken by reviewer name
    pub async fn list_by_movie_ordered_by_date(&self, movie_id: MovieId, order: SortOrder) -> Vec<Review> {
        let inner = self.inner.read().await;
        inner
            .movies
            .get(&movie_id)
            .map(|partition| collect(partition.by_date.values(), order))
            .unwrap_or_default()
    }

    /// Reviews of a movie ordered by rating, ties broken by reviewer name
    pub async fn list_by_movie_ordered_by_rating(&self, movie_id: MovieId, order: SortOrder) -> Vec<Review> {
        let inner = self.inner.read().await;
        inner
            .movies
            .get(&movie_id)
            .map(|partition| collect(partition.by_rating.values(), order))
            .unwrap_or_default()
    }

    /// Reviews written by one reviewer across all movies, ordered by movie id
    pub async fn list_by_reviewer(&self, reviewer_name: &str) -> Vec<Review> {
        let inner = self.inner.read().await;
        inner
            .by_reviewer
            .get(reviewer_name)
            .map(|movies| collect(movies.values(), SortOrder::Ascending))
            .unwrap_or_default()
    }

    /// Populate the store from seed data.
    ///
    /// Idempotent: a seed is written only when its key is absent, so
    /// re-running the same seed set is a no-op and reviews edited by users
    /// are never overwritten. Seeds get `SEED_VERSION`, or the next version
    /// after a removed review with the same key.
    pub async fn load_initial<I>(&self, seeds: I) -> LoadReport
    where
        I: IntoIterator<Item = Review>,
    {
        let mut report = LoadReport::default();
        let mut seen = std::collections::HashSet::new();
        let mut inner = self.inner.write().await;

        for mut seed in seeds {
            if !seen.insert(seed.key()) {
                warn!(
                    "Seed data repeats movie {} reviewer {:?}; keeping the first record",
                    seed.movie_id, seed.reviewer_name
                );
                report.duplicates += 1;
                continue;
            }
            if inner.get(seed.movie_id, &seed.reviewer_name).is_some() {
                report.already_present += 1;
                continue;
            }
            seed.version = inner
                .retired
                .get(&seed.key())
                .map_or(SEED_VERSION, |retired| retired + 1);
            inner.insert(seed);
            report.inserted += 1;
        }

        info!(
            "Loaded seed reviews: {} inserted, {} already present, {} duplicates",
            report.inserted, report.already_present, report.duplicates
        );
        report
    }

    /// Remove a review and all of its index entries
    pub async fn remove(&self, movie_id: MovieId, reviewer_name: &str) -> ReviewResult<Review> {
        let mut inner = self.inner.write().await;
        let removed = inner
            .remove(movie_id, reviewer_name)
            .ok_or_else(|| ReviewError::not_found(movie_id, reviewer_name))?;
        info!("Removed review: movie {} reviewer {:?}", movie_id, reviewer_name);
        Ok((*removed).clone())
    }

    /// All reviews in primary-key order, plus removed-key versions (for persistence)
    pub async fn snapshot(&self) -> StoreSnapshot {
        let inner = self.inner.read().await;
        let reviews = inner
            .movies
            .values()
            .flat_map(|partition| partition.by_reviewer.values())
            .map(|review| (**review).clone())
            .collect();
        let retired = inner
            .retired
            .iter()
            .map(|((movie_id, reviewer_name), version)| RetiredVersion {
                movie_id: *movie_id,
                reviewer_name: reviewer_name.clone(),
                version: *version,
            })
            .collect();
        StoreSnapshot { reviews, retired }
    }

    /// Replace the store contents with a snapshot, keeping stored versions.
    /// Returns the number of live reviews.
    pub async fn restore(&self, snapshot: StoreSnapshot) -> usize {
        let mut indexes = StoreIndexes::default();
        for review in snapshot.reviews {
            indexes.insert(review);
        }
        for retired in snapshot.retired {
            if indexes.get(retired.movie_id, &retired.reviewer_name).is_none() {
                indexes
                    .retired
                    .insert((retired.movie_id, retired.reviewer_name), retired.version);
            }
        }
        let count = indexes.len;
        *self.inner.write().await = indexes;
        count
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    pub async fn movie_count(&self) -> usize {
        self.inner.read().await.movies.len()
    }
}

impl Default for ReviewStore {
    fn default() -> Self {
        Self::new()
    }
}

fn collect<'a, I>(reviews: I, order: SortOrder) -> Vec<Review>
where
    I: DoubleEndedIterator<Item = &'a Arc<Review>>,
{
    match order {
        SortOrder::Ascending => reviews.map(|r| (**r).clone()).collect(),
        SortOrder::Descending => reviews.rev().map(|r| (**r).clone()).collect(),
    }
}
