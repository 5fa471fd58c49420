use futures::future::{BoxFuture, FutureExt, Shared};
use review_models::{LanguageCode, MovieId, Review};
use review_translate::{ProviderError, TranslationProvider};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use crate::error::{ReviewError, ReviewResult};
use crate::query::ReviewQueryService;
use crate::store::ReviewStore;
use crate::translation_cache::TranslationCache;

/// `(movie_id, reviewer_name, target_language, source_version)`
type FlightKey = (MovieId, String, LanguageCode, u64);

/// One provider call, awaited by every caller that asked for the same key
type Flight = Shared<BoxFuture<'static, Result<String, ProviderError>>>;

type FlightRegistry = Arc<Mutex<HashMap<FlightKey, Flight>>>;

/// Where a translation result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TranslationOrigin {
    /// Served from the translation cache
    Cache,
    /// This request triggered the provider call
    Provider,
    /// Joined a provider call already in flight for the same key
    Shared,
    /// Target is the source language; content returned as is
    Passthrough,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub movie_id: MovieId,
    pub reviewer_name: String,
    pub target_language: LanguageCode,
    pub text: String,
    pub source_version: u64,
    pub origin: TranslationOrigin,
}

#[derive(Debug, Clone)]
pub struct TranslationSettings {
    pub timeout: Duration,
    pub source_language: LanguageCode,
}

enum FlightJoin {
    /// Another flight finished and cached the text between our cache check and registry lookup
    Cached(String),
    Joined(Flight),
    Started(Flight),
}

/// Resolves a review, serves cached translations, and collapses concurrent
/// identical provider calls into one.
///
/// Request states: resolving -> cache check -> (hit | provider call -> cache put).
/// The provider call runs in its own task so it completes (or times out)
/// even when every waiting caller has gone away; that task writes the cache
/// on success, provided the review still holds the translated version, and
/// always clears its registry entry, so a failure is shared only with
/// callers that were already waiting.
pub struct TranslationService {
    queries: Arc<ReviewQueryService>,
    cache: Arc<TranslationCache>,
    provider: Arc<dyn TranslationProvider>,
    in_flight: FlightRegistry,
    settings: TranslationSettings,
}

impl TranslationService {
    pub fn new(
        queries: Arc<ReviewQueryService>,
        cache: Arc<TranslationCache>,
        provider: Arc<dyn TranslationProvider>,
        settings: TranslationSettings,
    ) -> Self {
        Self {
            queries,
            cache,
            provider,
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            settings,
        }
    }

    pub fn cache(&self) -> &Arc<TranslationCache> {
        &self.cache
    }

    pub async fn translate(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        target_language: &str,
    ) -> ReviewResult<Translation> {
        let target = LanguageCode::parse(target_language).ok_or_else(|| {
            ReviewError::validation(format!("invalid target language: {:?}", target_language))
        })?;

        let review = self
            .queries
            .get_review_by_movie_and_reviewer(movie_id, reviewer_name)
            .await?;

        if target.primary() == self.settings.source_language.primary() {
            return Ok(translation(&review, target, review.content.clone(), TranslationOrigin::Passthrough));
        }

        if let Some(text) = self
            .cache
            .get(review.movie_id, &review.reviewer_name, &target, review.version)
            .await
        {
            return Ok(translation(&review, target, text, TranslationOrigin::Cache));
        }

        let (flight, origin) = match self.join_or_start_flight(&review, &target).await {
            FlightJoin::Cached(text) => {
                return Ok(translation(&review, target, text, TranslationOrigin::Cache));
            }
            FlightJoin::Joined(flight) => (flight, TranslationOrigin::Shared),
            FlightJoin::Started(flight) => (flight, TranslationOrigin::Provider),
        };

        let text = flight.await?;
        Ok(translation(&review, target, text, origin))
    }

    /// Number of provider calls currently in flight
    pub async fn in_flight_count(&self) -> usize {
        self.in_flight.lock().await.len()
    }

    async fn join_or_start_flight(&self, review: &Review, target: &LanguageCode) -> FlightJoin {
        let key: FlightKey = (
            review.movie_id,
            review.reviewer_name.clone(),
            target.clone(),
            review.version,
        );

        let mut in_flight = self.in_flight.lock().await;
        if let Some(flight) = in_flight.get(&key) {
            debug!(
                "Joining in-flight translation: movie {} reviewer {:?} [{}] v{}",
                key.0, key.1, key.2, key.3
            );
            return FlightJoin::Joined(flight.clone());
        }

        // A flight writes the cache before it leaves the registry, so a
        // second look under the registry lock cannot miss a finished call.
        // `peek` keeps this from counting the same miss twice.
        if let Some(text) = self
            .cache
            .peek(review.movie_id, &review.reviewer_name, target, review.version)
            .await
        {
            return FlightJoin::Cached(text);
        }

        info!(
            "Calling {} for movie {} reviewer {:?} [{}] v{}",
            self.provider.provider_name(),
            key.0,
            key.1,
            key.2,
            key.3
        );

        let handle = tokio::spawn(run_flight(
            self.provider.clone(),
            self.queries.store().clone(),
            self.cache.clone(),
            self.in_flight.clone(),
            key.clone(),
            review.content.clone(),
            self.settings.timeout,
        ));
        let flight: Flight = async move {
            handle
                .await
                .unwrap_or_else(|e| Err(ProviderError::failure(format!("translation task failed: {}", e))))
        }
        .boxed()
        .shared();

        in_flight.insert(key, flight.clone());
        FlightJoin::Started(flight)
    }
}

async fn run_flight(
    provider: Arc<dyn TranslationProvider>,
    store: Arc<ReviewStore>,
    cache: Arc<TranslationCache>,
    registry: FlightRegistry,
    key: FlightKey,
    content: String,
    timeout: Duration,
) -> Result<String, ProviderError> {
    let (movie_id, reviewer_name, target, version) = &key;

    let outcome = match tokio::time::timeout(timeout, provider.translate(&content, target)).await {
        Ok(result) => result,
        Err(_) => Err(ProviderError::timeout(format!(
            "{} did not respond within {:?}",
            provider.provider_name(),
            timeout
        ))),
    };

    match &outcome {
        Ok(text) => {
            // The review may have been edited or removed while the provider worked
            if store.current_version(*movie_id, reviewer_name).await == Some(*version) {
                cache.put(*movie_id, reviewer_name, target, text.clone(), *version).await;
            } else {
                debug!(
                    "Not caching translation of movie {} reviewer {:?} [{}]: v{} is no longer current",
                    movie_id, reviewer_name, target, version
                );
            }
        }
        Err(e) => {
            warn!(
                "Translation failed for movie {} reviewer {:?} [{}]: {}",
                movie_id, reviewer_name, target, e
            );
        }
    }

    registry.lock().await.remove(&key);
    outcome
}

fn translation(review: &Review, target: LanguageCode, text: String, origin: TranslationOrigin) -> Translation {
    Translation {
        movie_id: review.movie_id,
        reviewer_name: review.reviewer_name.clone(),
        target_language: target,
        text,
        source_version: review.version,
        origin,
    }
}
