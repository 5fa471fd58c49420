#![allow(dead_code)]

use async_trait::async_trait;
use review_core::{ReviewApi, TranslationSettings};
use review_models::{LanguageCode, Review};
use review_translate::{ProviderError, TranslationProvider};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Provider double that counts calls and can be slowed down or made to fail
pub struct StubProvider {
    calls: AtomicUsize,
    delay: Duration,
    failure: Mutex<Option<ProviderError>>,
}

impl StubProvider {
    pub fn new() -> Arc<Self> {
        Self::with_delay(Duration::ZERO)
    }

    pub fn with_delay(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            delay,
            failure: Mutex::new(None),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn fail_with(&self, error: Option<ProviderError>) {
        *self.failure.lock().unwrap() = error;
    }
}

#[async_trait]
impl TranslationProvider for StubProvider {
    fn provider_name(&self) -> &str {
        "stub"
    }

    async fn translate(&self, text: &str, target_language: &LanguageCode) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if let Some(error) = self.failure.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(format!("[{}] {}", target_language, text))
    }
}

pub fn settings(timeout: Duration) -> TranslationSettings {
    TranslationSettings {
        timeout,
        source_language: LanguageCode::parse("en").unwrap(),
    }
}

pub fn api_with(provider: Arc<StubProvider>) -> ReviewApi {
    ReviewApi::new(provider, settings(Duration::from_secs(5)), 100)
}

pub fn review(movie_id: i64, reviewer: &str, date: &str, rating: u8, content: &str) -> Review {
    Review {
        movie_id,
        reviewer_name: reviewer.to_string(),
        review_date: date.parse().unwrap(),
        rating,
        content: content.to_string(),
        version: 0,
    }
}

/// Movie 101 with alice (2020-01-01, 8) and bob (2020-06-01, 3)
pub fn movie_101() -> Vec<Review> {
    vec![
        review(101, "alice", "2020-01-01", 8, "A quiet, generous film."),
        review(101, "bob", "2020-06-01", 3, "Too long by an hour."),
    ]
}
