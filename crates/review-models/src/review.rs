use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Partition identity of a review. Signed so that malformed ids coming from
/// callers can be represented and rejected by validation.
pub type MovieId = i64;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Version given to every review written by the initial bulk load.
/// User submissions start at 1 and therefore always win over seeds.
pub const SEED_VERSION: u64 = 0;

/// Composite primary key: `(movie_id, reviewer_name)`
pub type ReviewKey = (MovieId, String);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub movie_id: MovieId,
    pub reviewer_name: String,
    pub review_date: NaiveDate, // Serialized as ISO `YYYY-MM-DD`
    pub rating: u8,
    pub content: String, // Source language is English
    #[serde(default)]
    pub version: u64,
}

impl Review {
    pub fn key(&self) -> ReviewKey {
        (self.movie_id, self.reviewer_name.clone())
    }

    /// Whether `rating` lies within the 1-10 scale
    pub fn is_valid_rating(rating: u8) -> bool {
        (MIN_RATING..=MAX_RATING).contains(&rating)
    }

    /// Build the next version of this review with an edit applied.
    ///
    /// Fields the edit leaves as `None` are carried over unchanged.
    pub fn with_edit(&self, edit: &ReviewEdit) -> Review {
        Review {
            movie_id: self.movie_id,
            reviewer_name: self.reviewer_name.clone(),
            review_date: edit.review_date.unwrap_or(self.review_date),
            rating: edit.rating.unwrap_or(self.rating),
            content: edit.content.clone().unwrap_or_else(|| self.content.clone()),
            version: self.version + 1,
        }
    }
}

/// A review as submitted by a client, before the store assigns a version
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDraft {
    pub movie_id: MovieId,
    pub reviewer_name: String,
    pub review_date: NaiveDate,
    pub rating: u8,
    pub content: String,
}

impl ReviewDraft {
    pub fn into_review(self, version: u64) -> Review {
        Review {
            movie_id: self.movie_id,
            reviewer_name: self.reviewer_name,
            review_date: self.review_date,
            rating: self.rating,
            content: self.content,
            version,
        }
    }
}

/// Partial update of an existing review
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEdit {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub review_date: Option<NaiveDate>,
}

impl ReviewEdit {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.rating.is_none() && self.review_date.is_none()
    }

    /// Check whether applying this edit to `review` would change anything
    pub fn changes(&self, review: &Review) -> bool {
        self.content.as_ref().is_some_and(|c| *c != review.content)
            || self.rating.is_some_and(|r| r != review.rating)
            || self.review_date.is_some_and(|d| d != review.review_date)
    }
}
