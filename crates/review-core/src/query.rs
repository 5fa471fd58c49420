use chrono::{Datelike, NaiveDate};
use review_models::{MovieId, Review, ReviewDraft, ReviewEdit, MAX_RATING};
use std::sync::Arc;
use tracing::{debug, info};
use crate::error::{ReviewError, ReviewResult};
use crate::store::{ReviewStore, SortOrder};

/// Validated access to the review store.
///
/// Every method checks its input before touching storage. Listing an
/// unknown movie or reviewer yields an empty vector: a movie with no
/// reviews and a movie that does not exist look the same here.
pub struct ReviewQueryService {
    store: Arc<ReviewStore>,
}

impl ReviewQueryService {
    pub fn new(store: Arc<ReviewStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<ReviewStore> {
        &self.store
    }

    pub async fn get_reviews_for_movie(&self, movie_id: MovieId) -> ReviewResult<Vec<Review>> {
        validate_movie_id(movie_id)?;
        Ok(self.store.list_by_movie(movie_id).await)
    }

    pub async fn get_review_by_movie_and_reviewer(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
    ) -> ReviewResult<Review> {
        validate_movie_id(movie_id)?;
        validate_reviewer_name(reviewer_name)?;
        self.store.get_by_key(movie_id, reviewer_name).await
    }

    /// Reviews dated strictly after `after_date`, oldest first
    pub async fn get_reviews_for_movie_since(
        &self,
        movie_id: MovieId,
        after_date: NaiveDate,
    ) -> ReviewResult<Vec<Review>> {
        validate_movie_id(movie_id)?;
        let reviews = self
            .store
            .list_by_movie_ordered_by_date(movie_id, SortOrder::Ascending)
            .await;
        Ok(reviews.into_iter().filter(|r| r.review_date > after_date).collect())
    }

    /// Reviews rated at least `min_rating`, lowest rating first
    pub async fn get_reviews_for_movie_above_rating(
        &self,
        movie_id: MovieId,
        min_rating: u8,
    ) -> ReviewResult<Vec<Review>> {
        validate_movie_id(movie_id)?;
        if min_rating > MAX_RATING {
            return Err(ReviewError::validation(format!(
                "minimum rating must be at most {}, got {}",
                MAX_RATING, min_rating
            )));
        }
        let reviews = self
            .store
            .list_by_movie_ordered_by_rating(movie_id, SortOrder::Ascending)
            .await;
        Ok(reviews.into_iter().filter(|r| r.rating >= min_rating).collect())
    }

    /// Reviews written during one calendar year, oldest first
    pub async fn get_reviews_for_movie_in_year(&self, movie_id: MovieId, year: i32) -> ReviewResult<Vec<Review>> {
        validate_movie_id(movie_id)?;
        let reviews = self
            .store
            .list_by_movie_ordered_by_date(movie_id, SortOrder::Ascending)
            .await;
        Ok(reviews.into_iter().filter(|r| r.review_date.year() == year).collect())
    }

    pub async fn get_reviews_by_reviewer(&self, reviewer_name: &str) -> ReviewResult<Vec<Review>> {
        validate_reviewer_name(reviewer_name)?;
        Ok(self.store.list_by_reviewer(reviewer_name).await)
    }

    /// Ordered listing with the direction chosen by the caller
    pub async fn get_reviews_for_movie_ordered(
        &self,
        movie_id: MovieId,
        ordering: ReviewOrdering,
        order: SortOrder,
    ) -> ReviewResult<Vec<Review>> {
        validate_movie_id(movie_id)?;
        let reviews = match ordering {
            ReviewOrdering::Reviewer => {
                let mut reviews = self.store.list_by_movie(movie_id).await;
                if order == SortOrder::Descending {
                    reviews.reverse();
                }
                reviews
            }
            ReviewOrdering::Date => self.store.list_by_movie_ordered_by_date(movie_id, order).await,
            ReviewOrdering::Rating => self.store.list_by_movie_ordered_by_rating(movie_id, order).await,
        };
        Ok(reviews)
    }

    /// Create a review, or replace the stored one with the next version.
    ///
    /// Versions of a key only grow, also across removal.
    ///
    /// Fails with `ReviewError::Conflict` when a concurrent writer installed
    /// the same version first; the caller may retry.
    pub async fn submit_review(&self, draft: ReviewDraft) -> ReviewResult<Review> {
        validate_draft(&draft)?;
        // A key that was removed earlier continues above its old versions
        let version = self
            .store
            .latest_version(draft.movie_id, &draft.reviewer_name)
            .await
            .map_or(1, |latest| latest + 1);
        let review = draft.into_review(version);
        self.store.put(review.clone()).await?;
        info!(
            "Submitted review: movie {} reviewer {:?} version {}",
            review.movie_id, review.reviewer_name, review.version
        );
        Ok(review)
    }

    /// Apply a partial edit to an existing review, bumping its version
    pub async fn edit_review(
        &self,
        movie_id: MovieId,
        reviewer_name: &str,
        edit: &ReviewEdit,
    ) -> ReviewResult<Review> {
        if edit.is_empty() {
            return Err(ReviewError::validation("edit must change content, rating or date"));
        }
        if let Some(rating) = edit.rating {
            validate_rating(rating)?;
        }
        if let Some(content) = &edit.content {
            validate_content(content)?;
        }

        let current = self.get_review_by_movie_and_reviewer(movie_id, reviewer_name).await?;
        if !edit.changes(&current) {
            debug!("Edit leaves movie {} reviewer {:?} unchanged", movie_id, reviewer_name);
            return Ok(current);
        }
        let next = current.with_edit(edit);
        self.store.put(next.clone()).await?;
        info!(
            "Edited review: movie {} reviewer {:?} version {} -> {}",
            movie_id, reviewer_name, current.version, next.version
        );
        Ok(next)
    }
}

/// Which ordering of a movie's reviews to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewOrdering {
    Reviewer,
    Date,
    Rating,
}

pub fn validate_movie_id(movie_id: MovieId) -> ReviewResult<()> {
    if movie_id <= 0 {
        return Err(ReviewError::validation(format!(
            "movie id must be a positive integer, got {}",
            movie_id
        )));
    }
    Ok(())
}

pub fn validate_reviewer_name(reviewer_name: &str) -> ReviewResult<()> {
    if reviewer_name.trim().is_empty() {
        return Err(ReviewError::validation("reviewer name cannot be empty"));
    }
    Ok(())
}

fn validate_rating(rating: u8) -> ReviewResult<()> {
    if !Review::is_valid_rating(rating) {
        return Err(ReviewError::validation(format!(
            "rating must be between 1 and {}, got {}",
            MAX_RATING, rating
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> ReviewResult<()> {
    if content.trim().is_empty() {
        return Err(ReviewError::validation("review content cannot be empty"));
    }
    Ok(())
}

fn validate_draft(draft: &ReviewDraft) -> ReviewResult<()> {
    validate_movie_id(draft.movie_id)?;
    validate_reviewer_name(&draft.reviewer_name)?;
    validate_rating(draft.rating)?;
    validate_content(&draft.content)
}

/// Validate a seed record as it would be validated on submission
pub fn validate_review(review: &Review) -> ReviewResult<()> {
    validate_movie_id(review.movie_id)?;
    validate_reviewer_name(&review.reviewer_name)?;
    validate_rating(review.rating)?;
    validate_content(&review.content)
}
