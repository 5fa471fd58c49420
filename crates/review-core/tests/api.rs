mod common;

use common::{api_with, movie_101, review, StubProvider};
use review_config::{Config, PathManager};
use review_core::{ReviewApi, ReviewError, ReviewOrdering, SortOrder, TranslationOrigin};
use review_models::{ReviewDraft, ReviewEdit};
use std::io::Write;

fn names(reviews: &[review_models::Review]) -> Vec<&str> {
    reviews.iter().map(|r| r.reviewer_name.as_str()).collect()
}

#[tokio::test]
async fn test_movie_101_orderings() {
    let api = api_with(StubProvider::new());
    api.load_initial(movie_101()).await;

    let by_rating = api
        .list_reviews_for_movie_ordered(101, ReviewOrdering::Rating, SortOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(names(&by_rating), vec!["bob", "alice"]);

    let by_date = api
        .list_reviews_for_movie_ordered(101, ReviewOrdering::Date, SortOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(names(&by_date), vec!["alice", "bob"]);

    let newest_first = api
        .list_reviews_for_movie_ordered(101, ReviewOrdering::Date, SortOrder::Descending)
        .await
        .unwrap();
    assert_eq!(names(&newest_first), vec!["bob", "alice"]);

    let all = api.list_reviews_for_movie(101).await.unwrap();
    assert_eq!(names(&all), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_empty_store_lookups() {
    let api = api_with(StubProvider::new());

    let err = api.get_review(999, "nobody").await.unwrap_err();
    assert_eq!(err.kind(), "not-found");
    assert!(api.list_reviews_for_movie(999).await.unwrap().is_empty());
    assert!(api.list_reviews_by_reviewer("nobody").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_filtered_listings() {
    let api = api_with(StubProvider::new());
    let mut seeds = movie_101();
    seeds.push(review(101, "carol", "2021-02-14", 10, "Perfect."));
    api.load_initial(seeds).await;

    let since = api
        .list_reviews_for_movie_since(101, "2020-01-01".parse().unwrap())
        .await
        .unwrap();
    assert_eq!(names(&since), vec!["bob", "carol"]);

    let high = api.list_reviews_for_movie_above_rating(101, 8).await.unwrap();
    assert_eq!(names(&high), vec!["alice", "carol"]);
    assert!(api.list_reviews_for_movie_above_rating(101, 11).await.is_err());

    let in_2020 = api.list_reviews_for_movie_in_year(101, 2020).await.unwrap();
    assert_eq!(names(&in_2020), vec!["alice", "bob"]);
}

#[tokio::test]
async fn test_reviewer_listing_spans_movies() {
    let api = api_with(StubProvider::new());
    api.load_initial(vec![
        review(205, "alice", "2022-05-01", 6, "Fine."),
        review(101, "alice", "2020-01-01", 8, "Good."),
        review(101, "bob", "2020-06-01", 3, "Bad."),
    ])
    .await;

    let alice = api.list_reviews_by_reviewer("alice").await.unwrap();
    let movies: Vec<i64> = alice.iter().map(|r| r.movie_id).collect();
    assert_eq!(movies, vec![101, 205]);
    // Reviewer names match exactly
    assert!(api.list_reviews_by_reviewer("Alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_edit_remove_lifecycle() {
    let api = api_with(StubProvider::new());
    api.load_initial(movie_101()).await;

    let draft = ReviewDraft {
        movie_id: 101,
        reviewer_name: "dave".to_string(),
        review_date: "2023-03-03".parse().unwrap(),
        rating: 7,
        content: "Solid.".to_string(),
    };
    let created = api.submit_review(draft.clone()).await.unwrap();
    assert_eq!(created.version, 1);

    // Resubmitting replaces the stored review with the next version
    let replaced = api
        .submit_review(ReviewDraft {
            rating: 9,
            ..draft
        })
        .await
        .unwrap();
    assert_eq!(replaced.version, 2);
    assert_eq!(api.get_review(101, "dave").await.unwrap().rating, 9);

    let edit = ReviewEdit {
        rating: Some(4),
        ..Default::default()
    };
    let edited = api.edit_review(101, "alice", &edit).await.unwrap();
    assert_eq!((edited.rating, edited.version), (4, 1));

    let empty = api.edit_review(101, "alice", &ReviewEdit::default()).await.unwrap_err();
    assert_eq!(empty.kind(), "validation");

    let out_of_range = ReviewEdit {
        rating: Some(0),
        ..Default::default()
    };
    assert!(matches!(
        api.edit_review(101, "alice", &out_of_range).await,
        Err(ReviewError::Validation(_))
    ));

    api.remove_review(101, "dave").await.unwrap();
    assert_eq!(api.get_review(101, "dave").await.unwrap_err().kind(), "not-found");
    assert_eq!(api.remove_review(101, "dave").await.unwrap_err().kind(), "not-found");
}

#[tokio::test]
async fn test_seed_load_is_idempotent_and_keeps_user_edits() {
    let api = api_with(StubProvider::new());
    let first = api.load_initial(movie_101()).await;
    assert_eq!(first.inserted, 2);

    let edit = ReviewEdit {
        content: Some("Changed my mind.".to_string()),
        ..Default::default()
    };
    api.edit_review(101, "bob", &edit).await.unwrap();

    let second = api.load_initial(movie_101()).await;
    assert_eq!(second.inserted, 0);
    assert_eq!(second.already_present, 2);
    assert_eq!(api.get_review(101, "bob").await.unwrap().content, "Changed my mind.");
    assert_eq!(api.stats().await.reviews, 2);
}

#[tokio::test]
async fn test_load_seed_file() {
    let api = api_with(StubProvider::new());
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(
        file,
        r#"[{{"movieId": 7, "reviewerName": "erin", "reviewDate": "2018-08-08", "rating": 6, "content": "Okay."}}]"#
    )
    .unwrap();

    let report = api.load_seed_file(file.path()).await.unwrap();
    assert_eq!(report.inserted, 1);
    assert_eq!(api.get_review(7, "erin").await.unwrap().version, 0);
}

#[tokio::test]
async fn test_snapshots_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let paths = PathManager::from_base(dir.path().to_path_buf());
    let config = Config::default();
    let provider = StubProvider::new();

    {
        let api = ReviewApi::open_with_provider(&config, &paths, provider.clone()).await.unwrap();
        api.load_initial(movie_101()).await;
        api.translate_review(101, "alice", "fr").await.unwrap();
        api.persist().await.unwrap();
    }
    assert!(paths.reviews_snapshot().exists());
    assert!(paths.translations_snapshot().exists());

    let reopened = ReviewApi::open_with_provider(&config, &paths, provider.clone()).await.unwrap();
    assert_eq!(reopened.stats().await.reviews, 2);
    let cached = reopened.translate_review(101, "alice", "fr").await.unwrap();
    assert_eq!(cached.origin, TranslationOrigin::Cache);
    assert_eq!(provider.calls(), 1);

    reopened.clear().await.unwrap();
    assert!(!paths.reviews_snapshot().exists());
    assert_eq!(reopened.stats().await.reviews, 0);
}

#[tokio::test]
async fn test_cached_translation_of_lost_review_is_dropped_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let paths = PathManager::from_base(dir.path().to_path_buf());
    let config = Config::default();
    let provider = StubProvider::new();

    {
        let api = ReviewApi::open_with_provider(&config, &paths, provider.clone()).await.unwrap();
        api.load_initial(movie_101()).await;
        api.translate_review(101, "alice", "fr").await.unwrap();
        api.persist().await.unwrap();
    }
    std::fs::remove_file(paths.reviews_snapshot()).unwrap();

    let reopened = ReviewApi::open_with_provider(&config, &paths, provider.clone()).await.unwrap();
    assert_eq!(reopened.stats().await.reviews, 0);
    assert_eq!(reopened.stats().await.cached_translations, 0);

    reopened
        .load_initial(vec![review(101, "alice", "2020-01-01", 8, "Completely different text.")])
        .await;
    let fresh = reopened.translate_review(101, "alice", "fr").await.unwrap();
    assert_eq!(fresh.text, "[fr] Completely different text.");
    assert_eq!(fresh.origin, TranslationOrigin::Provider);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_removed_review_version_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let paths = PathManager::from_base(dir.path().to_path_buf());
    let config = Config::default();
    let provider = StubProvider::new();

    {
        let api = ReviewApi::open_with_provider(&config, &paths, provider.clone()).await.unwrap();
        api.load_initial(movie_101()).await;
        api.translate_review(101, "bob", "de").await.unwrap();
        api.remove_review(101, "bob").await.unwrap();
        api.persist().await.unwrap();
    }

    let reopened = ReviewApi::open_with_provider(&config, &paths, provider.clone()).await.unwrap();
    reopened
        .load_initial(vec![review(101, "bob", "2020-06-01", 5, "Grew on me.")])
        .await;
    let reseeded = reopened.get_review(101, "bob").await.unwrap();
    assert_eq!(reseeded.version, 1);

    let translated = reopened.translate_review(101, "bob", "de").await.unwrap();
    assert_eq!(translated.text, "[de] Grew on me.");
    assert_eq!(translated.origin, TranslationOrigin::Provider);
}
