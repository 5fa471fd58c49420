use super::{open_api, persist, review_table};
use crate::output::Output;
use crate::{OrderBy, ReviewCommands};
use color_eyre::Result;
use review_config::{Config, PathManager};
use review_core::{ReviewApi, ReviewOrdering, SortOrder};
use review_models::{Review, ReviewDraft, ReviewEdit};

pub async fn run_reviews(cmd: ReviewCommands, config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    let api = open_api(config, paths).await?;

    match cmd {
        ReviewCommands::Movie {
            movie_id,
            order_by,
            desc,
            since,
            min_rating,
            year,
        } => {
            let reviews = if let Some(after) = since {
                api.list_reviews_for_movie_since(movie_id, after).await?
            } else if let Some(min_rating) = min_rating {
                api.list_reviews_for_movie_above_rating(movie_id, min_rating).await?
            } else if let Some(year) = year {
                api.list_reviews_for_movie_in_year(movie_id, year).await?
            } else {
                api.list_reviews_for_movie_ordered(movie_id, ordering(order_by), SortOrder::from_ascending(!desc))
                    .await?
            };
            print_reviews(&reviews, output, &format!("No reviews for movie {}", movie_id));
        }
        ReviewCommands::Get { movie_id, reviewer } => {
            let review = api.get_review(movie_id, &reviewer).await?;
            print_reviews(std::slice::from_ref(&review), output, "");
        }
        ReviewCommands::ByReviewer { reviewer } => {
            let reviews = api.list_reviews_by_reviewer(&reviewer).await?;
            print_reviews(&reviews, output, &format!("No reviews by {:?}", reviewer));
        }
        ReviewCommands::Submit {
            movie_id,
            reviewer,
            rating,
            content,
            date,
        } => {
            let draft = ReviewDraft {
                movie_id,
                reviewer_name: reviewer,
                review_date: date.unwrap_or_else(|| chrono::Local::now().date_naive()),
                rating,
                content,
            };
            let review = api.submit_review(draft).await?;
            save_and_report(&api, &review, "Saved", output).await?;
        }
        ReviewCommands::Edit {
            movie_id,
            reviewer,
            rating,
            content,
            date,
        } => {
            let edit = ReviewEdit {
                content,
                rating,
                review_date: date,
            };
            let review = api.edit_review(movie_id, &reviewer, &edit).await?;
            save_and_report(&api, &review, "Edited", output).await?;
        }
        ReviewCommands::Remove { movie_id, reviewer } => {
            let review = api.remove_review(movie_id, &reviewer).await?;
            persist(&api).await?;
            output.success(format!(
                "Removed review of movie {} by {:?}",
                review.movie_id, review.reviewer_name
            ));
        }
    }

    Ok(())
}

fn ordering(order_by: OrderBy) -> ReviewOrdering {
    match order_by {
        OrderBy::Reviewer => ReviewOrdering::Reviewer,
        OrderBy::Date => ReviewOrdering::Date,
        OrderBy::Rating => ReviewOrdering::Rating,
    }
}

fn print_reviews(reviews: &[Review], output: &Output, empty_message: &str) {
    if reviews.is_empty() && output.is_human() {
        output.info(empty_message);
        return;
    }
    output.data(&reviews, || review_table(reviews));
}

async fn save_and_report(api: &ReviewApi, review: &Review, verb: &str, output: &Output) -> Result<()> {
    persist(api).await?;
    output.data(review, || review_table(std::slice::from_ref(review)));
    output.success(format!(
        "{} review of movie {} by {:?} (version {})",
        verb, review.movie_id, review.reviewer_name, review.version
    ));
    Ok(())
}
