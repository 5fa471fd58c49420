pub mod clear;
pub mod config;
pub mod reviews;
pub mod seed;
pub mod translate;

use color_eyre::eyre::{eyre, WrapErr};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use review_config::{Config, PathManager};
use review_core::ReviewApi;
use review_models::Review;

/// Config from the config file, or defaults when there is none
pub fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| eyre!("Invalid config {}: {}", config_file.display(), e))?;
    Ok(config)
}

pub async fn open_api(config: &Config, paths: &PathManager) -> Result<ReviewApi> {
    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create data directories: {}", e))?;
    ReviewApi::open(config, paths)
        .await
        .map_err(|e| eyre!("Failed to open review store: {:#}", e))
}

/// Write snapshots after a command changed the store or the cache
pub async fn persist(api: &ReviewApi) -> Result<()> {
    api.persist().await.wrap_err("Failed to save snapshots")
}

pub fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn review_table(reviews: &[Review]) -> Table {
    let mut table = styled_table();
    table.set_header(
        ["Movie", "Reviewer", "Date", "Rating", "Version", "Review"]
            .into_iter()
            .map(|h| Cell::new(h).add_attribute(comfy_table::Attribute::Bold)),
    );
    for review in reviews {
        table.add_row(vec![
            Cell::new(review.movie_id),
            Cell::new(&review.reviewer_name),
            Cell::new(review.review_date),
            Cell::new(format!("{}/10", review.rating)),
            Cell::new(review.version),
            Cell::new(&review.content),
        ]);
    }
    table
}
