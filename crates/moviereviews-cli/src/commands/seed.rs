use super::{open_api, persist, styled_table};
use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use comfy_table::Cell;
use review_config::{Config, PathManager};
use std::path::PathBuf;

const BUNDLED_SEED_FILE: &str = "seed/reviews.json";

pub async fn run_seed(file: Option<PathBuf>, config: &Config, paths: &PathManager, output: &Output) -> Result<()> {
    let seed_file = file
        .or_else(|| config.store.seed_file.clone())
        .unwrap_or_else(|| PathBuf::from(BUNDLED_SEED_FILE));
    tracing::debug!("Seeding from {}", seed_file.display());

    let api = open_api(config, paths).await?;
    let report = api
        .load_seed_file(&seed_file)
        .await
        .wrap_err_with(|| format!("Failed to load seed file {}", seed_file.display()))?;
    persist(&api).await?;

    output.data(&report, || {
        let mut table = styled_table();
        table.set_header(vec![Cell::new("Seed File"), Cell::new(seed_file.display().to_string())]);
        table.add_row(vec![Cell::new("Inserted"), Cell::new(report.inserted)]);
        table.add_row(vec![Cell::new("Already present"), Cell::new(report.already_present)]);
        table.add_row(vec![Cell::new("Duplicates skipped"), Cell::new(report.duplicates)]);
        table
    });
    if report.duplicates > 0 {
        output.warn(format!("{} duplicate records in the seed file were skipped", report.duplicates));
    }
    output.success(format!("Store now holds {} reviews", api.stats().await.reviews));
    Ok(())
}
