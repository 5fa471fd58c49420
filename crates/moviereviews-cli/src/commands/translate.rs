use super::{open_api, persist, styled_table};
use crate::output::Output;
use color_eyre::Result;
use comfy_table::Cell;
use review_config::{Config, PathManager};
use review_core::TranslationOrigin;

pub async fn run_translate(
    movie_id: i64,
    reviewer: &str,
    language: &str,
    config: &Config,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let api = open_api(config, paths).await?;
    let translation = api.translate_review(movie_id, reviewer, language).await?;

    // Only a fresh provider result changes the cache
    if matches!(translation.origin, TranslationOrigin::Provider | TranslationOrigin::Shared) {
        persist(&api).await?;
    }

    output.data(&translation, || {
        let mut table = styled_table();
        table.set_header(vec![
            Cell::new(format!("Movie {} / {}", translation.movie_id, translation.reviewer_name)),
            Cell::new(format!("[{}] v{}", translation.target_language, translation.source_version)),
        ]);
        table.add_row(vec![Cell::new("Translation"), Cell::new(&translation.text)]);
        table.add_row(vec![Cell::new("Source"), Cell::new(origin_label(translation.origin))]);
        table
    });
    Ok(())
}

fn origin_label(origin: TranslationOrigin) -> &'static str {
    match origin {
        TranslationOrigin::Cache => "cache",
        TranslationOrigin::Provider => "provider",
        TranslationOrigin::Shared => "provider (shared call)",
        TranslationOrigin::Passthrough => "original text",
    }
}
