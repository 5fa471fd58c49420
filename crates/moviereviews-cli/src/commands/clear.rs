use crate::output::Output;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use review_config::PathManager;
use review_core::SnapshotStorage;
use std::path::Path;

pub fn run_clear(all: bool, reviews: bool, translations: bool, paths: &PathManager, output: &Output) -> Result<()> {
    if all {
        clear_snapshot(&paths.reviews_snapshot(), "reviews", output)?;
        clear_snapshot(&paths.translations_snapshot(), "cached translations", output)?;
        output.success("All reviews and cached translations cleared");
        return Ok(());
    }

    if !reviews && !translations {
        output.warn("No clear option specified. Use --reviews, --translations, or --all");
        output.info("Example: moviereviews clear --translations");
        return Ok(());
    }

    if reviews {
        clear_snapshot(&paths.reviews_snapshot(), "reviews", output)?;
        // Cached translations are only valid against the versions they came from
        if !translations {
            output.info("Cached translations are cleared along with reviews");
        }
        clear_snapshot(&paths.translations_snapshot(), "cached translations", output)?;
    } else if translations {
        clear_snapshot(&paths.translations_snapshot(), "cached translations", output)?;
    }
    Ok(())
}

fn clear_snapshot(path: &Path, what: &str, output: &Output) -> Result<()> {
    let storage = SnapshotStorage::new(path);
    if !storage.exists() {
        output.info(format!("No {} found to clear", what));
        return Ok(());
    }
    let size = storage.size().unwrap_or(0);
    storage
        .clear()
        .wrap_err_with(|| format!("Failed to remove {}", path.display()))?;
    output.success(format!("Cleared {}: {} ({} bytes)", what, path.display(), size));
    Ok(())
}
