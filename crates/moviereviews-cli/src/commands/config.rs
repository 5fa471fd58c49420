use super::styled_table;
use crate::output::Output;
use crate::ConfigCommands;
use clap::ValueEnum;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Cell, Table};
use owo_colors::OwoColorize;
use review_config::{Config, PathManager, ProviderKind, API_KEY_ENV_VAR};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ProviderArg {
    #[value(name = "libretranslate")]
    LibreTranslate,
    #[value(name = "deepl")]
    DeepL,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::LibreTranslate => ProviderKind::LibreTranslate,
            ProviderArg::DeepL => ProviderKind::DeepL,
        }
    }
}

pub fn run_config(cmd: ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(full, paths, output),
        ConfigCommands::Init {
            force,
            provider,
            endpoint,
        } => init_config(force, provider, endpoint, paths, output),
    }
}

fn show_config(full: bool, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let config = super::load_config(paths)?;
    let translation = &config.translation;

    let api_key = match translation.resolved_api_key() {
        Some(key) if full => key,
        Some(key) => mask_string(&key),
        None => "<not set>".to_string(),
    };
    let optional_path = |path: &Option<std::path::PathBuf>, unset: &str| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| unset.to_string())
    };

    let summary = json!({
        "configFile": config_file.display().to_string(),
        "configFileExists": config_file.exists(),
        "dataDir": paths.data_dir().display().to_string(),
        "store": {
            "seedFile": config.store.seed_file,
        },
        "translation": {
            "provider": translation.provider.as_str(),
            "endpoint": translation.endpoint,
            "apiKey": api_key,
            "sourceLanguage": translation.source_language,
            "timeoutSeconds": translation.timeout_seconds,
            "cacheCapacity": translation.cache_capacity,
        },
        "logging": {
            "file": config.logging.file,
        },
    });

    output.data(&summary, || {
        let mut table = styled_table();
        table.set_header(vec![
            Cell::new("Config File").add_attribute(comfy_table::Attribute::Bold),
            Cell::new(config_file.display().to_string()),
        ]);
        if !config_file.exists() {
            table.add_row(vec![Cell::new(""), Cell::new("not found, showing defaults".yellow().to_string())]);
        }
        table.add_row(vec![Cell::new("Data Directory"), Cell::new(paths.data_dir().display())]);

        section(&mut table, "Store");
        table.add_row(vec![
            Cell::new("Seed File"),
            Cell::new(optional_path(&config.store.seed_file, "seed/reviews.json (bundled)")),
        ]);

        section(&mut table, "Translation");
        table.add_row(vec![Cell::new("Provider"), Cell::new(translation.provider.as_str())]);
        table.add_row(vec![Cell::new("Endpoint"), Cell::new(&translation.endpoint)]);
        table.add_row(vec![Cell::new("API Key"), Cell::new(&api_key)]);
        table.add_row(vec![Cell::new("Source Language"), Cell::new(&translation.source_language)]);
        table.add_row(vec![Cell::new("Timeout"), Cell::new(format!("{}s", translation.timeout_seconds))]);
        let capacity = match translation.cache_capacity {
            0 => "unbounded".to_string(),
            n => n.to_string(),
        };
        table.add_row(vec![Cell::new("Cache Capacity"), Cell::new(capacity)]);

        section(&mut table, "Logging");
        table.add_row(vec![
            Cell::new("Log File"),
            Cell::new(optional_path(&config.logging.file, "stderr")),
        ]);
        table
    });
    Ok(())
}

fn section(table: &mut Table, title: &str) {
    table.add_row(vec![Cell::new(title)
        .fg(comfy_table::Color::Cyan)
        .add_attribute(comfy_table::Attribute::Bold)]);
}

fn init_config(
    force: bool,
    provider: Option<ProviderArg>,
    endpoint: Option<String>,
    paths: &PathManager,
    output: &Output,
) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!("Configuration file already exists at: {}", config_file.display()));
        output.info("Use --force to overwrite it.");
        return Ok(());
    }

    let mut config = Config::default();
    if let Some(provider) = provider {
        config.translation.provider = provider.into();
    }
    if let Some(endpoint) = endpoint {
        config.translation.endpoint = endpoint;
    }
    config.validate().map_err(|e| eyre!("Invalid configuration: {}", e))?;
    config
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Configuration written to {}", config_file.display()));
    if config.translation.provider == ProviderKind::DeepL && config.translation.resolved_api_key().is_none() {
        output.warn(format!(
            "DeepL needs an API key: set translation.api_key or {}",
            API_KEY_ENV_VAR
        ));
    }
    Ok(())
}

fn mask_string(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= 4 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..2].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}***{}", head, tail)
}
