use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when `translation.api_key` is empty
pub const API_KEY_ENV_VAR: &str = "MOVIEREVIEWS_TRANSLATE_API_KEY";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Seed file loaded by `moviereviews seed` when no file is given (JSON or CSV)
    #[serde(default)]
    pub seed_file: Option<PathBuf>,
}

/// Which remote translation API to call
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    LibreTranslate,
    DeepL,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::LibreTranslate => "libretranslate",
            ProviderKind::DeepL => "deepl",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationConfig {
    #[serde(default = "default_provider")]
    pub provider: ProviderKind,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_source_language")]
    pub source_language: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    /// Maximum number of cached translations (0 = unbounded)
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write logs to a daily-rotated file instead of stderr
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_provider() -> ProviderKind {
    ProviderKind::LibreTranslate
}

fn default_endpoint() -> String {
    "http://localhost:5000".to_string()
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_cache_capacity() -> usize {
    1000
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            endpoint: default_endpoint(),
            api_key: String::new(),
            source_language: default_source_language(),
            timeout_seconds: default_timeout_seconds(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl TranslationConfig {
    /// API key from config, falling back to the environment
    pub fn resolved_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.clone());
        }
        std::env::var(API_KEY_ENV_VAR)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the config file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let translation = &self.translation;
        if translation.timeout_seconds == 0 {
            return Err(anyhow::anyhow!("translation.timeout_seconds must be greater than zero"));
        }
        if translation.endpoint.trim().is_empty() {
            return Err(anyhow::anyhow!("translation.endpoint cannot be empty"));
        }
        if !translation.endpoint.starts_with("http://") && !translation.endpoint.starts_with("https://") {
            return Err(anyhow::anyhow!(
                "translation.endpoint must be an http(s) URL: {}",
                translation.endpoint
            ));
        }
        let source = translation.source_language.trim();
        if source.len() < 2 || !source.chars().all(|c| c.is_ascii_alphabetic() || c == '-') {
            return Err(anyhow::anyhow!(
                "Invalid translation.source_language: {}",
                translation.source_language
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let config = Config {
            store: StoreConfig {
                seed_file: Some(PathBuf::from("seed/reviews.json")),
            },
            translation: TranslationConfig {
                provider: ProviderKind::DeepL,
                endpoint: "https://api-free.deepl.com".to_string(),
                api_key: "secret".to_string(),
                timeout_seconds: 5,
                cache_capacity: 0,
                ..TranslationConfig::default()
            },
            logging: LoggingConfig::default(),
        };

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.translation.provider, ProviderKind::DeepL);
        assert_eq!(loaded.translation.api_key, "secret");
        assert_eq!(loaded.translation.timeout_seconds, 5);
        assert_eq!(loaded.translation.cache_capacity, 0);
        assert_eq!(loaded.store.seed_file, Some(PathBuf::from("seed/reviews.json")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[translation]\nprovider = \"libretranslate\"\n").unwrap();
        assert_eq!(config.translation.endpoint, "http://localhost:5000");
        assert_eq!(config.translation.source_language, "en");
        assert_eq!(config.translation.timeout_seconds, 10);
        assert_eq!(config.translation.cache_capacity, 1000);
        assert!(config.store.seed_file.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.translation.timeout_seconds = 0;
        assert!(config.validate().is_err());

        config.translation.timeout_seconds = 10;
        config.translation.endpoint = "localhost:5000".to_string();
        assert!(config.validate().is_err());

        config.translation.endpoint = "http://localhost:5000".to_string();
        config.translation.source_language = "e".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_explicit_api_key_wins() {
        let config = TranslationConfig {
            api_key: "from-config".to_string(),
            ..TranslationConfig::default()
        };
        assert_eq!(config.resolved_api_key().as_deref(), Some("from-config"));
    }
}
