//! Builds the configured translation provider.

use anyhow::{anyhow, Result};
use review_config::{ProviderKind, TranslationConfig, API_KEY_ENV_VAR};
use std::sync::Arc;
use tracing::info;
use crate::{DeepLProvider, LibreTranslateProvider, TranslationProvider};

pub fn create_provider(config: &TranslationConfig) -> Result<Arc<dyn TranslationProvider>> {
    let timeout = config.timeout();
    let provider: Arc<dyn TranslationProvider> = match config.provider {
        ProviderKind::LibreTranslate => Arc::new(LibreTranslateProvider::new(
            &config.endpoint,
            config.resolved_api_key(),
            &config.source_language,
            timeout,
        )),
        ProviderKind::DeepL => {
            let api_key = config.resolved_api_key().ok_or_else(|| {
                anyhow!(
                    "DeepL requires an API key (set translation.api_key or {})",
                    API_KEY_ENV_VAR
                )
            })?;
            Arc::new(DeepLProvider::new(&config.endpoint, api_key, &config.source_language, timeout))
        }
    };

    info!(
        "Translation provider: {} at {} (timeout {:?})",
        provider.provider_name(),
        config.endpoint,
        timeout
    );
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_libretranslate_by_default() {
        let provider = create_provider(&TranslationConfig::default()).unwrap();
        assert_eq!(provider.provider_name(), "libretranslate");
    }

    #[test]
    fn test_deepl_with_key() {
        let config = TranslationConfig {
            provider: ProviderKind::DeepL,
            endpoint: "https://api-free.deepl.com".to_string(),
            api_key: "key".to_string(),
            ..TranslationConfig::default()
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.provider_name(), "deepl");
    }
}
