use async_trait::async_trait;
use review_models::LanguageCode;
use crate::error::ProviderError;

/// Remote machine-translation service.
///
/// Implementations are treated as untrusted and unreliable: every call may
/// fail, be rate limited, or hang. Callers bound the call with their own
/// timeout and decide about retries; providers never retry internally.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn translate(&self, text: &str, target_language: &LanguageCode) -> Result<String, ProviderError>;
}
