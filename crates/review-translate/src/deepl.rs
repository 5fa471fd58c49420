use async_trait::async_trait;
use reqwest::Client;
use review_models::LanguageCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use crate::error::ProviderError;
use crate::http::{check_response, create_http_client};
use crate::traits::TranslationProvider;

#[derive(Debug, Deserialize)]
struct DeepLResponse {
    translations: Vec<DeepLTranslation>,
}

#[derive(Debug, Deserialize)]
struct DeepLTranslation {
    text: String,
}

/// DeepL `POST /v2/translate` client (form-encoded, key in the Authorization header)
pub struct DeepLProvider {
    client: Client,
    endpoint: String,
    api_key: String,
    source_language: String,
}

impl DeepLProvider {
    pub fn new(endpoint: &str, api_key: String, source_language: &str, timeout: Duration) -> Self {
        Self {
            client: create_http_client(timeout),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            source_language: source_language.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for DeepLProvider {
    fn provider_name(&self) -> &str {
        "deepl"
    }

    async fn translate(&self, text: &str, target_language: &LanguageCode) -> Result<String, ProviderError> {
        let url = format!("{}/v2/translate", self.endpoint);
        // DeepL expects upper-case codes (EN, FR, PT-BR)
        let params = [
            ("text", text.to_string()),
            ("source_lang", self.source_language.to_uppercase()),
            ("target_lang", target_language.as_str().to_uppercase()),
        ];

        debug!("DeepL: translating {} chars to {}", text.len(), target_language);
        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("DeepL-Auth-Key {}", self.api_key))
            .form(&params)
            .send()
            .await?;
        let response = check_response(response).await?;

        let body: DeepLResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::failure(format!("Invalid DeepL response: {}", e)))?;
        body.translations
            .into_iter()
            .next()
            .map(|t| t.text)
            .ok_or_else(|| ProviderError::failure("DeepL returned no translations"))
    }
}
