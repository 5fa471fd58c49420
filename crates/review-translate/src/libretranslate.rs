use async_trait::async_trait;
use reqwest::Client;
use review_models::LanguageCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use crate::error::ProviderError;
use crate::http::{check_response, create_http_client};
use crate::traits::TranslationProvider;

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

/// LibreTranslate-compatible `POST /translate` client
pub struct LibreTranslateProvider {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
    source_language: String,
}

impl LibreTranslateProvider {
    pub fn new(endpoint: &str, api_key: Option<String>, source_language: &str, timeout: Duration) -> Self {
        Self {
            client: create_http_client(timeout),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            source_language: source_language.to_string(),
        }
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslateProvider {
    fn provider_name(&self) -> &str {
        "libretranslate"
    }

    async fn translate(&self, text: &str, target_language: &LanguageCode) -> Result<String, ProviderError> {
        let url = format!("{}/translate", self.endpoint);
        let request = TranslateRequest {
            q: text,
            source: &self.source_language,
            target: target_language.as_str(),
            format: "text",
            api_key: self.api_key.as_deref(),
        };

        debug!("LibreTranslate: translating {} chars to {}", text.len(), target_language);
        let response = self.client.post(&url).json(&request).send().await?;
        let response = check_response(response).await?;

        let body: TranslateResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::failure(format!("Invalid LibreTranslate response: {}", e)))?;
        Ok(body.translated_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn french() -> LanguageCode {
        LanguageCode::parse("fr").unwrap()
    }

    #[tokio::test]
    async fn test_translate_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .and(body_partial_json(json!({
                "q": "Great movie",
                "source": "en",
                "target": "fr",
                "format": "text"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "translatedText": "Super film"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = LibreTranslateProvider::new(&mock_server.uri(), None, "en", Duration::from_secs(5));
        let translated = provider.translate("Great movie", &french()).await.unwrap();
        assert_eq!(translated, "Super film");
    }

    #[tokio::test]
    async fn test_rate_limited_response() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": "Too many requests"
            })))
            .mount(&mock_server)
            .await;

        let provider = LibreTranslateProvider::new(&mock_server.uri(), None, "en", Duration::from_secs(5));
        let err = provider.translate("Great movie", &french()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::RateLimited);
    }

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "translatedText": "Trop tard" }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&mock_server)
            .await;

        let provider = LibreTranslateProvider::new(&mock_server.uri(), None, "en", Duration::from_millis(50));
        let err = provider.translate("Great movie", &french()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Timeout);
    }

    #[tokio::test]
    async fn test_malformed_body_is_provider_failure() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/translate"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = LibreTranslateProvider::new(&mock_server.uri(), None, "en", Duration::from_secs(5));
        let err = provider.translate("Great movie", &french()).await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::ProviderFailure);
    }
}
