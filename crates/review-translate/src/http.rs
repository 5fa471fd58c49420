use reqwest::{Client, Response};
use std::time::Duration;
use crate::error::ProviderError;

/// Shared HTTP client for provider calls, bounded by the configured timeout
pub fn create_http_client(timeout: Duration) -> Client {
    Client::builder()
        .user_agent(concat!("moviereviews/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Map a non-success HTTP status to a provider error kind
pub fn classify_status(status: u16, body: &str) -> ProviderError {
    let message = format!("HTTP {} - {}", status, body.trim());
    match status {
        // 456 is DeepL's "quota exceeded"
        429 | 456 => ProviderError::rate_limited(message),
        408 | 504 => ProviderError::timeout(message),
        _ => ProviderError::failure(message),
    }
}

/// Return the response if successful, otherwise a classified error carrying the body
pub async fn check_response(response: Response) -> Result<Response, ProviderError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let error_text = response.text().await.unwrap_or_default();
    Err(classify_status(status.as_u16(), &error_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;

    #[test]
    fn test_classify_status() {
        assert_eq!(classify_status(429, "slow down").kind, ProviderErrorKind::RateLimited);
        assert_eq!(classify_status(456, "quota").kind, ProviderErrorKind::RateLimited);
        assert_eq!(classify_status(504, "").kind, ProviderErrorKind::Timeout);
        assert_eq!(classify_status(500, "boom").kind, ProviderErrorKind::ProviderFailure);
        assert_eq!(classify_status(403, "bad key").kind, ProviderErrorKind::ProviderFailure);
        assert!(classify_status(500, "boom").message.contains("boom"));
    }
}
