use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderErrorKind {
    Timeout,
    RateLimited,
    ProviderFailure,
}

impl fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::RateLimited => "rate-limited",
            ProviderErrorKind::ProviderFailure => "provider-failure",
        };
        f.write_str(name)
    }
}

/// Failure reported by (or about) a translation provider.
///
/// `Clone` so that one failed call can be handed to every caller waiting on it.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("translation provider error ({kind}): {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub message: String,
}

impl ProviderError {
    pub fn new(kind: ProviderErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn timeout(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, message)
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::RateLimited, message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::ProviderFailure, message)
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::timeout(format!("request timed out: {}", e))
        } else if let Some(status) = e.status() {
            crate::http::classify_status(status.as_u16(), &e.to_string())
        } else {
            ProviderError::failure(format!("request failed: {}", e))
        }
    }
}
