use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalized target language code (e.g. `fr`, `pt-br`)
///
/// Codes are lower-cased on parse so that `FR` and `fr` address the same
/// cache entry. Accepted shape: 2-8 ASCII letters, optionally followed by a
/// `-` and a 2-8 character alphanumeric region/script subtag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LanguageCode(String);

impl LanguageCode {
    pub fn parse(raw: &str) -> Option<Self> {
        let code = raw.trim().to_ascii_lowercase();
        let mut parts = code.splitn(2, '-');
        let primary = parts.next().unwrap_or_default();
        if !(2..=8).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        if let Some(subtag) = parts.next() {
            if !(2..=8).contains(&subtag.len()) || !subtag.chars().all(|c| c.is_ascii_alphanumeric()) {
                return None;
            }
        }
        Some(Self(code))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary subtag only (`pt` for `pt-br`)
    pub fn primary(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for LanguageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LanguageCode {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        LanguageCode::parse(&value).ok_or_else(|| format!("invalid language code: {:?}", value))
    }
}

impl From<LanguageCode> for String {
    fn from(code: LanguageCode) -> Self {
        code.0
    }
}
