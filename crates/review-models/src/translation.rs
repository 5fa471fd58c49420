use serde::{Deserialize, Serialize};
use crate::language::LanguageCode;
use crate::review::MovieId;

/// Cached translation of one review into one language.
///
/// Only valid while `source_version` equals the review's current version.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TranslationCacheEntry {
    pub movie_id: MovieId,
    pub reviewer_name: String,
    pub target_language: LanguageCode,
    pub translated_text: String,
    pub source_version: u64,
}
