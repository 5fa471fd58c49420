pub mod review;
pub mod language;
pub mod translation;

pub use review::{MovieId, Review, ReviewDraft, ReviewEdit, ReviewKey, MAX_RATING, MIN_RATING, SEED_VERSION};
pub use language::LanguageCode;
pub use translation::TranslationCacheEntry;
