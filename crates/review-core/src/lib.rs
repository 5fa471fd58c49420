pub mod error;
pub mod store;
pub mod query;
pub mod translation_cache;
pub mod translation;
pub mod seed;
pub mod storage;
pub mod api;

pub use error::{ReviewError, ReviewResult};
pub use store::{LoadReport, RetiredVersion, ReviewStore, SortOrder, StoreSnapshot};
pub use query::{ReviewOrdering, ReviewQueryService};
pub use translation_cache::{CacheStats, TranslationCache};
pub use translation::{Translation, TranslationOrigin, TranslationService, TranslationSettings};
pub use seed::{load_seed_file, parse_seed_csv, parse_seed_json};
pub use storage::SnapshotStorage;
pub use api::{ApiStats, ReviewApi};
