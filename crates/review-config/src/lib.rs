pub mod config;
pub mod paths;

pub use config::{Config, LoggingConfig, ProviderKind, StoreConfig, TranslationConfig, API_KEY_ENV_VAR};
pub use paths::{PathManager, container_base_path};
