pub mod traits;
pub mod error;
pub mod http;
pub mod libretranslate;
pub mod deepl;
pub mod factory;

pub use traits::TranslationProvider;
pub use error::{ProviderError, ProviderErrorKind};
pub use libretranslate::LibreTranslateProvider;
pub use deepl::DeepLProvider;
pub use factory::create_provider;
