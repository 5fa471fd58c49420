use review_models::MovieId;
use review_translate::ProviderError;
use thiserror::Error;

/// Error taxonomy shared by the store, the query layer and the translation overlay.
///
/// `Clone` so that a single resolved outcome can be replayed to every caller
/// waiting on the same in-flight translation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReviewError {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("review not found: movie {movie_id}, reviewer {reviewer_name:?}")]
    NotFound {
        movie_id: MovieId,
        reviewer_name: String,
    },

    #[error(
        "version conflict for movie {movie_id}, reviewer {reviewer_name:?}: stored version {current_version}, attempted {attempted_version}"
    )]
    Conflict {
        movie_id: MovieId,
        reviewer_name: String,
        current_version: u64,
        attempted_version: u64,
    },

    #[error(transparent)]
    TranslationProvider(#[from] ProviderError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl ReviewError {
    pub fn validation(message: impl Into<String>) -> Self {
        ReviewError::Validation(message.into())
    }

    pub fn not_found(movie_id: MovieId, reviewer_name: &str) -> Self {
        ReviewError::NotFound {
            movie_id,
            reviewer_name: reviewer_name.to_string(),
        }
    }

    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            ReviewError::Validation(_) => "validation",
            ReviewError::NotFound { .. } => "not-found",
            ReviewError::Conflict { .. } => "conflict",
            ReviewError::TranslationProvider(_) => "translation-provider",
            ReviewError::Storage(_) => "storage",
        }
    }

    /// Whether a caller may retry after a fresh read
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReviewError::Conflict { .. })
    }
}

impl From<std::io::Error> for ReviewError {
    fn from(e: std::io::Error) -> Self {
        ReviewError::Storage(e.to_string())
    }
}

impl From<bincode::Error> for ReviewError {
    fn from(e: bincode::Error) -> Self {
        ReviewError::Storage(format!("snapshot encoding failed: {}", e))
    }
}

pub type ReviewResult<T> = Result<T, ReviewError>;
