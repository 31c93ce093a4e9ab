//! Error types for the embedding adapters.

use thiserror::Error;

use crate::provider::ProviderKind;

/// Result type alias for embedding operations.
pub type Result<T> = std::result::Result<T, EmbeddingError>;

/// Errors that can occur while building or calling an embedding adapter.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// No explicit dimension was given and the model is not in the
    /// dimensionality table.
    #[error("dimension for model {model} is unknown, please provide the dimension manually")]
    UnknownModel { model: String },

    /// A required credential is not configured.
    #[error("missing credential: {var} is not set")]
    MissingCredential { var: &'static str },

    /// Settings could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// The provider answered with a non-success status.
    #[error("{provider} returned {status}: {body}")]
    Provider {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    /// A success response that cannot be shaped into the requested output.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// HTTP transport error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl EmbeddingError {
    /// Whether this error was raised while constructing an adapter.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::UnknownModel { .. } | Self::MissingCredential { .. } | Self::Config(_)
        )
    }
}
