//! Provider credentials and adapter selection.
//!
//! Credentials are plain values that can be built explicitly or read from the
//! environment. The `from_lookup` variants take the variable lookup as a
//! function so callers can resolve them from somewhere other than the
//! process environment.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::cohere::CohereEmbedding;
use crate::error::{EmbeddingError, Result};
use crate::openai::OpenAIEmbedding;
use crate::provider::{Embedding, ProviderKind};
use crate::voyage::VoyageAIEmbedding;

/// Reads `name` from the process environment, treating blank values as unset.
pub fn env_lookup(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Credential and endpoint for one provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider these settings belong to.
    pub provider: ProviderKind,

    /// API key, `None` when not configured.
    pub api_key: Option<String>,

    /// API base URL without a trailing slash.
    pub base_url: String,
}

impl ProviderConfig {
    /// Explicit credential with the provider's default endpoint.
    pub fn new(provider: ProviderKind, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            api_key: Some(api_key.into()),
            base_url: provider.default_base_url().to_string(),
        }
    }

    /// No credential, default endpoint.
    pub fn unconfigured(provider: ProviderKind) -> Self {
        Self {
            provider,
            api_key: None,
            base_url: provider.default_base_url().to_string(),
        }
    }

    /// Read the provider's variables from the process environment.
    pub fn from_env(provider: ProviderKind) -> Self {
        Self::from_lookup(provider, env_lookup)
    }

    /// Read the provider's variables through `lookup`.
    pub fn from_lookup<F>(provider: ProviderKind, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            provider,
            api_key: lookup(provider.api_key_var()),
            base_url: provider.default_base_url().to_string(),
        };
        match lookup(provider.base_url_var()) {
            Some(url) => config.with_base_url(url),
            None => config,
        }
    }

    /// Point the adapter at another endpoint (a gateway or a test server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// The API key, or a missing-credential error naming its variable.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(EmbeddingError::MissingCredential {
                var: self.provider.api_key_var(),
            })
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("provider", &self.provider)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .finish()
    }
}

/// Which adapter to build and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Which provider to use.
    pub provider: ProviderKind,

    /// Model to use; the adapter's default when `None`.
    #[serde(default)]
    pub model: Option<String>,

    /// Output width; the adapter's default when `None`.
    #[serde(default)]
    pub dimension: Option<usize>,
}

impl EmbeddingSettings {
    /// Settings for `provider` with the adapter's default model and dimension.
    pub fn new(provider: ProviderKind) -> Self {
        Self {
            provider,
            model: None,
            dimension: None,
        }
    }

    /// Set the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the output dimension.
    pub fn with_dimension(mut self, dimension: usize) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Read `EMBEDDING_PROVIDER`, `EMBEDDING_MODEL` and `EMBEDDING_DIMENSION`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env_lookup)
    }

    /// Same as [`EmbeddingSettings::from_env`] with an injected lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let provider = match lookup("EMBEDDING_PROVIDER") {
            Some(name) => name.parse()?,
            None => ProviderKind::OpenAI,
        };
        let dimension = lookup("EMBEDDING_DIMENSION")
            .map(|raw| parse_dimension(&raw))
            .transpose()?;

        Ok(Self {
            provider,
            model: lookup("EMBEDDING_MODEL"),
            dimension,
        })
    }

    /// Build the selected adapter with credentials from the environment.
    pub fn build(&self) -> Result<Box<dyn Embedding>> {
        self.build_with_lookup(env_lookup)
    }

    /// Build the selected adapter with credentials resolved through `lookup`.
    ///
    /// OpenAI and Cohere resolve their credential here. Voyage keeps `lookup`
    /// and resolves it on every call.
    pub fn build_with_lookup<F>(&self, lookup: F) -> Result<Box<dyn Embedding>>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        debug!(
            provider = %self.provider,
            model = ?self.model,
            dimension = ?self.dimension,
            "Building embedding adapter"
        );

        let adapter: Box<dyn Embedding> = match self.provider {
            ProviderKind::OpenAI => {
                let model = self
                    .model
                    .as_deref()
                    .unwrap_or(OpenAIEmbedding::DEFAULT_MODEL);
                let dimension = self
                    .dimension
                    .unwrap_or(OpenAIEmbedding::DEFAULT_DIMENSION);
                let config = ProviderConfig::from_lookup(self.provider, lookup);
                Box::new(OpenAIEmbedding::with_config(config, model, dimension)?)
            }
            ProviderKind::Cohere => {
                let model = self
                    .model
                    .as_deref()
                    .unwrap_or(CohereEmbedding::DEFAULT_MODEL);
                let config = ProviderConfig::from_lookup(self.provider, lookup);
                Box::new(CohereEmbedding::with_config(config, model, self.dimension)?)
            }
            ProviderKind::VoyageAI => {
                let model = self
                    .model
                    .as_deref()
                    .unwrap_or(VoyageAIEmbedding::DEFAULT_MODEL);
                Box::new(VoyageAIEmbedding::with_lookup(
                    lookup,
                    model,
                    self.dimension,
                )?)
            }
        };
        Ok(adapter)
    }
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self::new(ProviderKind::OpenAI)
    }
}

/// Build the adapter described by `settings`, reading credentials from the
/// environment.
pub fn build_embedding(settings: &EmbeddingSettings) -> Result<Box<dyn Embedding>> {
    settings.build()
}

fn parse_dimension(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(dimension) if dimension > 0 => Ok(dimension),
        _ => Err(EmbeddingError::Config(format!(
            "EMBEDDING_DIMENSION must be a positive integer, got {raw:?}"
        ))),
    }
}
