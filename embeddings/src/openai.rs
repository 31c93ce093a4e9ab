//! OpenAI embeddings adapter.
//!
//! Only the v3 model family (`text-embedding-3-small`,
//! `text-embedding-3-large`) accepts the `dimensions` parameter this adapter
//! always sends. Other models are not rejected here; the API will refuse them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::dimensions::require_positive;
use crate::error::Result;
use crate::http::{self, IndexedEmbedding};
use crate::provider::{Embedding, EmbeddingInput, EmbeddingOutput, InputType, ProviderKind};

/// Embedding adapter for the OpenAI embeddings API.
#[derive(Debug, Clone)]
pub struct OpenAIEmbedding {
    /// Credential and endpoint.
    config: ProviderConfig,

    /// HTTP client.
    client: reqwest::Client,

    /// Model name.
    model: String,

    /// Requested output width.
    dimension: usize,
}

impl OpenAIEmbedding {
    pub const DEFAULT_MODEL: &'static str = "text-embedding-3-small";
    pub const DEFAULT_DIMENSION: usize = 768;

    /// Create an adapter using `OPENAI_API_KEY` (and `OPENAI_BASE_URL` if set).
    pub fn new(model: impl Into<String>, dimension: usize) -> Result<Self> {
        Self::with_config(
            ProviderConfig::from_env(ProviderKind::OpenAI),
            model,
            dimension,
        )
    }

    /// Create an adapter with the default model and dimension from the
    /// environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Self::DEFAULT_MODEL, Self::DEFAULT_DIMENSION)
    }

    /// Create an adapter with an explicit credential.
    ///
    /// Fails when `config` carries no API key or `dimension` is zero.
    pub fn with_config(
        config: ProviderConfig,
        model: impl Into<String>,
        dimension: usize,
    ) -> Result<Self> {
        config.require_api_key()?;
        let dimension = require_positive(dimension)?;
        Ok(Self {
            config,
            client: http::build_client()?,
            model: model.into(),
            dimension,
        })
    }
}

#[async_trait]
impl Embedding for OpenAIEmbedding {
    fn provider(&self) -> ProviderKind {
        ProviderKind::OpenAI
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// `input_type` has no OpenAI counterpart and is ignored.
    async fn get_embeddings(
        &self,
        text: EmbeddingInput,
        _input_type: Option<InputType>,
    ) -> Result<EmbeddingOutput> {
        debug!(
            "Generating {} OpenAI embedding(s) with model: {}",
            text.len(),
            self.model
        );

        let input = match &text {
            EmbeddingInput::Single(single) => OpenAIInput::Single(single),
            EmbeddingInput::Batch(batch) => OpenAIInput::Batch(batch),
        };
        let request = OpenAIEmbeddingRequest {
            model: &self.model,
            input,
            dimensions: self.dimension,
        };

        let response: OpenAIEmbeddingResponse =
            http::post_json(&self.client, &self.config, "embeddings", &request).await?;

        let vectors = http::in_input_order(response.data);
        info!(
            "Generated {} embeddings with {} dimensions",
            vectors.len(),
            vectors.first().map_or(0, Vec::len)
        );

        EmbeddingOutput::shaped_like(&text, vectors)
    }
}

#[derive(Debug, Serialize)]
struct OpenAIEmbeddingRequest<'a> {
    model: &'a str,
    input: OpenAIInput<'a>,
    dimensions: usize,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAIInput<'a> {
    Single(&'a str),
    Batch(&'a [String]),
}

/// OpenAI API response format.
#[derive(Debug, Deserialize)]
struct OpenAIEmbeddingResponse {
    data: Vec<IndexedEmbedding>,
}
