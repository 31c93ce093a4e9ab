//! Cohere embed adapter.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ProviderConfig;
use crate::dimensions::resolve_dimension;
use crate::error::Result;
use crate::http;
use crate::provider::{Embedding, EmbeddingInput, EmbeddingOutput, InputType, ProviderKind};

/// Embedding adapter for the Cohere embed API.
#[derive(Debug, Clone)]
pub struct CohereEmbedding {
    config: ProviderConfig,
    client: reqwest::Client,
    model: String,
    dimension: usize,
}

impl CohereEmbedding {
    pub const DEFAULT_MODEL: &'static str = "embed-english-v3.0";

    /// Create an adapter using `COHERE_API_KEY`.
    ///
    /// Without an explicit `dimension` the model must be in the
    /// dimensionality table.
    pub fn new(model: impl Into<String>, dimension: Option<usize>) -> Result<Self> {
        Self::with_config(
            ProviderConfig::from_env(ProviderKind::Cohere),
            model,
            dimension,
        )
    }

    /// Create an adapter for the default model from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(Self::DEFAULT_MODEL, None)
    }

    /// Create an adapter with an explicit credential.
    ///
    /// The credential is checked before the dimension is resolved.
    pub fn with_config(
        config: ProviderConfig,
        model: impl Into<String>,
        dimension: Option<usize>,
    ) -> Result<Self> {
        config.require_api_key()?;
        let model = model.into();
        let dimension = resolve_dimension(&model, dimension)?;
        Ok(Self {
            config,
            client: http::build_client()?,
            model,
            dimension,
        })
    }
}

/// Cohere names the search hints `search_query` and `search_document`;
/// every other value is forwarded unchanged.
fn cohere_input_type(input_type: &InputType) -> &str {
    match input_type {
        InputType::Query => "search_query",
        InputType::Document => "search_document",
        InputType::Other(value) => value,
    }
}

#[async_trait]
impl Embedding for CohereEmbedding {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Cohere
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn get_embeddings(
        &self,
        text: EmbeddingInput,
        input_type: Option<InputType>,
    ) -> Result<EmbeddingOutput> {
        let request = CohereEmbedRequest {
            texts: text.texts(),
            model: &self.model,
            input_type: input_type.as_ref().map(cohere_input_type),
        };
        debug!(
            input_type = ?request.input_type,
            "Generating {} Cohere embedding(s) with model: {}",
            request.texts.len(),
            self.model
        );

        let response: CohereEmbedResponse =
            http::post_json(&self.client, &self.config, "embed", &request).await?;

        info!("Generated {} Cohere embeddings", response.embeddings.len());

        EmbeddingOutput::shaped_like(&text, response.embeddings)
    }
}

#[derive(Debug, Serialize)]
struct CohereEmbedRequest<'a> {
    texts: Vec<&'a str>,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_type: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct CohereEmbedResponse {
    embeddings: Vec<Vec<f32>>,
}
