//! Voyage AI embeddings adapter.
//!
//! Unlike the other adapters this one needs no credential to be constructed.
//! Unless a [`ProviderConfig`] is supplied, `VOYAGE_API_KEY` and
//! `VOYAGE_BASE_URL` are looked up on every call (in the process environment
//! by default), so the key can be provided after the adapter exists.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{ProviderConfig, env_lookup};
use crate::dimensions::resolve_dimension;
use crate::error::Result;
use crate::http::{self, IndexedEmbedding};
use crate::provider::{Embedding, EmbeddingInput, EmbeddingOutput, InputType, ProviderKind};

type Lookup = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Where the adapter finds its credential.
#[derive(Clone)]
enum Credentials {
    Fixed(ProviderConfig),
    /// Resolved through the lookup on every call.
    Lookup(Lookup),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(config) => f.debug_tuple("Fixed").field(config).finish(),
            Self::Lookup(_) => f.write_str("Lookup"),
        }
    }
}

/// Embedding adapter for the Voyage AI embeddings API.
#[derive(Debug, Clone)]
pub struct VoyageAIEmbedding {
    credentials: Credentials,
    client: reqwest::Client,
    model: String,
    /// Trusted as given, never checked against the model's real width.
    dimension: usize,
}

impl VoyageAIEmbedding {
    pub const DEFAULT_MODEL: &'static str = "voyage-large-2";

    /// Create an adapter that reads its credential from the environment when
    /// called.
    pub fn new(model: impl Into<String>, dimension: Option<usize>) -> Result<Self> {
        Self::with_lookup(env_lookup, model, dimension)
    }

    /// Create an adapter that resolves `VOYAGE_API_KEY` and `VOYAGE_BASE_URL`
    /// through `lookup` on every call.
    pub fn with_lookup<F>(
        lookup: F,
        model: impl Into<String>,
        dimension: Option<usize>,
    ) -> Result<Self>
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        Self::build(Credentials::Lookup(Arc::new(lookup)), model.into(), dimension)
    }

    /// Create an adapter with an explicit credential.
    ///
    /// A config without an API key is accepted here; calls will fail.
    pub fn with_config(
        config: ProviderConfig,
        model: impl Into<String>,
        dimension: Option<usize>,
    ) -> Result<Self> {
        Self::build(Credentials::Fixed(config), model.into(), dimension)
    }

    /// Create an adapter for the default model.
    pub fn from_env() -> Result<Self> {
        Self::new(Self::DEFAULT_MODEL, None)
    }

    fn build(
        credentials: Credentials,
        model: String,
        dimension: Option<usize>,
    ) -> Result<Self> {
        let dimension = resolve_dimension(&model, dimension)?;
        Ok(Self {
            credentials,
            client: http::build_client()?,
            model,
            dimension,
        })
    }

    fn resolved_config(&self) -> Cow<'_, ProviderConfig> {
        match &self.credentials {
            Credentials::Fixed(config) => Cow::Borrowed(config),
            Credentials::Lookup(lookup) => Cow::Owned(ProviderConfig::from_lookup(
                ProviderKind::VoyageAI,
                |name: &str| lookup(name),
            )),
        }
    }
}

#[async_trait]
impl Embedding for VoyageAIEmbedding {
    fn provider(&self) -> ProviderKind {
        ProviderKind::VoyageAI
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    /// `input_type` is forwarded unchanged (`"query"`, `"document"`, ...).
    async fn get_embeddings(
        &self,
        text: EmbeddingInput,
        input_type: Option<InputType>,
    ) -> Result<EmbeddingOutput> {
        let config = self.resolved_config();

        let input = match &text {
            EmbeddingInput::Single(single) => VoyageInput::Single(single),
            EmbeddingInput::Batch(batch) => VoyageInput::Batch(batch),
        };
        let request = VoyageEmbeddingRequest {
            input,
            model: &self.model,
            input_type: input_type.as_ref().map(InputType::as_str),
        };
        debug!(
            input_type = ?request.input_type,
            "Generating {} Voyage embedding(s) with model: {}",
            text.len(),
            self.model
        );

        let response: VoyageEmbeddingResponse =
            http::post_json(&self.client, &config, "embeddings", &request).await?;

        let vectors = http::in_input_order(response.data);
        info!("Generated {} Voyage embeddings", vectors.len());

        EmbeddingOutput::shaped_like(&text, vectors)
    }
}

#[derive(Debug, Serialize)]
struct VoyageEmbeddingRequest<'a> {
    input: VoyageInput<'a>,
    model: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    input_type: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum VoyageInput<'a> {
    Single(&'a str),
    Batch(&'a [String]),
}

#[derive(Debug, Deserialize)]
struct VoyageEmbeddingResponse {
    data: Vec<IndexedEmbedding>,
}
