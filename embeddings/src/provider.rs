//! The embedding capability shared by every provider adapter.
//!
//! An adapter takes either one text or an ordered batch of texts and returns
//! vectors in the same shape: one text in, one vector out; N texts in, N
//! vectors out in input order.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{EmbeddingError, Result};

/// A dense vector embedding.
pub type EmbeddingVector = Vec<f32>;

/// Which provider an adapter talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// OpenAI embeddings API.
    #[serde(rename = "openai")]
    OpenAI,
    /// Cohere embed API.
    Cohere,
    /// Voyage AI embeddings API.
    #[serde(rename = "voyageai", alias = "voyage")]
    VoyageAI,
}

impl ProviderKind {
    /// Stable lowercase name of the provider.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAI => "openai",
            Self::Cohere => "cohere",
            Self::VoyageAI => "voyageai",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn api_key_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_API_KEY",
            Self::Cohere => "COHERE_API_KEY",
            Self::VoyageAI => "VOYAGE_API_KEY",
        }
    }

    /// Environment variable overriding this provider's API base URL.
    pub fn base_url_var(self) -> &'static str {
        match self {
            Self::OpenAI => "OPENAI_BASE_URL",
            Self::Cohere => "COHERE_BASE_URL",
            Self::VoyageAI => "VOYAGE_BASE_URL",
        }
    }

    pub fn default_base_url(self) -> &'static str {
        match self {
            Self::OpenAI => "https://api.openai.com/v1",
            Self::Cohere => "https://api.cohere.ai/v1",
            Self::VoyageAI => "https://api.voyageai.com/v1",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = EmbeddingError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "cohere" => Ok(Self::Cohere),
            "voyageai" | "voyage" => Ok(Self::VoyageAI),
            other => Err(EmbeddingError::Config(format!(
                "unknown embedding provider: {other}"
            ))),
        }
    }
}

/// Semantic hint telling the provider whether the text is a search query or
/// a document being indexed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputType {
    Query,
    Document,
    /// Any other provider-specific value, sent as-is where the provider
    /// forwards it.
    Other(String),
}

impl InputType {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Query => "query",
            Self::Document => "document",
            Self::Other(value) => value,
        }
    }
}

impl From<&str> for InputType {
    fn from(value: &str) -> Self {
        match value {
            "query" => Self::Query,
            "document" => Self::Document,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for InputType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "query" => Self::Query,
            "document" => Self::Document,
            _ => Self::Other(value),
        }
    }
}

impl fmt::Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text handed to [`Embedding::get_embeddings`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
}

impl EmbeddingInput {
    /// Number of texts carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(texts) => texts.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_single(&self) -> bool {
        matches!(self, Self::Single(_))
    }

    /// Borrow every text in order; a single text becomes a one-element list.
    pub fn texts(&self) -> Vec<&str> {
        match self {
            Self::Single(text) => vec![text.as_str()],
            Self::Batch(texts) => texts.iter().map(String::as_str).collect(),
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        Self::Single(text.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(text: String) -> Self {
        Self::Single(text)
    }
}

impl From<&String> for EmbeddingInput {
    fn from(text: &String) -> Self {
        Self::Single(text.clone())
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(texts: Vec<String>) -> Self {
        Self::Batch(texts)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(texts: Vec<&str>) -> Self {
        Self::Batch(texts.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for EmbeddingInput {
    fn from(texts: &[&str]) -> Self {
        Self::Batch(texts.iter().map(ToString::to_string).collect())
    }
}

impl From<&[String]> for EmbeddingInput {
    fn from(texts: &[String]) -> Self {
        Self::Batch(texts.to_vec())
    }
}

/// Vectors returned by [`Embedding::get_embeddings`], shaped like the input.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingOutput {
    Single(EmbeddingVector),
    Batch(Vec<EmbeddingVector>),
}

impl EmbeddingOutput {
    /// Shape `vectors` after `input`: the first vector for a single text,
    /// all of them for a batch.
    pub(crate) fn shaped_like(
        input: &EmbeddingInput,
        vectors: Vec<EmbeddingVector>,
    ) -> Result<Self> {
        match input {
            EmbeddingInput::Single(_) => vectors
                .into_iter()
                .next()
                .map(Self::Single)
                .ok_or_else(|| {
                    EmbeddingError::InvalidResponse("no embedding in response".to_string())
                }),
            EmbeddingInput::Batch(_) => Ok(Self::Batch(vectors)),
        }
    }

    /// The vector of a single-text call, `None` for a batch.
    pub fn into_single(self) -> Option<EmbeddingVector> {
        match self {
            Self::Single(vector) => Some(vector),
            Self::Batch(_) => None,
        }
    }

    /// The vectors of a batch call, `None` for a single text.
    pub fn into_batch(self) -> Option<Vec<EmbeddingVector>> {
        match self {
            Self::Single(_) => None,
            Self::Batch(vectors) => Some(vectors),
        }
    }

    /// Number of vectors carried.
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Batch(vectors) => vectors.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A text embedding capability backed by one provider.
///
/// Every adapter resolves its `dimension` at construction, so a constructed
/// adapter always reports a positive width.
#[async_trait]
pub trait Embedding: Send + Sync {
    /// Provider this adapter talks to.
    fn provider(&self) -> ProviderKind;

    /// Model identifier sent with every request.
    fn model(&self) -> &str;

    /// Output vector width.
    fn dimension(&self) -> usize;

    /// Embed one text or an ordered batch of texts.
    ///
    /// The output has the same shape as the input. One network round trip is
    /// made per call and provider failures are returned as-is.
    async fn get_embeddings(
        &self,
        text: EmbeddingInput,
        input_type: Option<InputType>,
    ) -> Result<EmbeddingOutput>;
}
