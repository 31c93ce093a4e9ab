//! # Embeddings
//!
//! One interface for turning text into dense vectors, backed by several
//! hosted embedding providers.
//!
//! ## Providers
//!
//! - **OpenAI**: `text-embedding-3-*` models with a caller-chosen width
//! - **Cohere**: `embed-*-v3.0` models, query/document aware
//! - **Voyage AI**: `voyage-*` models, query/document aware
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Embedding adapters                         │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingSettings ──► dyn Embedding ──► EmbeddingOutput        │
//! │         │                    │                                  │
//! │         ▼                    ▼                                  │
//! │  ProviderConfig     OpenAI / Cohere / VoyageAI                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use sprag_embeddings::{CohereEmbedding, Embedding, InputType};
//!
//! async fn example() -> sprag_embeddings::Result<()> {
//!     let cohere = CohereEmbedding::new("embed-english-v3.0", None)?;
//!     let query = cohere
//!         .get_embeddings("what is a vector?".into(), Some(InputType::Query))
//!         .await?;
//!     assert_eq!(query.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod cohere;
pub mod config;
pub mod dimensions;
pub mod error;
mod http;
pub mod openai;
pub mod provider;
pub mod voyage;

pub use cohere::CohereEmbedding;
pub use config::{EmbeddingSettings, ProviderConfig, build_embedding};
pub use dimensions::{DIMENSIONALITY, known_dimension};
pub use error::{EmbeddingError, Result};
pub use openai::OpenAIEmbedding;
pub use provider::{
    Embedding, EmbeddingInput, EmbeddingOutput, EmbeddingVector, InputType, ProviderKind,
};
pub use voyage::VoyageAIEmbedding;
