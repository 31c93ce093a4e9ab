//! JSON-over-HTTP plumbing shared by the provider adapters.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;
use crate::error::{EmbeddingError, Result};

/// Build the HTTP client an adapter holds for its lifetime.
pub(crate) fn build_client() -> Result<reqwest::Client> {
    Ok(reqwest::Client::builder().build()?)
}

/// POST `body` to `path` under the configured base URL and decode the reply.
///
/// A non-success status becomes [`EmbeddingError::Provider`] with the
/// response body kept verbatim.
pub(crate) async fn post_json<B, R>(
    client: &reqwest::Client,
    config: &ProviderConfig,
    path: &str,
    body: &B,
) -> Result<R>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let api_key = config.require_api_key()?;

    let response = client
        .post(config.endpoint(path))
        .bearer_auth(api_key)
        .json(body)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(EmbeddingError::Provider {
            provider: config.provider,
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Vectors tagged with their input position, as returned by the OpenAI and
/// Voyage APIs.
#[derive(Debug, Deserialize)]
pub(crate) struct IndexedEmbedding {
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub index: usize,
}

/// Put `data` back into input order and drop the indices.
pub(crate) fn in_input_order(mut data: Vec<IndexedEmbedding>) -> Vec<Vec<f32>> {
    data.sort_by_key(|item| item.index);
    data.into_iter().map(|item| item.embedding).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_input_order() {
        let data = vec![
            IndexedEmbedding {
                embedding: vec![2.0],
                index: 2,
            },
            IndexedEmbedding {
                embedding: vec![0.0],
                index: 0,
            },
            IndexedEmbedding {
                embedding: vec![1.0],
                index: 1,
            },
        ];
        assert_eq!(in_input_order(data), vec![vec![0.0], vec![1.0], vec![2.0]]);
    }
}
