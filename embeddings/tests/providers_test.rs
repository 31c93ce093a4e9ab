//! Adapter tests against mock provider endpoints.
//!
//! Every test points an adapter at a local `wiremock` server and checks both
//! the request it sends and how it shapes the reply.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use serde_json::json;
use sprag_embeddings::{
    CohereEmbedding, Embedding, EmbeddingError, EmbeddingOutput, EmbeddingSettings, InputType,
    OpenAIEmbedding, ProviderConfig, ProviderKind, VoyageAIEmbedding,
};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("sprag_embeddings=debug")
        .with_test_writer()
        .try_init();
}

fn config_for(server: &MockServer, provider: ProviderKind, key: &str) -> ProviderConfig {
    ProviderConfig::new(provider, key).with_base_url(format!("{}/v1", server.uri()))
}

fn indexed(vectors: &[(usize, Vec<f32>)]) -> serde_json::Value {
    let data: Vec<_> = vectors
        .iter()
        .map(|(index, embedding)| json!({"object": "embedding", "index": index, "embedding": embedding}))
        .collect();
    json!({"object": "list", "data": data, "model": "m", "usage": {"total_tokens": 3}})
}

#[tokio::test]
async fn test_openai_single_text() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_json(json!({
            "model": "text-embedding-3-small",
            "input": "hello",
            "dimensions": 768
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&[(0, vec![0.5, 0.25])])))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = OpenAIEmbedding::with_config(
        config_for(&server, ProviderKind::OpenAI, "sk-test"),
        OpenAIEmbedding::DEFAULT_MODEL,
        OpenAIEmbedding::DEFAULT_DIMENSION,
    )
    .unwrap();

    // input_type has no OpenAI counterpart and must not reach the body.
    let output = adapter
        .get_embeddings("hello".into(), Some(InputType::Query))
        .await
        .unwrap();

    assert_eq!(output, EmbeddingOutput::Single(vec![0.5, 0.25]));
}

#[tokio::test]
async fn test_openai_batch_keeps_input_order() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_json(json!({
            "model": "text-embedding-3-large",
            "input": ["first", "second", "third"],
            "dimensions": 256
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&[
            (2, vec![3.0]),
            (0, vec![1.0]),
            (1, vec![2.0]),
        ])))
        .mount(&server)
        .await;

    let adapter = OpenAIEmbedding::with_config(
        config_for(&server, ProviderKind::OpenAI, "sk-test"),
        "text-embedding-3-large",
        256,
    )
    .unwrap();

    let output = adapter
        .get_embeddings(vec!["first", "second", "third"].into(), None)
        .await
        .unwrap();

    assert_eq!(
        output,
        EmbeddingOutput::Batch(vec![vec![1.0], vec![2.0], vec![3.0]])
    );
}

#[tokio::test]
async fn test_openai_provider_error_is_returned_verbatim() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"error":{"message":"bad key"}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let adapter = OpenAIEmbedding::with_config(
        config_for(&server, ProviderKind::OpenAI, "sk-wrong"),
        OpenAIEmbedding::DEFAULT_MODEL,
        OpenAIEmbedding::DEFAULT_DIMENSION,
    )
    .unwrap();

    let err = adapter
        .get_embeddings("hello".into(), None)
        .await
        .unwrap_err();

    match err {
        EmbeddingError::Provider {
            provider,
            status,
            body,
        } => {
            assert_eq!(provider, ProviderKind::OpenAI);
            assert_eq!(status, 401);
            assert_eq!(body, r#"{"error":{"message":"bad key"}}"#);
        }
        other => panic!("expected provider error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_cohere_single_text_is_sent_as_list() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .and(header("authorization", "Bearer co-test"))
        .and(body_json(json!({
            "texts": ["hello"],
            "model": "embed-english-v3.0",
            "input_type": "search_query"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "abc",
            "texts": ["hello"],
            "embeddings": [[0.1, 0.2, 0.3]],
            "meta": {"api_version": {"version": "1"}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = CohereEmbedding::with_config(
        config_for(&server, ProviderKind::Cohere, "co-test"),
        CohereEmbedding::DEFAULT_MODEL,
        None,
    )
    .unwrap();
    assert_eq!(adapter.dimension(), 1024);

    let output = adapter
        .get_embeddings("hello".into(), Some(InputType::Query))
        .await
        .unwrap();

    assert_eq!(output.into_single(), Some(vec![0.1, 0.2, 0.3]));
}

#[tokio::test]
async fn test_cohere_batch_documents() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .and(body_json(json!({
            "texts": ["a", "b", "c"],
            "model": "embed-multilingual-light-v3.0",
            "input_type": "search_document"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[1.0], [2.0], [3.0]]
        })))
        .mount(&server)
        .await;

    let adapter = CohereEmbedding::with_config(
        config_for(&server, ProviderKind::Cohere, "co-test"),
        "embed-multilingual-light-v3.0",
        None,
    )
    .unwrap();
    assert_eq!(adapter.dimension(), 384);

    let output = adapter
        .get_embeddings(vec!["a", "b", "c"].into(), Some(InputType::Document))
        .await
        .unwrap();

    assert_eq!(
        output.into_batch(),
        Some(vec![vec![1.0], vec![2.0], vec![3.0]])
    );
}

#[tokio::test]
async fn test_cohere_other_input_types_pass_through() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .and(body_json(json!({
            "texts": ["spam?"],
            "model": "embed-english-v3.0",
            "input_type": "classification"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embeddings": [[0.0]]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .and(body_json(json!({
            "texts": ["plain"],
            "model": "embed-english-v3.0"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"embeddings": [[1.0]]})))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = CohereEmbedding::with_config(
        config_for(&server, ProviderKind::Cohere, "co-test"),
        "embed-english-v3.0",
        None,
    )
    .unwrap();

    let classified = adapter
        .get_embeddings("spam?".into(), Some(InputType::from("classification")))
        .await
        .unwrap();
    assert_eq!(classified, EmbeddingOutput::Single(vec![0.0]));

    let plain = adapter.get_embeddings("plain".into(), None).await.unwrap();
    assert_eq!(plain, EmbeddingOutput::Single(vec![1.0]));
}

#[tokio::test]
async fn test_voyage_single_text_keeps_input_type() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer pa-test"))
        .and(body_json(json!({
            "input": "hello",
            "model": "voyage-code-2",
            "input_type": "query"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&[(0, vec![0.75])])))
        .expect(1)
        .mount(&server)
        .await;

    let adapter = VoyageAIEmbedding::with_config(
        config_for(&server, ProviderKind::VoyageAI, "pa-test"),
        "voyage-code-2",
        None,
    )
    .unwrap();
    assert_eq!(adapter.dimension(), 1536);

    let output = adapter
        .get_embeddings("hello".into(), Some(InputType::Query))
        .await
        .unwrap();

    assert_eq!(output, EmbeddingOutput::Single(vec![0.75]));
}

#[tokio::test]
async fn test_voyage_batch_documents() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(body_json(json!({
            "input": ["x", "y"],
            "model": "voyage-law-2",
            "input_type": "document"
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(indexed(&[(1, vec![9.0]), (0, vec![8.0])])),
        )
        .mount(&server)
        .await;

    let adapter = VoyageAIEmbedding::with_config(
        config_for(&server, ProviderKind::VoyageAI, "pa-test"),
        "voyage-law-2",
        None,
    )
    .unwrap();

    let output = adapter
        .get_embeddings(vec!["x", "y"].into(), Some(InputType::Document))
        .await
        .unwrap();

    assert_eq!(output, EmbeddingOutput::Batch(vec![vec![8.0], vec![9.0]]));
}

#[tokio::test]
async fn test_voyage_without_key_fails_before_request() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let adapter = VoyageAIEmbedding::with_config(
        ProviderConfig::unconfigured(ProviderKind::VoyageAI)
            .with_base_url(format!("{}/v1", server.uri())),
        "voyage-large-2",
        None,
    )
    .unwrap();

    let err = adapter
        .get_embeddings("hello".into(), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        EmbeddingError::MissingCredential {
            var: "VOYAGE_API_KEY"
        }
    ));
}

#[tokio::test]
async fn test_settings_build_dispatches_to_provider() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embed"))
        .and(body_json(json!({
            "texts": ["one", "two"],
            "model": "embed-english-light-v3.0",
            "input_type": "search_document"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "embeddings": [[1.0, 1.0], [2.0, 2.0]]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vars: HashMap<&'static str, String> = HashMap::from([
        ("EMBEDDING_PROVIDER", "cohere".to_string()),
        ("EMBEDDING_MODEL", "embed-english-light-v3.0".to_string()),
        ("COHERE_API_KEY", "co-test".to_string()),
        ("COHERE_BASE_URL", format!("{}/v1", server.uri())),
    ]);
    let lookup = move |name: &str| vars.get(name).cloned();

    let settings = EmbeddingSettings::from_lookup(&lookup).unwrap();
    let adapter: Box<dyn Embedding> = settings.build_with_lookup(lookup).unwrap();
    assert_eq!(adapter.provider(), ProviderKind::Cohere);
    assert_eq!(adapter.dimension(), 384);

    let output = adapter
        .get_embeddings(vec!["one", "two"].into(), Some(InputType::Document))
        .await
        .unwrap();

    assert_eq!(output.len(), 2);
    assert_eq!(
        output,
        EmbeddingOutput::Batch(vec![vec![1.0, 1.0], vec![2.0, 2.0]])
    );
}

#[tokio::test]
async fn test_voyage_reads_credential_at_call_time() {
    init_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/embeddings"))
        .and(header("authorization", "Bearer voyage-late"))
        .and(body_json(json!({"input": "hello", "model": "voyage-law-2"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(indexed(&[(0, vec![0.5, 0.5])])))
        .expect(1)
        .mount(&server)
        .await;

    let vars: Arc<Mutex<HashMap<String, String>>> = Arc::default();
    let shared = Arc::clone(&vars);
    let adapter = VoyageAIEmbedding::with_lookup(
        move |name: &str| shared.lock().ok()?.get(name).cloned(),
        "voyage-law-2",
        None,
    )
    .unwrap();

    let err = adapter
        .get_embeddings("hello".into(), None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        EmbeddingError::MissingCredential {
            var: "VOYAGE_API_KEY"
        }
    ));

    {
        let mut vars = vars.lock().unwrap();
        vars.insert("VOYAGE_API_KEY".to_string(), "voyage-late".to_string());
        vars.insert("VOYAGE_BASE_URL".to_string(), format!("{}/v1", server.uri()));
    }

    let output = adapter.get_embeddings("hello".into(), None).await.unwrap();
    assert_eq!(output, EmbeddingOutput::Single(vec![0.5, 0.5]));
}
