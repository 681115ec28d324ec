//! Integration tests for the gRPC adapter's async half against an
//! in-process fixture server. The blocking half lives in
//! `grpc_blocking.rs`.

#![cfg(feature = "grpc")]

mod fixture;

use fixture::Fixture;
use tei_client::grpc::pb;
use tei_client::{ClassificationItem, Error, GrpcClient, ModelType, RerankOptions, TeiClient};

async fn client_for(fixture: Fixture) -> GrpcClient {
    let uri = fixture::spawn(fixture).await;
    GrpcClient::new(uri).unwrap()
}

#[tokio::test]
async fn info_reports_each_model_type() {
    for (wire, expected) in [
        (pb::ModelType::Embedding, ModelType::Embedding),
        (pb::ModelType::Classifier, ModelType::Classifier),
        (pb::ModelType::Reranker, ModelType::Reranker),
    ] {
        let client = client_for(Fixture::new(wire)).await;
        let info = client.info().await.unwrap();
        assert_eq!(info.model_type, expected);
        // The wire schema carries no pooling or label metadata.
        assert_eq!(info.model_metadata, None);
        assert_eq!(info.model_id, "fixture/model");
    }
}

#[tokio::test]
async fn embed_single_input_returns_one_vector() {
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    let vectors = client
        .embed("Hello world".into(), &Default::default())
        .await
        .unwrap();
    assert_eq!(vectors.len(), 1);
    assert_eq!(vectors[0][0], "Hello world".len() as f32);
}

#[tokio::test]
async fn embed_batch_pairs_responses_with_requests_in_order() {
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    let vectors = client
        .embed(vec!["a", "bb", "ccc"].into(), &Default::default())
        .await
        .unwrap();
    assert_eq!(vectors.len(), 3);
    assert_eq!(vectors[0][0], 1.0);
    assert_eq!(vectors[1][0], 2.0);
    assert_eq!(vectors[2][0], 3.0);
}

#[tokio::test]
async fn embed_large_burst_drains_every_response() {
    fixture::init_tracing();
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    let texts: Vec<String> = (0..128).map(|i| "x".repeat(i % 7 + 1)).collect();
    let vectors = client
        .embed(texts.clone().into(), &Default::default())
        .await
        .unwrap();
    assert_eq!(vectors.len(), 128);
    assert_eq!(vectors[5][0], texts[5].len() as f32);
    assert_eq!(vectors[127][0], texts[127].len() as f32);
}

#[tokio::test]
async fn embed_all_returns_per_token_vectors() {
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    let results = client
        .embed_all("hello world".into(), &Default::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].len(), 2);
    assert!(results[0][0].len() > 1);
}

#[tokio::test]
async fn pretokenized_embed_input_is_rejected() {
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    let err = client
        .embed(vec![101u32, 102, 103].into(), &Default::default())
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn tokenize_returns_one_result_per_text() {
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    let results = client
        .tokenize(vec!["hello world", "foo bar"].into(), &Default::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].ids(), vec![0, 1]);
    assert_eq!(results[1].tokens[1].text, "bar");
}

#[tokio::test]
async fn decode_inverts_tokenize() {
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    let results = client
        .tokenize("hello world".into(), &Default::default())
        .await
        .unwrap();
    let decoded = client
        .decode(results[0].ids().into(), &Default::default())
        .await
        .unwrap();
    assert_eq!(decoded, vec!["hello world".to_string()]);
}

#[tokio::test]
async fn classify_single_texts_use_the_single_stub() {
    let client = client_for(Fixture::new(pb::ModelType::Classifier)).await;
    let results = client
        .classify(vec!["one", "two"].into(), &Default::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.scores[0].label == "SINGLE"));
}

#[tokio::test]
async fn classify_pairs_use_the_pair_stub() {
    let client = client_for(Fixture::new(pb::ModelType::Classifier)).await;
    let results = client
        .classify(
            vec![("it rains", "wet"), ("sunny", "dry")].into(),
            &Default::default(),
        )
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.scores[0].label == "PAIR"));
}

#[tokio::test]
async fn mixed_classification_batch_is_rejected() {
    let client = client_for(Fixture::new(pb::ModelType::Classifier)).await;
    let input: tei_client::ClassificationInput = vec![
        ClassificationItem::from("single"),
        ClassificationItem::from(("premise", "hypothesis")),
    ]
    .into();
    let err = client.classify(input, &Default::default()).await.unwrap_err();
    assert!(matches!(err, Error::Validation(_)), "got {err:?}");
}

#[tokio::test]
async fn truncated_stream_reports_received_and_expected() {
    let client =
        client_for(Fixture::new(pb::ModelType::Embedding).with_truncated_embed(1)).await;
    let err = client
        .embed(vec!["a", "b", "c"].into(), &Default::default())
        .await
        .unwrap_err();
    match err {
        Error::StreamTruncated { received, expected } => {
            assert_eq!(received, 1);
            assert_eq!(expected, 3);
        }
        other => panic!("expected StreamTruncated, got {other:?}"),
    }
}

#[tokio::test]
async fn rerank_ranks_higher_relevance_first() {
    let client = client_for(Fixture::new(pb::ModelType::Reranker)).await;
    let result = client
        .rerank(
            "query",
            &["low relevance".to_string(), "high relevance".to_string()],
            &RerankOptions {
                return_text: true,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.ranks[0].index, 1);
    assert_eq!(result.ranks[1].index, 0);
    assert_eq!(result.ranks[0].text.as_deref(), Some("high relevance"));
    assert!(result.ranks[0].score > result.ranks[1].score);
}

#[tokio::test]
async fn embed_against_classifier_is_a_type_mismatch() {
    let client = client_for(Fixture::new(pb::ModelType::Classifier)).await;
    let err = client
        .embed("text".into(), &Default::default())
        .await
        .unwrap_err();
    match err {
        Error::TypeMismatch { expected, actual } => {
            assert_eq!(expected, ModelType::Embedding);
            assert_eq!(actual, ModelType::Classifier);
        }
        other => panic!("expected TypeMismatch, got {other:?}"),
    }
}

#[tokio::test]
async fn health_is_connectivity_based() {
    let client = client_for(Fixture::new(pb::ModelType::Embedding)).await;
    // A fresh channel is idle, which counts as healthy without a round trip.
    assert!(client.health().await.unwrap());
    client.info().await.unwrap();
    assert!(client.health().await.unwrap());
}

#[tokio::test]
async fn health_goes_false_after_a_transport_failure() {
    // A port with nothing listening on it.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GrpcClient::new(format!("http://{addr}")).unwrap();
    assert!(client.info().await.is_err());
    assert!(!client.health().await.unwrap());
}
