//! In-process `tei.v1` fixture server for gRPC adapter tests.
//!
//! Responses are derived deterministically from the requests so tests can
//! check response-to-request pairing: embed vectors start with the input
//! length, tokenize/decode share a fixed vocabulary, rerank scores later
//! texts higher.

#![allow(dead_code)]

use futures::Stream;
use std::net::SocketAddr;
use std::pin::Pin;
use tei_client::grpc::pb;
use tokio_stream::wrappers::{ReceiverStream, TcpListenerStream};
use tonic::transport::{server::Router, Server};
use tonic::{Request, Response, Status, Streaming};

pub type ResponseStream<T> = Pin<Box<dyn Stream<Item = Result<T, Status>> + Send>>;

const VOCAB: &[&str] = &["hello", "world", "foo", "bar", "baz"];

/// Call at the top of a test to see client and fixture traces via RUST_LOG.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Answer each inbound message with `map(message)`. When `limit` is set,
/// only the first `limit` responses are written (the rest of the inbound
/// stream is still drained) to simulate a truncated response stream that
/// closes cleanly.
fn relay<Req, Resp, F>(
    mut inbound: Streaming<Req>,
    limit: Option<usize>,
    map: F,
) -> ResponseStream<Resp>
where
    Req: Send + 'static,
    Resp: Send + 'static,
    F: Fn(Req) -> Resp + Send + 'static,
{
    let (tx, rx) = tokio::sync::mpsc::channel(16);
    tokio::spawn(async move {
        let mut sent = 0usize;
        while let Ok(Some(request)) = inbound.message().await {
            if limit.is_some_and(|limit| sent >= limit) {
                continue;
            }
            if tx.send(Ok(map(request))).await.is_err() {
                break;
            }
            sent += 1;
        }
    });
    Box::pin(ReceiverStream::new(rx))
}

#[derive(Clone)]
pub struct Fixture {
    pub model_type: pb::ModelType,
    pub truncate_embed_after: Option<usize>,
}

impl Fixture {
    pub fn new(model_type: pb::ModelType) -> Self {
        Self {
            model_type,
            truncate_embed_after: None,
        }
    }

    pub fn with_truncated_embed(mut self, after: usize) -> Self {
        self.truncate_embed_after = Some(after);
        self
    }
}

#[tonic::async_trait]
impl pb::info_server::Info for Fixture {
    async fn info(
        &self,
        _request: Request<pb::InfoRequest>,
    ) -> Result<Response<pb::InfoResponse>, Status> {
        Ok(Response::new(pb::InfoResponse {
            version: "1.6.0".to_string(),
            sha: None,
            docker_label: None,
            model_id: "fixture/model".to_string(),
            model_sha: None,
            model_dtype: "float32".to_string(),
            model_type: self.model_type as i32,
            max_concurrent_requests: 512,
            max_input_length: 8192,
            max_batch_tokens: 16384,
            max_batch_requests: None,
            max_client_batch_size: 32,
            tokenization_workers: 4,
        }))
    }
}

#[tonic::async_trait]
impl pb::embed_server::Embed for Fixture {
    type EmbedStreamStream = ResponseStream<pb::EmbedResponse>;

    async fn embed_stream(
        &self,
        request: Request<Streaming<pb::EmbedRequest>>,
    ) -> Result<Response<Self::EmbedStreamStream>, Status> {
        let limit = self.truncate_embed_after;
        Ok(Response::new(relay(
            request.into_inner(),
            limit,
            |request: pb::EmbedRequest| pb::EmbedResponse {
                embeddings: vec![request.inputs.len() as f32, 0.25],
                metadata: None,
            },
        )))
    }

    type EmbedAllStreamStream = ResponseStream<pb::EmbedAllResponse>;

    async fn embed_all_stream(
        &self,
        request: Request<Streaming<pb::EmbedAllRequest>>,
    ) -> Result<Response<Self::EmbedAllStreamStream>, Status> {
        Ok(Response::new(relay(
            request.into_inner(),
            None,
            |request: pb::EmbedAllRequest| pb::EmbedAllResponse {
                token_embeddings: request
                    .inputs
                    .split_whitespace()
                    .map(|word| pb::TokenEmbedding {
                        embeddings: vec![word.len() as f32, 1.0],
                    })
                    .collect(),
                metadata: None,
            },
        )))
    }
}

#[tonic::async_trait]
impl pb::tokenize_server::Tokenize for Fixture {
    type TokenizeStreamStream = ResponseStream<pb::EncodeResponse>;

    async fn tokenize_stream(
        &self,
        request: Request<Streaming<pb::EncodeRequest>>,
    ) -> Result<Response<Self::TokenizeStreamStream>, Status> {
        Ok(Response::new(relay(
            request.into_inner(),
            None,
            |request: pb::EncodeRequest| pb::EncodeResponse {
                tokens: request
                    .inputs
                    .split_whitespace()
                    .map(|word| pb::SimpleToken {
                        id: VOCAB.iter().position(|entry| *entry == word).unwrap_or(0) as u32,
                        text: word.to_string(),
                        special: false,
                        start: None,
                        stop: None,
                    })
                    .collect(),
            },
        )))
    }

    type DecodeStreamStream = ResponseStream<pb::DecodeResponse>;

    async fn decode_stream(
        &self,
        request: Request<Streaming<pb::DecodeRequest>>,
    ) -> Result<Response<Self::DecodeStreamStream>, Status> {
        Ok(Response::new(relay(
            request.into_inner(),
            None,
            |request: pb::DecodeRequest| pb::DecodeResponse {
                text: request
                    .ids
                    .iter()
                    .map(|id| VOCAB[*id as usize % VOCAB.len()])
                    .collect::<Vec<_>>()
                    .join(" "),
            },
        )))
    }
}

#[tonic::async_trait]
impl pb::predict_server::Predict for Fixture {
    type PredictStreamStream = ResponseStream<pb::PredictResponse>;

    async fn predict_stream(
        &self,
        request: Request<Streaming<pb::PredictRequest>>,
    ) -> Result<Response<Self::PredictStreamStream>, Status> {
        Ok(Response::new(relay(
            request.into_inner(),
            None,
            |_request: pb::PredictRequest| pb::PredictResponse {
                predictions: vec![pb::Prediction {
                    score: 0.9,
                    label: "SINGLE".to_string(),
                }],
                metadata: None,
            },
        )))
    }

    type PredictPairStreamStream = ResponseStream<pb::PredictResponse>;

    async fn predict_pair_stream(
        &self,
        request: Request<Streaming<pb::PredictPairRequest>>,
    ) -> Result<Response<Self::PredictPairStreamStream>, Status> {
        Ok(Response::new(relay(
            request.into_inner(),
            None,
            |_request: pb::PredictPairRequest| pb::PredictResponse {
                predictions: vec![pb::Prediction {
                    score: 0.8,
                    label: "PAIR".to_string(),
                }],
                metadata: None,
            },
        )))
    }
}

#[tonic::async_trait]
impl pb::rerank_server::Rerank for Fixture {
    async fn rerank(
        &self,
        request: Request<pb::RerankRequest>,
    ) -> Result<Response<pb::RerankResponse>, Status> {
        let request = request.into_inner();
        let count = request.texts.len().max(1);
        // Fixed contract: later texts are more relevant, ranks descending.
        let ranks = request
            .texts
            .iter()
            .enumerate()
            .rev()
            .map(|(index, text)| pb::Rank {
                index: index as u32,
                text: request.return_text.then(|| text.clone()),
                score: (index + 1) as f32 / count as f32,
            })
            .collect();
        Ok(Response::new(pb::RerankResponse {
            ranks,
            metadata: None,
        }))
    }
}

fn router(fixture: Fixture) -> Router {
    Server::builder()
        .add_service(pb::info_server::InfoServer::new(fixture.clone()))
        .add_service(pb::embed_server::EmbedServer::new(fixture.clone()))
        .add_service(pb::predict_server::PredictServer::new(fixture.clone()))
        .add_service(pb::rerank_server::RerankServer::new(fixture.clone()))
        .add_service(pb::tokenize_server::TokenizeServer::new(fixture))
}

/// Serve on an OS-assigned port inside the current runtime; returns the URI.
pub async fn spawn(fixture: Fixture) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(router(fixture).serve_with_incoming(TcpListenerStream::new(listener)));
    format!("http://{addr}")
}

/// Serve on a dedicated thread with its own runtime, for blocking tests.
pub fn spawn_on_thread(fixture: Fixture) -> String {
    let (tx, rx) = std::sync::mpsc::channel::<SocketAddr>();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            let _ = router(fixture)
                .serve_with_incoming(TcpListenerStream::new(listener))
                .await;
        });
    });
    format!("http://{}", rx.recv().unwrap())
}
