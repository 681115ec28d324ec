//! Streaming-RPC client: one request message per input item, correlated
//! positionally over bidirectional streams.

use super::convert;
use super::correlate;
use super::pb;
use crate::client::{BlockingTeiClient, ModelTypeCache, TeiClient};
use crate::error::TransportError;
use crate::types::{
    ClassificationInput, ClassificationItem, ClassificationResult, ClassifyOptions, DecodeInput,
    DecodeOptions, EmbedAllOptions, EmbedOptions, EmbeddingInput, EmbeddingItem, Info, ModelType,
    RerankOptions, RerankResult, TextInput, TokenizationResult, TokenizeOptions,
};
use crate::{Error, Result};
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use std::future::Future;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// Last-observed connectivity of the client's channels.
///
/// tonic exposes no channel-state API, so the adapter records what the most
/// recent exchange proved: `Idle` until the first call, `Ready` after a
/// success, `TransientFailure` after a transport-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Connectivity {
    Idle = 0,
    Connecting = 1,
    Ready = 2,
    TransientFailure = 3,
    Shutdown = 4,
}

#[derive(Debug, Default)]
struct ChannelHealth {
    state: AtomicU8,
}

impl ChannelHealth {
    fn get(&self) -> Connectivity {
        match self.state.load(Ordering::Relaxed) {
            0 => Connectivity::Idle,
            1 => Connectivity::Connecting,
            2 => Connectivity::Ready,
            3 => Connectivity::TransientFailure,
            _ => Connectivity::Shutdown,
        }
    }

    fn set(&self, state: Connectivity) {
        self.state.store(state as u8, Ordering::Relaxed);
    }

    /// Fold one call outcome into the last-observed state. Application-level
    /// statuses still prove the channel works; only transport-level failures
    /// mark it unhealthy.
    fn observe<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.set(Connectivity::Ready),
            Err(Error::Transport(TransportError::Connection(_))) => {
                self.set(Connectivity::TransientFailure)
            }
            Err(Error::Transport(TransportError::Rpc(status))) => match status.code() {
                tonic::Code::Unavailable | tonic::Code::DeadlineExceeded => {
                    self.set(Connectivity::TransientFailure)
                }
                _ => self.set(Connectivity::Ready),
            },
            Err(_) => {}
        }
        result
    }
}

/// Client for servers speaking the `tei.v1` streaming protocol.
///
/// Holds one lazily created channel per execution mode. Channels come into
/// being inside the runtime that drives their mode: the caller's runtime for
/// the suspending half, an internal current-thread runtime (built on first
/// use) for the blocking half. Async-only callers never pay for the latter.
#[derive(Debug)]
pub struct GrpcClient {
    endpoint: Endpoint,
    async_channel: OnceCell<Channel>,
    blocking_channel: OnceCell<Channel>,
    runtime: OnceCell<tokio::runtime::Runtime>,
    health: ChannelHealth,
    model_type: ModelTypeCache,
}

impl GrpcClient {
    pub fn builder() -> GrpcClientBuilder {
        GrpcClientBuilder::new()
    }

    /// Shorthand for `builder().endpoint(uri).build()`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::builder().endpoint(endpoint).build()
    }

    /// Last-observed connectivity state backing `health`.
    pub fn connectivity(&self) -> Connectivity {
        self.health.get()
    }

    /// Must be called from inside the caller's runtime.
    fn suspending_channel(&self) -> Channel {
        self.async_channel
            .get_or_init(|| self.endpoint.connect_lazy())
            .clone()
    }

    /// Run one operation on the internal runtime, resolving the blocking
    /// mode's channel inside that runtime.
    fn drive<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: FnOnce(Channel) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let runtime = self.runtime.get_or_try_init(|| {
            tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| {
                    Error::Configuration(format!("failed to start blocking runtime: {e}"))
                })
        })?;
        runtime.block_on(async {
            let channel = self
                .blocking_channel
                .get_or_init(|| self.endpoint.connect_lazy())
                .clone();
            op(channel).await
        })
    }

    fn healthy(&self) -> bool {
        matches!(
            self.health.get(),
            Connectivity::Ready | Connectivity::Idle
        )
    }

    async fn fetch_info_on(&self, channel: Channel) -> Result<Info> {
        let mut stub = pb::info_client::InfoClient::new(channel);
        let result = stub
            .info(pb::InfoRequest {})
            .await
            .map(|response| response.into_inner())
            .map_err(Error::from);
        convert::info_from_wire(self.health.observe(result)?)
    }

    async fn ensure_on(&self, channel: Channel, expected: ModelType) -> Result<()> {
        let actual = match self.model_type.cached() {
            Some(model_type) => model_type,
            None => self
                .model_type
                .record(self.fetch_info_on(channel).await?.model_type),
        };
        self.model_type.require(expected, actual)
    }

    async fn embed_on(
        &self,
        channel: Channel,
        input: EmbeddingInput,
        options: &EmbedOptions,
    ) -> Result<Vec<Vec<f32>>> {
        self.ensure_on(channel.clone(), ModelType::Embedding).await?;
        let requests = encode_embed_requests(input.into_items(), options)?;
        let result = correlate::exchange(
            requests,
            |outbound| async move {
                let mut stub = pb::embed_client::EmbedClient::new(channel);
                Ok(stub.embed_stream(outbound).await?.into_inner())
            },
            |response: pb::EmbedResponse| response.embeddings,
        )
        .await;
        self.health.observe(result)
    }

    async fn embed_all_on(
        &self,
        channel: Channel,
        input: EmbeddingInput,
        options: &EmbedAllOptions,
    ) -> Result<Vec<Vec<Vec<f32>>>> {
        self.ensure_on(channel.clone(), ModelType::Embedding).await?;
        let requests = encode_embed_all_requests(input.into_items(), options)?;
        let result = correlate::exchange(
            requests,
            |outbound| async move {
                let mut stub = pb::embed_client::EmbedClient::new(channel);
                Ok(stub.embed_all_stream(outbound).await?.into_inner())
            },
            |response: pb::EmbedAllResponse| {
                response
                    .token_embeddings
                    .into_iter()
                    .map(|token| token.embeddings)
                    .collect()
            },
        )
        .await;
        self.health.observe(result)
    }

    async fn tokenize_on(
        &self,
        channel: Channel,
        input: TextInput,
        options: &TokenizeOptions,
    ) -> Result<Vec<TokenizationResult>> {
        let requests: Vec<pb::EncodeRequest> = input
            .into_texts()
            .into_iter()
            .map(|text| pb::EncodeRequest {
                inputs: text,
                add_special_tokens: options.add_special_tokens,
            })
            .collect();
        let result = correlate::exchange(
            requests,
            |outbound| async move {
                let mut stub = pb::tokenize_client::TokenizeClient::new(channel);
                Ok(stub.tokenize_stream(outbound).await?.into_inner())
            },
            |response: pb::EncodeResponse| TokenizationResult {
                tokens: response
                    .tokens
                    .into_iter()
                    .map(convert::token_from_wire)
                    .collect(),
            },
        )
        .await;
        self.health.observe(result)
    }

    async fn decode_on(
        &self,
        channel: Channel,
        input: DecodeInput,
        options: &DecodeOptions,
    ) -> Result<Vec<String>> {
        let requests: Vec<pb::DecodeRequest> = input
            .into_sequences()
            .into_iter()
            .map(|ids| pb::DecodeRequest {
                ids,
                skip_special_tokens: options.skip_special_tokens,
            })
            .collect();
        let result = correlate::exchange(
            requests,
            |outbound| async move {
                let mut stub = pb::tokenize_client::TokenizeClient::new(channel);
                Ok(stub.decode_stream(outbound).await?.into_inner())
            },
            |response: pb::DecodeResponse| response.text,
        )
        .await;
        self.health.observe(result)
    }

    async fn classify_on(
        &self,
        channel: Channel,
        input: ClassificationInput,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassificationResult>> {
        self.ensure_on(channel.clone(), ModelType::Classifier).await?;
        let (pair_mode, items) = input.into_items();
        // The first item picks the stub family for the whole burst.
        let result = if pair_mode {
            let requests = encode_pair_requests(items, options)?;
            correlate::exchange(
                requests,
                |outbound| async move {
                    let mut stub = pb::predict_client::PredictClient::new(channel);
                    Ok(stub.predict_pair_stream(outbound).await?.into_inner())
                },
                convert::predictions_from_wire,
            )
            .await
        } else {
            let requests = encode_single_requests(items, options)?;
            correlate::exchange(
                requests,
                |outbound| async move {
                    let mut stub = pb::predict_client::PredictClient::new(channel);
                    Ok(stub.predict_stream(outbound).await?.into_inner())
                },
                convert::predictions_from_wire,
            )
            .await
        };
        self.health.observe(result)
    }

    async fn rerank_on(
        &self,
        channel: Channel,
        query: &str,
        texts: &[String],
        options: &RerankOptions,
    ) -> Result<RerankResult> {
        self.ensure_on(channel.clone(), ModelType::Reranker).await?;
        let request = pb::RerankRequest {
            query: query.to_string(),
            texts: texts.to_vec(),
            truncate: options.truncate,
            raw_scores: options.raw_scores,
            return_text: options.return_text,
            truncation_direction: convert::truncation_to_wire(options.truncation_direction),
        };
        let mut stub = pb::rerank_client::RerankClient::new(channel);
        let result = stub
            .rerank(request)
            .await
            .map(|response| response.into_inner())
            .map_err(Error::from);
        let response = self.health.observe(result)?;
        Ok(RerankResult {
            ranks: response
                .ranks
                .into_iter()
                .map(convert::rank_from_wire)
                .collect(),
        })
    }
}

#[async_trait]
impl TeiClient for GrpcClient {
    async fn health(&self) -> Result<bool> {
        Ok(self.healthy())
    }

    async fn info(&self) -> Result<Info> {
        self.fetch_info_on(self.suspending_channel()).await
    }

    async fn embed(
        &self,
        input: EmbeddingInput,
        options: &EmbedOptions,
    ) -> Result<Vec<Vec<f32>>> {
        self.embed_on(self.suspending_channel(), input, options).await
    }

    async fn embed_all(
        &self,
        input: EmbeddingInput,
        options: &EmbedAllOptions,
    ) -> Result<Vec<Vec<Vec<f32>>>> {
        self.embed_all_on(self.suspending_channel(), input, options).await
    }

    async fn tokenize(
        &self,
        input: TextInput,
        options: &TokenizeOptions,
    ) -> Result<Vec<TokenizationResult>> {
        self.tokenize_on(self.suspending_channel(), input, options).await
    }

    async fn decode(&self, input: DecodeInput, options: &DecodeOptions) -> Result<Vec<String>> {
        self.decode_on(self.suspending_channel(), input, options).await
    }

    async fn classify(
        &self,
        input: ClassificationInput,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassificationResult>> {
        self.classify_on(self.suspending_channel(), input, options).await
    }

    async fn rerank(
        &self,
        query: &str,
        texts: &[String],
        options: &RerankOptions,
    ) -> Result<RerankResult> {
        self.rerank_on(self.suspending_channel(), query, texts, options).await
    }
}

impl BlockingTeiClient for GrpcClient {
    fn health(&self) -> Result<bool> {
        Ok(self.healthy())
    }

    fn info(&self) -> Result<Info> {
        self.drive(|channel| self.fetch_info_on(channel))
    }

    fn embed(&self, input: EmbeddingInput, options: &EmbedOptions) -> Result<Vec<Vec<f32>>> {
        self.drive(|channel| self.embed_on(channel, input, options))
    }

    fn embed_all(
        &self,
        input: EmbeddingInput,
        options: &EmbedAllOptions,
    ) -> Result<Vec<Vec<Vec<f32>>>> {
        self.drive(|channel| self.embed_all_on(channel, input, options))
    }

    fn tokenize(
        &self,
        input: TextInput,
        options: &TokenizeOptions,
    ) -> Result<Vec<TokenizationResult>> {
        self.drive(|channel| self.tokenize_on(channel, input, options))
    }

    fn decode(&self, input: DecodeInput, options: &DecodeOptions) -> Result<Vec<String>> {
        self.drive(|channel| self.decode_on(channel, input, options))
    }

    fn classify(
        &self,
        input: ClassificationInput,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassificationResult>> {
        self.drive(|channel| self.classify_on(channel, input, options))
    }

    fn rerank(
        &self,
        query: &str,
        texts: &[String],
        options: &RerankOptions,
    ) -> Result<RerankResult> {
        self.drive(|channel| self.rerank_on(channel, query, texts, options))
    }
}

fn encode_embed_requests(
    items: Vec<EmbeddingItem>,
    options: &EmbedOptions,
) -> Result<Vec<pb::EmbedRequest>> {
    items
        .into_iter()
        .map(|item| match item {
            EmbeddingItem::Text(text) => Ok(pb::EmbedRequest {
                inputs: text,
                truncate: options.truncate,
                normalize: options.normalize,
                truncation_direction: convert::truncation_to_wire(options.truncation_direction),
            }),
            EmbeddingItem::Ids(_) => Err(Error::Validation(
                "pre-tokenized inputs are not representable on the streaming transport"
                    .to_string(),
            )),
        })
        .collect()
}

fn encode_embed_all_requests(
    items: Vec<EmbeddingItem>,
    options: &EmbedAllOptions,
) -> Result<Vec<pb::EmbedAllRequest>> {
    items
        .into_iter()
        .map(|item| match item {
            EmbeddingItem::Text(text) => Ok(pb::EmbedAllRequest {
                inputs: text,
                truncate: options.truncate,
                truncation_direction: convert::truncation_to_wire(options.truncation_direction),
            }),
            EmbeddingItem::Ids(_) => Err(Error::Validation(
                "pre-tokenized inputs are not representable on the streaming transport"
                    .to_string(),
            )),
        })
        .collect()
}

fn encode_single_requests(
    items: Vec<ClassificationItem>,
    options: &ClassifyOptions,
) -> Result<Vec<pb::PredictRequest>> {
    items
        .into_iter()
        .map(|item| match item {
            ClassificationItem::Single(text) => Ok(pb::PredictRequest {
                inputs: text,
                truncate: options.truncate,
                raw_scores: options.raw_scores,
                truncation_direction: convert::truncation_to_wire(options.truncation_direction),
            }),
            ClassificationItem::Pair(_, _) => Err(Error::Validation(
                "batches mixing single texts and pairs are not supported on the streaming \
                 transport"
                    .to_string(),
            )),
        })
        .collect()
}

fn encode_pair_requests(
    items: Vec<ClassificationItem>,
    options: &ClassifyOptions,
) -> Result<Vec<pb::PredictPairRequest>> {
    items
        .into_iter()
        .map(|item| match item {
            ClassificationItem::Pair(premise, hypothesis) => Ok(pb::PredictPairRequest {
                inputs: vec![premise, hypothesis],
                truncate: options.truncate,
                raw_scores: options.raw_scores,
                truncation_direction: convert::truncation_to_wire(options.truncation_direction),
            }),
            ClassificationItem::Single(_) => Err(Error::Validation(
                "batches mixing single texts and pairs are not supported on the streaming \
                 transport"
                    .to_string(),
            )),
        })
        .collect()
}

pub struct GrpcClientBuilder {
    endpoint: Option<String>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
}

impl GrpcClientBuilder {
    pub fn new() -> Self {
        Self {
            endpoint: None,
            timeout: None,
            connect_timeout: None,
        }
    }

    /// Server URI, e.g. `http://localhost:8080`.
    pub fn endpoint(mut self, uri: impl Into<String>) -> Self {
        self.endpoint = Some(uri.into());
        self
    }

    /// Per-request timeout applied to both channels. None by default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Build the client. Channels are created lazily per execution mode and
    /// connect on first use, so this does not touch the network.
    pub fn build(self) -> Result<GrpcClient> {
        let uri = self
            .endpoint
            .ok_or_else(|| Error::Configuration("endpoint must be specified".to_string()))?;
        let mut endpoint = Endpoint::from_shared(uri.clone())
            .map_err(|e| Error::Configuration(format!("invalid endpoint {uri:?}: {e}")))?;
        if let Some(timeout) = self.timeout {
            endpoint = endpoint.timeout(timeout);
        }
        if let Some(timeout) = self.connect_timeout {
            endpoint = endpoint.connect_timeout(timeout);
        }

        Ok(GrpcClient {
            endpoint,
            async_channel: OnceCell::new(),
            blocking_channel: OnceCell::new(),
            runtime: OnceCell::new(),
            health: ChannelHealth::default(),
            model_type: ModelTypeCache::default(),
        })
    }
}

impl Default for GrpcClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
