//! HTTP client: each verb is one round trip carrying the whole batch in a
//! single JSON envelope; the server batches internally.

use super::wire;
use crate::client::{BlockingTeiClient, ModelTypeCache, TeiClient};
use crate::types::{
    ClassificationInput, ClassificationResult, ClassifyOptions, DecodeInput, DecodeOptions,
    EmbedAllOptions, EmbedOptions, EmbeddingInput, Info, ModelType, RerankOptions, RerankResult,
    TextInput, TokenizationResult, TokenizeOptions,
};
use crate::{Error, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::time::Duration;

/// Client for servers speaking the document protocol.
///
/// Holds one transport handle per execution mode; the handles share nothing
/// but the lazily cached model type.
#[derive(Debug)]
pub struct HttpClient {
    async_http: reqwest::Client,
    blocking_http: reqwest::blocking::Client,
    base_url: String,
    model_type: ModelTypeCache,
}

impl HttpClient {
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Shorthand for `builder().base_url(url).build()`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn read_blocking(response: reqwest::blocking::Response) -> Result<String> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }

    async fn read(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(Error::Remote {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }

    fn post_blocking(&self, path: &str, body: &impl Serialize) -> Result<String> {
        tracing::debug!(path, "sending document request");
        let response = self.blocking_http.post(self.endpoint(path)).json(body).send()?;
        Self::read_blocking(response)
    }

    async fn post(&self, path: &str, body: &(impl Serialize + Sync)) -> Result<String> {
        tracing::debug!(path, "sending document request");
        let response = self.async_http.post(self.endpoint(path)).json(body).send().await?;
        Self::read(response).await
    }

    fn fetch_info_blocking(&self) -> Result<Info> {
        let response = self.blocking_http.get(self.endpoint("/info")).send()?;
        let body = Self::read_blocking(response)?;
        wire::decode_body::<wire::InfoDocument>(&body, "info response")?.into_info()
    }

    async fn fetch_info(&self) -> Result<Info> {
        let response = self.async_http.get(self.endpoint("/info")).send().await?;
        let body = Self::read(response).await?;
        wire::decode_body::<wire::InfoDocument>(&body, "info response")?.into_info()
    }

    fn ensure_blocking(&self, expected: ModelType) -> Result<()> {
        let actual = match self.model_type.cached() {
            Some(model_type) => model_type,
            None => self.model_type.record(self.fetch_info_blocking()?.model_type),
        };
        self.model_type.require(expected, actual)
    }

    async fn ensure(&self, expected: ModelType) -> Result<()> {
        let actual = match self.model_type.cached() {
            Some(model_type) => model_type,
            None => self.model_type.record(self.fetch_info().await?.model_type),
        };
        self.model_type.require(expected, actual)
    }
}

#[async_trait]
impl TeiClient for HttpClient {
    async fn health(&self) -> Result<bool> {
        let response = self.async_http.get(self.endpoint("/info")).send().await?;
        Ok(response.status().is_success())
    }

    async fn info(&self) -> Result<Info> {
        self.fetch_info().await
    }

    async fn embed(
        &self,
        input: EmbeddingInput,
        options: &EmbedOptions,
    ) -> Result<Vec<Vec<f32>>> {
        self.ensure(ModelType::Embedding).await?;
        let items = input.into_items();
        let body = self
            .post(
                "/embed",
                &wire::EmbedBody {
                    inputs: &items,
                    normalize: options.normalize,
                    truncate: options.truncate,
                    truncation_direction: options.truncation_direction,
                },
            )
            .await?;
        wire::decode_body(&body, "embed response")
    }

    async fn embed_all(
        &self,
        input: EmbeddingInput,
        options: &EmbedAllOptions,
    ) -> Result<Vec<Vec<Vec<f32>>>> {
        self.ensure(ModelType::Embedding).await?;
        let items = input.into_items();
        let body = self
            .post(
                "/embed_all",
                &wire::EmbedAllBody {
                    inputs: &items,
                    truncate: options.truncate,
                    truncation_direction: options.truncation_direction,
                },
            )
            .await?;
        wire::decode_body(&body, "embed_all response")
    }

    async fn tokenize(
        &self,
        input: TextInput,
        options: &TokenizeOptions,
    ) -> Result<Vec<TokenizationResult>> {
        let texts = input.into_texts();
        let body = self
            .post(
                "/tokenize",
                &wire::TokenizeBody {
                    inputs: &texts,
                    add_special_tokens: options.add_special_tokens,
                },
            )
            .await?;
        wire::tokenization_results(&body)
    }

    async fn decode(&self, input: DecodeInput, options: &DecodeOptions) -> Result<Vec<String>> {
        let sequences = input.into_sequences();
        let body = self
            .post(
                "/decode",
                &wire::DecodeBody {
                    ids: &sequences,
                    skip_special_tokens: options.skip_special_tokens,
                },
            )
            .await?;
        wire::decode_body(&body, "decode response")
    }

    async fn classify(
        &self,
        input: ClassificationInput,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassificationResult>> {
        self.ensure(ModelType::Classifier).await?;
        let (_, items) = input.into_items();
        let inputs = wire::classification_matrix(&items);
        let body = self
            .post(
                "/predict",
                &wire::PredictBody {
                    inputs: &inputs,
                    raw_scores: options.raw_scores,
                    truncate: options.truncate,
                    truncation_direction: options.truncation_direction,
                },
            )
            .await?;
        wire::classification_results(&body)
    }

    async fn rerank(
        &self,
        query: &str,
        texts: &[String],
        options: &RerankOptions,
    ) -> Result<RerankResult> {
        self.ensure(ModelType::Reranker).await?;
        let body = self
            .post(
                "/rerank",
                &wire::RerankBody {
                    query,
                    texts,
                    return_text: options.return_text,
                    raw_scores: options.raw_scores,
                    truncate: options.truncate,
                    truncation_direction: options.truncation_direction,
                },
            )
            .await?;
        wire::rerank_result(&body)
    }
}

impl BlockingTeiClient for HttpClient {
    fn health(&self) -> Result<bool> {
        let response = self.blocking_http.get(self.endpoint("/info")).send()?;
        Ok(response.status().is_success())
    }

    fn info(&self) -> Result<Info> {
        self.fetch_info_blocking()
    }

    fn embed(&self, input: EmbeddingInput, options: &EmbedOptions) -> Result<Vec<Vec<f32>>> {
        self.ensure_blocking(ModelType::Embedding)?;
        let items = input.into_items();
        let body = self.post_blocking(
            "/embed",
            &wire::EmbedBody {
                inputs: &items,
                normalize: options.normalize,
                truncate: options.truncate,
                truncation_direction: options.truncation_direction,
            },
        )?;
        wire::decode_body(&body, "embed response")
    }

    fn embed_all(
        &self,
        input: EmbeddingInput,
        options: &EmbedAllOptions,
    ) -> Result<Vec<Vec<Vec<f32>>>> {
        self.ensure_blocking(ModelType::Embedding)?;
        let items = input.into_items();
        let body = self.post_blocking(
            "/embed_all",
            &wire::EmbedAllBody {
                inputs: &items,
                truncate: options.truncate,
                truncation_direction: options.truncation_direction,
            },
        )?;
        wire::decode_body(&body, "embed_all response")
    }

    fn tokenize(
        &self,
        input: TextInput,
        options: &TokenizeOptions,
    ) -> Result<Vec<TokenizationResult>> {
        let texts = input.into_texts();
        let body = self.post_blocking(
            "/tokenize",
            &wire::TokenizeBody {
                inputs: &texts,
                add_special_tokens: options.add_special_tokens,
            },
        )?;
        wire::tokenization_results(&body)
    }

    fn decode(&self, input: DecodeInput, options: &DecodeOptions) -> Result<Vec<String>> {
        let sequences = input.into_sequences();
        let body = self.post_blocking(
            "/decode",
            &wire::DecodeBody {
                ids: &sequences,
                skip_special_tokens: options.skip_special_tokens,
            },
        )?;
        wire::decode_body(&body, "decode response")
    }

    fn classify(
        &self,
        input: ClassificationInput,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassificationResult>> {
        self.ensure_blocking(ModelType::Classifier)?;
        let (_, items) = input.into_items();
        let inputs = wire::classification_matrix(&items);
        let body = self.post_blocking(
            "/predict",
            &wire::PredictBody {
                inputs: &inputs,
                raw_scores: options.raw_scores,
                truncate: options.truncate,
                truncation_direction: options.truncation_direction,
            },
        )?;
        wire::classification_results(&body)
    }

    fn rerank(
        &self,
        query: &str,
        texts: &[String],
        options: &RerankOptions,
    ) -> Result<RerankResult> {
        self.ensure_blocking(ModelType::Reranker)?;
        let body = self.post_blocking(
            "/rerank",
            &wire::RerankBody {
                query,
                texts,
                return_text: options.return_text,
                raw_scores: options.raw_scores,
                truncate: options.truncate,
                truncation_direction: options.truncation_direction,
            },
        )?;
        wire::rerank_result(&body)
    }
}

pub struct HttpClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Request timeout applied to both transport handles. None by default;
    /// the server bounds its own work.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Configuration("base URL must be specified".to_string()))?;
        let parsed = url::Url::parse(&base_url)
            .map_err(|e| Error::Configuration(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "unsupported URL scheme {:?}",
                parsed.scheme()
            )));
        }
        let base_url = base_url.trim_end_matches('/').to_string();

        let mut async_builder = reqwest::Client::builder();
        let mut blocking_builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            async_builder = async_builder.timeout(timeout);
            blocking_builder = blocking_builder.timeout(timeout);
        }
        let async_http = async_builder
            .build()
            .map_err(|e| Error::Configuration(format!("failed to create HTTP client: {e}")))?;
        let blocking_http = blocking_builder
            .build()
            .map_err(|e| Error::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(HttpClient {
            async_http,
            blocking_http,
            base_url,
            model_type: ModelTypeCache::default(),
        })
    }
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
