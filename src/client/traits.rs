//! The capability contract: one operation set, two execution modes.
//!
//! Both transport adapters implement both traits. Which mode runs is chosen
//! per call by the trait the caller goes through, not by the client
//! instance.

use crate::types::{
    ClassificationInput, ClassificationResult, ClassifyOptions, DecodeInput, DecodeOptions,
    EmbedAllOptions, EmbedOptions, EmbeddingInput, Info, RerankOptions, RerankResult, TextInput,
    TokenizationResult, TokenizeOptions,
};
use crate::Result;
use async_trait::async_trait;

/// Suspend-based operations; every call yields at I/O boundaries.
#[async_trait]
pub trait TeiClient {
    /// Check whether the server is alive and ready to serve requests.
    async fn health(&self) -> Result<bool>;

    /// Fetch a fresh server metadata snapshot.
    async fn info(&self) -> Result<Info>;

    /// Embed each input into one pooled vector, in input order.
    ///
    /// Requires an embedding model.
    async fn embed(&self, input: EmbeddingInput, options: &EmbedOptions)
        -> Result<Vec<Vec<f32>>>;

    /// Embed without pooling: one vector per token, per input.
    ///
    /// Requires an embedding model.
    async fn embed_all(
        &self,
        input: EmbeddingInput,
        options: &EmbedAllOptions,
    ) -> Result<Vec<Vec<Vec<f32>>>>;

    /// Tokenize each input text, one result per input, order-preserving.
    async fn tokenize(
        &self,
        input: TextInput,
        options: &TokenizeOptions,
    ) -> Result<Vec<TokenizationResult>>;

    /// Decode token-id sequences back into text, one string per sequence.
    async fn decode(&self, input: DecodeInput, options: &DecodeOptions) -> Result<Vec<String>>;

    /// Classify each item (single text or premise/hypothesis pair).
    ///
    /// Requires a classifier model.
    async fn classify(
        &self,
        input: ClassificationInput,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassificationResult>>;

    /// Score `texts` against `query`, ranks ordered by the server.
    ///
    /// Requires a reranker model.
    async fn rerank(
        &self,
        query: &str,
        texts: &[String],
        options: &RerankOptions,
    ) -> Result<RerankResult>;
}

/// Blocking operations; each call runs to completion on the calling thread.
pub trait BlockingTeiClient {
    /// Check whether the server is alive and ready to serve requests.
    fn health(&self) -> Result<bool>;

    /// Fetch a fresh server metadata snapshot.
    fn info(&self) -> Result<Info>;

    /// Embed each input into one pooled vector, in input order.
    fn embed(&self, input: EmbeddingInput, options: &EmbedOptions) -> Result<Vec<Vec<f32>>>;

    /// Embed without pooling: one vector per token, per input.
    fn embed_all(
        &self,
        input: EmbeddingInput,
        options: &EmbedAllOptions,
    ) -> Result<Vec<Vec<Vec<f32>>>>;

    /// Tokenize each input text, one result per input, order-preserving.
    fn tokenize(
        &self,
        input: TextInput,
        options: &TokenizeOptions,
    ) -> Result<Vec<TokenizationResult>>;

    /// Decode token-id sequences back into text, one string per sequence.
    fn decode(&self, input: DecodeInput, options: &DecodeOptions) -> Result<Vec<String>>;

    /// Classify each item (single text or premise/hypothesis pair).
    fn classify(
        &self,
        input: ClassificationInput,
        options: &ClassifyOptions,
    ) -> Result<Vec<ClassificationResult>>;

    /// Score `texts` against `query`, ranks ordered by the server.
    fn rerank(&self, query: &str, texts: &[String], options: &RerankOptions)
        -> Result<RerankResult>;
}
