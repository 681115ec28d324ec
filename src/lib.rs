//! # tei-client
//!
//! Typed client for [text-embeddings-inference] servers, speaking both of
//! the server's protocols: a JSON document protocol over HTTP and the
//! `tei.v1` streaming RPC protocol over gRPC.
//!
//! ## Overview
//!
//! One operation set — `health`, `info`, `embed`, `embed_all`, `tokenize`,
//! `decode`, `classify`, `rerank` — implemented by two adapters:
//!
//! - [`HttpClient`]: each verb is one round trip carrying the whole batch in
//!   a single JSON envelope.
//! - [`GrpcClient`]: each verb writes one request message per input item
//!   over a bidirectional stream and collects the responses positionally.
//!
//! Every client offers the operations in two execution modes, selected per
//! call: suspend-based through [`TeiClient`], blocking through
//! [`BlockingTeiClient`]. The modes hold independent transport handles and
//! share nothing but the lazily cached model type.
//!
//! Model-type-specific verbs (`embed*` on embedding models, `classify` on
//! classifiers, `rerank` on rerankers) resolve the server's model type once,
//! cache it, and fail fast with [`Error::TypeMismatch`] when invoked against
//! the wrong model.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tei_client::{HttpClient, TeiClient};
//!
//! #[tokio::main]
//! async fn main() -> tei_client::Result<()> {
//!     let client = HttpClient::new("http://localhost:8080")?;
//!
//!     let vectors = client.embed("Hello world".into(), &Default::default()).await?;
//!     assert_eq!(vectors.len(), 1);
//!
//!     Ok(())
//! }
//! ```
//!
//! The gRPC adapter has the same surface (enabled by the default `grpc`
//! feature):
//!
//! ```rust,no_run
//! use tei_client::{BlockingTeiClient, GrpcClient};
//!
//! fn main() -> tei_client::Result<()> {
//!     let client = GrpcClient::new("http://localhost:8080")?;
//!     let results = client.tokenize("Hello world".into(), &Default::default())?;
//!     println!("{} tokens", results[0].tokens.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | The operation contract and execution modes |
//! | [`types`] | Inputs, options, and result value types |
//! | [`http`] | Document-protocol adapter (JSON over HTTP) |
//! | [`grpc`] | Streaming-RPC adapter (`tei.v1` over gRPC) |
//! | [`error`] | Error taxonomy |
//!
//! [text-embeddings-inference]: https://github.com/huggingface/text-embeddings-inference

pub mod client;
pub mod error;
pub mod http;
pub mod types;

#[cfg(feature = "grpc")]
pub mod grpc;

// Re-export main types for convenience
pub use client::{BlockingTeiClient, TeiClient};
pub use error::{Error, TransportError};
pub use http::{HttpClient, HttpClientBuilder};
pub use types::{
    ClassificationInput, ClassificationItem, ClassificationPair, ClassificationResult,
    ClassificationScore, ClassifyOptions, ClassifierMetadata, DecodeInput, DecodeOptions,
    EmbedAllOptions, EmbedOptions, EmbeddingInput, EmbeddingItem, EmbeddingMetadata, Info,
    ModelMetadata, ModelType, Pooling, RerankOptions, RerankResult, RerankScore, TextInput,
    Token, TokenizationResult, TokenizeOptions, TruncationDirection,
};

#[cfg(feature = "grpc")]
pub use grpc::{Connectivity, GrpcClient, GrpcClientBuilder};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;
