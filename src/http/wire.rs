//! Request documents and response decoding for the document protocol.

use crate::types::{
    ClassificationItem, ClassificationResult, ClassificationScore, ClassifierMetadata,
    EmbeddingItem, EmbeddingMetadata, Info, ModelMetadata, ModelType, RerankResult, RerankScore,
    Token, TokenizationResult, TruncationDirection,
};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct EmbedBody<'a> {
    pub inputs: &'a [EmbeddingItem],
    pub normalize: bool,
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmbedAllBody<'a> {
    pub inputs: &'a [EmbeddingItem],
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenizeBody<'a> {
    pub inputs: &'a [String],
    pub add_special_tokens: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct DecodeBody<'a> {
    pub ids: &'a [Vec<u32>],
    pub skip_special_tokens: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PredictBody<'a> {
    pub inputs: &'a [Vec<&'a str>],
    pub raw_scores: bool,
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}

#[derive(Debug, Serialize)]
pub(crate) struct RerankBody<'a> {
    pub query: &'a str,
    pub texts: &'a [String],
    pub return_text: bool,
    pub raw_scores: bool,
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}

/// Each classification item becomes a one- or two-element row.
pub(crate) fn classification_matrix(items: &[ClassificationItem]) -> Vec<Vec<&str>> {
    items
        .iter()
        .map(|item| match item {
            ClassificationItem::Single(text) => vec![text.as_str()],
            ClassificationItem::Pair(premise, hypothesis) => {
                vec![premise.as_str(), hypothesis.as_str()]
            }
        })
        .collect()
}

/// Decode a JSON body, labelling failures with the payload that broke.
pub(crate) fn decode_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| Error::decode(format!("{what}: {e}")))
}

pub(crate) fn tokenization_results(body: &str) -> Result<Vec<TokenizationResult>> {
    let raw: Vec<Vec<Token>> = decode_body(body, "tokenize response")?;
    Ok(raw
        .into_iter()
        .map(|tokens| TokenizationResult { tokens })
        .collect())
}

pub(crate) fn classification_results(body: &str) -> Result<Vec<ClassificationResult>> {
    let raw: Vec<Vec<ClassificationScore>> = decode_body(body, "predict response")?;
    Ok(raw
        .into_iter()
        .map(|scores| ClassificationResult { scores })
        .collect())
}

pub(crate) fn rerank_result(body: &str) -> Result<RerankResult> {
    let ranks: Vec<RerankScore> = decode_body(body, "rerank response")?;
    Ok(RerankResult { ranks })
}

/// `/info` response with the polymorphic `model_type` field still raw.
#[derive(Debug, Deserialize)]
pub(crate) struct InfoDocument {
    version: String,
    #[serde(default)]
    sha: Option<String>,
    #[serde(default)]
    docker_label: Option<String>,
    model_id: String,
    #[serde(default)]
    model_sha: Option<String>,
    model_dtype: String,
    model_type: serde_json::Map<String, serde_json::Value>,
    max_concurrent_requests: u32,
    max_input_length: u32,
    max_batch_tokens: u32,
    #[serde(default)]
    max_batch_requests: Option<u32>,
    max_client_batch_size: u32,
    tokenization_workers: u32,
}

impl InfoDocument {
    /// `model_type` is a single-key map: the key names the model type, the
    /// value carries the type-specific metadata shape.
    pub(crate) fn into_info(self) -> Result<Info> {
        let mut entries = self.model_type.into_iter();
        let (key, metadata) = entries
            .next()
            .ok_or_else(|| Error::decode("info.model_type: empty map"))?;

        let (model_type, model_metadata) = match key.as_str() {
            "embedding" => {
                let meta: EmbeddingMetadata = serde_json::from_value(metadata)
                    .map_err(|e| Error::decode(format!("info.model_type.embedding: {e}")))?;
                (ModelType::Embedding, ModelMetadata::Embedding(meta))
            }
            "classifier" | "reranker" => {
                let meta: ClassifierMetadata = serde_json::from_value(metadata)
                    .map_err(|e| Error::decode(format!("info.model_type.{key}: {e}")))?;
                let model_type = if key == "classifier" {
                    ModelType::Classifier
                } else {
                    ModelType::Reranker
                };
                (model_type, ModelMetadata::Classifier(meta))
            }
            other => {
                return Err(Error::decode(format!(
                    "info.model_type: unknown model type {other:?}"
                )))
            }
        };

        Ok(Info {
            version: self.version,
            sha: self.sha,
            docker_label: self.docker_label,
            model_id: self.model_id,
            model_sha: self.model_sha,
            model_dtype: self.model_dtype,
            model_type,
            model_metadata: Some(model_metadata),
            max_concurrent_requests: self.max_concurrent_requests,
            max_input_length: self.max_input_length,
            max_batch_tokens: self.max_batch_tokens,
            max_batch_requests: self.max_batch_requests,
            max_client_batch_size: self.max_client_batch_size,
            tokenization_workers: self.tokenization_workers,
        })
    }
}
