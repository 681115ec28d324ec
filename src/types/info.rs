//! Server metadata types.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The kind of model a server is serving.
///
/// Fetched once per client instance and cached; type-specific verbs validate
/// against it before dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    Embedding,
    Classifier,
    Reranker,
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModelType::Embedding => "embedding",
            ModelType::Classifier => "classifier",
            ModelType::Reranker => "reranker",
        };
        f.write_str(name)
    }
}

/// Strategy an embedding model uses to reduce per-token vectors to one vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pooling {
    Cls,
    Mean,
    Splade,
    LastToken,
}

/// Metadata reported for embedding models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingMetadata {
    pub pooling: Pooling,
}

/// Metadata reported for classifier and reranker models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierMetadata {
    pub id2label: HashMap<String, String>,
    pub label2id: HashMap<String, u32>,
}

/// Model-type-specific metadata attached to [`Info`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelMetadata {
    Embedding(EmbeddingMetadata),
    Classifier(ClassifierMetadata),
}

impl ModelMetadata {
    pub fn pooling(&self) -> Option<Pooling> {
        match self {
            ModelMetadata::Embedding(meta) => Some(meta.pooling),
            ModelMetadata::Classifier(_) => None,
        }
    }

    pub fn labels(&self) -> Option<&ClassifierMetadata> {
        match self {
            ModelMetadata::Embedding(_) => None,
            ModelMetadata::Classifier(meta) => Some(meta),
        }
    }
}

/// Server metadata snapshot, constructed fresh on every `info` call.
///
/// Field optionality follows the wire schema; the streaming transport has no
/// representation for `model_metadata` and reports it as absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Info {
    pub version: String,
    pub sha: Option<String>,
    pub docker_label: Option<String>,
    pub model_id: String,
    pub model_sha: Option<String>,
    pub model_dtype: String,
    pub model_type: ModelType,
    pub model_metadata: Option<ModelMetadata>,
    pub max_concurrent_requests: u32,
    pub max_input_length: u32,
    pub max_batch_tokens: u32,
    pub max_batch_requests: Option<u32>,
    pub max_client_batch_size: u32,
    pub tokenization_workers: u32,
}
