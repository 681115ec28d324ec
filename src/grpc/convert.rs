//! Two-way mapping between wire messages and domain types.

use super::pb;
use crate::types::{
    ClassificationResult, ClassificationScore, Info, ModelType, RerankScore, Token,
    TruncationDirection,
};
use crate::{Error, Result};

pub(crate) fn model_type_from_wire(value: i32) -> Result<ModelType> {
    match pb::ModelType::try_from(value) {
        Ok(pb::ModelType::Embedding) => Ok(ModelType::Embedding),
        Ok(pb::ModelType::Classifier) => Ok(ModelType::Classifier),
        Ok(pb::ModelType::Reranker) => Ok(ModelType::Reranker),
        Err(_) => Err(Error::decode(format!(
            "info.model_type: unknown wire value {value}"
        ))),
    }
}

pub(crate) fn truncation_to_wire(direction: TruncationDirection) -> i32 {
    let wire = match direction {
        TruncationDirection::Left => pb::TruncationDirection::Left,
        TruncationDirection::Right => pb::TruncationDirection::Right,
    };
    wire as i32
}

/// The wire schema carries no pooling or label metadata; `model_metadata`
/// is reported as absent rather than failing.
pub(crate) fn info_from_wire(response: pb::InfoResponse) -> Result<Info> {
    Ok(Info {
        version: response.version,
        sha: response.sha,
        docker_label: response.docker_label,
        model_id: response.model_id,
        model_sha: response.model_sha,
        model_dtype: response.model_dtype,
        model_type: model_type_from_wire(response.model_type)?,
        model_metadata: None,
        max_concurrent_requests: response.max_concurrent_requests,
        max_input_length: response.max_input_length,
        max_batch_tokens: response.max_batch_tokens,
        max_batch_requests: response.max_batch_requests,
        max_client_batch_size: response.max_client_batch_size,
        tokenization_workers: response.tokenization_workers,
    })
}

pub(crate) fn token_from_wire(token: pb::SimpleToken) -> Token {
    Token {
        id: token.id,
        text: token.text,
        special: token.special,
        start: token.start,
        stop: token.stop,
    }
}

pub(crate) fn predictions_from_wire(response: pb::PredictResponse) -> ClassificationResult {
    ClassificationResult {
        scores: response
            .predictions
            .into_iter()
            .map(|prediction| ClassificationScore {
                label: prediction.label,
                score: prediction.score,
            })
            .collect(),
    }
}

pub(crate) fn rank_from_wire(rank: pb::Rank) -> RerankScore {
    RerankScore {
        index: rank.index as usize,
        score: rank.score,
        text: rank.text,
    }
}
