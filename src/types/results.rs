//! Value types returned to callers.

use serde::{Deserialize, Serialize};

/// One tokenizer token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub text: String,
    pub special: bool,
    #[serde(default)]
    pub start: Option<u32>,
    #[serde(default)]
    pub stop: Option<u32>,
}

/// Ordered tokens for one input text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizationResult {
    pub tokens: Vec<Token>,
}

impl TokenizationResult {
    /// Token ids in input order, ready to feed back into `decode`.
    pub fn ids(&self) -> Vec<u32> {
        self.tokens.iter().map(|t| t.id).collect()
    }
}

/// One label with its score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationScore {
    pub label: String,
    pub score: f32,
}

/// Scores for one classification item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub scores: Vec<ClassificationScore>,
}

/// Relevance of one reranked text, identified by its original index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankScore {
    pub index: usize,
    pub score: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Ranks in the order the server returned them (descending relevance).
/// The client does not re-sort.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    pub ranks: Vec<RerankScore>,
}
