//! Caller-facing input unions and their canonical normalized shapes.
//!
//! Flexible call-site inputs are resolved into tagged variants once, at the
//! API boundary; the transport adapters consume only the normalized item
//! lists and never re-inspect shapes.

use serde::Serialize;

/// One embedding input item after normalization: plain text, or a
/// pre-tokenized id sequence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EmbeddingItem {
    Text(String),
    Ids(Vec<u32>),
}

/// Input accepted by `embed` and `embed_all`.
#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddingInput {
    Single(String),
    Batch(Vec<String>),
    Tokens(Vec<u32>),
    TokenBatch(Vec<Vec<u32>>),
}

impl EmbeddingInput {
    /// Normalize to one item per logical input; bare scalars wrap into a
    /// one-element list, lists pass through unchanged.
    pub fn into_items(self) -> Vec<EmbeddingItem> {
        match self {
            EmbeddingInput::Single(text) => vec![EmbeddingItem::Text(text)],
            EmbeddingInput::Batch(texts) => {
                texts.into_iter().map(EmbeddingItem::Text).collect()
            }
            EmbeddingInput::Tokens(ids) => vec![EmbeddingItem::Ids(ids)],
            EmbeddingInput::TokenBatch(sequences) => {
                sequences.into_iter().map(EmbeddingItem::Ids).collect()
            }
        }
    }
}

impl From<&str> for EmbeddingInput {
    fn from(text: &str) -> Self {
        EmbeddingInput::Single(text.to_string())
    }
}

impl From<String> for EmbeddingInput {
    fn from(text: String) -> Self {
        EmbeddingInput::Single(text)
    }
}

impl From<Vec<String>> for EmbeddingInput {
    fn from(texts: Vec<String>) -> Self {
        EmbeddingInput::Batch(texts)
    }
}

impl From<Vec<&str>> for EmbeddingInput {
    fn from(texts: Vec<&str>) -> Self {
        EmbeddingInput::Batch(texts.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for EmbeddingInput {
    fn from(texts: &[&str]) -> Self {
        EmbeddingInput::Batch(texts.iter().map(|t| t.to_string()).collect())
    }
}

impl From<Vec<u32>> for EmbeddingInput {
    fn from(ids: Vec<u32>) -> Self {
        EmbeddingInput::Tokens(ids)
    }
}

impl From<Vec<Vec<u32>>> for EmbeddingInput {
    fn from(sequences: Vec<Vec<u32>>) -> Self {
        EmbeddingInput::TokenBatch(sequences)
    }
}

/// Input accepted by `tokenize`.
#[derive(Debug, Clone, PartialEq)]
pub enum TextInput {
    Single(String),
    Batch(Vec<String>),
}

impl TextInput {
    pub fn into_texts(self) -> Vec<String> {
        match self {
            TextInput::Single(text) => vec![text],
            TextInput::Batch(texts) => texts,
        }
    }
}

impl From<&str> for TextInput {
    fn from(text: &str) -> Self {
        TextInput::Single(text.to_string())
    }
}

impl From<String> for TextInput {
    fn from(text: String) -> Self {
        TextInput::Single(text)
    }
}

impl From<Vec<String>> for TextInput {
    fn from(texts: Vec<String>) -> Self {
        TextInput::Batch(texts)
    }
}

impl From<Vec<&str>> for TextInput {
    fn from(texts: Vec<&str>) -> Self {
        TextInput::Batch(texts.into_iter().map(str::to_string).collect())
    }
}

/// Input accepted by `decode`: one token sequence, or many.
///
/// The flat-vs-nested distinction is resolved here by the `From`
/// conversions; `decode` always returns one string per sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeInput {
    Single(Vec<u32>),
    Batch(Vec<Vec<u32>>),
}

impl DecodeInput {
    pub fn into_sequences(self) -> Vec<Vec<u32>> {
        match self {
            DecodeInput::Single(ids) => vec![ids],
            DecodeInput::Batch(sequences) => sequences,
        }
    }
}

impl From<Vec<u32>> for DecodeInput {
    fn from(ids: Vec<u32>) -> Self {
        DecodeInput::Single(ids)
    }
}

impl From<&[u32]> for DecodeInput {
    fn from(ids: &[u32]) -> Self {
        DecodeInput::Single(ids.to_vec())
    }
}

impl From<Vec<Vec<u32>>> for DecodeInput {
    fn from(sequences: Vec<Vec<u32>>) -> Self {
        DecodeInput::Batch(sequences)
    }
}

/// A premise/hypothesis pair scored jointly by pair-classification models.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationPair {
    pub premise: String,
    pub hypothesis: String,
}

impl ClassificationPair {
    pub fn new(premise: impl Into<String>, hypothesis: impl Into<String>) -> Self {
        Self {
            premise: premise.into(),
            hypothesis: hypothesis.into(),
        }
    }
}

/// One classification item after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationItem {
    Single(String),
    Pair(String, String),
}

impl ClassificationItem {
    pub fn is_pair(&self) -> bool {
        matches!(self, ClassificationItem::Pair(_, _))
    }
}

impl From<&str> for ClassificationItem {
    fn from(text: &str) -> Self {
        ClassificationItem::Single(text.to_string())
    }
}

impl From<String> for ClassificationItem {
    fn from(text: String) -> Self {
        ClassificationItem::Single(text)
    }
}

impl From<(&str, &str)> for ClassificationItem {
    fn from((premise, hypothesis): (&str, &str)) -> Self {
        ClassificationItem::Pair(premise.to_string(), hypothesis.to_string())
    }
}

impl From<(String, String)> for ClassificationItem {
    fn from((premise, hypothesis): (String, String)) -> Self {
        ClassificationItem::Pair(premise, hypothesis)
    }
}

impl From<ClassificationPair> for ClassificationItem {
    fn from(pair: ClassificationPair) -> Self {
        ClassificationItem::Pair(pair.premise, pair.hypothesis)
    }
}

/// Input accepted by `classify`.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassificationInput {
    Single(String),
    Pair(String, String),
    Batch(Vec<ClassificationItem>),
}

impl ClassificationInput {
    /// Normalize to a flat item list plus the pair-mode flag.
    ///
    /// The flag reflects the first item and selects the pair or single code
    /// path for the entire batch. Batches mixing both shapes are not
    /// supported by the streaming transport and are rejected there.
    pub fn into_items(self) -> (bool, Vec<ClassificationItem>) {
        let items = match self {
            ClassificationInput::Single(text) => vec![ClassificationItem::Single(text)],
            ClassificationInput::Pair(premise, hypothesis) => {
                vec![ClassificationItem::Pair(premise, hypothesis)]
            }
            ClassificationInput::Batch(items) => items,
        };
        let pair_mode = items.first().map(ClassificationItem::is_pair).unwrap_or(false);
        (pair_mode, items)
    }
}

impl From<&str> for ClassificationInput {
    fn from(text: &str) -> Self {
        ClassificationInput::Single(text.to_string())
    }
}

impl From<String> for ClassificationInput {
    fn from(text: String) -> Self {
        ClassificationInput::Single(text)
    }
}

impl From<(&str, &str)> for ClassificationInput {
    fn from((premise, hypothesis): (&str, &str)) -> Self {
        ClassificationInput::Pair(premise.to_string(), hypothesis.to_string())
    }
}

impl From<(String, String)> for ClassificationInput {
    fn from((premise, hypothesis): (String, String)) -> Self {
        ClassificationInput::Pair(premise, hypothesis)
    }
}

impl From<ClassificationPair> for ClassificationInput {
    fn from(pair: ClassificationPair) -> Self {
        ClassificationInput::Pair(pair.premise, pair.hypothesis)
    }
}

impl From<Vec<String>> for ClassificationInput {
    fn from(texts: Vec<String>) -> Self {
        ClassificationInput::Batch(texts.into_iter().map(ClassificationItem::Single).collect())
    }
}

impl From<Vec<&str>> for ClassificationInput {
    fn from(texts: Vec<&str>) -> Self {
        ClassificationInput::Batch(texts.into_iter().map(ClassificationItem::from).collect())
    }
}

impl From<Vec<(String, String)>> for ClassificationInput {
    fn from(pairs: Vec<(String, String)>) -> Self {
        ClassificationInput::Batch(pairs.into_iter().map(ClassificationItem::from).collect())
    }
}

impl From<Vec<(&str, &str)>> for ClassificationInput {
    fn from(pairs: Vec<(&str, &str)>) -> Self {
        ClassificationInput::Batch(pairs.into_iter().map(ClassificationItem::from).collect())
    }
}

impl From<Vec<ClassificationPair>> for ClassificationInput {
    fn from(pairs: Vec<ClassificationPair>) -> Self {
        ClassificationInput::Batch(pairs.into_iter().map(ClassificationItem::from).collect())
    }
}

impl From<Vec<ClassificationItem>> for ClassificationInput {
    fn from(items: Vec<ClassificationItem>) -> Self {
        ClassificationInput::Batch(items)
    }
}
