//! Per-verb request options, mirroring the server's defaults.

use serde::{Deserialize, Serialize};

/// Which side of an over-long input gets cut when truncation is enabled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TruncationDirection {
    Left,
    #[default]
    Right,
}

/// Options for `embed`.
#[derive(Debug, Clone)]
pub struct EmbedOptions {
    pub normalize: bool,
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}

impl Default for EmbedOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            truncate: false,
            truncation_direction: TruncationDirection::default(),
        }
    }
}

/// Options for `embed_all`.
#[derive(Debug, Clone, Default)]
pub struct EmbedAllOptions {
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}

/// Options for `tokenize`.
#[derive(Debug, Clone)]
pub struct TokenizeOptions {
    pub add_special_tokens: bool,
}

impl Default for TokenizeOptions {
    fn default() -> Self {
        Self {
            add_special_tokens: true,
        }
    }
}

/// Options for `decode`.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    pub skip_special_tokens: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            skip_special_tokens: true,
        }
    }
}

/// Options for `classify`.
#[derive(Debug, Clone, Default)]
pub struct ClassifyOptions {
    pub raw_scores: bool,
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}

/// Options for `rerank`.
#[derive(Debug, Clone, Default)]
pub struct RerankOptions {
    pub return_text: bool,
    pub raw_scores: bool,
    pub truncate: bool,
    pub truncation_direction: TruncationDirection,
}
