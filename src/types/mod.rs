//! Value types shared by both transport adapters.

mod info;
mod input;
mod options;
mod results;

pub use info::{ClassifierMetadata, EmbeddingMetadata, Info, ModelMetadata, ModelType, Pooling};
pub use input::{
    ClassificationInput, ClassificationItem, ClassificationPair, DecodeInput, EmbeddingInput,
    EmbeddingItem, TextInput,
};
pub use options::{
    ClassifyOptions, DecodeOptions, EmbedAllOptions, EmbedOptions, RerankOptions, TokenizeOptions,
    TruncationDirection,
};
pub use results::{
    ClassificationResult, ClassificationScore, RerankResult, RerankScore, Token,
    TokenizationResult,
};
