pub mod aggregate;
pub mod embedding;
pub mod error;
pub mod persist;
pub mod scorer;
pub mod tokenizer;
pub mod vocab;

pub use embedding::EmbeddingTable;
pub use error::{DocsimError, Result};
pub use scorer::{EmbeddingSumModel, PairBatch, Prediction, SimilarityModel};
pub use vocab::{Vocabulary, VocabularyBuilder};

/// Id assigned to a cleaned word by the vocabulary. 0 is never assigned.
pub type VocabId = u32;

/// Entry of a document's title/abstract index array. Values <= 0 are padding.
pub type TokenIndex = i64;

pub const PADDING: TokenIndex = 0;
