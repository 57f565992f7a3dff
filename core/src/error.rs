use std::io;
use thiserror::Error;

/// Errors surfaced while loading embeddings or scoring documents.
#[derive(Debug, Error)]
pub enum DocsimError {
    /// The embedding path or vocabulary cannot describe a table.
    #[error("invalid embedding config: {0}")]
    Config(String),
    /// A line of the embedding file does not hold `dim` numbers.
    #[error("parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },
    /// The vocabulary mapping breaks the id contract.
    #[error("invalid vocabulary: {0}")]
    Vocabulary(String),
    /// A token index points past the last row of the embedding matrix.
    #[error("token index {index} out of range for {rows} embedding rows")]
    IndexOutOfRange { index: i64, rows: usize },
    /// Title/abstract batches differ in length.
    #[error("batch size mismatch: {0}")]
    BatchMismatch(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<bincode::Error> for DocsimError {
    fn from(err: bincode::Error) -> Self { DocsimError::Serialization(err.to_string()) }
}

impl From<serde_json::Error> for DocsimError {
    fn from(err: serde_json::Error) -> Self { DocsimError::Serialization(err.to_string()) }
}

pub type Result<T> = std::result::Result<T, DocsimError>;
