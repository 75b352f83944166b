use thiserror::Error;

pub type Result<T> = std::result::Result<T, DocQaError>;

#[derive(Error, Debug)]
pub enum DocQaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown document: {0}")]
    UnknownDocument(String),

    #[error("Vector dimensionality mismatch: query has {query} dimensions, index has {index}")]
    DimensionMismatch { query: usize, index: usize },

    #[error("Completion service error: {0}")]
    Completion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub mod answer;
pub mod completion;
pub mod config;
pub mod engine;
pub mod index;
pub mod locale;
pub mod quality;
pub mod retrieval;
pub mod segmenter;
pub mod session;
pub mod tokenizer;
