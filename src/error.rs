//! Error types for the ingestion pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors related to configuration and argument validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors related to converting input files to PDF.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("converter not found on PATH: {0}")]
    ConverterNotFound(String),

    #[error("conversion of {path} failed: {message}")]
    ConversionFailed { path: PathBuf, message: String },

    #[error("PDF render error for {path}: {message}")]
    RenderError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors related to PDF text extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("failed to extract text from {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Errors related to tokenization and chunking.
#[derive(Debug, Error)]
pub enum ChunkError {
    #[error("no tokenizer available for model {0}")]
    UnknownEncoding(String),

    #[error("extract error: {0}")]
    ExtractError(#[from] ExtractError),
}

/// Errors related to the remote embedding/completion API.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to build API client: {0}")]
    ClientError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ServerError(String),

    #[error("invalid API response: {0}")]
    InvalidResponse(String),
}

/// Errors related to the chunk store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to connect to PostgreSQL: {0}")]
    ConnectionError(String),

    #[error("query error: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),
}

/// Errors related to the clustering pass.
#[derive(Debug, Error)]
pub enum ClusterError {
    #[error("no stored embeddings to cluster")]
    EmptyTable,

    #[error("store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("labeling error: {0}")]
    LabelError(#[from] EmbeddingError),
}
