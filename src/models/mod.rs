pub mod chunk;
pub mod config;
pub mod model;

pub use chunk::{Chunk, ParsedFile, StoredChunk, total_tokens};
pub use config::{DatabaseConfig, IngestConfig, OpenAiConfig, validate_chunk_params};
pub use model::EmbeddingModel;
