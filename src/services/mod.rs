mod chunker;
mod cluster;
mod convert;
mod embedding;
mod extract;
mod pricing;
mod store;
mod tokenizer;

pub use chunker::TextChunker;
pub use cluster::{ClusteredChunk, DEFAULT_CLUSTERS, cluster_chunks};
pub use convert::{ConvertStats, FileKind, classify, convert_files, pdf_output_name};
pub use embedding::OpenAiClient;
pub use extract::{extract_pages, parse_directory};
pub use pricing::PriceTable;
pub use store::ChunkStore;
pub use tokenizer::TokenCodec;
