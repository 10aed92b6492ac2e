//! CLI surface of the ingestion pipeline.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::models::EmbeddingModel;
use crate::services::DEFAULT_CLUSTERS;

/// Document-to-embedding ingestion pipeline for PostgreSQL + pgvector.
#[derive(Debug, Parser)]
#[command(name = "docvec")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[arg(long, short = 'v', global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert, chunk, embed and store a directory of documents
    Ingest(IngestArgs),

    /// Count tokens and estimate the embedding price without storing
    Estimate(EstimateArgs),

    /// Cluster stored embeddings and label each cluster
    Cluster(ClusterArgs),
}

/// Chunking parameters shared by ingest and estimate.
#[derive(Debug, Args)]
pub struct ChunkingArgs {
    /// Input directory with the source documents
    #[arg(long, short = 'i')]
    pub in_dir: PathBuf,

    /// Output directory for the converted PDFs
    #[arg(long, short = 'o')]
    pub out_dir: PathBuf,

    /// Embedding model to tokenize and embed with
    #[arg(long, short = 'm', value_enum)]
    pub model: EmbeddingModel,

    /// Chunk size in tokens (50-8000; ~100 for semantic search, ~800 for RAG)
    #[arg(long, short = 'c')]
    pub chunk_size: usize,

    /// Overlap between adjacent chunks, in tokens
    #[arg(long, short = 'p', default_value_t = 0)]
    pub overlap: usize,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    #[command(flatten)]
    pub chunking: ChunkingArgs,
}

#[derive(Debug, Args)]
pub struct EstimateArgs {
    #[command(flatten)]
    pub chunking: ChunkingArgs,
}

#[derive(Debug, Args)]
pub struct ClusterArgs {
    /// Number of clusters to partition the stored embeddings into
    #[arg(long, short = 'k', default_value_t = DEFAULT_CLUSTERS)]
    pub clusters: usize,
}
