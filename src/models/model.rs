//! Supported embedding models and their fixed properties.

use std::fmt;

use clap::ValueEnum;

/// The embedding models the pipeline can write vectors for.
///
/// The vector column dimension is fixed by the model, so the choice is a
/// closed enum rather than a free string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbeddingModel {
    /// text-embedding-3-small (1536 dimensions)
    #[value(name = "text-embedding-3-small")]
    Small,

    /// text-embedding-3-large (3072 dimensions)
    #[value(name = "text-embedding-3-large")]
    Large,

    /// text-embedding-ada-002 (1536 dimensions)
    #[value(name = "text-embedding-ada-002")]
    Ada002,
}

impl EmbeddingModel {
    /// Model identifier as sent to the API and the tokenizer registry.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbeddingModel::Small => "text-embedding-3-small",
            EmbeddingModel::Large => "text-embedding-3-large",
            EmbeddingModel::Ada002 => "text-embedding-ada-002",
        }
    }

    /// Dimension of the vectors this model produces.
    pub fn dimension(&self) -> u32 {
        match self {
            EmbeddingModel::Large => 3072,
            EmbeddingModel::Small | EmbeddingModel::Ada002 => 1536,
        }
    }
}

impl fmt::Display for EmbeddingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
