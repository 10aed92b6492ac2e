//! Chunk data types shared between the chunker, the store and clustering.

use serde::Serialize;
use uuid::Uuid;

/// One token-bounded slice of page text.
///
/// Keyed by (page, position) within a source file; positions restart at 1
/// on every page. The text is boundary-trimmed; `token_len` is the number
/// of tokens in the final (snapped) slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Chunk {
    pub page: u32,
    pub position: u32,
    pub text: String,
    pub token_len: usize,
}

/// All chunks produced from one converted PDF.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// File name of the converted PDF (no directory components).
    pub file: String,
    pub chunks: Vec<Chunk>,
}

/// Sum of token lengths over every chunk of every file.
pub fn total_tokens(files: &[ParsedFile]) -> u64 {
    files
        .iter()
        .flat_map(|f| f.chunks.iter())
        .map(|c| c.token_len as u64)
        .sum()
}

/// A persisted chunk row loaded back for the clustering pass.
#[derive(Debug, Clone)]
pub struct StoredChunk {
    pub id: Uuid,
    pub file: String,
    pub page: i32,
    pub position: i32,
    pub text: String,
    pub embedding: Vec<f32>,
}
