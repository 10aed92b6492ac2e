//! Model-specific token encoding/decoding.

use tiktoken_rs::{CoreBPE, get_bpe_from_model};

use crate::error::ChunkError;
use crate::models::EmbeddingModel;

/// Wraps the BPE tokenizer of an embedding model.
///
/// Chunk sizes are measured in these tokens, so the chunker always counts
/// with the same tokenizer the embedding model bills with.
pub struct TokenCodec {
    bpe: CoreBPE,
}

impl TokenCodec {
    pub fn for_model(model: EmbeddingModel) -> Result<Self, ChunkError> {
        let bpe = get_bpe_from_model(model.as_str())
            .map_err(|_| ChunkError::UnknownEncoding(model.to_string()))?;
        Ok(Self { bpe })
    }

    /// Encode text into token IDs. Deterministic; special tokens are
    /// treated as plain text.
    pub fn encode(&self, text: &str) -> Vec<usize> {
        self.bpe.encode_ordinary(text)
    }

    /// Decode token IDs back into text.
    ///
    /// A partial slice can cut a multi-byte glyph, which does not decode to
    /// valid UTF-8; such slices decode to an empty string, which the snap
    /// loops read as "not at a boundary".
    pub fn decode(&self, tokens: &[usize]) -> String {
        self.bpe.decode(tokens.to_vec()).unwrap_or_default()
    }
}
