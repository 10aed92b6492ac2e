//! Token-aware text chunking with overlap and boundary snapping.

use crate::models::Chunk;
use crate::services::TokenCodec;

/// Splits per-page text into token-bounded overlapping chunks.
///
/// Chunks are measured in model tokens, keyed by (page, position), and
/// snapped to whitespace boundaries so no word is cut in half. A chunk that
/// would run past the end of a page is filled with tokens pulled from the
/// front of the next page; the next page's own chunking then starts from
/// whatever is left.
pub struct TextChunker {
    codec: TokenCodec,
    chunk_size: usize,
    overlap: usize,
    /// Reserved minimum-length threshold; accepted for parity with the CLI
    /// surface but not applied as a drop filter.
    pub min_chunk_size: usize,
}

impl TextChunker {
    pub fn new(codec: TokenCodec, chunk_size: usize, overlap: usize, min_chunk_size: usize) -> Self {
        Self {
            codec,
            chunk_size,
            overlap,
            min_chunk_size,
        }
    }

    /// Chunk the ordered page texts of one document.
    ///
    /// Positions restart at 1 on every page. An empty page yields no
    /// chunks. The trailing chunk of the final page may be shorter than
    /// `chunk_size` when no further page exists to borrow from.
    pub fn split_pages(&self, pages: &[String]) -> Vec<Chunk> {
        let mut all_tokens: Vec<Vec<usize>> = pages.iter().map(|p| self.codec.encode(p)).collect();
        let page_count = all_tokens.len();
        let mut chunks = Vec::new();

        for page_idx in 0..page_count {
            let mut cursor = 0usize;
            let mut position = 1u32;

            while cursor < all_tokens[page_idx].len() {
                let mut end_idx = cursor + self.chunk_size;

                // Cross-page fill: move the shortfall from the front of the
                // next page into this one. The donor is mutated in place so
                // its own pass starts past the borrowed tokens.
                if end_idx > all_tokens[page_idx].len() && page_idx + 1 < page_count {
                    let shortfall = end_idx - all_tokens[page_idx].len();
                    let take = shortfall.min(all_tokens[page_idx + 1].len());
                    let borrowed: Vec<usize> =
                        all_tokens[page_idx + 1].drain(..take).collect();
                    all_tokens[page_idx].extend(borrowed);
                }

                let tokens = &all_tokens[page_idx];
                let len = tokens.len();
                let mut text = self.codec.decode(&tokens[cursor..end_idx.min(len)]);

                // Forward snap: grow the slice one token at a time until the
                // decoded text ends on whitespace. Bounded to one chunk_size
                // past the nominal end; without a boundary in reach, hard
                // cut at the nominal end.
                let snap_cap = (cursor + 2 * self.chunk_size).min(len);
                while end_idx < len && !ends_on_boundary(&text) {
                    if end_idx >= snap_cap {
                        end_idx = cursor + self.chunk_size;
                        break;
                    }
                    end_idx += 1;
                    text = self.codec.decode(&tokens[cursor..end_idx]);
                }

                // Backward snap: pull the start back until its token begins
                // on whitespace, so the chunk opens on a word boundary. This
                // grows the effective overlap with the previous chunk, never
                // shrinks it. Same one-chunk_size bound, reverting to the
                // nominal start when no boundary is in reach.
                let mut start = cursor;
                let floor = cursor.saturating_sub(self.chunk_size);
                while start > floor && !self.token_starts_on_boundary(tokens[start]) {
                    start -= 1;
                }
                if start == floor && start > 0 && !self.token_starts_on_boundary(tokens[start]) {
                    start = cursor;
                }

                let chunk_tokens = &tokens[start..end_idx.min(len)];
                let text = self.codec.decode(chunk_tokens);

                chunks.push(Chunk {
                    page: (page_idx + 1) as u32,
                    position,
                    text: text.trim().to_string(),
                    token_len: chunk_tokens.len(),
                });
                position += 1;

                // Overlap advance. A degenerate overlap (>= the chunk span)
                // would stall the cursor; the max() keeps it moving.
                cursor = end_idx.saturating_sub(self.overlap).max(cursor + 1);
            }
        }

        chunks
    }

    fn token_starts_on_boundary(&self, token: usize) -> bool {
        let decoded = self.codec.decode(&[token]);
        decoded.starts_with(' ') || decoded.starts_with('\n')
    }
}

fn ends_on_boundary(text: &str) -> bool {
    text.ends_with(' ') || text.ends_with('\n')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EmbeddingModel;

    // The tests build pages out of single-letter words: every letter and
    // every space-prefixed letter is a single token in the cl100k
    // vocabulary, so token counts are exact.

    fn chunker(chunk_size: usize, overlap: usize) -> TextChunker {
        let codec = TokenCodec::for_model(EmbeddingModel::Small).unwrap();
        TextChunker::new(codec, chunk_size, overlap, overlap + 1)
    }

    fn letter_words(count: usize) -> String {
        let mut text = String::new();
        for i in 0..count {
            if i > 0 {
                text.push(' ');
            }
            text.push((b'a' + (i % 26) as u8) as char);
        }
        text.push('\n');
        text
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        let chunker = chunker(100, 20);
        assert!(chunker.split_pages(&[]).is_empty());
        assert!(chunker.split_pages(&[String::new()]).is_empty());
    }

    #[test]
    fn test_short_page_fits_one_chunk() {
        let chunker = chunker(50, 0);
        let chunks = chunker.split_pages(&["a b c\n".to_string()]);

        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].page, 1);
        assert_eq!(chunks[0].position, 1);
        assert_eq!(chunks[0].text, "a b c");
        assert_eq!(chunks[0].token_len, 4);
    }

    #[test]
    fn test_cross_page_borrow() {
        // page 1 is 4 tokens, the chunk wants 8: the missing 4 come from
        // the front of page 2, whose own chunking starts from the rest
        let chunker = chunker(8, 0);
        let pages = vec![
            "a b c\n".to_string(),
            "d e f g h i j k l m\n".to_string(),
        ];
        let chunks = chunker.split_pages(&pages);

        assert_eq!(chunks.len(), 2);

        assert_eq!(chunks[0].page, 1);
        assert_eq!(chunks[0].position, 1);
        assert_eq!(chunks[0].token_len, 8);
        assert_eq!(chunks[0].text, "a b c\nd e f g");

        assert_eq!(chunks[1].page, 2);
        assert_eq!(chunks[1].position, 1);
        assert_eq!(chunks[1].token_len, 7);
        assert_eq!(chunks[1].text, "h i j k l m");
    }

    #[test]
    fn test_overlap_and_boundary_snap() {
        // 21 tokens: 20 letter words plus the trailing newline
        let chunker = chunker(10, 2);
        let page = letter_words(20);
        let chunks = chunker.split_pages(&[page.clone()]);

        assert_eq!(chunks.len(), 3);
        assert_eq!(
            chunks.iter().map(|c| c.position).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        // first chunk hard-cuts (no whitespace-final token in reach), the
        // second extends to the end of the line, the tail picks up the rest
        assert_eq!(
            chunks.iter().map(|c| c.token_len).collect::<Vec<_>>(),
            vec![10, 13, 2]
        );
        assert_eq!(chunks[0].text, "a b c d e f g h i j");
        assert_eq!(chunks[1].text, "i j k l m n o p q r s t");
        assert_eq!(chunks[2].text, "t");

        // every chunk is a contiguous slice of the page
        for chunk in &chunks {
            assert!(page.contains(&chunk.text));
            assert!(chunk.token_len >= 1);
        }
        // the requested 2-token overlap is visible in the text
        assert!(chunks[0].text.ends_with("i j"));
        assert!(chunks[1].text.starts_with("i j"));
    }

    #[test]
    fn test_positions_reset_per_page() {
        let chunker = chunker(7, 0);
        let pages = vec!["a b c d e f\n".to_string(), "g h i j k l\n".to_string()];
        let chunks = chunker.split_pages(&pages);

        assert_eq!(chunks.len(), 2);
        assert_eq!((chunks[0].page, chunks[0].position), (1, 1));
        assert_eq!((chunks[1].page, chunks[1].position), (2, 1));
        assert_eq!(chunks[0].text, "a b c d e f");
        assert_eq!(chunks[1].text, "g h i j k l");
    }

    #[test]
    fn test_degenerate_overlap_still_advances() {
        // overlap larger than the chunk size: the cursor guard must force
        // one token of progress per iteration and terminate
        let chunker = chunker(3, 5);
        let chunks = chunker.split_pages(&["a b c d e\n".to_string()]);

        assert_eq!(chunks.len(), 6);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, (i + 1) as u32);
            assert!(chunk.token_len >= 1);
        }
    }

    #[test]
    fn test_whitespace_free_input_hard_cuts() {
        let chunker = chunker(10, 0);
        let chunks = chunker.split_pages(&["a".repeat(2000)]);

        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, (i + 1) as u32);
            assert!(chunk.token_len >= 1);
            // never beyond nominal size plus one chunk of snap slack
            assert!(chunk.token_len <= 20);
        }
    }

    #[test]
    fn test_thousand_token_page_chunk_layout() {
        // 999 letter words + newline = 1000 tokens; C=100, V=20 gives an
        // 80-token stride, so roughly 1000/(100-20) chunks. The only
        // whitespace-final token is the trailing newline: mid-page chunks
        // hard-cut at 100 tokens, the chunk whose snap cap reaches the page
        // end extends to it, and a short tail picks up the overlap window.
        let chunker = chunker(100, 20);
        let page = letter_words(999);
        let chunks = chunker.split_pages(&[page]);

        assert_eq!(chunks.len(), 12);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.page, 1);
            assert_eq!(chunk.position, (i + 1) as u32);
        }
        for chunk in &chunks[..10] {
            assert_eq!(chunk.token_len, 100);
        }
        assert_eq!(chunks[10].token_len, 200);
        assert_eq!(chunks[11].token_len, 20);

        // adjacent chunks overlap by exactly the requested 20 tokens here
        let first: Vec<&str> = chunks[0].text.split(' ').collect();
        let second: Vec<&str> = chunks[1].text.split(' ').collect();
        assert_eq!(first.len(), 100);
        assert_eq!(&first[80..], &second[..20]);
    }
}
