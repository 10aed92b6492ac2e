//! Per-page PDF text extraction and directory parsing.

use std::path::Path;

use crate::error::{ChunkError, ExtractError};
use crate::models::ParsedFile;
use crate::services::TextChunker;

/// Extract the raw text of every page of a PDF, in page order.
pub fn extract_pages(path: &Path) -> Result<Vec<String>, ExtractError> {
    if !path.exists() {
        return Err(ExtractError::FileNotFound(path.to_path_buf()));
    }
    pdf_extract::extract_text_by_pages(path).map_err(|e| ExtractError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Extract and chunk every PDF directly inside `dir` (the conversion
/// output directory; not recursive). Results are keyed by file name.
pub fn parse_directory(dir: &Path, chunker: &TextChunker) -> Result<Vec<ParsedFile>, ChunkError> {
    let pdfs = crate::utils::file::pdf_files_in(dir)
        .map_err(|e| ChunkError::ExtractError(ExtractError::IoError(e)))?;

    let mut parsed = Vec::with_capacity(pdfs.len());
    for pdf in pdfs {
        let pages = extract_pages(&pdf)?;
        let chunks = chunker.split_pages(&pages);
        let file = pdf
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        parsed.push(ParsedFile { file, chunks });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_missing_file_errors() {
        let err = extract_pages(Path::new("/nonexistent/docvec.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::FileNotFound(_)));
    }

    #[test]
    fn test_extract_garbage_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let err = extract_pages(&path).unwrap_err();
        assert!(matches!(err, ExtractError::ParseError { .. }));
    }
}
