//! File-system checks and listings for the ingestion pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::ConfigError;

/// Verify that a directory exists, is readable and is not empty.
///
/// Runs before any processing so a bad input directory fails fast.
pub fn ensure_readable_dir(path: &Path) -> Result<(), ConfigError> {
    if !path.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "the directory '{}' does not exist",
            path.display()
        )));
    }
    let mut entries = fs::read_dir(path).map_err(|e| {
        ConfigError::ValidationError(format!(
            "the directory '{}' is not readable: {}",
            path.display(),
            e
        ))
    })?;
    if entries.next().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "the directory '{}' is empty",
            path.display()
        )));
    }
    Ok(())
}

/// Verify that a directory exists and is writable by creating and removing
/// a probe file.
pub fn ensure_writable_dir(path: &Path) -> Result<(), ConfigError> {
    if !path.is_dir() {
        return Err(ConfigError::ValidationError(format!(
            "the directory '{}' does not exist",
            path.display()
        )));
    }
    let probe = path.join(".write_test.tmp");
    fs::write(&probe, "test").map_err(|e| {
        ConfigError::ValidationError(format!(
            "the directory '{}' is not writable: {}",
            path.display(),
            e
        ))
    })?;
    fs::remove_file(&probe)?;
    Ok(())
}

/// Recursively list files under `root` whose extension is in the
/// allowlist, returned as paths relative to `root`.
pub fn list_files_with_extensions(
    root: &Path,
    extensions: &[String],
) -> Result<Vec<PathBuf>, ConfigError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).follow_links(false) {
        let entry = entry.map_err(|e| ConfigError::ValidationError(e.to_string()))?;
        if !entry.path().is_file() {
            continue;
        }
        if !has_allowed_extension(entry.path(), extensions) {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(root) {
            files.push(relative.to_path_buf());
        }
    }
    files.sort();
    Ok(files)
}

fn has_allowed_extension(path: &Path, extensions: &[String]) -> bool {
    let Some(ext) = path.extension() else {
        return false;
    };
    let dotted = format!(".{}", ext.to_string_lossy().to_lowercase());
    extensions.iter().any(|allowed| *allowed == dotted)
}

/// Delete every top-level file in a directory, returning how many were
/// removed. Subdirectories are left alone.
pub fn clear_directory(path: &Path) -> std::io::Result<usize> {
    let mut removed = 0;
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        if entry.path().is_file() {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    Ok(removed)
}

/// Non-recursive listing of the PDF files in a directory.
pub fn pdf_files_in(path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut pdfs = Vec::new();
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let p = entry.path();
        if p.is_file()
            && p.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"))
        {
            pdfs.push(p);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}
