//! Ingest command implementation: the full pipeline.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use anyhow::{Context, Result};
use console::style;
use indicatif::ProgressBar;

use crate::cli::IngestArgs;
use crate::cli::output::IngestStats;
use crate::models::{
    DatabaseConfig, IngestConfig, OpenAiConfig, total_tokens, validate_chunk_params,
};
use crate::services::{
    ChunkStore, OpenAiClient, TextChunker, TokenCodec, convert_files, parse_directory,
};
use crate::utils::file::{
    clear_directory, ensure_readable_dir, ensure_writable_dir, list_files_with_extensions,
};

pub async fn handle_ingest(args: IngestArgs, verbose: bool) -> Result<()> {
    let chunking = args.chunking;

    // fail fast before touching any file
    validate_chunk_params(chunking.chunk_size, chunking.overlap)?;
    ensure_readable_dir(&chunking.in_dir)?;
    ensure_writable_dir(&chunking.out_dir)?;
    let ingest_config = IngestConfig::from_env();
    let db_config = DatabaseConfig::from_env()?;
    let openai_config = OpenAiConfig::from_env()?;

    let start = Instant::now();
    let mut stats = IngestStats::default();

    let files = list_files_with_extensions(&chunking.in_dir, &ingest_config.file_formats)?;
    if files.is_empty() {
        anyhow::bail!(
            "no input files with allowed extensions in {}",
            chunking.in_dir.display()
        );
    }
    stats.files_found = files.len() as u64;
    if verbose {
        println!("Found {} input files", files.len());
    }

    let removed = clear_directory(&chunking.out_dir)?;
    if verbose && removed > 0 {
        println!(
            "Cleared {} stale files from {}",
            removed,
            chunking.out_dir.display()
        );
    }

    let convert_stats = convert_files(&files, &chunking.in_dir, &chunking.out_dir);
    for (path, reason) in &convert_stats.failures {
        eprintln!(
            "{} conversion of {} failed: {}",
            style("warning:").yellow(),
            path.display(),
            reason
        );
    }
    stats.files_converted = convert_stats.converted as u64;
    stats.files_failed = convert_stats.failures.len() as u64;

    let codec = TokenCodec::for_model(chunking.model)?;
    let chunker = TextChunker::new(
        codec,
        chunking.chunk_size,
        chunking.overlap,
        chunking.overlap + 1,
    );
    let parsed = parse_directory(&chunking.out_dir, &chunker)?;
    stats.chunks_created = parsed.iter().map(|f| f.chunks.len() as u64).sum();
    stats.total_tokens = total_tokens(&parsed);

    let client = OpenAiClient::new(&openai_config)?;
    let store = ChunkStore::setup(&db_config, chunking.model)
        .await
        .context("database setup failed")?;

    if verbose {
        println!(
            "Embedding {} chunks into table {}",
            stats.chunks_created, db_config.table
        );
    }

    let pb = ProgressBar::new_spinner();
    let stored_count = AtomicU64::new(0);
    let store_result = store
        .store_chunks(&client, chunking.model, &parsed, |stored| {
            stored_count.store(stored, Ordering::Relaxed);
            pb.set_message(format!("Stored: {} records", stored));
            pb.tick();
        })
        .await;
    pb.finish_and_clear();
    stats.chunks_stored = stored_count.load(Ordering::Relaxed);

    // committed batches survive an aborted store phase; the index is still
    // rebuilt over whatever made it in
    if let Err(e) = store_result {
        eprintln!(
            "{} store phase aborted after {} records: {}",
            style("error:").red(),
            stats.chunks_stored,
            e
        );
    }

    store.rebuild_index().await.context("index rebuild failed")?;

    stats.duration_ms = start.elapsed().as_millis() as u64;
    print!("{}", stats.render());
    Ok(())
}
