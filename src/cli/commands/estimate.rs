//! Estimate command implementation: token count and price, no storage.

use anyhow::Result;
use console::style;

use crate::cli::EstimateArgs;
use crate::models::{IngestConfig, total_tokens, validate_chunk_params};
use crate::services::{PriceTable, TextChunker, TokenCodec, convert_files, parse_directory};
use crate::utils::file::{
    clear_directory, ensure_readable_dir, ensure_writable_dir, list_files_with_extensions,
};

pub async fn handle_estimate(args: EstimateArgs, verbose: bool) -> Result<()> {
    let chunking = args.chunking;

    validate_chunk_params(chunking.chunk_size, chunking.overlap)?;
    ensure_readable_dir(&chunking.in_dir)?;
    ensure_writable_dir(&chunking.out_dir)?;
    let ingest_config = IngestConfig::from_env();

    let files = list_files_with_extensions(&chunking.in_dir, &ingest_config.file_formats)?;
    if files.is_empty() {
        anyhow::bail!(
            "no input files with allowed extensions in {}",
            chunking.in_dir.display()
        );
    }
    if verbose {
        println!("Found {} input files", files.len());
    }

    clear_directory(&chunking.out_dir)?;
    let convert_stats = convert_files(&files, &chunking.in_dir, &chunking.out_dir);
    for (path, reason) in &convert_stats.failures {
        eprintln!(
            "{} conversion of {} failed: {}",
            style("warning:").yellow(),
            path.display(),
            reason
        );
    }

    let codec = TokenCodec::for_model(chunking.model)?;
    let chunker = TextChunker::new(
        codec,
        chunking.chunk_size,
        chunking.overlap,
        chunking.overlap + 1,
    );
    let parsed = parse_directory(&chunking.out_dir, &chunker)?;

    let tokens = total_tokens(&parsed);
    let price = PriceTable::default().usd_for_tokens(chunking.model.as_str(), tokens);
    println!(
        "Total tokens {} - price for {}: {} USD",
        tokens, chunking.model, price
    );

    Ok(())
}
