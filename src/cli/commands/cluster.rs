//! Cluster command implementation.

use anyhow::{Context, Result};

use crate::cli::ClusterArgs;
use crate::models::{DatabaseConfig, OpenAiConfig};
use crate::services::{ChunkStore, OpenAiClient, cluster_chunks};

pub async fn handle_cluster(args: ClusterArgs, verbose: bool) -> Result<()> {
    let db_config = DatabaseConfig::from_env()?;
    let openai_config = OpenAiConfig::from_env()?;

    let store = ChunkStore::connect(&db_config)
        .await
        .context("failed to connect to the chunk store")?;
    let client = OpenAiClient::new(&openai_config)?;

    if verbose {
        println!(
            "Clustering stored embeddings from table {} into {} clusters",
            db_config.table, args.clusters
        );
    }

    let clustered = cluster_chunks(&store, &client, args.clusters).await?;
    println!("{}", serde_json::to_string_pretty(&clustered)?);

    Ok(())
}
