//! PostgreSQL + pgvector chunk store.

use std::time::Duration;

use pgvector::Vector;
use sqlx::Row;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use uuid::Uuid;

use crate::error::StoreError;
use crate::models::{DatabaseConfig, EmbeddingModel, ParsedFile, StoredChunk};
use crate::services::OpenAiClient;
use crate::utils::{exceeds_storage_threshold, normalize_text};

/// Inserts are committed in batches of this many rows; a crash loses at
/// most the uncommitted tail of the current batch.
const COMMIT_BATCH_SIZE: u64 = 100;

/// Handle over the ingestion table of one database.
pub struct ChunkStore {
    pool: PgPool,
    table: String,
}

impl ChunkStore {
    /// Connect to the target database.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.url())
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            pool,
            table: config.table.clone(),
        })
    }

    /// Create the target database when absent (via the maintenance
    /// database), then the pgvector extension and the chunk table sized
    /// for the chosen model.
    pub async fn setup(
        config: &DatabaseConfig,
        model: EmbeddingModel,
    ) -> Result<Self, StoreError> {
        let admin = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(30))
            .connect(&config.admin_url())
            .await
            .map_err(|e| StoreError::ConnectionError(e.to_string()))?;

        let exists: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM pg_catalog.pg_database WHERE datname = $1")
                .bind(&config.name)
                .fetch_optional(&admin)
                .await?;
        if exists.is_none() {
            sqlx::query(&format!("CREATE DATABASE {}", config.name))
                .execute(&admin)
                .await?;
        }
        admin.close().await;

        let store = Self::connect(config).await?;
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&store.pool)
            .await?;
        sqlx::query(&create_table_sql(&store.table, model.dimension()))
            .execute(&store.pool)
            .await?;
        Ok(store)
    }

    /// Embed and insert every chunk that passes the storage threshold.
    ///
    /// One embedding request per chunk, inserts committed every
    /// [`COMMIT_BATCH_SIZE`] rows and once more at the end. The first
    /// remote or storage error aborts the phase; batches committed before
    /// it remain. Returns the number of rows written, reported through
    /// `on_stored` as it grows.
    pub async fn store_chunks(
        &self,
        client: &OpenAiClient,
        model: EmbeddingModel,
        files: &[ParsedFile],
        mut on_stored: impl FnMut(u64),
    ) -> Result<u64, StoreError> {
        let insert = insert_chunk_sql(&self.table);
        let mut tx = self.pool.begin().await?;
        let mut stored = 0u64;

        for file in files {
            for chunk in &file.chunks {
                let text = normalize_text(&chunk.text);
                if !exceeds_storage_threshold(&text) {
                    continue;
                }

                let embedding = client.embed(text.trim(), model).await?;
                sqlx::query(&insert)
                    .bind(&file.file)
                    .bind(chunk.page as i32)
                    .bind(chunk.position as i32)
                    .bind(&text)
                    .bind(Vector::from(embedding))
                    .execute(&mut *tx)
                    .await?;
                stored += 1;
                on_stored(stored);

                if stored % COMMIT_BATCH_SIZE == 0 {
                    tx.commit().await?;
                    tx = self.pool.begin().await?;
                }
            }
        }

        tx.commit().await?;
        Ok(stored)
    }

    /// Drop and recreate the approximate-nearest-neighbor index over the
    /// embedding column.
    pub async fn rebuild_index(&self) -> Result<(), StoreError> {
        sqlx::query(&drop_index_sql(&self.table))
            .execute(&self.pool)
            .await?;
        sqlx::query(&create_index_sql(&self.table))
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Load every stored chunk with its embedding, for the clustering pass.
    pub async fn load_all(&self) -> Result<Vec<StoredChunk>, StoreError> {
        let query = format!(
            "SELECT id, file, page, position, text_chunk, embedding FROM {} ORDER BY file, page, position",
            self.table
        );
        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        Ok(rows
            .into_iter()
            .map(|row: PgRow| {
                let embedding: Vector = row.get("embedding");
                StoredChunk {
                    id: row.get("id"),
                    file: row.get("file"),
                    page: row.get("page"),
                    position: row.get("position"),
                    text: row.get("text_chunk"),
                    embedding: embedding.to_vec(),
                }
            })
            .collect())
    }

    /// Add the cluster columns when they are missing. Idempotent.
    pub async fn ensure_cluster_columns(&self) -> Result<(), StoreError> {
        for column in ["cluster_id INTEGER", "cluster TEXT"] {
            let query = format!(
                "ALTER TABLE {} ADD COLUMN IF NOT EXISTS {}",
                self.table, column
            );
            sqlx::query(&query).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Write cluster assignments back onto the stored rows, in one
    /// transaction.
    pub async fn assign_clusters(
        &self,
        assignments: &[(Uuid, i32, String)],
    ) -> Result<(), StoreError> {
        let update = format!(
            "UPDATE {} SET cluster_id = $1, cluster = $2 WHERE id = $3",
            self.table
        );
        let mut tx = self.pool.begin().await?;
        for (id, cluster_id, label) in assignments {
            sqlx::query(&update)
                .bind(cluster_id)
                .bind(label)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}

fn create_table_sql(table: &str, dimension: u32) -> String {
    format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            file TEXT,
            page INTEGER,
            position INTEGER,
            text_chunk TEXT,
            embedding VECTOR({})
        )
        "#,
        table, dimension
    )
}

fn insert_chunk_sql(table: &str) -> String {
    format!(
        "INSERT INTO {} (file, page, position, text_chunk, embedding) VALUES ($1, $2, $3, $4, $5)",
        table
    )
}

fn drop_index_sql(table: &str) -> String {
    format!("DROP INDEX IF EXISTS {}_embedding_idx", table)
}

fn create_index_sql(table: &str) -> String {
    format!(
        "CREATE INDEX {}_embedding_idx ON {} USING ivfflat (embedding vector_cosine_ops) WITH (lists = 100)",
        table, table
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_table_sql_uses_model_dimension() {
        let sql = create_table_sql("chunks", 1536);
        assert!(sql.contains("CREATE TABLE IF NOT EXISTS chunks"));
        assert!(sql.contains("id UUID PRIMARY KEY DEFAULT gen_random_uuid()"));
        assert!(sql.contains("embedding VECTOR(1536)"));

        let large = create_table_sql("chunks", 3072);
        assert!(large.contains("embedding VECTOR(3072)"));
    }

    #[test]
    fn test_insert_sql_binds_five_columns() {
        let sql = insert_chunk_sql("chunks");
        assert!(sql.contains("(file, page, position, text_chunk, embedding)"));
        assert!(sql.contains("($1, $2, $3, $4, $5)"));
    }

    #[test]
    fn test_index_rebuild_drops_what_it_creates() {
        assert_eq!(drop_index_sql("chunks"), "DROP INDEX IF EXISTS chunks_embedding_idx");
        let create = create_index_sql("chunks");
        assert!(create.contains("chunks_embedding_idx"));
        assert!(create.contains("ivfflat (embedding vector_cosine_ops)"));
        assert!(create.contains("lists = 100"));
    }
}
