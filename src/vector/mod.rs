//! Vector index over bio embeddings
//!
//! A thin collection ADT on top of a pgvector table. The collection is
//! rebuilt destructively on reindex (drop + recreate); point-level upsert by
//! id covers incremental additions between rebuilds. Distance metric is
//! cosine throughout.

pub mod indexer;

pub use indexer::SemanticIndexer;

use std::sync::Arc;

use pgvector::Vector;
use tracing::debug;

use crate::database::Database;
use crate::Result;

/// One nearest-neighbor hit: payload user id plus cosine similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub user_id: String,
    pub score: f64,
}

/// Vector collection handle
#[derive(Clone)]
pub struct VectorStore {
    database: Arc<Database>,
}

impl VectorStore {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Drop and recreate the collection for the given dimension.
    ///
    /// Must not run concurrently with retrieval traffic against the same
    /// store; reindexing is an offline step.
    pub async fn recreate_collection(&self, dimension: usize) -> Result<()> {
        sqlx::query("DROP TABLE IF EXISTS bio_embeddings")
            .execute(self.database.pool())
            .await?;

        // Dimension is config-controlled, never caller input
        let create = format!(
            r"
            CREATE TABLE bio_embeddings (
                id BIGINT PRIMARY KEY,
                user_id TEXT NOT NULL,
                embedding VECTOR({dimension}) NOT NULL
            )
            "
        );
        sqlx::query(&create).execute(self.database.pool()).await?;

        tracing::info!("Recreated bio_embeddings collection (dimension {dimension})");

        Ok(())
    }

    /// Insert or replace one point
    pub async fn upsert_point(&self, id: i64, embedding: Vec<f32>, user_id: &str) -> Result<()> {
        sqlx::query(
            r"
            INSERT INTO bio_embeddings (id, user_id, embedding)
            VALUES ($1, $2, $3)
            ON CONFLICT (id)
            DO UPDATE SET user_id = EXCLUDED.user_id, embedding = EXCLUDED.embedding
            ",
        )
        .bind(id)
        .bind(user_id)
        .bind(Vector::from(embedding))
        .execute(self.database.pool())
        .await?;

        Ok(())
    }

    /// k nearest neighbors by cosine similarity, best first.
    ///
    /// The raw result may include the point belonging to the query text's
    /// own user; callers filter it out. Ties keep the index's native order.
    pub async fn search(&self, embedding: Vec<f32>, k: usize) -> Result<Vec<SearchHit>> {
        debug!("Vector search, k={}", k);

        let rows: Vec<(String, f64)> = sqlx::query_as(
            r"
            SELECT user_id, 1 - (embedding <=> $1) AS score
            FROM bio_embeddings
            ORDER BY embedding <=> $1
            LIMIT $2
            ",
        )
        .bind(Vector::from(embedding))
        .bind(k as i64)
        .fetch_all(self.database.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, score)| SearchHit { user_id, score })
            .collect())
    }

    /// Number of indexed points
    pub async fn count_points(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bio_embeddings")
            .fetch_one(self.database.pool())
            .await?;

        Ok(count.0)
    }
}
