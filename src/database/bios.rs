use super::Database;
use crate::models::BioDocument;
use crate::Result;

impl Database {
    /// Replace all bio documents with a freshly parsed set.
    ///
    /// Bio documents are a derived artifact, regenerated wholesale on each
    /// ingestion run. No incremental update path exists.
    pub async fn replace_bio_documents(&self, documents: &[BioDocument]) -> Result<usize> {
        let mut tx = self.pool().begin().await?;

        sqlx::query("DELETE FROM bio_documents")
            .execute(&mut *tx)
            .await?;

        for document in documents {
            sqlx::query(
                "INSERT INTO bio_documents (user_id, bio, sources) VALUES ($1, $2, $3)",
            )
            .bind(&document.user_id)
            .bind(&document.bio)
            .bind(&document.sources)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!("Stored {} bio documents", documents.len());

        Ok(documents.len())
    }

    /// Get the merged bio document for one user
    pub async fn get_bio_document(&self, user_id: &str) -> Result<Option<BioDocument>> {
        let row: Option<(String, String, Vec<String>)> = sqlx::query_as(
            "SELECT user_id, bio, sources FROM bio_documents WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(self.pool())
        .await?;

        Ok(row.map(|(user_id, bio, sources)| BioDocument {
            user_id,
            bio,
            sources,
        }))
    }

    /// Count stored bio documents
    pub async fn count_bio_documents(&self) -> Result<i64> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM bio_documents")
            .fetch_one(self.pool())
            .await?;

        Ok(count.0)
    }

    /// List every bio document, id order (indexer input)
    pub async fn list_bio_documents(&self) -> Result<Vec<BioDocument>> {
        let rows: Vec<(String, String, Vec<String>)> = sqlx::query_as(
            "SELECT user_id, bio, sources FROM bio_documents ORDER BY user_id ASC",
        )
        .fetch_all(self.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|(user_id, bio, sources)| BioDocument {
                user_id,
                bio,
                sources,
            })
            .collect())
    }
}
