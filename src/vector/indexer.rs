//! Offline rebuild of the bio embedding collection

use std::sync::Arc;

use tracing::info;
use tracing::warn;

use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::vector::VectorStore;
use crate::Result;

/// Rebuilds the vector collection from stored bio documents.
pub struct SemanticIndexer {
    database: Arc<Database>,
    embedding_service: Arc<EmbeddingService>,
    store: VectorStore,
}

impl SemanticIndexer {
    pub fn new(
        database: Arc<Database>,
        embedding_service: Arc<EmbeddingService>,
        store: VectorStore,
    ) -> Self {
        Self {
            database,
            embedding_service,
            store,
        }
    }

    /// Embed every non-empty bio and rebuild the collection from scratch.
    ///
    /// Users with an empty bio get no embedding at all; they are absent from
    /// the index rather than present as a zero vector. Returns the number of
    /// indexed points.
    pub async fn rebuild(&self) -> Result<usize> {
        let documents = self.database.list_bio_documents().await?;

        let dimension = self.embedding_service.dimension();
        self.store.recreate_collection(dimension).await?;

        let mut indexed = 0usize;
        let mut skipped = 0usize;

        for document in &documents {
            if document.bio.trim().is_empty() {
                skipped += 1;
                continue;
            }

            let embedding = self.embedding_service.generate(&document.bio).await?;

            // Point ids are positions in the rebuild, starting at 1
            let point_id = (indexed + 1) as i64;
            self.store
                .upsert_point(point_id, embedding, &document.user_id)
                .await?;
            indexed += 1;
        }

        if skipped > 0 {
            warn!("Skipped {} user(s) with empty bios", skipped);
        }
        info!("Indexed {} bios into the vector collection", indexed);

        Ok(indexed)
    }
}
