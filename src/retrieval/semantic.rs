//! Semantic retrieval: nearest neighbors over bio embeddings

use std::sync::Arc;

use tracing::debug;

use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::errors::NetRecError;
use crate::models::Recommendation;
use crate::vector::SearchHit;
use crate::vector::VectorStore;
use crate::Result;

/// Default neighbor count requested from the index. The raw result includes
/// the query user, which is filtered out afterwards.
pub const DEFAULT_K: usize = 5;

/// Reason attached to semantic hits; similarity has no single shared
/// attribute to cite.
const SIMILAR_REASON: &str = "Similar profile";

/// Retriever for bio-embedding similarity.
pub struct SemanticRetriever {
    database: Arc<Database>,
    embedding_service: Arc<EmbeddingService>,
    store: VectorStore,
    default_k: usize,
}

impl SemanticRetriever {
    pub fn new(
        database: Arc<Database>,
        embedding_service: Arc<EmbeddingService>,
        store: VectorStore,
        default_k: usize,
    ) -> Self {
        Self {
            database,
            embedding_service,
            store,
            default_k,
        }
    }

    /// Users whose bios are nearest to this user's bio, best match first.
    ///
    /// An empty bio counts as "no bio", not a zero vector, and fails with
    /// `UserNotFound`. The query user never appears in the result; with a
    /// collection holding only the query user the result is empty. Ordering
    /// is the index's own descending-similarity order, not re-sorted here.
    pub async fn find_similar(
        &self,
        user_id: &str,
        k: Option<usize>,
    ) -> Result<Vec<Recommendation>> {
        let k = k.unwrap_or(self.default_k);

        let document = self
            .database
            .get_bio_document(user_id)
            .await?
            .filter(|document| !document.bio.trim().is_empty())
            .ok_or_else(|| NetRecError::UserNotFound(user_id.to_string()))?;

        debug!("Semantic lookup for {} (k={})", user_id, k);

        let embedding = self.embedding_service.generate(&document.bio).await?;
        let hits = self.store.search(embedding, k).await?;

        Ok(exclude_self(user_id, hits))
    }
}

/// Drop the query user from the raw neighbor list, preserving index order.
fn exclude_self(user_id: &str, hits: Vec<SearchHit>) -> Vec<Recommendation> {
    hits.into_iter()
        .filter(|hit| hit.user_id != user_id)
        .map(|hit| Recommendation::new(hit.user_id, SIMILAR_REASON))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(user_id: &str, score: f64) -> SearchHit {
        SearchHit {
            user_id: user_id.to_string(),
            score,
        }
    }

    #[test]
    fn test_exclude_self_filters_query_user() {
        let hits = vec![hit("u001", 1.0), hit("u002", 0.9), hit("u003", 0.8)];
        let recs = exclude_self("u001", hits);
        assert_eq!(recs.len(), 2);
        assert!(recs.iter().all(|r| r.user_id != "u001"));
    }

    #[test]
    fn test_exclude_self_preserves_index_order() {
        let hits = vec![hit("u005", 0.95), hit("u001", 0.9), hit("u002", 0.85)];
        let recs = exclude_self("u001", hits);
        let ids: Vec<_> = recs.iter().map(|r| r.user_id.as_str()).collect();
        assert_eq!(ids, vec!["u005", "u002"]);
    }

    #[test]
    fn test_exclude_self_degenerate_collection() {
        // Collection holds only the query user
        let hits = vec![hit("u001", 1.0)];
        assert!(exclude_self("u001", hits).is_empty());
    }

    #[test]
    fn test_semantic_reason_is_generic() {
        let recs = exclude_self("u001", vec![hit("u002", 0.9)]);
        assert_eq!(recs[0].reason, "Similar profile");
    }
}
