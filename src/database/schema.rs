use super::Database;
use crate::NetRecError;
use crate::Result;

impl Database {
    /// Check if database schema is initialized
    /// Returns true if all required tables exist
    pub async fn is_schema_initialized(&self) -> Result<bool> {
        let required_tables = vec![
            "users",
            "bio_documents",
            "affiliation_nodes",
            "affiliation_edges",
        ];

        for table_name in required_tables {
            let result = sqlx::query_scalar::<_, bool>(
                r"
                SELECT EXISTS (
                    SELECT FROM information_schema.tables
                    WHERE table_schema = 'public'
                    AND table_name = $1
                )
                ",
            )
            .bind(table_name)
            .fetch_one(self.pool())
            .await?;

            if !result {
                tracing::debug!("Missing required table: {}", table_name);
                return Ok(false);
            }
        }

        Ok(true)
    }

    /// Verify database schema or return helpful error
    pub async fn verify_schema_or_error(&self) -> Result<()> {
        if !self.is_schema_initialized().await? {
            return Err(NetRecError::Custom(
                "Database schema not initialized. Run `netrec init` first.".to_string(),
            ));
        }
        Ok(())
    }

    /// Create all tables required by the retrieval path.
    ///
    /// The bio_embeddings collection is owned by the vector store and is
    /// dropped/recreated on reindex, so it is not created here.
    pub async fn init_schema(&self) -> Result<()> {
        // pgvector is needed for the bio_embeddings collection
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(self.pool())
            .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                user_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                email TEXT,
                company TEXT,
                school TEXT,
                location TEXT,
                title TEXT,
                bio TEXT
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bio_documents (
                user_id TEXT PRIMARY KEY,
                bio TEXT NOT NULL,
                sources TEXT[] NOT NULL DEFAULT '{}'
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS affiliation_nodes (
                id BIGSERIAL PRIMARY KEY,
                kind TEXT NOT NULL,
                name TEXT NOT NULL,
                UNIQUE (kind, name)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS affiliation_edges (
                user_id TEXT NOT NULL,
                node_id BIGINT NOT NULL REFERENCES affiliation_nodes(id) ON DELETE CASCADE,
                edge_type TEXT NOT NULL,
                PRIMARY KEY (user_id, node_id, edge_type)
            )
            ",
        )
        .execute(self.pool())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS affiliation_edges_node_idx ON affiliation_edges (node_id)",
        )
        .execute(self.pool())
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS users_name_idx ON users (name)")
            .execute(self.pool())
            .await?;

        tracing::info!("Database schema initialized");

        Ok(())
    }
}
