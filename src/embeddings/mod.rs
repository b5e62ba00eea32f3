//! Embeddings generation module
//!
//! Wraps the external embedding model behind one function: text in, fixed-length
//! vector out. Providers:
//! - OpenAI-compatible endpoints (text-embedding-3-small, etc.)
//! - Ollama (local models)
//!
//! The model is deterministic for identical input within one deployment; model
//! identity is a deployment concern, not part of the retrieval contract.
//!
//! # Examples
//!
//! ```rust,no_run
//! use netrec::embeddings::EmbeddingService;
//! use netrec::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let service = EmbeddingService::new(&config)?;
//!
//!     let embedding = service.generate("Distributed systems engineer").await?;
//!     println!("Generated embedding with {} dimensions", embedding.len());
//!
//!     Ok(())
//! }
//! ```

pub mod client;

pub use client::EmbeddingClient;
pub use client::EmbeddingProvider;

use crate::errors::NetRecError;
use crate::errors::Result;

/// Service wrapper validating vectors against the configured dimension
pub struct EmbeddingService {
    client: EmbeddingClient,
    dimension: usize,
}

impl EmbeddingService {
    /// Create a service from application configuration
    pub fn new(config: &crate::config::AppConfig) -> Result<Self> {
        let provider = EmbeddingProvider::parse(&config.embeddings.provider)?;
        let client = EmbeddingClient::new(
            provider,
            config.embeddings.model.clone(),
            config.embeddings.endpoint.clone(),
            config.embeddings.api_key.clone(),
        )?;

        Ok(Self {
            client,
            dimension: config.embedding_dimension(),
        })
    }

    /// Generate an embedding for one text
    ///
    /// # Errors
    /// - API request failures (network errors, timeouts, authentication)
    /// - Dimension mismatch between the response and the configured index
    pub async fn generate(&self, text: &str) -> Result<Vec<f32>> {
        let embedding = self.client.generate(text).await?;

        if embedding.len() != self.dimension {
            return Err(NetRecError::Embedding(format!(
                "Model returned {} dimensions, index expects {}",
                embedding.len(),
                self.dimension
            )));
        }

        Ok(embedding)
    }

    /// Configured embedding dimension
    #[must_use]
    pub const fn dimension(&self) -> usize {
        self.dimension
    }
}
