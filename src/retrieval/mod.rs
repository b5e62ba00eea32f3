//! Multi-modal retrieval routing
//!
//! This module is the core of NetRec: one recommendation request fans out to
//! one or more retrieval strategies, each hitting a different backend with
//! its own data shape and failure modes, and the results come back merged
//! with per-result provenance.
//!
//! - [`StructuredRetriever`]: exact filters over tabular attributes
//! - [`SemanticRetriever`]: nearest neighbors over bio embeddings
//! - [`RelationalRetriever`]: 2nd-degree connections through shared
//!   affiliations
//! - [`EntityResolver`]: person names in the request become canonical ids
//!   before dispatch
//! - [`Router`]: classification, isolated dispatch, aggregation
//!
//! # Examples
//!
//! ```rust,no_run
//! use netrec::config::AppConfig;
//! use netrec::retrieval::Router;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let router = Router::from_config(&config).await?;
//!
//!     let result = router.route("Find users who work at Acme").await?;
//!     for rec in &result.recommendations {
//!         println!("{}: {}", rec.user_id, rec.reason);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod classifier;
pub mod llm;
pub mod registry;
pub mod relational;
pub mod resolver;
pub mod router;
pub mod semantic;
pub mod structured;

pub use aggregator::InvocationOutcome;
pub use classifier::RouteStrategy;
pub use classifier::RuleClassifier;
pub use classifier::ToolCall;
pub use llm::LlmClassifier;
pub use registry::ToolSpec;
pub use relational::RelationalRetriever;
pub use resolver::EntityResolver;
pub use resolver::HeuristicNameExtractor;
pub use resolver::PersonNameExtractor;
pub use router::Router;
pub use semantic::SemanticRetriever;
pub use structured::StructuredRetriever;
