//! Retrieval router: classify, dispatch, contain failures, aggregate
//!
//! The router owns the dispatch and aggregation contract, independent of
//! which classifier produced the plan:
//!
//! 1. every invocation is isolated; a failure becomes a structured
//!    per-invocation diagnostic and never aborts siblings or the request;
//! 2. successful invocations merge through the aggregator, left-to-right in
//!    dispatch order;
//! 3. when everything fails or comes back empty, the caller sees the last
//!    diagnostic (or a generic no-results message), never an error;
//! 4. a failed backend call is never retried; these are interactive,
//!    user-facing lookups where a stale retry only adds latency.
//!
//! Invocations run concurrently; they share no mutable state, so parallel
//! execution is safe by construction and `join_all` keeps outcome order
//! equal to dispatch order.

use std::sync::Arc;

use futures::future::join_all;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::graph::GraphStore;
use crate::models::RouterResult;
use crate::retrieval::aggregator;
use crate::retrieval::aggregator::InvocationOutcome;
use crate::retrieval::classifier::RouteStrategy;
use crate::retrieval::classifier::ToolCall;
use crate::retrieval::EntityResolver;
use crate::retrieval::LlmClassifier;
use crate::retrieval::RelationalRetriever;
use crate::retrieval::RuleClassifier;
use crate::retrieval::SemanticRetriever;
use crate::retrieval::StructuredRetriever;
use crate::vector::VectorStore;
use crate::Result;

const NO_RESULTS: &str = "No matching users were found.";

/// Orchestration core over the three retrieval strategies.
pub struct Router {
    structured: StructuredRetriever,
    semantic: SemanticRetriever,
    relational: RelationalRetriever,
    resolver: EntityResolver,
    strategy: RouteStrategy,
}

impl Router {
    /// Build a router and all its backends from configuration.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let database = Arc::new(Database::from_config(config).await?);
        let embedding_service = Arc::new(EmbeddingService::new(config)?);
        Self::from_services(database, embedding_service, config)
    }

    /// Build a router from existing services.
    pub fn from_services(
        database: Arc<Database>,
        embedding_service: Arc<EmbeddingService>,
        config: &AppConfig,
    ) -> Result<Self> {
        let store = VectorStore::new(database.clone());
        let graph = GraphStore::new(database.clone());

        let strategy = match config.retrieval.classifier.as_str() {
            "llm" => RouteStrategy::Llm(LlmClassifier::new(config)?),
            _ => RouteStrategy::Rule(RuleClassifier),
        };

        Ok(Self {
            structured: StructuredRetriever::new(database.clone()),
            semantic: SemanticRetriever::new(
                database.clone(),
                embedding_service,
                store,
                config.semantic_k(),
            ),
            relational: RelationalRetriever::new(graph, config.connection_limit()),
            resolver: EntityResolver::with_heuristics(database),
            strategy,
        })
    }

    /// Route one recommendation request end to end.
    pub async fn route(&self, request: &str) -> Result<RouterResult> {
        info!("Routing request with {} classifier: {}", self.strategy.name(), request);

        // Person names become canonical ids before classification; failure
        // here degrades to the original text.
        let processed = self.resolver.preprocess(request).await;

        let plan = match self.strategy.classify(&processed).await {
            Ok(plan) => plan,
            Err(e) => {
                // Classification happens before any invocation exists, so
                // there is no sibling work to protect; degrade to a
                // diagnostic rather than failing the request.
                warn!("Classification failed: {}", e);
                return Ok(RouterResult {
                    text: format!("Unable to interpret request: {e}"),
                    recommendations: Vec::new(),
                });
            }
        };

        if plan.is_empty() {
            debug!("Empty dispatch plan for request");
            return Ok(RouterResult {
                text: NO_RESULTS.to_string(),
                recommendations: Vec::new(),
            });
        }

        debug!("Dispatching {} invocation(s)", plan.len());

        let outcomes = join_all(plan.iter().map(|call| self.execute(call))).await;

        for outcome in &outcomes {
            if let Err(diagnostic) = &outcome.result {
                warn!("Invocation {} failed: {}", outcome.invocation, diagnostic);
            }
        }

        let recommendations = aggregator::merge(&outcomes);
        let text = summarize(&outcomes, recommendations.len());

        Ok(RouterResult {
            text,
            recommendations,
        })
    }

    /// Run one invocation, containing any failure at this boundary.
    ///
    /// Failure is terminal for this invocation within the request: no retry,
    /// no backoff.
    async fn execute(&self, call: &ToolCall) -> InvocationOutcome {
        let invocation = call.describe();

        let result = match call {
            ToolCall::Structured { field, value } => self.structured.find(field, value).await,
            ToolCall::Semantic { user_id, k } => self.semantic.find_similar(user_id, *k).await,
            ToolCall::Relational {
                user_id,
                max_results,
            } => {
                self.relational
                    .find_connections(user_id, *max_results)
                    .await
            }
        };

        match result {
            Ok(recommendations) => InvocationOutcome::ok(invocation, recommendations),
            Err(e) => InvocationOutcome::failed(invocation, e.to_string()),
        }
    }
}

/// Textual summary for the caller: a count on success, the last diagnostic
/// (or a generic message) when nothing came back.
fn summarize(outcomes: &[InvocationOutcome], merged_count: usize) -> String {
    if merged_count > 0 {
        return format!(
            "Found {merged_count} recommended user(s) across {} retrieval call(s).",
            outcomes.len()
        );
    }

    outcomes
        .iter()
        .rev()
        .find_map(|outcome| outcome.result.as_ref().err().cloned())
        .unwrap_or_else(|| NO_RESULTS.to_string())
}
