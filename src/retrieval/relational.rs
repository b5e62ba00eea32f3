//! Relational retrieval: 2nd-degree connections through shared affiliations

use tracing::debug;

use crate::graph::GraphStore;
use crate::graph::SharedAffiliation;
use crate::models::Recommendation;
use crate::Result;

/// Default cap on users returned per lookup.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Retriever for graph-based connection recommendations.
pub struct RelationalRetriever {
    graph: GraphStore,
    default_max_results: usize,
}

impl RelationalRetriever {
    pub fn new(graph: GraphStore, default_max_results: usize) -> Self {
        Self {
            graph,
            default_max_results,
        }
    }

    /// Users connected to `user_id` through a shared school or company.
    ///
    /// A user sharing several affiliations with the target appears once,
    /// with every distinct shared pair folded into a single comma-separated
    /// reason. The target itself never appears.
    pub async fn find_connections(
        &self,
        user_id: &str,
        max_results: Option<usize>,
    ) -> Result<Vec<Recommendation>> {
        let max_results = max_results.unwrap_or(self.default_max_results);

        debug!("Graph lookup for {} (max {})", user_id, max_results);

        let connections = self.graph.find_connections(user_id, max_results).await?;

        Ok(connections
            .into_iter()
            .map(|connection| {
                Recommendation::new(connection.user_id, format_reason(&connection.shared))
            })
            .collect())
    }
}

/// "Shared School: MIT, Shared Company: Acme"
fn format_reason(shared: &[SharedAffiliation]) -> String {
    shared
        .iter()
        .map(|affiliation| format!("Shared {}: {}", affiliation.kind, affiliation.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn affiliation(kind: &str, name: &str) -> SharedAffiliation {
        SharedAffiliation {
            kind: kind.to_string(),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_format_reason_single() {
        let shared = vec![affiliation("Company", "Acme")];
        assert_eq!(format_reason(&shared), "Shared Company: Acme");
    }

    #[test]
    fn test_format_reason_multiple_pairs_joined() {
        let shared = vec![affiliation("Company", "Acme"), affiliation("School", "MIT")];
        assert_eq!(
            format_reason(&shared),
            "Shared Company: Acme, Shared School: MIT"
        );
    }
}
