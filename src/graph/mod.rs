//! Affiliation graph store
//!
//! Directed edges from users to shared affiliation nodes
//! (`User -ATTENDED-> School`, `User -WORKED_AT-> Company`). Nodes are
//! deduplicated by `(kind, name)` with merge-on-conflict semantics, so
//! rebuilding against the same name never produces a duplicate. Fan-in on a
//! shared node is what makes 2nd-degree recommendations possible.
//!
//! The store is realized as node/edge tables in PostgreSQL behind this ADT;
//! only this module knows that, so the backing engine is a local swap.

use std::sync::Arc;

use tracing::debug;
use tracing::info;

use crate::database::Database;
use crate::models::UserRecord;
use crate::Result;

/// Edge labels in the affiliation graph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeType {
    Attended,
    WorkedAt,
}

impl EdgeType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Attended => "ATTENDED",
            Self::WorkedAt => "WORKED_AT",
        }
    }
}

/// Target node kinds; the kind names appear verbatim in reason strings
/// ("Shared School: MIT").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    School,
    Company,
}

impl NodeKind {
    pub const fn label(self) -> &'static str {
        match self {
            Self::School => "School",
            Self::Company => "Company",
        }
    }
}

/// One shared affiliation between the target user and a recommended user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedAffiliation {
    /// Node kind label ("School" or "Company")
    pub kind: String,
    pub name: String,
}

/// A recommended user with the distinct set of affiliations shared with the
/// target, in deterministic (kind, name) order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub user_id: String,
    pub shared: Vec<SharedAffiliation>,
}

/// Graph store handle
#[derive(Clone)]
pub struct GraphStore {
    database: Arc<Database>,
}

impl GraphStore {
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Remove every node and edge.
    pub async fn clear(&self) -> Result<()> {
        sqlx::query("DELETE FROM affiliation_edges")
            .execute(self.database.pool())
            .await?;
        sqlx::query("DELETE FROM affiliation_nodes")
            .execute(self.database.pool())
            .await?;

        debug!("Cleared affiliation graph");

        Ok(())
    }

    /// Merge one affiliation: node by (kind, name), then the typed edge.
    ///
    /// Idempotent; re-running against the same name yields the same node.
    pub async fn merge_affiliation(
        &self,
        user_id: &str,
        kind: NodeKind,
        name: &str,
        edge_type: EdgeType,
    ) -> Result<()> {
        let node_id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO affiliation_nodes (kind, name)
            VALUES ($1, $2)
            ON CONFLICT (kind, name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            ",
        )
        .bind(kind.label())
        .bind(name)
        .fetch_one(self.database.pool())
        .await?;

        sqlx::query(
            r"
            INSERT INTO affiliation_edges (user_id, node_id, edge_type)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, node_id, edge_type) DO NOTHING
            ",
        )
        .bind(user_id)
        .bind(node_id)
        .bind(edge_type.label())
        .execute(self.database.pool())
        .await?;

        Ok(())
    }

    /// Clear and rebuild the graph from user records.
    ///
    /// Offline destructive step; must not run concurrently with retrieval
    /// against the same store.
    pub async fn rebuild_from_users(&self, users: &[UserRecord]) -> Result<usize> {
        self.clear().await?;

        let mut edges = 0usize;
        for user in users {
            if let Some(school) = user.school.as_deref().filter(|s| !s.trim().is_empty()) {
                self.merge_affiliation(&user.user_id, NodeKind::School, school, EdgeType::Attended)
                    .await?;
                edges += 1;
            }
            if let Some(company) = user.company.as_deref().filter(|s| !s.trim().is_empty()) {
                self.merge_affiliation(
                    &user.user_id,
                    NodeKind::Company,
                    company,
                    EdgeType::WorkedAt,
                )
                .await?;
                edges += 1;
            }
        }

        info!("Built affiliation graph for {} users ({} edges)", users.len(), edges);

        Ok(edges)
    }

    /// 2nd-degree connections: one forward traversal to a shared node, one
    /// backward traversal to other users, excluding the target itself.
    ///
    /// Each recommended user appears once with the distinct set of
    /// `(kind, name)` pairs shared with the target. Results are capped at
    /// `max_results` users in user_id ascending order, a deliberate
    /// deterministic tie-break.
    pub async fn find_connections(
        &self,
        user_id: &str,
        max_results: usize,
    ) -> Result<Vec<Connection>> {
        let rows: Vec<(String, String, String)> = sqlx::query_as(
            r"
            SELECT e2.user_id, n.kind, n.name
            FROM affiliation_edges e1
            JOIN affiliation_nodes n ON n.id = e1.node_id
            JOIN affiliation_edges e2 ON e2.node_id = e1.node_id
            WHERE e1.user_id = $1 AND e2.user_id <> $1
            GROUP BY e2.user_id, n.kind, n.name
            ORDER BY e2.user_id ASC, n.kind ASC, n.name ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.database.pool())
        .await?;

        Ok(group_connections(rows, max_results))
    }
}

/// Fold (user, kind, name) rows, already sorted by user then affiliation,
/// into per-user connection groups capped at `max_results` users.
fn group_connections(rows: Vec<(String, String, String)>, max_results: usize) -> Vec<Connection> {
    let mut connections: Vec<Connection> = Vec::new();

    for (user_id, kind, name) in rows {
        match connections.last_mut() {
            Some(last) if last.user_id == user_id => {
                last.shared.push(SharedAffiliation { kind, name });
            }
            _ => {
                if connections.len() == max_results {
                    break;
                }
                connections.push(Connection {
                    user_id,
                    shared: vec![SharedAffiliation { kind, name }],
                });
            }
        }
    }

    connections
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(user: &str, kind: &str, name: &str) -> (String, String, String) {
        (user.to_string(), kind.to_string(), name.to_string())
    }

    #[test]
    fn test_group_connections_combines_shared_pairs() {
        let rows = vec![
            row("u002", "Company", "Acme"),
            row("u002", "School", "MIT"),
            row("u003", "School", "MIT"),
        ];

        let grouped = group_connections(rows, 10);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].user_id, "u002");
        assert_eq!(grouped[0].shared.len(), 2);
        assert_eq!(grouped[1].user_id, "u003");
        assert_eq!(grouped[1].shared.len(), 1);
    }

    #[test]
    fn test_group_connections_caps_users_not_rows() {
        let rows = vec![
            row("u002", "Company", "Acme"),
            row("u002", "School", "MIT"),
            row("u003", "School", "MIT"),
            row("u004", "Company", "Acme"),
        ];

        let grouped = group_connections(rows, 2);
        assert_eq!(grouped.len(), 2);
        // The cap applies to distinct users; u002 keeps both affiliations
        assert_eq!(grouped[0].shared.len(), 2);
        assert_eq!(grouped[1].user_id, "u003");
    }

    #[test]
    fn test_group_connections_empty() {
        assert!(group_connections(Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_edge_and_node_labels() {
        assert_eq!(EdgeType::Attended.label(), "ATTENDED");
        assert_eq!(EdgeType::WorkedAt.label(), "WORKED_AT");
        assert_eq!(NodeKind::School.label(), "School");
        assert_eq!(NodeKind::Company.label(), "Company");
    }
}
