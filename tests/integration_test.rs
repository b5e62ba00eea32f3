//! Integration tests against a live PostgreSQL instance
//!
//! These tests are ignored by default; run them with `cargo test -- --ignored`
//! against a dedicated database configured in config.toml (pgvector extension
//! required). Ingestion is destructive, so never point these at real data.

use std::sync::Arc;

use netrec::config::AppConfig;
use netrec::database::Database;
use netrec::embeddings::EmbeddingService;
use netrec::graph::GraphStore;
use netrec::models::UserRecord;
use netrec::retrieval::RelationalRetriever;
use netrec::retrieval::Router;
use netrec::retrieval::StructuredRetriever;
use netrec::vector::VectorStore;

fn user(
    user_id: &str,
    name: &str,
    company: Option<&str>,
    school: Option<&str>,
) -> UserRecord {
    UserRecord {
        user_id: user_id.to_string(),
        name: name.to_string(),
        email: None,
        company: company.map(ToString::to_string),
        school: school.map(ToString::to_string),
        location: None,
        title: None,
        bio: None,
    }
}

/// u001 shares a company with u002 and a school with u003.
fn scenario_users() -> Vec<UserRecord> {
    vec![
        user("u001", "Alice Heart", Some("Acme"), Some("MIT")),
        user("u002", "Bob Stone", Some("Acme"), None),
        user("u003", "Carol Reed", None, Some("MIT")),
    ]
}

async fn setup() -> (AppConfig, Arc<Database>) {
    let config = AppConfig::load().expect("config.toml required for integration tests");
    let database = Arc::new(
        Database::from_config(&config)
            .await
            .expect("database connection"),
    );
    database.init_schema().await.expect("schema init");
    database
        .replace_users(&scenario_users())
        .await
        .expect("user ingest");
    (config, database)
}

#[tokio::test]
#[ignore]
async fn test_structured_find_matches_exactly() {
    let (_config, database) = setup().await;

    let retriever = StructuredRetriever::new(database);
    let recs = retriever.find("company", "Acme").await.unwrap();

    let ids: Vec<_> = recs.iter().map(|r| r.user_id.as_str()).collect();
    assert_eq!(ids, vec!["u001", "u002"]);
    assert!(recs.iter().all(|r| r.reason == "Same company: Acme"));
}

#[tokio::test]
#[ignore]
async fn test_structured_invalid_field_fails_without_query() {
    let (_config, database) = setup().await;

    let retriever = StructuredRetriever::new(database);
    let err = retriever.find("email", "alice@acme.com").await.unwrap_err();
    assert!(err.to_string().contains("Allowed fields"));
}

#[tokio::test]
#[ignore]
async fn test_graph_scenario_connections() {
    let (_config, database) = setup().await;

    let graph = GraphStore::new(database.clone());
    let users = database.list_users(i64::MAX).await.unwrap();
    graph.rebuild_from_users(&users).await.unwrap();

    let retriever = RelationalRetriever::new(graph, 10);
    let recs = retriever.find_connections("u001", None).await.unwrap();

    assert_eq!(recs.len(), 2);
    assert_eq!(recs[0].user_id, "u002");
    assert_eq!(recs[0].reason, "Shared Company: Acme");
    assert_eq!(recs[1].user_id, "u003");
    assert_eq!(recs[1].reason, "Shared School: MIT");

    // The target user itself never appears
    assert!(recs.iter().all(|r| r.user_id != "u001"));
}

#[tokio::test]
#[ignore]
async fn test_graph_rebuild_is_idempotent() {
    let (_config, database) = setup().await;

    let graph = GraphStore::new(database.clone());
    let users = database.list_users(i64::MAX).await.unwrap();
    let first = graph.rebuild_from_users(&users).await.unwrap();
    let second = graph.rebuild_from_users(&users).await.unwrap();

    // Merge-on-conflict: same input, same edge count, no duplicates
    assert_eq!(first, second);

    let retriever = RelationalRetriever::new(graph, 10);
    let recs = retriever.find_connections("u001", None).await.unwrap();
    assert_eq!(recs.len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_vector_store_search_order_and_upsert() {
    let (_config, database) = setup().await;

    let store = VectorStore::new(database);
    store.recreate_collection(3).await.unwrap();

    store
        .upsert_point(1, vec![1.0, 0.0, 0.0], "u001")
        .await
        .unwrap();
    store
        .upsert_point(2, vec![0.9, 0.1, 0.0], "u002")
        .await
        .unwrap();
    store
        .upsert_point(3, vec![0.0, 1.0, 0.0], "u003")
        .await
        .unwrap();

    let hits = store.search(vec![1.0, 0.0, 0.0], 3).await.unwrap();
    let ids: Vec<_> = hits.iter().map(|h| h.user_id.as_str()).collect();
    assert_eq!(ids, vec!["u001", "u002", "u003"]);

    // Upsert by id replaces the payload in place
    store
        .upsert_point(3, vec![0.95, 0.05, 0.0], "u003")
        .await
        .unwrap();
    let hits = store.search(vec![1.0, 0.0, 0.0], 2).await.unwrap();
    let ids: Vec<_> = hits.iter().map(|h| h.user_id.as_str()).collect();
    assert_eq!(ids, vec!["u001", "u003"]);
}

#[tokio::test]
#[ignore]
async fn test_router_isolates_failing_sibling_invocation() {
    let (mut config, database) = setup().await;
    config.retrieval.classifier = "rule".to_string();

    let graph = GraphStore::new(database.clone());
    let users = database.list_users(i64::MAX).await.unwrap();
    graph.rebuild_from_users(&users).await.unwrap();

    // "similar to u001" dispatches a semantic invocation that fails here
    // (no vector collection and no reachable embedding endpoint); the
    // relational sibling must still deliver its results.
    let embedding_service = Arc::new(EmbeddingService::new(&config).unwrap());
    let router = Router::from_services(database, embedding_service, &config).unwrap();

    let result = router
        .route("Find users similar to u001 and u001's connections")
        .await
        .unwrap();

    let ids: Vec<_> = result
        .recommendations
        .iter()
        .map(|r| r.user_id.as_str())
        .collect();
    assert_eq!(ids, vec!["u002", "u003"]);
}

#[tokio::test]
#[ignore]
async fn test_router_surfaces_diagnostic_when_everything_fails() {
    let (mut config, database) = setup().await;
    config.retrieval.classifier = "rule".to_string();

    let embedding_service = Arc::new(EmbeddingService::new(&config).unwrap());
    let router = Router::from_services(database, embedding_service, &config).unwrap();

    // Semantic lookup for a user with no bio document fails inside the
    // invocation; with no sibling producing results the diagnostic text is
    // the user-visible output, never an error.
    let result = router.route("find users similar to u099").await.unwrap();
    assert!(result.recommendations.is_empty());
    assert!(!result.text.is_empty());
}
