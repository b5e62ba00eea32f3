//! CLI command handlers

use std::sync::Arc;

use crate::api::types::UserCard;
use crate::cli::commands::IngestCommands;
use crate::cli::output::*;
use crate::config::AppConfig;
use crate::database::Database;
use crate::embeddings::EmbeddingService;
use crate::graph::GraphStore;
use crate::ingest;
use crate::retrieval::aggregator;
use crate::retrieval::Router;
use crate::vector::SemanticIndexer;
use crate::vector::VectorStore;
use crate::Result;

/// Initialize the database schema
pub async fn handle_init(config: &AppConfig) -> Result<()> {
    let database = Database::from_config(config).await?;
    database.init_schema().await?;
    print_success("Database schema initialized");
    Ok(())
}

/// Run an ingestion subcommand
pub async fn handle_ingest(config: &AppConfig, command: IngestCommands) -> Result<()> {
    let database = Database::from_config(config).await?;
    database.verify_schema_or_error().await?;

    match command {
        IngestCommands::Profiles { path } => {
            let records = ingest::parse_users_csv(&path)?;
            let count = database.replace_users(&records).await?;
            print_success(&format!("Loaded {count} user records from {path}"));
        }
        IngestCommands::Bios { dir, jsonl_out } => {
            let documents = ingest::parse_bio_fragments(&dir)?;
            if let Some(out) = jsonl_out {
                ingest::write_bio_documents_jsonl(&documents, &out)?;
                print_info(&format!("Wrote {} documents to {out}", documents.len()));
            }
            let count = database.replace_bio_documents(&documents).await?;
            print_success(&format!("Stored {count} bio documents from {dir}"));
        }
    }

    Ok(())
}

/// Rebuild the vector index from stored bio documents
pub async fn handle_index(config: &AppConfig) -> Result<()> {
    let database = Arc::new(Database::from_config(config).await?);
    database.verify_schema_or_error().await?;

    let embedding_service = Arc::new(EmbeddingService::new(config)?);
    let store = VectorStore::new(database.clone());
    let indexer = SemanticIndexer::new(database, embedding_service, store);

    let indexed = indexer.rebuild().await?;
    print_success(&format!("Indexed {indexed} bios into the vector collection"));

    Ok(())
}

/// Rebuild the affiliation graph from user records
pub async fn handle_graph(config: &AppConfig) -> Result<()> {
    let database = Arc::new(Database::from_config(config).await?);
    database.verify_schema_or_error().await?;

    let users = database.list_users(i64::MAX).await?;
    let graph = GraphStore::new(database);
    let edges = graph.rebuild_from_users(&users).await?;

    print_success(&format!(
        "Built affiliation graph for {} users ({edges} edges)",
        users.len()
    ));

    Ok(())
}

/// Route a one-shot recommendation request
pub async fn handle_ask(
    config: &AppConfig,
    prompt: &str,
    classifier: Option<String>,
) -> Result<()> {
    let mut config = config.clone();
    if let Some(classifier) = classifier {
        config.retrieval.classifier = classifier;
    }

    let database = Arc::new(Database::from_config(&config).await?);
    database.verify_schema_or_error().await?;

    let embedding_service = Arc::new(EmbeddingService::new(&config)?);
    let router = Router::from_services(database.clone(), embedding_service, &config)?;

    let result = router.route(prompt).await?;

    // Fallback path: scan the router text for ids when the structured
    // aggregation produced nothing
    let ids: Vec<String> = if result.recommendations.is_empty() {
        aggregator::extract_user_ids(&result.text)
    } else {
        result
            .recommendations
            .iter()
            .map(|r| r.user_id.clone())
            .collect()
    };

    let cards = hydrate_cards(&database, &result, &ids).await?;
    print_recommendations(&result, &cards);

    Ok(())
}

async fn hydrate_cards(
    database: &Database,
    result: &crate::models::RouterResult,
    ids: &[String],
) -> Result<Vec<UserCard>> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let users = database.get_users_by_ids(ids).await?;

    let mut by_id: std::collections::HashMap<String, _> = users
        .into_iter()
        .map(|record| (record.user_id.clone(), record))
        .collect();

    Ok(ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|record| {
            let reason = result
                .recommendations
                .iter()
                .find(|r| r.user_id == record.user_id)
                .map(|r| r.reason.clone());
            UserCard::from_record(record, reason)
        })
        .collect())
}

/// Start the API server
pub async fn handle_serve(
    config: &AppConfig,
    host: Option<String>,
    port: Option<u16>,
    no_cors: bool,
) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);
    let enable_cors = !no_cors && config.server.enable_cors;

    crate::api::serve_api(config, host, port, enable_cors).await
}

/// Show store statistics
pub async fn handle_stats(config: &AppConfig) -> Result<()> {
    let database = Arc::new(Database::from_config(config).await?);
    database.verify_schema_or_error().await?;

    let users = database.count_users().await?;
    let bios = database.count_bio_documents().await?;

    println!("Users:          {users}");
    println!("Bio documents:  {bios}");

    // The collection only exists after the first index run
    let store = VectorStore::new(database);
    match store.count_points().await {
        Ok(points) => println!("Vector points:  {points}"),
        Err(_) => println!("Vector points:  (collection not built yet)"),
    }

    Ok(())
}
