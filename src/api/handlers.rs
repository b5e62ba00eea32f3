//! API request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::Path;
use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::error;
use tracing::info;

use crate::api::types::*;
use crate::database::Database;
use crate::retrieval::aggregator;
use crate::retrieval::registry;
use crate::retrieval::registry::ToolSpec;
use crate::retrieval::Router;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub database: Arc<Database>,
    pub router: Arc<Router>,
}

/// Health check
pub async fn health() -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

/// List declared retrieval capabilities
pub async fn list_tools() -> Json<ApiResponse<Vec<ToolSpec>>> {
    Json(ApiResponse::success(registry::builtin_tools()))
}

/// List users
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<Json<ApiResponse<Vec<UserCard>>>, StatusCode> {
    match state.database.list_users(query.limit).await {
        Ok(users) => Ok(Json(ApiResponse::success(
            users
                .into_iter()
                .map(|record| UserCard::from_record(record, None))
                .collect(),
        ))),
        Err(e) => {
            error!("Error listing users: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Get a single user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<ApiResponse<UserCard>>, StatusCode> {
    match state.database.get_user(&user_id).await {
        Ok(Some(record)) => Ok(Json(ApiResponse::success(UserCard::from_record(
            record, None,
        )))),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => {
            error!("Error fetching user {}: {}", user_id, e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Route a recommendation request and hydrate the result set
pub async fn recommend(
    State(state): State<AppState>,
    Json(req): Json<RecommendRequest>,
) -> Result<Json<ApiResponse<RecommendResponse>>, StatusCode> {
    info!("POST /api/recommend: {}", req.prompt);

    let result = match state.router.route(&req.prompt).await {
        Ok(result) => result,
        Err(e) => {
            error!("Error routing recommendation request: {}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    // Structured aggregation is the primary path; the free-text id scan is
    // a lossy last resort when no structured keys came back.
    let (ids, used_fallback) = if result.recommendations.is_empty() {
        (aggregator::extract_user_ids(&result.text), true)
    } else {
        (
            result
                .recommendations
                .iter()
                .map(|r| r.user_id.clone())
                .collect(),
            false,
        )
    };

    let users = if ids.is_empty() {
        Vec::new()
    } else {
        match state.database.get_users_by_ids(&ids).await {
            Ok(users) => users,
            Err(e) => {
                error!("Error hydrating user cards: {}", e);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        }
    };

    let reasons: HashMap<&str, &str> = result
        .recommendations
        .iter()
        .map(|r| (r.user_id.as_str(), r.reason.as_str()))
        .collect();

    // Cards follow recommendation order, not the store's id order
    let mut by_id: HashMap<String, _> = users
        .into_iter()
        .map(|record| (record.user_id.clone(), record))
        .collect();
    let cards: Vec<UserCard> = ids
        .iter()
        .filter_map(|id| by_id.remove(id))
        .map(|record| {
            let reason = reasons.get(record.user_id.as_str()).map(ToString::to_string);
            UserCard::from_record(record, reason)
        })
        .collect();

    Ok(Json(ApiResponse::success(RecommendResponse {
        output_text: result.text,
        recommendations: result.recommendations,
        users: cards,
        used_fallback,
    })))
}
