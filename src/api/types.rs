//! API request and response types

use serde::Deserialize;
use serde::Serialize;

use crate::models::Recommendation;
use crate::models::UserRecord;

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Recommendation request
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub prompt: String,
}

/// Recommendation response: the router's text and structured output, plus
/// user cards hydrated from the relational store.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub output_text: String,
    pub recommendations: Vec<Recommendation>,
    pub users: Vec<UserCard>,
    /// True when the ids came from the lossy free-text fallback scan rather
    /// than the structured aggregation path.
    pub used_fallback: bool,
}

/// Hydrated user card for display
#[derive(Debug, Serialize)]
pub struct UserCard {
    pub user_id: String,
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub company: Option<String>,
    pub school: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub reason: Option<String>,
}

impl UserCard {
    pub fn from_record(record: UserRecord, reason: Option<String>) -> Self {
        Self {
            user_id: record.user_id,
            name: record.name,
            title: record.title,
            email: record.email,
            company: record.company,
            school: record.school,
            location: record.location,
            bio: record.bio,
            reason,
        }
    }
}

/// User listing query parameters
#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}
