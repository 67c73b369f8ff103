//! Database models for tool reviews.

use crate::types::{ReviewId, ToolId, UserId};
use chrono::{DateTime, Utc};

/// Database request for creating a review
#[derive(Debug, Clone)]
pub struct ReviewCreateDBRequest {
    pub tool_id: ToolId,
    pub user_id: UserId,
    pub rating: i64,
    pub comment: Option<String>,
}

/// Database response for a review
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewDBResponse {
    pub id: ReviewId,
    pub tool_id: ToolId,
    pub user_id: UserId,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Review joined with the reviewer's public profile fields
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReviewWithUserDBResponse {
    pub id: ReviewId,
    pub tool_id: ToolId,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: UserId,
    pub user_name: Option<String>,
    pub user_image: Option<String>,
}
