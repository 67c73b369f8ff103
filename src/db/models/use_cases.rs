//! Database models for use cases.

use crate::api::models::use_cases::UseCaseCreate;
use crate::types::UseCaseId;
use chrono::{DateTime, Utc};

/// Database request for creating a new use case
#[derive(Debug, Clone)]
pub struct UseCaseCreateDBRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<UseCaseCreate> for UseCaseCreateDBRequest {
    fn from(api: UseCaseCreate) -> Self {
        Self {
            slug: api.slug,
            name: api.name,
            description: api.description,
        }
    }
}

/// Database response for a use case
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UseCaseDBResponse {
    pub id: UseCaseId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Use-case row with its tool count, used by the listing endpoint
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UseCaseWithCountDBResponse {
    pub id: UseCaseId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tool_count: i64,
}
