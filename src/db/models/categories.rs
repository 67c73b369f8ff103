//! Database models for categories.

use crate::api::models::categories::CategoryCreate;
use crate::types::CategoryId;
use chrono::{DateTime, Utc};

/// Database request for creating a new category
#[derive(Debug, Clone)]
pub struct CategoryCreateDBRequest {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
}

impl From<CategoryCreate> for CategoryCreateDBRequest {
    fn from(api: CategoryCreate) -> Self {
        Self {
            slug: api.slug,
            name: api.name,
            description: api.description,
        }
    }
}

/// Database response for a category
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryDBResponse {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category row with its tool count, used by the listing endpoint
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CategoryWithCountDBResponse {
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tool_count: i64,
}
