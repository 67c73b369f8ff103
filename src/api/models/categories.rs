//! API request/response models for categories.

use crate::db::models::categories::{CategoryDBResponse, CategoryWithCountDBResponse};
use crate::types::CategoryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a category (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryCreate {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: CategoryId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of tools in this category (listing endpoint only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_count: Option<i64>,
}

impl From<CategoryDBResponse> for CategoryResponse {
    fn from(db: CategoryDBResponse) -> Self {
        Self {
            id: db.id,
            slug: db.slug,
            name: db.name,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
            tool_count: None,
        }
    }
}

impl From<CategoryWithCountDBResponse> for CategoryResponse {
    fn from(db: CategoryWithCountDBResponse) -> Self {
        Self {
            id: db.id,
            slug: db.slug,
            name: db.name,
            description: db.description,
            created_at: db.created_at,
            updated_at: db.updated_at,
            tool_count: Some(db.tool_count),
        }
    }
}

/// Category detail: the category plus its most recent tools
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryDetailResponse {
    #[serde(flatten)]
    pub category: CategoryResponse,
    #[schema(no_recursion)]
    pub tools: Vec<crate::api::models::tools::ToolResponse>,
}
