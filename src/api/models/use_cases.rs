//! API request/response models for use cases.

use crate::db::models::use_cases::{UseCaseDBResponse, UseCaseWithCountDBResponse};
use crate::types::UseCaseId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for creating a use case (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UseCaseCreate {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UseCaseResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UseCaseId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of tools for this use case (listing endpoint only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_count: Option<i64>,
}

impl From<UseCaseDBResponse> for UseCaseResponse {
    fn from(db: UseCaseDBResponse) -> Self {
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

impl From<UseCaseWithCountDBResponse> for UseCaseResponse {
    fn from(db: UseCaseWithCountDBResponse) -> Self {
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

/// Use-case detail: the use case plus its most recent tools
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UseCaseDetailResponse {
    #[serde(flatten)]
    pub use_case: UseCaseResponse,
    #[schema(no_recursion)]
    pub tools: Vec<crate::api::models::tools::ToolResponse>,
}
