//! API response models for tool reviews.

use crate::db::models::reviews::ReviewWithUserDBResponse;
use crate::types::{ReviewId, UserId};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Public profile of a reviewer
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewerResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ReviewId,
    pub rating: i64,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user: ReviewerResponse,
}

impl From<ReviewWithUserDBResponse> for ReviewResponse {
    fn from(db: ReviewWithUserDBResponse) -> Self {
        Self {
            id: db.id,
            rating: db.rating,
            comment: db.comment,
            created_at: db.created_at,
            updated_at: db.updated_at,
            user: ReviewerResponse {
                id: db.user_id,
                name: db.user_name,
                image: db.user_image,
            },
        }
    }
}
