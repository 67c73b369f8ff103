//! Database models for catalog tools.

use crate::api::models::tools::{Platform, PricingModel, ToolCreate};
use crate::types::{CategoryId, ToolId, UseCaseId};
use chrono::{DateTime, Utc};

/// Database request for creating a new tool
#[derive(Debug, Clone)]
pub struct ToolCreateDBRequest {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub long_description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub pricing_model: PricingModel,
    pub has_free_version: bool,
    pub starting_price: Option<f64>,
    pub featured: bool,
    pub verified: bool,
    pub launch_date: Option<DateTime<Utc>>,
    pub category_ids: Vec<CategoryId>,
    pub use_case_ids: Vec<UseCaseId>,
    pub platforms: Vec<Platform>,
    pub integrations: Vec<String>,
}

impl From<ToolCreate> for ToolCreateDBRequest {
    fn from(api: ToolCreate) -> Self {
        Self {
            slug: api.slug,
            name: api.name,
            description: api.description,
            long_description: api.long_description,
            website: api.website,
            logo: api.logo,
            pricing_model: api.pricing_model,
            has_free_version: api.has_free_version.unwrap_or(false),
            starting_price: api.starting_price,
            featured: api.featured.unwrap_or(false),
            verified: api.verified.unwrap_or(false),
            launch_date: api.launch_date,
            category_ids: api.category_ids,
            use_case_ids: api.use_case_ids,
            platforms: api.platforms,
            integrations: api.integrations,
        }
    }
}

/// Database response for a tool row (relations loaded separately)
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ToolDBResponse {
    pub id: ToolId,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub long_description: Option<String>,
    pub website: Option<String>,
    pub logo: Option<String>,
    pub pricing_model: PricingModel,
    pub has_free_version: bool,
    pub starting_price: Option<f64>,
    pub featured: bool,
    pub verified: bool,
    pub view_count: i64,
    pub launch_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal row for typeahead name search
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ToolNameDBResponse {
    pub id: ToolId,
    pub name: String,
    pub slug: String,
}
