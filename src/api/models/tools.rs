//! API request/response models for catalog tools.

use super::categories::CategoryResponse;
use super::pagination::CursorPagination;
use super::reviews::ReviewResponse;
use super::use_cases::UseCaseResponse;
use crate::db::models::categories::CategoryDBResponse;
use crate::db::models::tools::{ToolDBResponse, ToolNameDBResponse};
use crate::types::{CategoryId, ToolId, UseCaseId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

/// How a tool is priced. Closed set; the API rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PricingModel {
    Free,
    Freemium,
    Paid,
    Subscription,
    ContactForPricing,
}

impl std::str::FromStr for PricingModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "FREE" => Ok(PricingModel::Free),
            "FREEMIUM" => Ok(PricingModel::Freemium),
            "PAID" => Ok(PricingModel::Paid),
            "SUBSCRIPTION" => Ok(PricingModel::Subscription),
            "CONTACT_FOR_PRICING" => Ok(PricingModel::ContactForPricing),
            _ => Err(format!("Unknown pricing model: {s}")),
        }
    }
}

/// Platform a tool runs on. Closed set, stored normalized per tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Platform {
    Web,
    Desktop,
    Mobile,
    Api,
    Extension,
}

impl std::str::FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEB" => Ok(Platform::Web),
            "DESKTOP" => Ok(Platform::Desktop),
            "MOBILE" => Ok(Platform::Mobile),
            "API" => Ok(Platform::Api),
            "EXTENSION" => Ok(Platform::Extension),
            _ => Err(format!("Unknown platform: {s}")),
        }
    }
}

/// Request body for submitting a new tool (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ToolCreate {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub long_description: Option<String>,
    /// Absolute URL of the tool's website
    pub website: Option<String>,
    /// Absolute URL of the tool's logo image
    pub logo: Option<String>,
    pub pricing_model: PricingModel,
    pub has_free_version: Option<bool>,
    pub starting_price: Option<f64>,
    pub featured: Option<bool>,
    pub verified: Option<bool>,
    pub launch_date: Option<DateTime<Utc>>,
    /// At least one existing category id
    #[schema(value_type = Vec<String>, format = "uuid")]
    pub category_ids: Vec<CategoryId>,
    #[serde(default)]
    #[schema(value_type = Vec<String>, format = "uuid")]
    pub use_case_ids: Vec<UseCaseId>,
    #[serde(default)]
    pub platforms: Vec<Platform>,
    #[serde(default)]
    pub integrations: Vec<String>,
}

/// Tool as returned by listing endpoints, with its categories attached
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolResponse {
    #[schema(value_type = String, format = "uuid")]
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
    pub categories: Vec<CategoryResponse>,
}

impl ToolResponse {
    pub fn from_db(db: ToolDBResponse, categories: Vec<CategoryDBResponse>) -> Self {
        Self {
            id: db.id,
            slug: db.slug,
            name: db.name,
            description: db.description,
            long_description: db.long_description,
            website: db.website,
            logo: db.logo,
            pricing_model: db.pricing_model,
            has_free_version: db.has_free_version,
            starting_price: db.starting_price,
            featured: db.featured,
            verified: db.verified,
            view_count: db.view_count,
            launch_date: db.launch_date,
            created_at: db.created_at,
            updated_at: db.updated_at,
            categories: categories.into_iter().map(CategoryResponse::from).collect(),
        }
    }
}

/// Full tool detail: everything on [`ToolResponse`] plus use cases,
/// platforms, integrations, and reviews
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolDetailResponse {
    #[serde(flatten)]
    pub tool: ToolResponse,
    pub use_cases: Vec<UseCaseResponse>,
    pub platforms: Vec<Platform>,
    pub integrations: Vec<String>,
    pub reviews: Vec<ReviewResponse>,
}

/// Typeahead search result
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ToolSearchResult {
    #[schema(value_type = String, format = "uuid")]
    pub id: ToolId,
    pub name: String,
    pub slug: String,
}

impl From<ToolNameDBResponse> for ToolSearchResult {
    fn from(db: ToolNameDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            slug: db.slug,
        }
    }
}

/// Query parameters for the plain tool listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListToolsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: CursorPagination,
}

/// Query parameters for the filtered tool listing.
///
/// Multi-valued filters arrive as comma-separated strings
/// (e.g. `platforms=WEB,API`) and are split in the handler.
///
/// `DisplayFromStr` is needed on the bool: with a flattened struct in play,
/// query-string values all arrive as strings.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct FilteredToolsQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: CursorPagination,

    /// Case-insensitive substring match over name and description
    pub search: Option<String>,

    /// Comma-separated category slugs; matches tools in any of them
    pub categories: Option<String>,

    /// Comma-separated pricing models (e.g. "FREE,FREEMIUM")
    pub pricing_models: Option<String>,

    /// Exact match on whether a free tier exists
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[param(value_type = Option<bool>)]
    pub has_free_version: Option<bool>,

    /// Comma-separated platforms; matches tools on any of them
    pub platforms: Option<String>,
}

/// Default number of results for the typeahead search.
pub const DEFAULT_SEARCH_LIMIT: i64 = 5;

/// Maximum number of results for the typeahead search.
pub const MAX_SEARCH_LIMIT: i64 = 20;

/// Query parameters for the typeahead name search
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct SearchToolsQuery {
    /// The (non-empty) name fragment to search for
    pub q: String,

    /// Maximum number of results (default: 5, max: 20)
    #[param(default = 5, minimum = 1, maximum = 20)]
    pub limit: Option<i64>,
}

impl SearchToolsQuery {
    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, MAX_SEARCH_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pricing_model_round_trip() {
        for (text, expected) in [
            ("FREE", PricingModel::Free),
            ("FREEMIUM", PricingModel::Freemium),
            ("PAID", PricingModel::Paid),
            ("SUBSCRIPTION", PricingModel::Subscription),
            ("CONTACT_FOR_PRICING", PricingModel::ContactForPricing),
        ] {
            assert_eq!(text.parse::<PricingModel>().unwrap(), expected);
            assert_eq!(serde_json::to_value(expected).unwrap(), serde_json::json!(text));
        }

        assert!("free".parse::<PricingModel>().is_err());
        assert!("LIFETIME".parse::<PricingModel>().is_err());
    }

    #[test]
    fn test_platform_round_trip() {
        for (text, expected) in [
            ("WEB", Platform::Web),
            ("DESKTOP", Platform::Desktop),
            ("MOBILE", Platform::Mobile),
            ("API", Platform::Api),
            ("EXTENSION", Platform::Extension),
        ] {
            assert_eq!(text.parse::<Platform>().unwrap(), expected);
            assert_eq!(serde_json::to_value(expected).unwrap(), serde_json::json!(text));
        }

        assert!("CLI".parse::<Platform>().is_err());
    }

    #[test]
    fn test_search_limit_clamping() {
        let q = SearchToolsQuery {
            q: "x".to_string(),
            limit: None,
        };
        assert_eq!(q.limit(), DEFAULT_SEARCH_LIMIT);

        let q = SearchToolsQuery {
            q: "x".to_string(),
            limit: Some(50),
        };
        assert_eq!(q.limit(), MAX_SEARCH_LIMIT);
    }

    #[test]
    fn test_filtered_query_parses_from_query_string() {
        let q: FilteredToolsQuery = serde_urlencoded::from_str("search=writer&platforms=WEB,API&has_free_version=true&limit=10").unwrap();
        assert_eq!(q.search.as_deref(), Some("writer"));
        assert_eq!(q.platforms.as_deref(), Some("WEB,API"));
        assert_eq!(q.has_free_version, Some(true));
        assert_eq!(q.pagination.limit(), 10);
    }
}
