//! OpenAPI documentation for the catalog API.
//!
//! The generated document is served interactively at `/docs`.

use crate::api;
use utoipa::{
    Modify, OpenApi,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme("BearerAuth", SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)));
            components.add_security_scheme(
                "CookieAuth",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("aidex_session"))),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "aidex",
        description = "Catalog API for browsing and curating AI tools, organized by category and use case."
    ),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::tools::list_tools,
        api::handlers::tools::filtered_tools,
        api::handlers::tools::featured_tools,
        api::handlers::tools::search_tools,
        api::handlers::tools::get_tool,
        api::handlers::tools::create_tool,
        api::handlers::categories::list_categories,
        api::handlers::categories::get_category,
        api::handlers::categories::create_category,
        api::handlers::use_cases::list_use_cases,
        api::handlers::use_cases::get_use_case,
        api::handlers::use_cases::create_use_case,
        api::handlers::auth::login,
        api::handlers::auth::logout,
        api::handlers::auth::me,
    ),
    components(
        schemas(
            api::models::tools::PricingModel,
            api::models::tools::Platform,
            api::models::tools::ToolCreate,
            api::models::tools::ToolResponse,
            api::models::tools::ToolDetailResponse,
            api::models::tools::ToolSearchResult,
            api::models::categories::CategoryCreate,
            api::models::categories::CategoryResponse,
            api::models::categories::CategoryDetailResponse,
            api::models::use_cases::UseCaseCreate,
            api::models::use_cases::UseCaseResponse,
            api::models::use_cases::UseCaseDetailResponse,
            api::models::reviews::ReviewResponse,
            api::models::reviews::ReviewerResponse,
            api::models::users::Role,
            api::models::users::UserResponse,
            api::models::users::CurrentUser,
            api::models::auth::LoginRequest,
            api::models::auth::LogoutResponse,
        )
    ),
    tags(
        (name = "tools", description = "Browse, search and curate catalog tools"),
        (name = "categories", description = "Category taxonomy"),
        (name = "use-cases", description = "Use-case taxonomy"),
        (name = "authentication", description = "Session management")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_document_builds() {
        let doc = ApiDoc::openapi();
        let json = doc.to_json().unwrap();
        assert!(json.contains("/tools/{slug}"));
        assert!(json.contains("BearerAuth"));
    }
}
