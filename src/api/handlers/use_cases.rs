use super::is_valid_slug;
use crate::api::models::tools::ToolResponse;
use crate::api::models::use_cases::{UseCaseCreate, UseCaseDetailResponse, UseCaseResponse};
use crate::auth::permissions::RequireAdmin;
use crate::db::handlers::{Repository, Tools, UseCases};
use crate::db::models::use_cases::UseCaseCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::ToolId;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::Acquire;

/// Number of recent tools shown on a use-case detail page.
const DETAIL_TOOL_LIMIT: i64 = 20;

#[utoipa::path(
    get,
    path = "/api/v1/use-cases",
    tag = "use-cases",
    summary = "List use cases",
    description = "All use cases with tool counts, alphabetical",
    responses(
        (status = 200, description = "List of use cases", body = Vec<UseCaseResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_use_cases(State(state): State<AppState>) -> Result<Json<Vec<UseCaseResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = UseCases::new(&mut conn);

    let use_cases = repo.list_with_counts().await?;
    Ok(Json(use_cases.into_iter().map(UseCaseResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/use-cases/{slug}",
    tag = "use-cases",
    summary = "Get use case by slug",
    description = "The use case plus its most recent tools",
    params(
        ("slug" = String, Path, description = "Use case slug")
    ),
    responses(
        (status = 200, description = "Use case detail", body = UseCaseDetailResponse),
        (status = 404, description = "Use case not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(slug = %slug))]
pub async fn get_use_case(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<UseCaseDetailResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let use_case;
    let tool_rows;
    {
        let mut repo = UseCases::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        use_case = repo.get_by_slug(&slug).await?.ok_or_else(|| Error::NotFound {
            resource: "use case".to_string(),
            id: slug.clone(),
        })?;
        tool_rows = repo.tools_for(use_case.id, DETAIL_TOOL_LIMIT).await?;
    }

    let tools;
    {
        let mut repo = Tools::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        let ids: Vec<ToolId> = tool_rows.iter().map(|t| t.id).collect();
        let mut categories = repo.categories_for(&ids).await?;
        tools = tool_rows
            .into_iter()
            .map(|tool| {
                let cats = categories.remove(&tool.id).unwrap_or_default();
                ToolResponse::from_db(tool, cats)
            })
            .collect();
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(UseCaseDetailResponse {
        use_case: UseCaseResponse::from(use_case),
        tools,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/use-cases",
    tag = "use-cases",
    summary = "Create use case",
    description = "Add a use case to the taxonomy (admin only)",
    request_body = UseCaseCreate,
    responses(
        (status = 201, description = "Use case created", body = UseCaseResponse),
        (status = 400, description = "Invalid use case data"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Slug already exists"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = []),
        ("CookieAuth" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_use_case(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<UseCaseCreate>,
) -> Result<(StatusCode, Json<UseCaseResponse>)> {
    if payload.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Use case name must not be empty".to_string(),
        });
    }
    if !is_valid_slug(&payload.slug) {
        return Err(Error::Validation {
            message: "Slug must contain only lowercase letters, digits and hyphens".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let use_case;
    {
        let mut repo = UseCases::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        use_case = repo.create(&UseCaseCreateDBRequest::from(payload)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(UseCaseResponse::from(use_case))))
}
