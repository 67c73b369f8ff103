use super::is_valid_slug;
use crate::api::models::categories::{CategoryCreate, CategoryDetailResponse, CategoryResponse};
use crate::api::models::tools::ToolResponse;
use crate::auth::permissions::RequireAdmin;
use crate::db::handlers::{Categories, Repository, Tools};
use crate::db::models::categories::CategoryCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::ToolId;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use sqlx::Acquire;

/// Number of recent tools shown on a category detail page.
const DETAIL_TOOL_LIMIT: i64 = 20;

#[utoipa::path(
    get,
    path = "/api/v1/categories",
    tag = "categories",
    summary = "List categories",
    description = "All categories with tool counts, alphabetical",
    responses(
        (status = 200, description = "List of categories", body = Vec<CategoryResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_categories(State(state): State<AppState>) -> Result<Json<Vec<CategoryResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Categories::new(&mut conn);

    let categories = repo.list_with_counts().await?;
    Ok(Json(categories.into_iter().map(CategoryResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/categories/{slug}",
    tag = "categories",
    summary = "Get category by slug",
    description = "The category plus its most recent tools",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category detail", body = CategoryDetailResponse),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(slug = %slug))]
pub async fn get_category(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<CategoryDetailResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let category;
    let tool_rows;
    {
        let mut repo = Categories::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        category = repo.get_by_slug(&slug).await?.ok_or_else(|| Error::NotFound {
            resource: "category".to_string(),
            id: slug.clone(),
        })?;
        tool_rows = repo.tools_for(category.id, DETAIL_TOOL_LIMIT).await?;
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

    Ok(Json(CategoryDetailResponse {
        category: CategoryResponse::from(category),
        tools,
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/categories",
    tag = "categories",
    summary = "Create category",
    description = "Add a category to the taxonomy (admin only)",
    request_body = CategoryCreate,
    responses(
        (status = 201, description = "Category created", body = CategoryResponse),
        (status = 400, description = "Invalid category data"),
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
pub async fn create_category(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<CategoryCreate>,
) -> Result<(StatusCode, Json<CategoryResponse>)> {
    if payload.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Category name must not be empty".to_string(),
        });
    }
    if !is_valid_slug(&payload.slug) {
        return Err(Error::Validation {
            message: "Slug must contain only lowercase letters, digits and hyphens".to_string(),
        });
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let category;
    {
        let mut repo = Categories::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        category = repo.create(&CategoryCreateDBRequest::from(payload)).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(CategoryResponse::from(category))))
}
