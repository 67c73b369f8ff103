use crate::api::models::pagination::CursorPage;
use crate::api::models::tools::{
    FilteredToolsQuery, ListToolsQuery, SearchToolsQuery, ToolCreate, ToolDetailResponse, ToolResponse, ToolSearchResult,
};
use crate::auth::permissions::RequireAdmin;
use crate::db::handlers::{Repository, Reviews, Tools, tools::ToolFilter};
use crate::db::models::tools::ToolCreateDBRequest;
use crate::errors::{Error, Result};
use crate::types::ToolId;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Acquire, SqliteConnection};
use std::collections::HashSet;
use url::Url;

use super::is_valid_slug;

/// Number of tools on the featured shelf.
const FEATURED_LIMIT: i64 = 6;

/// Split a comma-separated query value into parsed filter values.
fn parse_csv<T>(raw: &str) -> Result<Vec<T>>
where
    T: std::str::FromStr<Err = String>,
{
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<T>().map_err(|message| Error::Validation { message }))
        .collect()
}

/// Resolve the cursor query parameter to its listing position, rejecting ids
/// that don't correspond to any tool.
async fn resolve_cursor(conn: &mut SqliteConnection, cursor: Option<ToolId>) -> Result<Option<crate::db::handlers::tools::ToolCursor>> {
    match cursor {
        Some(id) => {
            let mut repo = Tools::new(conn);
            let position = repo.cursor_position(id).await?.ok_or_else(|| Error::Validation {
                message: format!("Unknown cursor: {id}"),
            })?;
            Ok(Some(position))
        }
        None => Ok(None),
    }
}

/// Fetch one page of tools plus their categories.
///
/// `filter.limit` must already be `limit + 1`; the extra row, when present,
/// becomes the next page's cursor.
async fn tool_page(conn: &mut SqliteConnection, filter: &ToolFilter, limit: i64) -> Result<CursorPage<ToolResponse>> {
    let mut repo = Tools::new(conn);
    let mut rows = repo.list(filter).await?;

    let next_cursor = if rows.len() as i64 > limit {
        rows.pop().map(|t| t.id)
    } else {
        None
    };

    let ids: Vec<ToolId> = rows.iter().map(|t| t.id).collect();
    let mut categories = repo.categories_for(&ids).await?;

    let items = rows
        .into_iter()
        .map(|tool| {
            let cats = categories.remove(&tool.id).unwrap_or_default();
            ToolResponse::from_db(tool, cats)
        })
        .collect();

    Ok(CursorPage::new(items, next_cursor))
}

#[utoipa::path(
    get,
    path = "/api/v1/tools",
    tag = "tools",
    summary = "List tools",
    description = "All tools newest first, cursor-paginated",
    params(ListToolsQuery),
    responses(
        (status = 200, description = "Page of tools", body = CursorPage<ToolResponse>),
        (status = 400, description = "Unknown cursor"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_tools(State(state): State<AppState>, Query(query): Query<ListToolsQuery>) -> Result<Json<CursorPage<ToolResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let limit = query.pagination.limit();
    let mut filter = ToolFilter::new(limit + 1);
    if let Some(cursor) = resolve_cursor(&mut conn, query.pagination.cursor).await? {
        filter = filter.cursor(cursor);
    }

    let page = tool_page(&mut conn, &filter, limit).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/tools/filtered",
    tag = "tools",
    summary = "List tools with filters",
    description = "Discovery listing: filters combine conjunctively, featured tools sort first",
    params(FilteredToolsQuery),
    responses(
        (status = 200, description = "Page of matching tools", body = CursorPage<ToolResponse>),
        (status = 400, description = "Unknown filter value or cursor"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn filtered_tools(
    State(state): State<AppState>,
    Query(query): Query<FilteredToolsQuery>,
) -> Result<Json<CursorPage<ToolResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let limit = query.pagination.limit();
    let mut filter = ToolFilter::new(limit + 1).featured_first();

    if let Some(search) = query.search.as_deref() {
        let search = search.trim();
        if !search.is_empty() {
            filter = filter.search(search);
        }
    }
    if let Some(raw) = query.categories.as_deref() {
        let slugs: Vec<String> = raw.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect();
        if !slugs.is_empty() {
            filter = filter.category_slugs(slugs);
        }
    }
    if let Some(raw) = query.pricing_models.as_deref() {
        let models = parse_csv(raw)?;
        if !models.is_empty() {
            filter = filter.pricing_models(models);
        }
    }
    if let Some(value) = query.has_free_version {
        filter = filter.has_free_version(value);
    }
    if let Some(raw) = query.platforms.as_deref() {
        let platforms = parse_csv(raw)?;
        if !platforms.is_empty() {
            filter = filter.platforms(platforms);
        }
    }
    if let Some(cursor) = resolve_cursor(&mut conn, query.pagination.cursor).await? {
        filter = filter.cursor(cursor);
    }

    let page = tool_page(&mut conn, &filter, limit).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/api/v1/tools/featured",
    tag = "tools",
    summary = "Featured tools",
    description = "Up to six featured tools, most viewed first",
    responses(
        (status = 200, description = "Featured tools", body = Vec<ToolResponse>),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn featured_tools(State(state): State<AppState>) -> Result<Json<Vec<ToolResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Tools::new(&mut conn);

    let rows = repo.featured(FEATURED_LIMIT).await?;
    let ids: Vec<ToolId> = rows.iter().map(|t| t.id).collect();
    let mut categories = repo.categories_for(&ids).await?;

    let tools = rows
        .into_iter()
        .map(|tool| {
            let cats = categories.remove(&tool.id).unwrap_or_default();
            ToolResponse::from_db(tool, cats)
        })
        .collect();

    Ok(Json(tools))
}

#[utoipa::path(
    get,
    path = "/api/v1/tools/search",
    tag = "tools",
    summary = "Search tools by name",
    description = "Typeahead search over tool names",
    params(SearchToolsQuery),
    responses(
        (status = 200, description = "Matching tools", body = Vec<ToolSearchResult>),
        (status = 400, description = "Empty search query"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn search_tools(State(state): State<AppState>, Query(query): Query<SearchToolsQuery>) -> Result<Json<Vec<ToolSearchResult>>> {
    let q = query.q.trim();
    if q.is_empty() {
        return Err(Error::Validation {
            message: "Search query must not be empty".to_string(),
        });
    }

    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = Tools::new(&mut conn);

    let results = repo.search_by_name(q, query.limit()).await?;
    Ok(Json(results.into_iter().map(ToolSearchResult::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/v1/tools/{slug}",
    tag = "tools",
    summary = "Get tool by slug",
    description = "Full tool detail with categories, use cases, platforms, integrations and reviews. Each fetch bumps the view counter.",
    params(
        ("slug" = String, Path, description = "Tool slug")
    ),
    responses(
        (status = 200, description = "Tool detail", body = ToolDetailResponse),
        (status = 404, description = "Tool not found"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all, fields(slug = %slug))]
pub async fn get_tool(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<ToolDetailResponse>> {
    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let tool;
    let categories;
    let use_cases;
    let platforms;
    let integrations;
    {
        let mut repo = Tools::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        tool = repo.get_by_slug(&slug).await?.ok_or_else(|| Error::NotFound {
            resource: "tool".to_string(),
            id: slug.clone(),
        })?;

        categories = repo.categories_for(&[tool.id]).await?.remove(&tool.id).unwrap_or_default();
        use_cases = repo.use_cases_for(tool.id).await?;
        platforms = repo.platforms_for(tool.id).await?;
        integrations = repo.integrations_for(tool.id).await?;

        // The response carries the pre-increment count; the bump is visible
        // from the next fetch onward.
        repo.increment_view_count(tool.id).await?;
    }

    let reviews;
    {
        let mut repo = Reviews::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);
        reviews = repo.list_for_tool(tool.id).await?;
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok(Json(ToolDetailResponse {
        tool: ToolResponse::from_db(tool, categories),
        use_cases: use_cases.into_iter().map(Into::into).collect(),
        platforms,
        integrations,
        reviews: reviews.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/v1/tools",
    tag = "tools",
    summary = "Create tool",
    description = "Add a tool to the catalog (admin only)",
    request_body = ToolCreate,
    responses(
        (status = 201, description = "Tool created", body = ToolResponse),
        (status = 400, description = "Invalid tool data"),
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
pub async fn create_tool(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(payload): Json<ToolCreate>,
) -> Result<(StatusCode, Json<ToolResponse>)> {
    if payload.name.trim().is_empty() {
        return Err(Error::Validation {
            message: "Tool name must not be empty".to_string(),
        });
    }
    if payload.description.trim().is_empty() {
        return Err(Error::Validation {
            message: "Tool description must not be empty".to_string(),
        });
    }
    if !is_valid_slug(&payload.slug) {
        return Err(Error::Validation {
            message: "Slug must contain only lowercase letters, digits and hyphens".to_string(),
        });
    }
    if payload.category_ids.is_empty() {
        return Err(Error::Validation {
            message: "At least one category is required".to_string(),
        });
    }
    for url in [payload.website.as_deref(), payload.logo.as_deref()].into_iter().flatten() {
        Url::parse(url).map_err(|e| Error::Validation {
            message: format!("Invalid URL '{url}': {e}"),
        })?;
    }

    let mut tx = state.db.begin().await.map_err(|e| Error::Database(e.into()))?;

    let tool;
    let categories;
    {
        let mut repo = Tools::new(tx.acquire().await.map_err(|e| Error::Database(e.into()))?);

        // SQLite won't enforce the join-table references for us here, so
        // verify the categories exist before inserting.
        let found: HashSet<_> = repo.existing_category_ids(&payload.category_ids).await?.into_iter().collect();
        if let Some(missing) = payload.category_ids.iter().find(|id| !found.contains(id)) {
            return Err(Error::Validation {
                message: format!("Unknown category id: {missing}"),
            });
        }

        let request = ToolCreateDBRequest::from(payload);
        tool = repo.create(&request).await?;
        categories = repo.categories_for(&[tool.id]).await?.remove(&tool.id).unwrap_or_default();
    }

    tx.commit().await.map_err(|e| Error::Database(e.into()))?;

    Ok((StatusCode::CREATED, Json(ToolResponse::from_db(tool, categories))))
}
