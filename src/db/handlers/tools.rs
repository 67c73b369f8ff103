use crate::api::models::tools::{Platform, PricingModel};
use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::categories::CategoryDBResponse,
    models::tools::{ToolCreateDBRequest, ToolDBResponse, ToolNameDBResponse},
    models::use_cases::UseCaseDBResponse,
};
use crate::types::{CategoryId, ToolId};
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use std::collections::HashMap;
use uuid::Uuid;

const TOOL_COLUMNS: &str = "id, slug, name, description, long_description, website, logo, \
     pricing_model, has_free_version, starting_price, featured, verified, \
     view_count, launch_date, created_at, updated_at";

/// Position of a cursor row in the listing order.
///
/// Resolved from the cursor id before building the page query, so the keyset
/// predicate can compare against the row's actual sort keys. The cursor is
/// inclusive: the page starts at this row.
#[derive(Debug, Clone, Copy)]
pub struct ToolCursor {
    pub id: ToolId,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Filter for listing tools
#[derive(Debug, Clone)]
pub struct ToolFilter {
    pub search: Option<String>,
    pub category_slugs: Vec<String>,
    pub pricing_models: Vec<PricingModel>,
    pub has_free_version: Option<bool>,
    pub platforms: Vec<Platform>,
    /// Order featured tools first (the discovery listing); the plain listing
    /// orders by recency alone.
    pub featured_first: bool,
    pub cursor: Option<ToolCursor>,
    pub limit: i64,
}

impl Default for ToolFilter {
    fn default() -> Self {
        Self {
            search: None,
            category_slugs: Vec::new(),
            pricing_models: Vec::new(),
            has_free_version: None,
            platforms: Vec::new(),
            featured_first: false,
            cursor: None,
            limit: 50,
        }
    }
}

impl ToolFilter {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    pub fn search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn category_slugs(mut self, slugs: Vec<String>) -> Self {
        self.category_slugs = slugs;
        self
    }

    pub fn pricing_models(mut self, models: Vec<PricingModel>) -> Self {
        self.pricing_models = models;
        self
    }

    pub fn has_free_version(mut self, value: bool) -> Self {
        self.has_free_version = Some(value);
        self
    }

    pub fn platforms(mut self, platforms: Vec<Platform>) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn featured_first(mut self) -> Self {
        self.featured_first = true;
        self
    }

    pub fn cursor(mut self, cursor: ToolCursor) -> Self {
        self.cursor = Some(cursor);
        self
    }
}

pub struct Tools<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Tools<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Resolve a cursor id to its position in the listing order.
    ///
    /// Returns `None` for ids that don't exist (stale or fabricated cursors).
    pub async fn cursor_position(&mut self, id: ToolId) -> Result<Option<ToolCursor>> {
        let row = sqlx::query_as::<_, (Uuid, bool, DateTime<Utc>)>("SELECT id, featured, created_at FROM tools WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(row.map(|(id, featured, created_at)| ToolCursor { id, featured, created_at }))
    }

    pub async fn get_by_slug(&mut self, slug: &str) -> Result<Option<ToolDBResponse>> {
        let tool = sqlx::query_as::<_, ToolDBResponse>(&format!("SELECT {TOOL_COLUMNS} FROM tools WHERE slug = ?"))
            .bind(slug)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(tool)
    }

    /// Bump the view counter. Deliberately leaves `updated_at` alone - views
    /// are not edits.
    pub async fn increment_view_count(&mut self, id: ToolId) -> Result<bool> {
        let result = sqlx::query("UPDATE tools SET view_count = view_count + 1 WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Featured tools for the landing surface, most viewed first.
    pub async fn featured(&mut self, limit: i64) -> Result<Vec<ToolDBResponse>> {
        let tools = sqlx::query_as::<_, ToolDBResponse>(&format!(
            "SELECT {TOOL_COLUMNS} FROM tools WHERE featured = 1 ORDER BY view_count DESC, id DESC LIMIT ?"
        ))
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(tools)
    }

    /// Typeahead name search, most viewed first.
    pub async fn search_by_name(&mut self, query: &str, limit: i64) -> Result<Vec<ToolNameDBResponse>> {
        let pattern = format!("%{query}%");
        let tools = sqlx::query_as::<_, ToolNameDBResponse>(
            "SELECT id, name, slug FROM tools WHERE name LIKE ? ORDER BY view_count DESC, id DESC LIMIT ?",
        )
        .bind(pattern)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(tools)
    }

    /// Load categories for a set of tools in one query, keyed by tool id.
    pub async fn categories_for(&mut self, tool_ids: &[ToolId]) -> Result<HashMap<ToolId, Vec<CategoryDBResponse>>> {
        if tool_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = sqlx::QueryBuilder::new(
            "SELECT tc.tool_id, c.id, c.slug, c.name, c.description, c.created_at, c.updated_at \
             FROM tool_categories tc \
             JOIN categories c ON c.id = tc.category_id \
             WHERE tc.tool_id IN (",
        );
        let mut ids = query.separated(", ");
        for tool_id in tool_ids {
            ids.push_bind(*tool_id);
        }
        query.push(") ORDER BY c.name ASC");

        let rows = query
            .build_query_as::<(Uuid, Uuid, String, String, Option<String>, DateTime<Utc>, DateTime<Utc>)>()
            .fetch_all(&mut *self.db)
            .await?;

        let mut by_tool: HashMap<ToolId, Vec<CategoryDBResponse>> = HashMap::new();
        for (tool_id, id, slug, name, description, created_at, updated_at) in rows {
            by_tool.entry(tool_id).or_default().push(CategoryDBResponse {
                id,
                slug,
                name,
                description,
                created_at,
                updated_at,
            });
        }

        Ok(by_tool)
    }

    pub async fn use_cases_for(&mut self, tool_id: ToolId) -> Result<Vec<UseCaseDBResponse>> {
        let use_cases = sqlx::query_as::<_, UseCaseDBResponse>(
            "SELECT u.id, u.slug, u.name, u.description, u.created_at, u.updated_at \
             FROM tool_use_cases tu \
             JOIN use_cases u ON u.id = tu.use_case_id \
             WHERE tu.tool_id = ? \
             ORDER BY u.name ASC",
        )
        .bind(tool_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(use_cases)
    }

    pub async fn platforms_for(&mut self, tool_id: ToolId) -> Result<Vec<Platform>> {
        let platforms = sqlx::query_scalar::<_, Platform>("SELECT platform FROM tool_platforms WHERE tool_id = ? ORDER BY platform ASC")
            .bind(tool_id)
            .fetch_all(&mut *self.db)
            .await?;

        Ok(platforms)
    }

    pub async fn integrations_for(&mut self, tool_id: ToolId) -> Result<Vec<String>> {
        let integrations =
            sqlx::query_scalar::<_, String>("SELECT integration FROM tool_integrations WHERE tool_id = ? ORDER BY integration ASC")
                .bind(tool_id)
                .fetch_all(&mut *self.db)
                .await?;

        Ok(integrations)
    }

    /// Check which of the given category ids actually exist.
    pub async fn existing_category_ids(&mut self, ids: &[CategoryId]) -> Result<Vec<CategoryId>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = sqlx::QueryBuilder::new("SELECT id FROM categories WHERE id IN (");
        let mut values = query.separated(", ");
        for id in ids {
            values.push_bind(*id);
        }
        query.push(")");

        let found = query.build_query_scalar::<Uuid>().fetch_all(&mut *self.db).await?;
        Ok(found)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Tools<'c> {
    type CreateRequest = ToolCreateDBRequest;
    type Response = ToolDBResponse;
    type Id = ToolId;
    type Filter = ToolFilter;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO tools (
                id, slug, name, description, long_description, website, logo,
                pricing_model, has_free_version, starting_price, featured, verified,
                view_count, launch_date, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0, ?, ?, ?)
            "#,
        )
        .bind(id)
        .bind(&request.slug)
        .bind(&request.name)
        .bind(&request.description)
        .bind(&request.long_description)
        .bind(&request.website)
        .bind(&request.logo)
        .bind(request.pricing_model)
        .bind(request.has_free_version)
        .bind(request.starting_price)
        .bind(request.featured)
        .bind(request.verified)
        .bind(request.launch_date)
        .bind(now)
        .bind(now)
        .execute(&mut *self.db)
        .await?;

        for category_id in &request.category_ids {
            sqlx::query("INSERT INTO tool_categories (tool_id, category_id) VALUES (?, ?)")
                .bind(id)
                .bind(category_id)
                .execute(&mut *self.db)
                .await?;
        }

        for use_case_id in &request.use_case_ids {
            sqlx::query("INSERT INTO tool_use_cases (tool_id, use_case_id) VALUES (?, ?)")
                .bind(id)
                .bind(use_case_id)
                .execute(&mut *self.db)
                .await?;
        }

        for platform in &request.platforms {
            sqlx::query("INSERT OR IGNORE INTO tool_platforms (tool_id, platform) VALUES (?, ?)")
                .bind(id)
                .bind(*platform)
                .execute(&mut *self.db)
                .await?;
        }

        for integration in &request.integrations {
            sqlx::query("INSERT OR IGNORE INTO tool_integrations (tool_id, integration) VALUES (?, ?)")
                .bind(id)
                .bind(integration)
                .execute(&mut *self.db)
                .await?;
        }

        Ok(ToolDBResponse {
            id,
            slug: request.slug.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            long_description: request.long_description.clone(),
            website: request.website.clone(),
            logo: request.logo.clone(),
            pricing_model: request.pricing_model,
            has_free_version: request.has_free_version,
            starting_price: request.starting_price,
            featured: request.featured,
            verified: request.verified,
            view_count: 0,
            launch_date: request.launch_date,
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let tool = sqlx::query_as::<_, ToolDBResponse>(&format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(tool)
    }

    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = sqlx::QueryBuilder::new(format!("SELECT {TOOL_COLUMNS} FROM tools WHERE id IN ("));
        let mut values = query.separated(", ");
        for id in &ids {
            values.push_bind(*id);
        }
        query.push(")");

        let tools = query.build_query_as::<ToolDBResponse>().fetch_all(&mut *self.db).await?;
        Ok(tools.into_iter().map(|t| (t.id, t)).collect())
    }

    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = sqlx::QueryBuilder::new(format!("SELECT {TOOL_COLUMNS} FROM tools WHERE 1=1"));

        // Every filter composes with AND; a tool must satisfy all of them.
        if let Some(search) = &filter.search {
            let pattern = format!("%{search}%");
            query.push(" AND (name LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR description LIKE ");
            query.push_bind(pattern);
            query.push(")");
        }

        if !filter.category_slugs.is_empty() {
            query.push(
                " AND EXISTS (SELECT 1 FROM tool_categories tc \
                 JOIN categories c ON c.id = tc.category_id \
                 WHERE tc.tool_id = tools.id AND c.slug IN (",
            );
            let mut slugs = query.separated(", ");
            for slug in &filter.category_slugs {
                slugs.push_bind(slug.clone());
            }
            query.push("))");
        }

        if !filter.pricing_models.is_empty() {
            query.push(" AND pricing_model IN (");
            let mut models = query.separated(", ");
            for model in &filter.pricing_models {
                models.push_bind(*model);
            }
            query.push(")");
        }

        if let Some(has_free_version) = filter.has_free_version {
            query.push(" AND has_free_version = ");
            query.push_bind(has_free_version);
        }

        if !filter.platforms.is_empty() {
            query.push(
                " AND EXISTS (SELECT 1 FROM tool_platforms tp \
                 WHERE tp.tool_id = tools.id AND tp.platform IN (",
            );
            let mut platforms = query.separated(", ");
            for platform in &filter.platforms {
                platforms.push_bind(*platform);
            }
            query.push("))");
        }

        // Keyset predicate mirroring the ORDER BY below. `<=` on the id makes
        // the cursor row itself the first row of the page.
        if let Some(cursor) = &filter.cursor {
            if filter.featured_first {
                query.push(" AND (featured < ");
                query.push_bind(cursor.featured);
                query.push(" OR (featured = ");
                query.push_bind(cursor.featured);
                query.push(" AND (created_at < ");
                query.push_bind(cursor.created_at);
                query.push(" OR (created_at = ");
                query.push_bind(cursor.created_at);
                query.push(" AND id <= ");
                query.push_bind(cursor.id);
                query.push("))))");
            } else {
                query.push(" AND (created_at < ");
                query.push_bind(cursor.created_at);
                query.push(" OR (created_at = ");
                query.push_bind(cursor.created_at);
                query.push(" AND id <= ");
                query.push_bind(cursor.id);
                query.push("))");
            }
        }

        if filter.featured_first {
            query.push(" ORDER BY featured DESC, created_at DESC, id DESC");
        } else {
            query.push(" ORDER BY created_at DESC, id DESC");
        }

        query.push(" LIMIT ");
        query.push_bind(filter.limit);

        let tools = query.build_query_as::<ToolDBResponse>().fetch_all(&mut *self.db).await?;

        Ok(tools)
    }
}
