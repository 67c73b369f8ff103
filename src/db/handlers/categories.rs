use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::categories::{CategoryCreateDBRequest, CategoryDBResponse, CategoryWithCountDBResponse},
    models::tools::ToolDBResponse,
};
use crate::types::CategoryId;
use chrono::Utc;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use uuid::Uuid;

/// Filter for listing categories. The taxonomy is small; listing is always
/// alphabetical and unpaginated.
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {}

pub struct Categories<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Categories<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_slug(&mut self, slug: &str) -> Result<Option<CategoryDBResponse>> {
        let category = sqlx::query_as::<_, CategoryDBResponse>(
            "SELECT id, slug, name, description, created_at, updated_at FROM categories WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(category)
    }

    /// All categories with their tool counts, alphabetical.
    pub async fn list_with_counts(&mut self) -> Result<Vec<CategoryWithCountDBResponse>> {
        let categories = sqlx::query_as::<_, CategoryWithCountDBResponse>(
            "SELECT c.id, c.slug, c.name, c.description, c.created_at, c.updated_at, \
             (SELECT COUNT(*) FROM tool_categories tc WHERE tc.category_id = c.id) AS tool_count \
             FROM categories c \
             ORDER BY c.name ASC",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(categories)
    }

    /// Most recent tools in a category, newest first.
    pub async fn tools_for(&mut self, category_id: CategoryId, limit: i64) -> Result<Vec<ToolDBResponse>> {
        let tools = sqlx::query_as::<_, ToolDBResponse>(
            "SELECT t.id, t.slug, t.name, t.description, t.long_description, t.website, t.logo, \
             t.pricing_model, t.has_free_version, t.starting_price, t.featured, t.verified, \
             t.view_count, t.launch_date, t.created_at, t.updated_at \
             FROM tool_categories tc \
             JOIN tools t ON t.id = tc.tool_id \
             WHERE tc.category_id = ? \
             ORDER BY t.created_at DESC, t.id DESC \
             LIMIT ?",
        )
        .bind(category_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(tools)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Categories<'c> {
    type CreateRequest = CategoryCreateDBRequest;
    type Response = CategoryDBResponse;
    type Id = CategoryId;
    type Filter = CategoryFilter;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query("INSERT INTO categories (id, slug, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(&request.slug)
            .bind(&request.name)
            .bind(&request.description)
            .bind(now)
            .bind(now)
            .execute(&mut *self.db)
            .await?;

        Ok(CategoryDBResponse {
            id,
            slug: request.slug.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let category =
            sqlx::query_as::<_, CategoryDBResponse>("SELECT id, slug, name, description, created_at, updated_at FROM categories WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(category)
    }

    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query =
            sqlx::QueryBuilder::new("SELECT id, slug, name, description, created_at, updated_at FROM categories WHERE id IN (");
        let mut values = query.separated(", ");
        for id in &ids {
            values.push_bind(*id);
        }
        query.push(")");

        let categories = query.build_query_as::<CategoryDBResponse>().fetch_all(&mut *self.db).await?;
        Ok(categories.into_iter().map(|c| (c.id, c)).collect())
    }

    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let categories =
            sqlx::query_as::<_, CategoryDBResponse>("SELECT id, slug, name, description, created_at, updated_at FROM categories ORDER BY name ASC")
                .fetch_all(&mut *self.db)
                .await?;

        Ok(categories)
    }
}
