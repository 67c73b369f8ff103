use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::tools::ToolDBResponse,
    models::use_cases::{UseCaseCreateDBRequest, UseCaseDBResponse, UseCaseWithCountDBResponse},
};
use crate::types::UseCaseId;
use chrono::Utc;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use uuid::Uuid;

/// Filter for listing use cases; alphabetical and unpaginated like categories.
#[derive(Debug, Clone, Default)]
pub struct UseCaseFilter {}

pub struct UseCases<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> UseCases<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    pub async fn get_by_slug(&mut self, slug: &str) -> Result<Option<UseCaseDBResponse>> {
        let use_case =
            sqlx::query_as::<_, UseCaseDBResponse>("SELECT id, slug, name, description, created_at, updated_at FROM use_cases WHERE slug = ?")
                .bind(slug)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(use_case)
    }

    /// All use cases with their tool counts, alphabetical.
    pub async fn list_with_counts(&mut self) -> Result<Vec<UseCaseWithCountDBResponse>> {
        let use_cases = sqlx::query_as::<_, UseCaseWithCountDBResponse>(
            "SELECT u.id, u.slug, u.name, u.description, u.created_at, u.updated_at, \
             (SELECT COUNT(*) FROM tool_use_cases tu WHERE tu.use_case_id = u.id) AS tool_count \
             FROM use_cases u \
             ORDER BY u.name ASC",
        )
        .fetch_all(&mut *self.db)
        .await?;

        Ok(use_cases)
    }

    /// Most recent tools for a use case, newest first.
    pub async fn tools_for(&mut self, use_case_id: UseCaseId, limit: i64) -> Result<Vec<ToolDBResponse>> {
        let tools = sqlx::query_as::<_, ToolDBResponse>(
            "SELECT t.id, t.slug, t.name, t.description, t.long_description, t.website, t.logo, \
             t.pricing_model, t.has_free_version, t.starting_price, t.featured, t.verified, \
             t.view_count, t.launch_date, t.created_at, t.updated_at \
             FROM tool_use_cases tu \
             JOIN tools t ON t.id = tu.tool_id \
             WHERE tu.use_case_id = ? \
             ORDER BY t.created_at DESC, t.id DESC \
             LIMIT ?",
        )
        .bind(use_case_id)
        .bind(limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(tools)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for UseCases<'c> {
    type CreateRequest = UseCaseCreateDBRequest;
    type Response = UseCaseDBResponse;
    type Id = UseCaseId;
    type Filter = UseCaseFilter;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query("INSERT INTO use_cases (id, slug, name, description, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(&request.slug)
            .bind(&request.name)
            .bind(&request.description)
            .bind(now)
            .bind(now)
            .execute(&mut *self.db)
            .await?;

        Ok(UseCaseDBResponse {
            id,
            slug: request.slug.clone(),
            name: request.name.clone(),
            description: request.description.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let use_case =
            sqlx::query_as::<_, UseCaseDBResponse>("SELECT id, slug, name, description, created_at, updated_at FROM use_cases WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *self.db)
                .await?;

        Ok(use_case)
    }

    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = sqlx::QueryBuilder::new("SELECT id, slug, name, description, created_at, updated_at FROM use_cases WHERE id IN (");
        let mut values = query.separated(", ");
        for id in &ids {
            values.push_bind(*id);
        }
        query.push(")");

        let use_cases = query.build_query_as::<UseCaseDBResponse>().fetch_all(&mut *self.db).await?;
        Ok(use_cases.into_iter().map(|u| (u.id, u)).collect())
    }

    async fn list(&mut self, _filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let use_cases =
            sqlx::query_as::<_, UseCaseDBResponse>("SELECT id, slug, name, description, created_at, updated_at FROM use_cases ORDER BY name ASC")
                .fetch_all(&mut *self.db)
                .await?;

        Ok(use_cases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use sqlx::SqlitePool;

    async fn seed(pool: &SqlitePool, slug: &str, name: &str) -> UseCaseDBResponse {
        let mut tx = pool.begin().await.unwrap();
        let mut repo = UseCases::new(&mut tx);
        let use_case = repo
            .create(&UseCaseCreateDBRequest {
                slug: slug.to_string(),
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap();
        tx.commit().await.unwrap();
        use_case
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_lookup(pool: SqlitePool) {
        let created = seed(&pool, "content-drafting", "Content Drafting").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = UseCases::new(&mut conn);

        let by_slug = repo.get_by_slug("content-drafting").await.unwrap().unwrap();
        assert_eq!(by_slug.id, created.id);

        assert!(repo.get_by_slug("missing").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_slug_is_unique_violation(pool: SqlitePool) {
        seed(&pool, "summarization", "Summarization").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = UseCases::new(&mut conn);
        let result = repo
            .create(&UseCaseCreateDBRequest {
                slug: "summarization".to_string(),
                name: "Summaries".to_string(),
                description: None,
            })
            .await;

        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_is_alphabetical(pool: SqlitePool) {
        seed(&pool, "video-editing", "Video Editing").await;
        seed(&pool, "brainstorming", "Brainstorming").await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = UseCases::new(&mut conn);
        let listed = repo.list_with_counts().await.unwrap();

        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].slug, "brainstorming");
        assert_eq!(listed[1].slug, "video-editing");
    }
}
