use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::reviews::{ReviewCreateDBRequest, ReviewDBResponse, ReviewWithUserDBResponse},
};
use crate::types::{ReviewId, ToolId};
use chrono::Utc;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use uuid::Uuid;

/// Filter for listing reviews of one tool, newest first.
#[derive(Debug, Clone)]
pub struct ReviewFilter {
    pub tool_id: ToolId,
}

pub struct Reviews<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Reviews<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Reviews of a tool joined with each reviewer's public profile fields,
    /// newest first.
    pub async fn list_for_tool(&mut self, tool_id: ToolId) -> Result<Vec<ReviewWithUserDBResponse>> {
        let reviews = sqlx::query_as::<_, ReviewWithUserDBResponse>(
            "SELECT r.id, r.tool_id, r.rating, r.comment, r.created_at, r.updated_at, \
             u.id AS user_id, u.name AS user_name, u.image AS user_image \
             FROM reviews r \
             JOIN users u ON u.id = r.user_id \
             WHERE r.tool_id = ? \
             ORDER BY r.created_at DESC, r.id DESC",
        )
        .bind(tool_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(reviews)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Reviews<'c> {
    type CreateRequest = ReviewCreateDBRequest;
    type Response = ReviewDBResponse;
    type Id = ReviewId;
    type Filter = ReviewFilter;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query("INSERT INTO reviews (id, tool_id, user_id, rating, comment, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?)")
            .bind(id)
            .bind(request.tool_id)
            .bind(request.user_id)
            .bind(request.rating)
            .bind(&request.comment)
            .bind(now)
            .bind(now)
            .execute(&mut *self.db)
            .await?;

        Ok(ReviewDBResponse {
            id,
            tool_id: request.tool_id,
            user_id: request.user_id,
            rating: request.rating,
            comment: request.comment.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let review = sqlx::query_as::<_, ReviewDBResponse>(
            "SELECT id, tool_id, user_id, rating, comment, created_at, updated_at FROM reviews WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(review)
    }

    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query =
            sqlx::QueryBuilder::new("SELECT id, tool_id, user_id, rating, comment, created_at, updated_at FROM reviews WHERE id IN (");
        let mut values = query.separated(", ");
        for id in &ids {
            values.push_bind(*id);
        }
        query.push(")");

        let reviews = query.build_query_as::<ReviewDBResponse>().fetch_all(&mut *self.db).await?;
        Ok(reviews.into_iter().map(|r| (r.id, r)).collect())
    }

    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let reviews = sqlx::query_as::<_, ReviewDBResponse>(
            "SELECT id, tool_id, user_id, rating, comment, created_at, updated_at \
             FROM reviews WHERE tool_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(filter.tool_id)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(reviews)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::tools::PricingModel;
    use crate::api::models::users::Role;
    use crate::db::errors::DbError;
    use crate::db::handlers::{Tools, Users};
    use crate::db::models::tools::ToolCreateDBRequest;
    use crate::db::models::users::UserCreateDBRequest;
    use sqlx::SqlitePool;

    async fn seed_tool_and_user(pool: &SqlitePool) -> (ToolId, Uuid) {
        let mut tx = pool.begin().await.unwrap();

        let mut tools = Tools::new(&mut tx);
        let tool = tools
            .create(&ToolCreateDBRequest {
                slug: "reviewed-tool".to_string(),
                name: "Reviewed Tool".to_string(),
                description: "a tool".to_string(),
                long_description: None,
                website: None,
                logo: None,
                pricing_model: PricingModel::Free,
                has_free_version: true,
                starting_price: None,
                featured: false,
                verified: false,
                launch_date: None,
                category_ids: Vec::new(),
                use_case_ids: Vec::new(),
                platforms: Vec::new(),
                integrations: Vec::new(),
            })
            .await
            .unwrap();

        let mut users = Users::new(&mut tx);
        let user = users
            .create(&UserCreateDBRequest {
                email: "reviewer@example.com".to_string(),
                name: Some("Reviewer".to_string()),
                image: None,
                role: Role::User,
                password_hash: None,
            })
            .await
            .unwrap();

        tx.commit().await.unwrap();
        (tool.id, user.id)
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_list_newest_first(pool: SqlitePool) {
        let (tool_id, user_id) = seed_tool_and_user(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Reviews::new(&mut conn);

        repo.create(&ReviewCreateDBRequest {
            tool_id,
            user_id,
            rating: 4,
            comment: Some("solid".to_string()),
        })
        .await
        .unwrap();
        let newest = repo
            .create(&ReviewCreateDBRequest {
                tool_id,
                user_id,
                rating: 5,
                comment: None,
            })
            .await
            .unwrap();

        let listed = repo.list_for_tool(tool_id).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, newest.id);
        assert_eq!(listed[0].user_name.as_deref(), Some("Reviewer"));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_rating_out_of_range_is_check_violation(pool: SqlitePool) {
        let (tool_id, user_id) = seed_tool_and_user(&pool).await;

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Reviews::new(&mut conn);

        let result = repo
            .create(&ReviewCreateDBRequest {
                tool_id,
                user_id,
                rating: 6,
                comment: None,
            })
            .await;

        assert!(matches!(result, Err(DbError::CheckViolation { .. })));
    }
}
