use crate::db::{
    errors::Result,
    handlers::repository::Repository,
    models::users::{UserCreateDBRequest, UserDBResponse},
};
use crate::types::UserId;
use chrono::Utc;
use sqlx::SqliteConnection;
use std::collections::HashMap;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, name, image, role, password_hash, created_at, updated_at";

/// Filter for listing users; accounts are few, so a plain limit suffices.
#[derive(Debug, Clone)]
pub struct UserFilter {
    pub limit: i64,
}

impl Default for UserFilter {
    fn default() -> Self {
        Self { limit: 100 }
    }
}

pub struct Users<'c> {
    db: &'c mut SqliteConnection,
}

impl<'c> Users<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Look up a user by email for credential checks.
    pub async fn get_user_by_email(&mut self, email: &str) -> Result<Option<UserDBResponse>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    /// Replace a user's password hash (admin provisioning at startup).
    pub async fn set_password_hash(&mut self, id: UserId, password_hash: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(password_hash)
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Users<'c> {
    type CreateRequest = UserCreateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = UserFilter;

    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO users (id, email, name, image, role, password_hash, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&request.email)
        .bind(&request.name)
        .bind(&request.image)
        .bind(request.role)
        .bind(&request.password_hash)
        .bind(now)
        .bind(now)
        .execute(&mut *self.db)
        .await?;

        Ok(UserDBResponse {
            id,
            email: request.email.clone(),
            name: request.name.clone(),
            image: request.image.clone(),
            role: request.role,
            password_hash: request.password_hash.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let user = sqlx::query_as::<_, UserDBResponse>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(user)
    }

    async fn get_bulk(&mut self, ids: Vec<Self::Id>) -> Result<HashMap<Self::Id, Self::Response>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut query = sqlx::QueryBuilder::new(format!("SELECT {USER_COLUMNS} FROM users WHERE id IN ("));
        let mut values = query.separated(", ");
        for id in &ids {
            values.push_bind(*id);
        }
        query.push(")");

        let users = query.build_query_as::<UserDBResponse>().fetch_all(&mut *self.db).await?;
        Ok(users.into_iter().map(|u| (u.id, u)).collect())
    }

    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let users = sqlx::query_as::<_, UserDBResponse>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at DESC, id DESC LIMIT ?"
        ))
        .bind(filter.limit)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::db::errors::DbError;
    use sqlx::SqlitePool;

    fn user_request(email: &str, role: Role) -> UserCreateDBRequest {
        UserCreateDBRequest {
            email: email.to_string(),
            name: Some("Test User".to_string()),
            image: None,
            role,
            password_hash: None,
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_get_by_email(pool: SqlitePool) {
        let mut tx = pool.begin().await.unwrap();
        let mut repo = Users::new(&mut tx);

        let created = repo.create(&user_request("user@example.com", Role::User)).await.unwrap();
        tx.commit().await.unwrap();

        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let fetched = repo.get_user_by_email("user@example.com").await.unwrap().unwrap();
        assert_eq!(fetched.id, created.id);
        assert_eq!(fetched.role, Role::User);

        assert!(repo.get_user_by_email("nobody@example.com").await.unwrap().is_none());
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_duplicate_email_is_unique_violation(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        repo.create(&user_request("dupe@example.com", Role::User)).await.unwrap();
        let result = repo.create(&user_request("dupe@example.com", Role::Admin)).await;

        assert!(matches!(result, Err(DbError::UniqueViolation { .. })));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_set_password_hash(pool: SqlitePool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = Users::new(&mut conn);

        let user = repo.create(&user_request("admin@example.com", Role::Admin)).await.unwrap();
        assert!(user.password_hash.is_none());

        assert!(repo.set_password_hash(user.id, "argon2-hash").await.unwrap());

        let fetched = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.password_hash.as_deref(), Some("argon2-hash"));
    }
}
