//! API request/response models for users.

use crate::db::models::users::UserDBResponse;
use crate::types::UserId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role. Closed set - authorization is a capability check on the
/// role, never a string comparison in handlers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Whether this role may create catalog entries (tools, categories, use cases).
    pub fn can_curate(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// User as exposed over the API (never includes the password hash)
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UserResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub image: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserDBResponse> for UserResponse {
    fn from(db: UserDBResponse) -> Self {
        Self {
            id: db.id,
            email: db.email,
            name: db.name,
            image: db.image,
            role: db.role,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// The authenticated principal, reconstructed from session claims
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CurrentUser {
    #[schema(value_type = String, format = "uuid")]
    pub id: UserId,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_capabilities() {
        assert!(Role::Admin.can_curate());
        assert!(!Role::User.can_curate());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_value(Role::Admin).unwrap(), serde_json::json!("ADMIN"));
        assert_eq!(serde_json::from_value::<Role>(serde_json::json!("USER")).unwrap(), Role::User);
        assert!(serde_json::from_value::<Role>(serde_json::json!("SUPERUSER")).is_err());
    }
}
