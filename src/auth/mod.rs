//! Authentication and authorization.
//!
//! Two credential forms are accepted everywhere:
//! - a JWT session cookie (issued by the login endpoint)
//! - an `Authorization: Bearer <jwt>` header carrying the same token
//!
//! [`crate::api::models::users::CurrentUser`] is the extractor for "any
//! authenticated user"; [`permissions::RequireAdmin`] wraps it with a
//! capability check for the admin-only catalog mutations.

pub mod current_user;
pub mod password;
pub mod permissions;
pub mod session;
