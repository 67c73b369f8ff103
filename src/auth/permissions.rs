//! Role-based access checks on top of [`CurrentUser`] extraction.

use crate::{
    AppState,
    api::models::users::CurrentUser,
    errors::{Error, Result},
    types::Operation,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::debug;

/// Extractor that only admits users whose role can curate the catalog.
///
/// Wraps [`CurrentUser`] extraction, so the usual 401 applies when no
/// credentials are present; authenticated non-admins get a 403.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if !user.role.can_curate() {
            debug!("User {} denied catalog curation (role {:?})", user.id, user.role);
            return Err(Error::InsufficientPermissions {
                action: Operation::Create,
                resource: "catalog entries".to_string(),
            });
        }

        Ok(RequireAdmin(user))
    }
}
