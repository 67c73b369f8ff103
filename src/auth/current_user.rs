use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::session,
    errors::{Error, Result},
    types::abbrev_uuid,
};
use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{debug, instrument, trace};

/// Extract user from a Bearer JWT in the Authorization header if present.
/// Returns:
/// - None: No Authorization header or not a Bearer token
/// - Some(Ok(user)): Valid session token found and verified
/// - Some(Err(error)): Bearer token present but invalid
#[instrument(skip(parts, config))]
fn try_bearer_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentUser>> {
    let auth_header = parts.headers.get(axum::http::header::AUTHORIZATION)?;

    let auth_str = match auth_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::Validation {
                message: format!("Invalid authorization header: {e}"),
            }));
        }
    };

    let token = auth_str.strip_prefix("Bearer ")?;

    Some(session::verify_session_token(token, config))
}

/// Extract user from the JWT session cookie if present and valid.
/// Returns:
/// - None: No session cookie present
/// - Some(Ok(user)): Valid JWT found and verified
/// - Some(Err(error)): Cookie header present but unreadable
#[instrument(skip(parts, config))]
fn try_session_cookie_auth(parts: &Parts, config: &crate::config::Config) -> Option<Result<CurrentUser>> {
    let cookie_header = parts.headers.get(axum::http::header::COOKIE)?;

    let cookie_str = match cookie_header.to_str() {
        Ok(s) => s,
        Err(e) => {
            return Some(Err(Error::Validation {
                message: format!("Invalid cookie header: {e}"),
            }));
        }
    };
    let cookie_name = &config.auth.session.cookie_name;

    for cookie in cookie_str.split(';') {
        let cookie = cookie.trim();
        if let Some((name, value)) = cookie.split_once('=') {
            if name == cookie_name {
                match session::verify_session_token(value, config) {
                    Ok(user) => return Some(Ok(user)),
                    Err(_) => {
                        // Expired/invalid token; an expired cookie is normal,
                        // so keep checking rather than failing the request
                        continue;
                    }
                }
            }
        }
    }
    None
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // Each method returns Option<Result<CurrentUser>>:
        // - None means the auth method is not applicable (no credentials present)
        // - Some(Ok(user)) means successful authentication
        // - Some(Err(error)) means auth credentials were present but invalid
        //
        // Try the bearer header first, then the session cookie; fail only if
        // neither produced a user.

        match try_bearer_auth(parts, &state.config) {
            Some(Ok(user)) => {
                debug!("Found bearer-token authenticated user: {}", abbrev_uuid(&user.id));
                return Ok(user);
            }
            Some(Err(e)) => {
                trace!("Bearer token authentication failed: {:?}", e);
            }
            None => {
                trace!("No bearer token authentication attempted");
            }
        }

        match try_session_cookie_auth(parts, &state.config) {
            Some(Ok(user)) => {
                debug!("Found session-cookie authenticated user: {}", abbrev_uuid(&user.id));
                return Ok(user);
            }
            Some(Err(e)) => {
                trace!("Session cookie authentication failed: {:?}", e);
            }
            None => {
                trace!("No session cookie authentication attempted");
            }
        }

        Err(Error::Unauthenticated { message: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::users::Role;
    use crate::auth::session::{create_session_cookie, create_session_token};
    use crate::test_utils::create_test_config;
    use axum::extract::FromRequestParts as _;
    use sqlx::SqlitePool;
    use uuid::Uuid;

    fn test_user() -> CurrentUser {
        CurrentUser {
            id: Uuid::new_v4(),
            email: "someone@example.com".to_string(),
            name: None,
            role: Role::User,
        }
    }

    fn parts_with_header(header_name: &str, header_value: &str) -> Parts {
        let request = axum::http::Request::builder()
            .uri("http://localhost/test")
            .header(header_name, header_value)
            .body(())
            .unwrap();

        let (parts, _body) = request.into_parts();
        parts
    }

    fn state_for(pool: SqlitePool) -> AppState {
        AppState::builder().db(pool).config(create_test_config()).build()
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_bearer_token_extraction(pool: SqlitePool) {
        let state = state_for(pool);
        let user = test_user();
        let token = create_session_token(&user, &state.config).unwrap();

        let mut parts = parts_with_header("authorization", &format!("Bearer {token}"));
        let extracted = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap();

        assert_eq!(extracted.id, user.id);
        assert_eq!(extracted.email, user.email);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_session_cookie_extraction(pool: SqlitePool) {
        let state = state_for(pool);
        let user = test_user();
        let token = create_session_token(&user, &state.config).unwrap();
        let cookie = create_session_cookie(&token, &state.config);
        // Send back only the name=value pair, as a browser would
        let pair = cookie.split(';').next().unwrap();

        let mut parts = parts_with_header("cookie", pair);
        let extracted = CurrentUser::from_request_parts(&mut parts, &state).await.unwrap();

        assert_eq!(extracted.id, user.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_no_credentials_is_unauthenticated(pool: SqlitePool) {
        let state = state_for(pool);

        let request = axum::http::Request::builder().uri("http://localhost/test").body(()).unwrap();
        let (mut parts, _body) = request.into_parts();

        let result = CurrentUser::from_request_parts(&mut parts, &state).await;
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_garbage_bearer_token_is_unauthenticated(pool: SqlitePool) {
        let state = state_for(pool);

        let mut parts = parts_with_header("authorization", "Bearer not-a-jwt");
        let result = CurrentUser::from_request_parts(&mut parts, &state).await;

        assert!(result.is_err());
        assert_eq!(result.unwrap_err().status_code(), axum::http::StatusCode::UNAUTHORIZED);
    }
}
