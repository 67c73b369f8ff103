use crate::api::models::auth::{LoginRequest, LoginResponse, LogoutResponse};
use crate::api::models::users::{CurrentUser, UserResponse};
use crate::auth::{
    password::verify_string,
    session::{clear_session_cookie, create_session_cookie, create_session_token},
};
use crate::db::handlers::Users;
use crate::errors::{Error, Result};
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{AppendHeaders, IntoResponse},
    Json,
};

/// One message for every credential failure so the endpoint doesn't reveal
/// which emails have accounts.
fn invalid_credentials() -> Error {
    Error::Unauthenticated {
        message: Some("Invalid email or password".to_string()),
    }
}

#[utoipa::path(
    post,
    path = "/authentication/login",
    tag = "authentication",
    summary = "Log in",
    description = "Verify credentials and set the session cookie",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = UserResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, Json(payload): Json<LoginRequest>) -> Result<LoginResponse> {
    let mut conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    let user = {
        let mut repo = Users::new(&mut conn);
        repo.get_user_by_email(&payload.email).await?.ok_or_else(invalid_credentials)?
    };

    // Accounts without a password (e.g. not yet provisioned) can never log in.
    let Some(hash) = user.password_hash.clone() else {
        return Err(invalid_credentials());
    };

    // Argon2 verification is CPU-bound; keep it off the async runtime.
    let password = payload.password;
    let verified = tokio::task::spawn_blocking(move || verify_string(&password, &hash))
        .await
        .map_err(|e| Error::Internal {
            operation: format!("join password verification task: {e}"),
        })??;

    if !verified {
        return Err(invalid_credentials());
    }

    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    };
    let token = create_session_token(&current, &state.config)?;
    let cookie = create_session_cookie(&token, &state.config);

    tracing::info!("User {} logged in", current.id);

    Ok(LoginResponse {
        user: UserResponse::from(user),
        cookie,
    })
}

#[utoipa::path(
    post,
    path = "/authentication/logout",
    tag = "authentication",
    summary = "Log out",
    description = "Clear the session cookie",
    responses(
        (status = 200, description = "Logged out", body = LogoutResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    let cookie = clear_session_cookie(&state.config);
    (
        AppendHeaders([(header::SET_COOKIE, cookie)]),
        Json(LogoutResponse {
            message: "Logged out".to_string(),
        }),
    )
}

#[utoipa::path(
    get,
    path = "/authentication/me",
    tag = "authentication",
    summary = "Current user",
    description = "The authenticated principal from the session token",
    responses(
        (status = 200, description = "Current user", body = CurrentUser),
        (status = 401, description = "Not authenticated")
    ),
    security(
        ("BearerAuth" = []),
        ("CookieAuth" = [])
    )
)]
#[tracing::instrument(skip_all)]
pub async fn me(user: CurrentUser) -> Json<CurrentUser> {
    Json(user)
}
