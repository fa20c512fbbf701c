/// Authentication endpoints
///
/// Session-based authentication: register and login create a server-side
/// session and hand the browser an opaque token in an HttpOnly cookie. The
/// creator record doubles as the credential identity, so these endpoints
/// return the creator object (minus the password hash) under a `user` key.
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Create a creator account and a session
/// - `POST /api/auth/login` - Authenticate and create a session
/// - `POST /api/auth/logout` - Destroy the session (idempotent)
/// - `GET /api/auth/me` - Current creator (requires a session)

use crate::{
    app::{AppState, SESSION_COOKIE},
    error::{validation_error, ApiError, ApiResult, ValidationErrorDetail},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use makerfolio_shared::{
    auth::{
        password,
        session::SessionIdentity,
    },
    models::creator::{CreateCreator, Creator},
};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Register request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Username, unique
    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    /// Password (length policy checked separately)
    pub password: String,

    /// Display name
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,
}

/// Login request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password
    pub password: String,
}

/// Auth response envelope: the creator, wrapped under `user`
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: Creator,
}

/// Builds the session cookie
fn session_cookie(state: &AppState, token: String) -> Cookie<'static> {
    let max_age = time::Duration::seconds(state.session_ttl().as_secs() as i64);

    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .path("/")
        .same_site(SameSite::Lax)
        .secure(state.config.session.cookie_secure)
        .max_age(max_age)
        .build()
}

/// Register a new creator
///
/// Creates a creator with login credentials, opens a session, and sets the
/// session cookie.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or email/username already taken
/// - `500 Internal Server Error`: Server error
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate().map_err(validation_error)?;

    password::validate_password_policy(&req.password).map_err(|message| {
        ApiError::Validation(vec![ValidationErrorDetail {
            field: "password".to_string(),
            message,
        }])
    })?;

    // Pre-check duplicates for friendly messages; the unique constraints
    // still catch races
    if Creator::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Duplicate("Email already exists".to_string()));
    }
    if Creator::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate("Username already taken".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    let creator = Creator::create(
        &state.db,
        CreateCreator {
            email: req.email,
            username: req.username,
            name: req.name,
            password_hash: Some(password_hash),
            avatar_url: None,
            bio: None,
            socials: None,
        },
    )
    .await?;

    tracing::info!(creator_id = %creator.id, "Creator registered");

    let session = state
        .sessions
        .create(
            SessionIdentity {
                id: creator.id,
                email: creator.email.clone(),
                username: creator.username.clone(),
                name: creator.name.clone(),
            },
            state.session_ttl(),
        )
        .await;

    let jar = jar.add(session_cookie(&state, session.token));

    Ok((
        jar,
        (StatusCode::CREATED, Json(UserResponse { user: creator })),
    ))
}

/// Login
///
/// Verifies credentials and opens a session. Unknown emails, wrong passwords,
/// and accounts without credentials all produce the same 401 so the endpoint
/// leaks nothing about which emails are registered.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `401 Unauthorized`: Invalid credentials
/// - `500 Internal Server Error`: Server error
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate().map_err(validation_error)?;

    let creator = Creator::find_by_email(&state.db, &req.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    // Directory-created profiles have no hash and cannot log in
    let hash = creator
        .password_hash
        .as_deref()
        .ok_or(ApiError::InvalidCredentials)?;

    let valid = password::verify_password(&req.password, hash)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    tracing::info!(creator_id = %creator.id, "Creator logged in");

    let session = state
        .sessions
        .create(
            SessionIdentity {
                id: creator.id,
                email: creator.email.clone(),
                username: creator.username.clone(),
                name: creator.name.clone(),
            },
            state.session_ttl(),
        )
        .await;

    let jar = jar.add(session_cookie(&state, session.token));

    Ok((jar, Json(UserResponse { user: creator })))
}

/// Logout
///
/// Destroys the session behind the cookie and clears the cookie. Calling
/// without a session, or twice, succeeds the same way.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.destroy(cookie.value()).await;
    }

    let mut removal = Cookie::from(SESSION_COOKIE);
    removal.set_path("/");
    let jar = jar.remove(removal);

    (jar, Json(serde_json::json!({ "message": "Logged out" })))
}

/// Current creator
///
/// Resolves the session identity to the creator's fresh database record.
///
/// # Errors
///
/// - `401 Unauthorized`: No session, or the account no longer exists
pub async fn me(
    State(state): State<AppState>,
    Extension(identity): Extension<SessionIdentity>,
) -> ApiResult<Json<UserResponse>> {
    let creator = Creator::find_by_id(&state.db, identity.id)
        .await?
        .ok_or(ApiError::AuthenticationRequired)?;

    Ok(Json(UserResponse { user: creator }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_user_response_wraps_creator_under_user_key() {
        let creator = Creator {
            id: Uuid::new_v4(),
            email: "maker@example.com".to_string(),
            username: "maker".to_string(),
            name: "Maker".to_string(),
            password_hash: Some("$argon2id$not-a-real-hash".to_string()),
            avatar_url: None,
            bio: None,
            socials: None,
            email_capture_enabled: false,
            is_premium: false,
            is_admin: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse { user: creator }).unwrap();
        assert_eq!(json["user"]["username"], "maker");
        assert_eq!(json["user"]["email"], "maker@example.com");
        // The hash must never serialize, even inside the envelope
        assert!(json["user"].get("passwordHash").is_none());
        assert!(json["user"].get("password_hash").is_none());
    }
}
