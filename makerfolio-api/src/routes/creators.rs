/// Creator directory endpoints
///
/// Creators created here carry no credentials and cannot log in; they are
/// directory profiles. Accounts with credentials come from
/// `POST /api/auth/register`.
///
/// # Endpoints
///
/// - `GET /api/creators` - List all creators (requires a session)
/// - `POST /api/creators` - Create a profile
/// - `GET /api/creators/:id` - Fetch by id
/// - `PUT /api/creators/:id` - Update profile fields
/// - `GET /api/creators/username/:username` - Public profile with products

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use makerfolio_shared::models::{
    creator::{CreateCreator, Creator, Socials, UpdateCreator},
    product::Product,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Create creator request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCreatorRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: String,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    pub socials: Option<Socials>,
}

/// Update creator request; only present fields are written
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCreatorRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 50, message = "Username must be 3-50 characters"))]
    pub username: Option<String>,

    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: Option<String>,

    #[validate(length(max = 512, message = "Avatar URL must be at most 512 characters"))]
    pub avatar_url: Option<String>,

    #[validate(length(max = 1000, message = "Bio must be at most 1000 characters"))]
    pub bio: Option<String>,

    pub socials: Option<Socials>,

    pub email_capture_enabled: Option<bool>,
}

/// Public profile response: the creator plus their visible products
#[derive(Debug, Serialize)]
pub struct CreatorProfileResponse {
    #[serde(flatten)]
    pub creator: Creator,

    pub products: Vec<Product>,
}

/// List all creators, newest first
pub async fn list_creators(State(state): State<AppState>) -> ApiResult<Json<Vec<Creator>>> {
    let creators = Creator::list_all(&state.db).await?;
    Ok(Json(creators))
}

/// Create a directory profile (no login credentials)
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or email/username already taken
pub async fn create_creator(
    State(state): State<AppState>,
    Json(req): Json<CreateCreatorRequest>,
) -> ApiResult<(StatusCode, Json<Creator>)> {
    req.validate().map_err(validation_error)?;

    if Creator::find_by_email(&state.db, &req.email).await?.is_some() {
        return Err(ApiError::Duplicate("Email already exists".to_string()));
    }
    if Creator::find_by_username(&state.db, &req.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Duplicate("Username already taken".to_string()));
    }

    let creator = Creator::create(
        &state.db,
        CreateCreator {
            email: req.email,
            username: req.username,
            name: req.name,
            password_hash: None,
            avatar_url: req.avatar_url,
            bio: req.bio,
            socials: req.socials,
        },
    )
    .await?;

    tracing::info!(creator_id = %creator.id, "Creator profile created");

    Ok((StatusCode::CREATED, Json(creator)))
}

/// Fetch a creator by id
pub async fn get_creator(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Creator>> {
    let creator = Creator::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Creator not found".to_string()))?;

    Ok(Json(creator))
}

/// Update a creator's profile fields
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the new email/username is taken
/// - `404 Not Found`: No creator with that id
pub async fn update_creator(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCreatorRequest>,
) -> ApiResult<Json<Creator>> {
    req.validate().map_err(validation_error)?;

    // Uniqueness pre-checks ignore the creator's own current values
    if let Some(email) = &req.email {
        if let Some(existing) = Creator::find_by_email(&state.db, email).await? {
            if existing.id != id {
                return Err(ApiError::Duplicate("Email already exists".to_string()));
            }
        }
    }
    if let Some(username) = &req.username {
        if let Some(existing) = Creator::find_by_username(&state.db, username).await? {
            if existing.id != id {
                return Err(ApiError::Duplicate("Username already taken".to_string()));
            }
        }
    }

    let creator = Creator::update(
        &state.db,
        id,
        UpdateCreator {
            email: req.email,
            username: req.username,
            name: req.name,
            avatar_url: req.avatar_url,
            bio: req.bio,
            socials: req.socials,
            email_capture_enabled: req.email_capture_enabled,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Creator not found".to_string()))?;

    Ok(Json(creator))
}

/// Public profile: creator by username plus their visible products
///
/// Products shown are the creator's approved ones plus their drafts; products
/// sitting in moderation or rejected stay off the profile.
pub async fn get_creator_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<CreatorProfileResponse>> {
    let creator = Creator::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| ApiError::NotFound("Creator not found".to_string()))?;

    let products = Product::list_by_creator(&state.db, creator.id)
        .await?
        .into_iter()
        .filter(|p| {
            matches!(
                p.status,
                makerfolio_shared::models::product::ProductStatus::Approved
                    | makerfolio_shared::models::product::ProductStatus::Draft
            )
        })
        .collect();

    Ok(Json(CreatorProfileResponse { creator, products }))
}
