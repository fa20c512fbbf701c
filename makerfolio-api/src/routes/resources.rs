/// Resource library endpoints
///
/// Resources are downloadable assets with a free/premium visibility flag.
/// Plain CRUD, no moderation lifecycle.
///
/// # Endpoints
///
/// - `GET /api/resources` - List, optionally filtered by visibility
/// - `POST /api/resources` - Create
/// - `GET /api/resources/:id` - Fetch by id
/// - `PUT /api/resources/:id` - Update
/// - `DELETE /api/resources/:id` - Delete

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use makerfolio_shared::models::resource::{
    CreateResource, Resource, ResourceType, UpdateResource, Visibility,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create resource request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 512, message = "Link must be 1-512 characters"))]
    pub link: String,

    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Defaults to free
    pub visible_to: Option<Visibility>,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update resource request; only present fields are written
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 512, message = "Link must be 1-512 characters"))]
    pub link: Option<String>,

    #[serde(rename = "type")]
    pub resource_type: Option<ResourceType>,

    pub visible_to: Option<Visibility>,

    pub tags: Option<Vec<String>>,
}

/// Listing filters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResourcesQuery {
    pub visible_to: Option<Visibility>,
}

/// List resources, newest first
pub async fn list_resources(
    State(state): State<AppState>,
    Query(query): Query<ListResourcesQuery>,
) -> ApiResult<Json<Vec<Resource>>> {
    let resources = Resource::list(&state.db, query.visible_to).await?;
    Ok(Json(resources))
}

/// Create a resource
pub async fn create_resource(
    State(state): State<AppState>,
    Json(req): Json<CreateResourceRequest>,
) -> ApiResult<(StatusCode, Json<Resource>)> {
    req.validate().map_err(validation_error)?;

    let resource = Resource::create(
        &state.db,
        CreateResource {
            title: req.title,
            description: req.description,
            link: req.link,
            resource_type: req.resource_type,
            visible_to: req.visible_to.unwrap_or(Visibility::Free),
            tags: req.tags,
        },
    )
    .await?;

    tracing::info!(resource_id = %resource.id, "Resource created");

    Ok((StatusCode::CREATED, Json(resource)))
}

/// Fetch a resource by id
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Resource>> {
    let resource = Resource::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))?;

    Ok(Json(resource))
}

/// Update a resource
pub async fn update_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResourceRequest>,
) -> ApiResult<Json<Resource>> {
    req.validate().map_err(validation_error)?;

    let resource = Resource::update(
        &state.db,
        id,
        UpdateResource {
            title: req.title,
            description: req.description,
            link: req.link,
            resource_type: req.resource_type,
            visible_to: req.visible_to,
            tags: req.tags,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Resource not found".to_string()))?;

    Ok(Json(resource))
}

/// Delete a resource
///
/// # Errors
///
/// - `404 Not Found`: No resource with that id
pub async fn delete_resource(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    let removed = Resource::delete(&state.db, id).await?;
    if !removed {
        return Err(ApiError::NotFound("Resource not found".to_string()));
    }

    tracing::info!(resource_id = %id, "Resource deleted");

    Ok(StatusCode::NO_CONTENT)
}
