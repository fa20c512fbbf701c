/// Product endpoints
///
/// Products move through a moderation lifecycle (draft, submitted, approved
/// or rejected). The generic update endpoint can never change status; the
/// three transition endpoints are the only way a product moves.
///
/// # Endpoints
///
/// - `GET /api/products` - List with filters (requires a session)
/// - `POST /api/products` - Create a draft
/// - `GET /api/products/:id` - Fetch by id
/// - `PUT /api/products/:id` - Update editable fields
/// - `POST /api/products/:id/submit` - draft → submitted
/// - `POST /api/products/:id/approve` - submitted → approved
/// - `POST /api/products/:id/reject` - submitted → rejected

use crate::{
    app::AppState,
    error::{validation_error, ApiError, ApiResult},
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use makerfolio_shared::models::product::{
    CreateProduct, Product, ProductStatus, UpdateProduct,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Create product request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    /// Owning creator
    pub creator_id: Uuid,

    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 512, message = "Link must be 1-512 characters"))]
    pub link: String,

    #[serde(default)]
    pub tags: Vec<String>,
}

/// Update product request; only present fields are written
///
/// Status is not accepted here. Sending one is a deserialization error, not a
/// silent ignore.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateProductRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[validate(length(min = 1, max = 512, message = "Link must be 1-512 characters"))]
    pub link: Option<String>,

    pub tags: Option<Vec<String>>,

    pub is_featured: Option<bool>,
}

/// Listing filters
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    /// Restrict to one creator's products (any status)
    pub creator_id: Option<Uuid>,

    /// Status to list; supported values are `approved` (default) and
    /// `submitted` (the moderation queue)
    pub status: Option<ProductStatus>,
}

/// List products
///
/// `?creatorId=` wins over `?status=`: a creator filter returns all of that
/// creator's products regardless of status.
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ListProductsQuery>,
) -> ApiResult<Json<Vec<Product>>> {
    if let Some(creator_id) = query.creator_id {
        let products = Product::list_by_creator(&state.db, creator_id).await?;
        return Ok(Json(products));
    }

    let products = match query.status {
        Some(ProductStatus::Submitted) => Product::list_submitted(&state.db).await?,
        Some(ProductStatus::Approved) | None => Product::list_approved(&state.db).await?,
        Some(other) => {
            return Err(ApiError::BadRequest(format!(
                "No listing for status '{}'",
                other.as_str()
            )))
        }
    };

    Ok(Json(products))
}

/// Create a product in draft status
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the creator does not exist
pub async fn create_product(
    State(state): State<AppState>,
    Json(req): Json<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    req.validate().map_err(validation_error)?;

    let product = Product::create(
        &state.db,
        CreateProduct {
            creator_id: req.creator_id,
            title: req.title,
            description: req.description,
            link: req.link,
            tags: req.tags,
        },
    )
    .await?;

    tracing::info!(product_id = %product.id, creator_id = %product.creator_id, "Product created");

    Ok((StatusCode::CREATED, Json(product)))
}

/// Fetch a product by id
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    let product = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Update a product's editable fields
///
/// Approved and rejected products are frozen.
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the product is in a terminal status
/// - `404 Not Found`: No product with that id
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateProductRequest>,
) -> ApiResult<Json<Product>> {
    req.validate().map_err(validation_error)?;

    let existing = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    if existing.status.is_terminal() {
        return Err(ApiError::InvalidTransition(format!(
            "Cannot update a product with status '{}'",
            existing.status.as_str()
        )));
    }

    let product = Product::update(
        &state.db,
        id,
        UpdateProduct {
            title: req.title,
            description: req.description,
            link: req.link,
            tags: req.tags,
            is_featured: req.is_featured,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    Ok(Json(product))
}

/// Submit a draft for review
///
/// # Errors
///
/// - `400 Bad Request`: The product is not a draft
/// - `404 Not Found`: No product with that id
pub async fn submit_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    transition(&state, id, ProductStatus::Submitted).await
}

/// Approve a submitted product
///
/// # Errors
///
/// - `400 Bad Request`: The product is not submitted
/// - `404 Not Found`: No product with that id
pub async fn approve_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    transition(&state, id, ProductStatus::Approved).await
}

/// Reject a submitted product
///
/// # Errors
///
/// - `400 Bad Request`: The product is not submitted
/// - `404 Not Found`: No product with that id
pub async fn reject_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Product>> {
    transition(&state, id, ProductStatus::Rejected).await
}

/// Shared transition flow: existence check, legality check, guarded update
///
/// The guarded update can still return None if another request moved the
/// product between the check and the update; that race reports the same
/// invalid-transition error.
async fn transition(
    state: &AppState,
    id: Uuid,
    target: ProductStatus,
) -> ApiResult<Json<Product>> {
    let existing = Product::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

    if !existing.status.can_transition_to(target) {
        return Err(ApiError::InvalidTransition(format!(
            "Cannot move a product from '{}' to '{}'",
            existing.status.as_str(),
            target.as_str()
        )));
    }

    let updated = match target {
        ProductStatus::Submitted => Product::submit(&state.db, id).await?,
        ProductStatus::Approved => Product::approve(&state.db, id).await?,
        ProductStatus::Rejected => Product::reject(&state.db, id).await?,
        ProductStatus::Draft => None,
    };

    let product = updated.ok_or_else(|| {
        ApiError::InvalidTransition(format!(
            "Product is no longer eligible to become '{}'",
            target.as_str()
        ))
    })?;

    tracing::info!(product_id = %product.id, status = product.status.as_str(), "Product transitioned");

    Ok(Json(product))
}
