/// Tag taxonomy endpoints
///
/// # Endpoints
///
/// - `GET /api/tags` - List, optionally filtered by type
/// - `POST /api/tags` - Create

use crate::{
    app::AppState,
    error::{validation_error, ApiResult},
};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use makerfolio_shared::models::tag::{CreateTag, Tag, TagType};
use serde::Deserialize;
use validator::Validate;

/// Create tag request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTagRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be 1-50 characters"))]
    pub name: String,

    #[validate(length(min = 1, max = 50, message = "Slug must be 1-50 characters"))]
    pub slug: String,

    /// Defaults to `product` when omitted
    #[serde(rename = "type", default)]
    pub tag_type: TagType,
}

/// Listing filter
#[derive(Debug, Deserialize)]
pub struct ListTagsQuery {
    #[serde(rename = "type")]
    pub tag_type: Option<TagType>,
}

/// List tags ordered by name
pub async fn list_tags(
    State(state): State<AppState>,
    Query(query): Query<ListTagsQuery>,
) -> ApiResult<Json<Vec<Tag>>> {
    let tags = match query.tag_type {
        Some(tag_type) => Tag::list_by_type(&state.db, tag_type).await?,
        None => Tag::list_all(&state.db).await?,
    };

    Ok(Json(tags))
}

/// Create a tag
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or name/slug already exists
pub async fn create_tag(
    State(state): State<AppState>,
    Json(req): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<Tag>)> {
    req.validate().map_err(validation_error)?;

    // Unique constraints on name and slug surface as duplicate-key errors
    let tag = Tag::create(
        &state.db,
        CreateTag {
            name: req.name,
            slug: req.slug,
            tag_type: req.tag_type,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(tag)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tag_request_defaults_type_to_product() {
        let req: CreateTagRequest =
            serde_json::from_str(r#"{"name": "Design", "slug": "design"}"#).unwrap();
        assert_eq!(req.tag_type, TagType::Product);

        let req: CreateTagRequest =
            serde_json::from_str(r#"{"name": "Guides", "slug": "guides", "type": "resource"}"#)
                .unwrap();
        assert_eq!(req.tag_type, TagType::Resource);
    }
}
