/// Lead capture endpoints
///
/// Visitors leave an email on a creator's public page; creators read their
/// captured leads back. Submissions are append-only.
///
/// # Endpoints
///
/// - `POST /api/email-submissions` - Record a lead
/// - `GET /api/email-submissions/:creator_id` - A creator's leads

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
    creator::Creator,
    email_submission::{CreateEmailSubmission, EmailSubmission},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Record a lead request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubmissionRequest {
    /// Creator whose page captured the lead
    pub creator_id: Uuid,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Where the form was shown
    #[serde(default = "default_source")]
    pub source: String,
}

fn default_source() -> String {
    "profile".to_string()
}

/// Record a lead
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or the creator does not exist
pub async fn create_submission(
    State(state): State<AppState>,
    Json(req): Json<CreateSubmissionRequest>,
) -> ApiResult<(StatusCode, Json<EmailSubmission>)> {
    req.validate().map_err(validation_error)?;

    let submission = EmailSubmission::create(
        &state.db,
        CreateEmailSubmission {
            creator_id: req.creator_id,
            email: req.email,
            source: req.source,
        },
    )
    .await?;

    tracing::info!(creator_id = %submission.creator_id, "Lead captured");

    Ok((StatusCode::CREATED, Json(submission)))
}

/// A creator's captured leads, newest first
///
/// # Errors
///
/// - `404 Not Found`: No creator with that id
pub async fn list_submissions(
    State(state): State<AppState>,
    Path(creator_id): Path<Uuid>,
) -> ApiResult<Json<Vec<EmailSubmission>>> {
    // Distinguish "no such creator" from "no leads yet"
    if Creator::find_by_id(&state.db, creator_id).await?.is_none() {
        return Err(ApiError::NotFound("Creator not found".to_string()));
    }

    let submissions = EmailSubmission::list_by_creator(&state.db, creator_id).await?;

    Ok(Json(submissions))
}
