/// Email submission model: append-only lead capture
///
/// Visitors leave an email address on a creator's public page. Records are
/// never updated or deleted.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A captured lead
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailSubmission {
    pub id: Uuid,

    /// Creator whose page captured the lead
    pub creator_id: Uuid,

    /// Visitor-supplied email address
    pub email: String,

    /// Where the form was shown (defaults to "profile")
    pub source: String,

    pub created_at: DateTime<Utc>,
}

/// Input for recording a lead
#[derive(Debug, Clone)]
pub struct CreateEmailSubmission {
    pub creator_id: Uuid,
    pub email: String,
    pub source: String,
}

impl EmailSubmission {
    /// Records a new lead
    pub async fn create(pool: &PgPool, data: CreateEmailSubmission) -> Result<Self, sqlx::Error> {
        let submission = sqlx::query_as::<_, EmailSubmission>(
            r#"
            INSERT INTO email_submissions (creator_id, email, source)
            VALUES ($1, $2, $3)
            RETURNING id, creator_id, email, source, created_at
            "#,
        )
        .bind(data.creator_id)
        .bind(data.email)
        .bind(data.source)
        .fetch_one(pool)
        .await?;

        Ok(submission)
    }

    /// Lists a creator's captured leads, newest first
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let submissions = sqlx::query_as::<_, EmailSubmission>(
            r#"
            SELECT id, creator_id, email, source, created_at
            FROM email_submissions
            WHERE creator_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(creator_id)
        .fetch_all(pool)
        .await?;

        Ok(submissions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_wire_format() {
        let submission = EmailSubmission {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            email: "fan@example.com".to_string(),
            source: "profile".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&submission).unwrap();
        assert!(json.get("creatorId").is_some());
        assert_eq!(json["source"], "profile");
    }
}
