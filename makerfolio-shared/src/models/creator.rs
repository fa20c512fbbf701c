/// Creator model and database operations
///
/// A creator is both the public-facing profile and the credential identity:
/// profiles registered through `/api/auth/register` carry a password hash,
/// while profiles created directly through the directory API carry none and
/// cannot log in.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE creators (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     email TEXT NOT NULL UNIQUE,
///     username TEXT NOT NULL UNIQUE,
///     name TEXT NOT NULL,
///     password_hash VARCHAR(255),
///     avatar_url VARCHAR(512),
///     bio TEXT,
///     socials JSONB,
///     email_capture_enabled BOOLEAN NOT NULL DEFAULT FALSE,
///     is_premium BOOLEAN NOT NULL DEFAULT FALSE,
///     is_admin BOOLEAN NOT NULL DEFAULT FALSE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Optional social links shown on a creator profile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
}

/// Creator account and public profile
///
/// The password hash never appears in serialized output.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Creator {
    /// Unique creator ID
    pub id: Uuid,

    /// Email address, unique across all creators
    pub email: String,

    /// Username, unique across all creators
    pub username: String,

    /// Display name
    pub name: String,

    /// Argon2id password hash; None for profiles without login credentials
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,

    /// Optional avatar URL
    pub avatar_url: Option<String>,

    /// Optional profile bio
    pub bio: Option<String>,

    /// Optional social links (stored as JSONB)
    pub socials: Option<Json<Socials>>,

    /// Whether the profile shows the email-capture form
    pub email_capture_enabled: bool,

    /// Premium account flag
    pub is_premium: bool,

    /// Admin flag; defined but not used to gate any operation
    pub is_admin: bool,

    /// When the creator was created
    pub created_at: DateTime<Utc>,

    /// When the creator was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new creator
#[derive(Debug, Clone)]
pub struct CreateCreator {
    pub email: String,
    pub username: String,
    pub name: String,

    /// Argon2id hash; None for directory-created profiles
    pub password_hash: Option<String>,

    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub socials: Option<Socials>,
}

/// Input for updating an existing creator
///
/// Only non-None fields are written. Credentials and the premium/admin flags
/// are not updatable through this path.
#[derive(Debug, Clone, Default)]
pub struct UpdateCreator {
    pub email: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub socials: Option<Socials>,
    pub email_capture_enabled: Option<bool>,
}

const CREATOR_COLUMNS: &str = "id, email, username, name, password_hash, avatar_url, bio, \
     socials, email_capture_enabled, is_premium, is_admin, created_at, updated_at";

impl Creator {
    /// Creates a new creator
    ///
    /// # Errors
    ///
    /// Returns an error if email or username already exists (unique constraint
    /// violation) or the database operation fails.
    pub async fn create(pool: &PgPool, data: CreateCreator) -> Result<Self, sqlx::Error> {
        let creator = sqlx::query_as::<_, Creator>(&format!(
            r#"
            INSERT INTO creators (email, username, name, password_hash, avatar_url, bio, socials)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {CREATOR_COLUMNS}
            "#,
        ))
        .bind(data.email)
        .bind(data.username)
        .bind(data.name)
        .bind(data.password_hash)
        .bind(data.avatar_url)
        .bind(data.bio)
        .bind(data.socials.map(Json))
        .fetch_one(pool)
        .await?;

        Ok(creator)
    }

    /// Finds a creator by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let creator = sqlx::query_as::<_, Creator>(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(creator)
    }

    /// Finds a creator by email address
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let creator = sqlx::query_as::<_, Creator>(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(creator)
    }

    /// Finds a creator by username
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let creator = sqlx::query_as::<_, Creator>(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators WHERE username = $1"
        ))
        .bind(username)
        .fetch_optional(pool)
        .await?;

        Ok(creator)
    }

    /// Updates profile fields, stamping `updated_at`
    ///
    /// Returns the updated creator, or None if the id does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateCreator,
    ) -> Result<Option<Self>, sqlx::Error> {
        // Build dynamic update query based on which fields are present
        let mut query = String::from("UPDATE creators SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.email.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email = ${}", bind_count));
        }
        if data.username.is_some() {
            bind_count += 1;
            query.push_str(&format!(", username = ${}", bind_count));
        }
        if data.name.is_some() {
            bind_count += 1;
            query.push_str(&format!(", name = ${}", bind_count));
        }
        if data.avatar_url.is_some() {
            bind_count += 1;
            query.push_str(&format!(", avatar_url = ${}", bind_count));
        }
        if data.bio.is_some() {
            bind_count += 1;
            query.push_str(&format!(", bio = ${}", bind_count));
        }
        if data.socials.is_some() {
            bind_count += 1;
            query.push_str(&format!(", socials = ${}", bind_count));
        }
        if data.email_capture_enabled.is_some() {
            bind_count += 1;
            query.push_str(&format!(", email_capture_enabled = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {CREATOR_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Creator>(&query).bind(id);

        if let Some(email) = data.email {
            q = q.bind(email);
        }
        if let Some(username) = data.username {
            q = q.bind(username);
        }
        if let Some(name) = data.name {
            q = q.bind(name);
        }
        if let Some(avatar_url) = data.avatar_url {
            q = q.bind(avatar_url);
        }
        if let Some(bio) = data.bio {
            q = q.bind(bio);
        }
        if let Some(socials) = data.socials {
            q = q.bind(Json(socials));
        }
        if let Some(email_capture_enabled) = data.email_capture_enabled {
            q = q.bind(email_capture_enabled);
        }

        let creator = q.fetch_optional(pool).await?;

        Ok(creator)
    }

    /// Lists all creators, newest first
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let creators = sqlx::query_as::<_, Creator>(&format!(
            "SELECT {CREATOR_COLUMNS} FROM creators ORDER BY created_at DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(creators)
    }
}
