/// Tag model: lookup taxonomy for products and resources
///
/// Pure lookup entity with unique name and slug. No update or delete.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// What a tag applies to; defaults to product
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "tag_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TagType {
    #[default]
    Product,
    Resource,
}

/// Tag model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: Uuid,

    /// Display name, unique
    pub name: String,

    /// URL slug, unique
    pub slug: String,

    /// Applies to products or resources
    #[serde(rename = "type")]
    pub tag_type: TagType,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a tag
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub name: String,
    pub slug: String,
    pub tag_type: TagType,
}

const TAG_COLUMNS: &str = "id, name, slug, tag_type, created_at";

impl Tag {
    /// Creates a new tag
    ///
    /// # Errors
    ///
    /// Returns an error if name or slug already exists.
    pub async fn create(pool: &PgPool, data: CreateTag) -> Result<Self, sqlx::Error> {
        let tag = sqlx::query_as::<_, Tag>(&format!(
            r#"
            INSERT INTO tags (name, slug, tag_type)
            VALUES ($1, $2, $3)
            RETURNING {TAG_COLUMNS}
            "#,
        ))
        .bind(data.name)
        .bind(data.slug)
        .bind(data.tag_type)
        .fetch_one(pool)
        .await?;

        Ok(tag)
    }

    /// Lists all tags ordered by name
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags ORDER BY name"
        ))
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }

    /// Lists tags of one type ordered by name
    pub async fn list_by_type(pool: &PgPool, tag_type: TagType) -> Result<Vec<Self>, sqlx::Error> {
        let tags = sqlx::query_as::<_, Tag>(&format!(
            "SELECT {TAG_COLUMNS} FROM tags WHERE tag_type = $1 ORDER BY name"
        ))
        .bind(tag_type)
        .fetch_all(pool)
        .await?;

        Ok(tags)
    }
}
