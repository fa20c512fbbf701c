/// Resource model: free/premium downloadable assets
///
/// Resources have no moderation lifecycle, just CRUD with a visibility flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Kind of downloadable asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_type")]
pub enum ResourceType {
    #[sqlx(rename = "PDF")]
    #[serde(rename = "PDF")]
    Pdf,

    Notion,
    Tool,
    Guide,
}

/// Who can see a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "resource_visibility", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Free,
    Premium,
}

/// Resource model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub link: String,

    /// Asset kind
    #[serde(rename = "type")]
    pub resource_type: ResourceType,

    /// Visibility tier, defaults to free
    pub visible_to: Visibility,

    pub tags: Json<Vec<String>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a resource
#[derive(Debug, Clone)]
pub struct CreateResource {
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub resource_type: ResourceType,
    pub visible_to: Visibility,
    pub tags: Vec<String>,
}

/// Input for updating a resource
#[derive(Debug, Clone, Default)]
pub struct UpdateResource {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub visible_to: Option<Visibility>,
    pub tags: Option<Vec<String>>,
}

const RESOURCE_COLUMNS: &str =
    "id, title, description, link, resource_type, visible_to, tags, created_at, updated_at";

impl Resource {
    /// Creates a new resource
    pub async fn create(pool: &PgPool, data: CreateResource) -> Result<Self, sqlx::Error> {
        let resource = sqlx::query_as::<_, Resource>(&format!(
            r#"
            INSERT INTO resources (title, description, link, resource_type, visible_to, tags)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {RESOURCE_COLUMNS}
            "#,
        ))
        .bind(data.title)
        .bind(data.description)
        .bind(data.link)
        .bind(data.resource_type)
        .bind(data.visible_to)
        .bind(Json(data.tags))
        .fetch_one(pool)
        .await?;

        Ok(resource)
    }

    /// Finds a resource by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let resource = sqlx::query_as::<_, Resource>(&format!(
            "SELECT {RESOURCE_COLUMNS} FROM resources WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(resource)
    }

    /// Lists resources, newest first, optionally filtered by visibility
    pub async fn list(
        pool: &PgPool,
        visible_to: Option<Visibility>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let resources = match visible_to {
            Some(visibility) => {
                sqlx::query_as::<_, Resource>(&format!(
                    r#"
                    SELECT {RESOURCE_COLUMNS} FROM resources
                    WHERE visible_to = $1
                    ORDER BY created_at DESC
                    "#,
                ))
                .bind(visibility)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Resource>(&format!(
                    "SELECT {RESOURCE_COLUMNS} FROM resources ORDER BY created_at DESC"
                ))
                .fetch_all(pool)
                .await?
            }
        };

        Ok(resources)
    }

    /// Updates a resource, stamping `updated_at`
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateResource,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE resources SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            query.push_str(&format!(", title = ${}", bind_count));
        }
        if data.description.is_some() {
            bind_count += 1;
            query.push_str(&format!(", description = ${}", bind_count));
        }
        if data.link.is_some() {
            bind_count += 1;
            query.push_str(&format!(", link = ${}", bind_count));
        }
        if data.resource_type.is_some() {
            bind_count += 1;
            query.push_str(&format!(", resource_type = ${}", bind_count));
        }
        if data.visible_to.is_some() {
            bind_count += 1;
            query.push_str(&format!(", visible_to = ${}", bind_count));
        }
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {RESOURCE_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Resource>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(link) = data.link {
            q = q.bind(link);
        }
        if let Some(resource_type) = data.resource_type {
            q = q.bind(resource_type);
        }
        if let Some(visible_to) = data.visible_to {
            q = q.bind(visible_to);
        }
        if let Some(tags) = data.tags {
            q = q.bind(Json(tags));
        }

        let resource = q.fetch_optional(pool).await?;

        Ok(resource)
    }

    /// Hard-deletes a resource
    ///
    /// Returns true if a row was removed.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resources WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_type_wire_names() {
        assert_eq!(serde_json::to_string(&ResourceType::Pdf).unwrap(), "\"PDF\"");
        assert_eq!(
            serde_json::to_string(&ResourceType::Notion).unwrap(),
            "\"Notion\""
        );
        assert_eq!(
            serde_json::from_str::<ResourceType>("\"Guide\"").unwrap(),
            ResourceType::Guide
        );
    }

    #[test]
    fn test_visibility_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Visibility::Free).unwrap(), "\"free\"");
        assert_eq!(
            serde_json::from_str::<Visibility>("\"premium\"").unwrap(),
            Visibility::Premium
        );
    }

    #[test]
    fn test_resource_wire_format() {
        let resource = Resource {
            id: Uuid::new_v4(),
            title: "Pricing guide".to_string(),
            description: None,
            link: "https://example.com/guide.pdf".to_string(),
            resource_type: ResourceType::Pdf,
            visible_to: Visibility::Premium,
            tags: Json(vec![]),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&resource).unwrap();
        assert_eq!(json["type"], "PDF");
        assert_eq!(json["visibleTo"], "premium");
        assert!(json.get("resource_type").is_none());
    }
}
