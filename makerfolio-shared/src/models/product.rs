/// Product model and moderation lifecycle
///
/// Products are the core moderated entity: a creator drafts a product,
/// submits it for review, and a moderator approves or rejects it.
///
/// # State Machine
///
/// ```text
/// draft → submitted → approved
///                   → rejected
/// ```
///
/// Approved and rejected are terminal. Status only changes through the three
/// named transition operations; the generic update path cannot touch it.
/// Each transition is a single guarded row update (`WHERE id = .. AND status
/// = ..`), so a double submit or a concurrent approve/reject loses the race
/// cleanly instead of corrupting timestamps.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE product_status AS ENUM ('draft', 'submitted', 'approved', 'rejected');
///
/// CREATE TABLE products (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     creator_id UUID NOT NULL REFERENCES creators(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT,
///     link TEXT NOT NULL,
///     tags JSONB NOT NULL DEFAULT '[]',
///     status product_status NOT NULL DEFAULT 'draft',
///     is_featured BOOLEAN NOT NULL DEFAULT FALSE,
///     submitted_at TIMESTAMPTZ,
///     approved_at TIMESTAMPTZ,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Product moderation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    /// Being edited by its creator, not yet in review
    Draft,

    /// Waiting for moderator review
    Submitted,

    /// Approved for the public explore directory
    Approved,

    /// Rejected by a moderator
    Rejected,
}

impl ProductStatus {
    /// Converts status to string for database predicates
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Submitted => "submitted",
            ProductStatus::Approved => "approved",
            ProductStatus::Rejected => "rejected",
        }
    }

    /// Checks if status is terminal (no further transitions)
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProductStatus::Approved | ProductStatus::Rejected)
    }

    /// Checks if transition to target status is valid
    pub fn can_transition_to(&self, target: ProductStatus) -> bool {
        match (self, target) {
            (ProductStatus::Draft, ProductStatus::Submitted) => true,
            (ProductStatus::Submitted, ProductStatus::Approved) => true,
            (ProductStatus::Submitted, ProductStatus::Rejected) => true,
            _ => false,
        }
    }
}

/// Product model
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product ID
    pub id: Uuid,

    /// Owning creator
    pub creator_id: Uuid,

    /// Product title
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Link to the product page or download
    pub link: String,

    /// Free-form tags (stored as JSONB)
    pub tags: Json<Vec<String>>,

    /// Current moderation status
    pub status: ProductStatus,

    /// Whether the product is featured in the explore directory
    pub is_featured: bool,

    /// Set exactly when the product first becomes submitted
    pub submitted_at: Option<DateTime<Utc>>,

    /// Set exactly when the product first becomes approved
    pub approved_at: Option<DateTime<Utc>>,

    /// When the product was created
    pub created_at: DateTime<Utc>,

    /// When the product was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new product (always starts as draft)
#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub creator_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub link: String,
    pub tags: Vec<String>,
}

/// Input for updating a product
///
/// `status` is deliberately absent: status changes go through
/// [`Product::submit`], [`Product::approve`], and [`Product::reject`].
#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub title: Option<String>,
    pub description: Option<String>,
    pub link: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_featured: Option<bool>,
}

const PRODUCT_COLUMNS: &str = "id, creator_id, title, description, link, tags, status, \
     is_featured, submitted_at, approved_at, created_at, updated_at";

impl Product {
    /// Creates a new product in draft status
    pub async fn create(pool: &PgPool, data: CreateProduct) -> Result<Self, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (creator_id, title, description, link, tags)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(data.creator_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.link)
        .bind(Json(data.tags))
        .fetch_one(pool)
        .await?;

        Ok(product)
    }

    /// Finds a product by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Updates editable fields, stamping `updated_at`
    ///
    /// Returns None if the id does not exist. Callers are expected to reject
    /// updates on terminal products before calling this.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProduct,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut query = String::from("UPDATE products SET updated_at = NOW()");
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
        if data.tags.is_some() {
            bind_count += 1;
            query.push_str(&format!(", tags = ${}", bind_count));
        }
        if data.is_featured.is_some() {
            bind_count += 1;
            query.push_str(&format!(", is_featured = ${}", bind_count));
        }

        query.push_str(&format!(" WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"));

        let mut q = sqlx::query_as::<_, Product>(&query).bind(id);

        if let Some(title) = data.title {
            q = q.bind(title);
        }
        if let Some(description) = data.description {
            q = q.bind(description);
        }
        if let Some(link) = data.link {
            q = q.bind(link);
        }
        if let Some(tags) = data.tags {
            q = q.bind(Json(tags));
        }
        if let Some(is_featured) = data.is_featured {
            q = q.bind(is_featured);
        }

        let product = q.fetch_optional(pool).await?;

        Ok(product)
    }

    /// Submits a draft product for review
    ///
    /// Stamps `submitted_at`. The status predicate makes this atomic: if the
    /// product is not currently a draft, no row is updated and None is
    /// returned.
    pub async fn submit(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET status = 'submitted',
                submitted_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'draft'
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Approves a submitted product
    ///
    /// Stamps `approved_at`. Returns None unless the product is currently
    /// submitted.
    pub async fn approve(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET status = 'approved',
                approved_at = NOW(),
                updated_at = NOW()
            WHERE id = $1 AND status = 'submitted'
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Rejects a submitted product
    ///
    /// `approved_at` stays null. Returns None unless the product is currently
    /// submitted.
    pub async fn reject(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let product = sqlx::query_as::<_, Product>(&format!(
            r#"
            UPDATE products
            SET status = 'rejected',
                updated_at = NOW()
            WHERE id = $1 AND status = 'submitted'
            RETURNING {PRODUCT_COLUMNS}
            "#,
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(product)
    }

    /// Lists a creator's products, newest first
    pub async fn list_by_creator(
        pool: &PgPool,
        creator_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE creator_id = $1
            ORDER BY created_at DESC
            "#,
        ))
        .bind(creator_id)
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Lists approved products, most recently approved first
    pub async fn list_approved(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE status = 'approved'
            ORDER BY approved_at DESC
            "#,
        ))
        .fetch_all(pool)
        .await?;

        Ok(products)
    }

    /// Lists submitted products for the moderation queue, oldest submission last
    pub async fn list_submitted(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS} FROM products
            WHERE status = 'submitted'
            ORDER BY submitted_at DESC
            "#,
        ))
        .fetch_all(pool)
        .await?;

        Ok(products)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(ProductStatus::Draft.as_str(), "draft");
        assert_eq!(ProductStatus::Submitted.as_str(), "submitted");
        assert_eq!(ProductStatus::Approved.as_str(), "approved");
        assert_eq!(ProductStatus::Rejected.as_str(), "rejected");
    }

    #[test]
    fn test_status_is_terminal() {
        assert!(!ProductStatus::Draft.is_terminal());
        assert!(!ProductStatus::Submitted.is_terminal());
        assert!(ProductStatus::Approved.is_terminal());
        assert!(ProductStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_status_transitions() {
        // The only legal path is draft → submitted → approved | rejected
        assert!(ProductStatus::Draft.can_transition_to(ProductStatus::Submitted));
        assert!(ProductStatus::Submitted.can_transition_to(ProductStatus::Approved));
        assert!(ProductStatus::Submitted.can_transition_to(ProductStatus::Rejected));

        // A submitted product cannot be submitted again
        assert!(!ProductStatus::Submitted.can_transition_to(ProductStatus::Submitted));

        // Draft cannot skip review
        assert!(!ProductStatus::Draft.can_transition_to(ProductStatus::Approved));
        assert!(!ProductStatus::Draft.can_transition_to(ProductStatus::Rejected));

        // Terminal states never move
        assert!(!ProductStatus::Approved.can_transition_to(ProductStatus::Submitted));
        assert!(!ProductStatus::Approved.can_transition_to(ProductStatus::Rejected));
        assert!(!ProductStatus::Rejected.can_transition_to(ProductStatus::Submitted));
        assert!(!ProductStatus::Rejected.can_transition_to(ProductStatus::Approved));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Draft).unwrap(),
            "\"draft\""
        );
        assert_eq!(
            serde_json::from_str::<ProductStatus>("\"approved\"").unwrap(),
            ProductStatus::Approved
        );
    }

    #[test]
    fn test_product_wire_format_is_camel_case() {
        let product = Product {
            id: Uuid::new_v4(),
            creator_id: Uuid::new_v4(),
            title: "T".to_string(),
            description: None,
            link: "http://l".to_string(),
            tags: Json(vec!["design".to_string()]),
            status: ProductStatus::Draft,
            is_featured: false,
            submitted_at: None,
            approved_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&product).unwrap();
        assert!(json.get("creatorId").is_some());
        assert!(json.get("isFeatured").is_some());
        assert!(json.get("submittedAt").is_some());
        assert_eq!(json["status"], "draft");
        assert!(json["submittedAt"].is_null());
        assert!(json["approvedAt"].is_null());
    }

    #[test]
    fn test_update_product_has_no_status_field() {
        // Compile-time shape check: the partial update cannot carry a status,
        // so arbitrary status writes are impossible by construction.
        let update = UpdateProduct {
            title: Some("New title".to_string()),
            ..Default::default()
        };
        assert!(update.description.is_none());
        assert!(update.is_featured.is_none());
    }
}
