/// End-to-end tests against a real PostgreSQL
///
/// These run the full stack (router, handlers, SQL) against the database in
/// `DATABASE_URL` and skip when it is unset:
/// - Registration and login round-trip
/// - Unique email/username enforcement
/// - The product moderation lifecycle, including the approved listing
/// - The guarded single-row transition at the model layer

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{body_json, db_context, unique_email, unique_username, DbContext};
use makerfolio_shared::models::creator::{CreateCreator, Creator};
use makerfolio_shared::models::product::{CreateProduct, Product, ProductStatus};
use serde_json::json;
use tower::Service as _;

fn get(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Registers a fresh creator; returns the session Cookie value and the
/// creator body from the `user` envelope
async fn register(ctx: &mut DbContext) -> (String, serde_json::Value) {
    let response = ctx
        .app
        .call(post_json(
            "/api/auth/register",
            json!({
                "email": unique_email(),
                "username": unique_username(),
                "password": "correct horse battery",
                "name": "Maker"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("register sets a session cookie")
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string();

    let body = body_json(response).await;
    (cookie, body["user"].clone())
}

/// Creates a draft product owned by `creator_id` via the API
async fn create_draft(ctx: &mut DbContext, creator_id: &str, title: &str) -> serde_json::Value {
    let response = ctx
        .app
        .call(post_json(
            "/api/products",
            json!({
                "creatorId": creator_id,
                "title": title,
                "link": "https://example.com/product"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    body_json(response).await
}

#[tokio::test]
async fn test_register_then_login_returns_the_same_creator() {
    let Some(mut ctx) = db_context().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let email = unique_email();
    let username = unique_username();

    let response = ctx
        .app
        .call(post_json(
            "/api/auth/register",
            json!({
                "email": email,
                "username": username,
                "password": "correct horse battery",
                "name": "Maker"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let registered = body_json(response).await;
    assert_eq!(registered["user"]["email"], email.as_str());
    assert_eq!(registered["user"]["username"], username.as_str());
    assert!(registered["user"].get("passwordHash").is_none());

    let response = ctx
        .app
        .call(post_json(
            "/api/auth/login",
            json!({ "email": email, "password": "correct horse battery" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let logged_in = body_json(response).await;
    assert_eq!(logged_in["user"]["id"], registered["user"]["id"]);
    assert_eq!(logged_in["user"]["username"], username.as_str());
}

#[tokio::test]
async fn test_me_resolves_the_session_to_the_registered_creator() {
    let Some(mut ctx) = db_context().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let (cookie, user) = register(&mut ctx).await;

    let response = ctx.app.call(get("/api/auth/me", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["user"]["id"], user["id"]);
    assert_eq!(body["user"]["email"], user["email"]);
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let Some(mut ctx) = db_context().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let email = unique_email();
    let username = unique_username();

    let response = ctx
        .app
        .call(post_json(
            "/api/auth/register",
            json!({
                "email": email,
                "username": username,
                "password": "correct horse battery",
                "name": "Maker"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    // Same email, fresh username
    let response = ctx
        .app
        .call(post_json(
            "/api/auth/register",
            json!({
                "email": email,
                "username": unique_username(),
                "password": "correct horse battery",
                "name": "Maker"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "duplicate_key");

    // Fresh email, same username
    let response = ctx
        .app
        .call(post_json(
            "/api/auth/register",
            json!({
                "email": unique_email(),
                "username": username,
                "password": "correct horse battery",
                "name": "Maker"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "duplicate_key");
}

#[tokio::test]
async fn test_product_moderation_flow() {
    let Some(mut ctx) = db_context().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let (cookie, user) = register(&mut ctx).await;
    let creator_id = user["id"].as_str().unwrap().to_string();

    let product = create_draft(&mut ctx, &creator_id, "First Product").await;
    assert_eq!(product["status"], "draft");
    assert!(product["submittedAt"].is_null());
    assert!(product["approvedAt"].is_null());
    let product_id = product["id"].as_str().unwrap().to_string();

    // Submit stamps submittedAt
    let response = ctx
        .app
        .call(post_json(
            &format!("/api/products/{product_id}/submit"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "submitted");
    assert!(body["submittedAt"].is_string());

    // A second submit is no longer legal
    let response = ctx
        .app
        .call(post_json(
            &format!("/api/products/{product_id}/submit"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_transition");

    // Approve stamps approvedAt
    let response = ctx
        .app
        .call(post_json(
            &format!("/api/products/{product_id}/approve"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "approved");
    assert!(body["approvedAt"].is_string());

    // A later approval sorts before it in the listing
    let second = create_draft(&mut ctx, &creator_id, "Second Product").await;
    let second_id = second["id"].as_str().unwrap().to_string();
    for step in ["submit", "approve"] {
        let response = ctx
            .app
            .call(post_json(&format!("/api/products/{second_id}/{step}"), json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = ctx.app.call(get("/api/products", &cookie)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    let ids: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();

    let first_pos = ids.iter().position(|id| *id == product_id).unwrap();
    let second_pos = ids.iter().position(|id| *id == second_id).unwrap();
    assert!(second_pos < first_pos, "newest approval lists first");

    for product in listing.as_array().unwrap() {
        assert_eq!(product["status"], "approved");
    }
}

#[tokio::test]
async fn test_rejected_product_cannot_be_approved() {
    let Some(mut ctx) = db_context().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let (_cookie, user) = register(&mut ctx).await;
    let creator_id = user["id"].as_str().unwrap().to_string();

    let product = create_draft(&mut ctx, &creator_id, "Doomed Product").await;
    let product_id = product["id"].as_str().unwrap().to_string();

    let response = ctx
        .app
        .call(post_json(
            &format!("/api/products/{product_id}/submit"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .call(post_json(
            &format!("/api/products/{product_id}/reject"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "rejected");
    assert!(body["approvedAt"].is_null());

    // Rejection is terminal
    let response = ctx
        .app
        .call(post_json(
            &format!("/api/products/{product_id}/approve"),
            json!({}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "invalid_transition");
}

/// The guarded UPDATE itself refuses a repeat transition, independent of the
/// handler's legality check
#[tokio::test]
async fn test_guarded_submit_refuses_a_second_caller() {
    let Some(ctx) = db_context().await else {
        eprintln!("skipping: DATABASE_URL not set");
        return;
    };

    let creator = Creator::create(
        &ctx.db,
        CreateCreator {
            email: unique_email(),
            username: unique_username(),
            name: "Maker".to_string(),
            password_hash: None,
            avatar_url: None,
            bio: None,
            socials: None,
        },
    )
    .await
    .unwrap();

    let product = Product::create(
        &ctx.db,
        CreateProduct {
            creator_id: creator.id,
            title: "Raced Product".to_string(),
            description: None,
            link: "https://example.com/product".to_string(),
            tags: vec![],
        },
    )
    .await
    .unwrap();

    let first = Product::submit(&ctx.db, product.id).await.unwrap();
    assert_eq!(first.map(|p| p.status), Some(ProductStatus::Submitted));

    // The row no longer matches WHERE status = 'draft'
    let second = Product::submit(&ctx.db, product.id).await.unwrap();
    assert!(second.is_none());
}
