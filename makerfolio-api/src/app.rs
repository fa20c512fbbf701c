/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use axum_extra::extract::cookie::CookieJar;
use makerfolio_shared::auth::session::SessionStore;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "makerfolio_session";

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// Session storage backend
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, sessions: Arc<dyn SessionStore>) -> Self {
        Self {
            db,
            config: Arc::new(config),
            sessions,
        }
    }

    /// Session lifetime from configuration
    pub fn session_ttl(&self) -> std::time::Duration {
        self.config.session.ttl()
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                          # Health check (public)
/// └── /api/
///     ├── /auth/
///     │   ├── POST /register           # Create account + session
///     │   ├── POST /login              # Create session
///     │   ├── POST /logout             # Destroy session (idempotent)
///     │   └── GET  /me                 # Current creator (session)
///     ├── /creators/
///     │   ├── GET  /                   # List all (session)
///     │   ├── POST /                   # Create profile (no credentials)
///     │   ├── GET  /:id
///     │   ├── PUT  /:id
///     │   └── GET  /username/:username # Public profile + products
///     ├── /products/
///     │   ├── GET  /                   # List with filters (session)
///     │   ├── POST /
///     │   ├── GET  /:id
///     │   ├── PUT  /:id
///     │   ├── POST /:id/submit
///     │   ├── POST /:id/approve
///     │   └── POST /:id/reject
///     ├── /resources/                  # CRUD
///     ├── /tags/                       # List + create
///     └── /email-submissions/          # Capture + list per creator
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Security headers
/// 4. Session authentication (per-route basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes; only /me requires a session
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .merge(
            Router::new()
                .route("/me", get(routes::auth::me))
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    session_auth_layer,
                )),
        );

    // Creator directory; the full listing requires a session, the rest is public
    let creator_routes = Router::new()
        .route("/", post(routes::creators::create_creator))
        .route("/:id", get(routes::creators::get_creator))
        .route("/:id", put(routes::creators::update_creator))
        .route(
            "/username/:username",
            get(routes::creators::get_creator_by_username),
        )
        .merge(
            Router::new()
                .route("/", get(routes::creators::list_creators))
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    session_auth_layer,
                )),
        );

    // Products; the filtered listing requires a session
    let product_routes = Router::new()
        .route("/", post(routes::products::create_product))
        .route("/:id", get(routes::products::get_product))
        .route("/:id", put(routes::products::update_product))
        .route("/:id/submit", post(routes::products::submit_product))
        .route("/:id/approve", post(routes::products::approve_product))
        .route("/:id/reject", post(routes::products::reject_product))
        .merge(
            Router::new()
                .route("/", get(routes::products::list_products))
                .route_layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    session_auth_layer,
                )),
        );

    let resource_routes = Router::new()
        .route("/", get(routes::resources::list_resources))
        .route("/", post(routes::resources::create_resource))
        .route("/:id", get(routes::resources::get_resource))
        .route("/:id", put(routes::resources::update_resource))
        .route("/:id", delete(routes::resources::delete_resource));

    let tag_routes = Router::new()
        .route("/", get(routes::tags::list_tags))
        .route("/", post(routes::tags::create_tag));

    let email_submission_routes = Router::new()
        .route("/", post(routes::email_submissions::create_submission))
        .route(
            "/:creator_id",
            get(routes::email_submissions::list_submissions),
        );

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/creators", creator_routes)
        .nest("/products", product_routes)
        .nest("/resources", resource_routes)
        .nest("/tags", tag_routes)
        .nest("/email-submissions", email_submission_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        // Development mode: permissive CORS
        CorsLayer::permissive()
    } else {
        // Production mode: configure allowed origins
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    // Combine all routes with middleware stack
    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

/// Session authentication middleware layer
///
/// Resolves the session cookie against the session store, slides the expiry
/// window, and injects the session identity into request extensions.
async fn session_auth_layer(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(ApiError::AuthenticationRequired)?;

    let session = state
        .sessions
        .get(&token)
        .await
        .ok_or(ApiError::AuthenticationRequired)?;

    // Sliding expiration: activity keeps the session alive
    state.sessions.touch(&token, state.session_ttl()).await;

    req.extensions_mut().insert(session.identity);

    Ok(next.run(req).await)
}
