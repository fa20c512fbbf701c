//! # Makerfolio API Server
//!
//! REST backend for a maker portfolio platform: creator profiles, a
//! moderated product directory, a resource library, tags, and lead capture.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p makerfolio-api
//! ```

use makerfolio_api::{
    app::{build_router, AppState},
    config::Config,
};
use makerfolio_shared::{
    auth::session::InMemorySessionStore,
    db::{
        migrations::{ensure_database_exists, run_migrations},
        pool::create_pool,
    },
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "makerfolio_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Makerfolio API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    ensure_database_exists(&config.database.url).await?;
    let pool = create_pool(config.database.clone()).await?;
    run_migrations(&pool).await?;

    let sessions = Arc::new(InMemorySessionStore::new());
    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, sessions);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
