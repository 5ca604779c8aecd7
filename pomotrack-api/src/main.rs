//! # Pomotrack API Server
//!
//! Task and pomodoro tracking backend built with Axum and sqlx.
//!
//! Startup sequence: load configuration, connect the database pool, run
//! migrations, then serve. The token signing secret is read once here and
//! travels with `AppState`.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p pomotrack-api
//! ```

use pomotrack_api::{
    app::{build_router, AppState},
    config::Config,
};
use pomotrack_shared::db::{migrations::run_migrations, pool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pomotrack_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "Pomotrack API v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let db = pool::create_pool(pool::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&db).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(db, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
