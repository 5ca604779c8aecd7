/// Application state and router builder
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                        # public
/// └── /v1/
///     ├── /auth/
///     │   ├── POST /register         # public
///     │   └── POST /login            # public
///     ├── /tasks/                    # authenticated, owner-scoped
///     │   ├── GET    /
///     │   ├── POST   /
///     │   ├── GET    /:id
///     │   ├── PUT    /:id
///     │   └── DELETE /:id
///     └── /pomodoros/                # authenticated, owner-scoped
///         ├── GET    /
///         ├── POST   /
///         ├── GET    /stats
///         └── POST   /:id/complete
/// ```
///
/// Identity resolution runs as a layer on the protected groups: a request
/// either carries a verifiable `Authorization: Bearer <token>` header, or
/// it is rejected with 401 before any handler runs.

use crate::{config::Config, error::ApiError};
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use pomotrack_shared::auth::middleware::resolve_identity;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; `Arc` keeps the clone
/// cheap. Nothing in here is mutable after startup except through the pool.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Token signing secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public: token acquisition
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        );

    let pomodoro_routes = Router::new()
        .route(
            "/",
            get(routes::pomodoros::list_pomodoros).post(routes::pomodoros::start_pomodoro),
        )
        .route("/stats", get(routes::pomodoros::pomodoro_stats))
        .route("/:id/complete", post(routes::pomodoros::complete_pomodoro));

    // Everything below requires a resolved identity
    let protected_routes = Router::new()
        .nest("/tasks", task_routes)
        .nest("/pomodoros", pomodoro_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_layer,
        ));

    let v1_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    let cors = build_cors_layer(&state.config);

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(axum::middleware::from_fn(
            crate::middleware::security::security_headers,
        ))
        .with_state(state)
}

/// Configures CORS from the allowed-origins list; `*` means permissive
fn build_cors_layer(config: &Config) -> CorsLayer {
    if config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = config
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
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    }
}

/// Identity-resolution middleware layer
///
/// Verifies the bearer token and injects the resolved `AuthContext` into
/// request extensions for downstream handlers.
async fn auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let context = resolve_identity(req.headers(), state.jwt_secret())?;
    req.extensions_mut().insert(context);

    Ok(next.run(req).await)
}
