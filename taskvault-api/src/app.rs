//! Application state and router builder
//!
//! # Example
//!
//! ```no_run
//! use taskvault_api::{app::{build_router, AppState}, config::Config};
//! use taskvault_shared::store::Storage;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let state = AppState::new(Storage::in_memory(), config);
//! let app = build_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use taskvault_shared::{
    auth::jwt::TokenIssuer,
    services::{auth::AuthService, tasks::TaskService},
    store::Storage,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::{config::Config, middleware::auth::jwt_auth_layer, response::Envelope, routes};

/// Shared application state
///
/// Cloned into every handler via Axum's `State` extractor; all fields are
/// cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Registration and login
    pub auth: AuthService,

    /// Owner-scoped task operations
    pub tasks: TaskService,

    /// Backing stores, for health checks
    pub storage: Storage,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services to `storage` using `config`
    pub fn new(storage: Storage, config: Config) -> Self {
        let issuer = TokenIssuer::new(&config.jwt);

        Self {
            auth: AuthService::new(storage.users.clone(), issuer, config.password),
            tasks: TaskService::new(storage.tasks.clone()),
            storage,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET /health                  # Health check (public)
/// └── /api/
///     ├── /auth/                   # Public
///     │   ├── POST /register
///     │   └── POST /login
///     └── /tasks/                  # Bearer token required
///         ├── GET    /             # List own tasks
///         ├── POST   /             # Create task
///         ├── GET    /status       # Filter by ?completed=
///         ├── GET    /:id
///         ├── PUT    /:id          # Partial update
///         └── DELETE /:id
/// ```
///
/// `/tasks/status` is a static segment, so it always wins over `/tasks/:id`.
/// Unknown paths get a 404 envelope; a known path with an unsupported
/// method gets a 405 envelope.
///
/// # Middleware Stack
///
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (task routes only)
pub fn build_router(state: AppState) -> Router {
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let task_routes = Router::new()
        .route(
            "/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route("/status", get(routes::tasks::list_tasks_by_status))
        .route(
            "/:id",
            get(routes::tasks::get_task)
                .put(routes::tasks::update_task)
                .delete(routes::tasks::delete_task),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/tasks", task_routes);

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(route_not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.cors_permissive() {
        return CorsLayer::permissive();
    }

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
        .max_age(std::time::Duration::from_secs(3600))
}

async fn route_not_found() -> impl IntoResponse {
    failure_response(StatusCode::NOT_FOUND, "Route not found")
}

async fn method_not_allowed() -> impl IntoResponse {
    failure_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

fn failure_response(status: StatusCode, message: &str) -> impl IntoResponse {
    (status, Json(Envelope::<()>::failure(status.as_u16(), message)))
}
