//! # TaskVault API Server
//!
//! Multi-user task tracker: register, log in, then manage personal tasks
//! through a bearer-token protected REST API.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p taskvault-api
//! ```
//!
//! Without `DATABASE_URL` the server runs on in-memory storage and loses
//! all data on exit.

use anyhow::Context;
use taskvault_api::{
    app::{build_router, AppState},
    config::{Config, LogFormat},
};
use taskvault_shared::{
    db::{migrations::run_migrations, pool::create_pool},
    store::Storage,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    tracing::info!(
        "TaskVault API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let storage = match &config.database {
        Some(database) => {
            let pool = create_pool(database.clone())
                .await
                .context("Failed to connect to database")?;
            run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Storage::postgres(pool)
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage");
            Storage::in_memory()
        }
    };

    let bind_address = config.bind_address();
    let app = build_router(AppState::new(storage, config));

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "taskvault_api=debug,taskvault_shared=info,tower_http=info".into()
    });

    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, draining connections...");
}
