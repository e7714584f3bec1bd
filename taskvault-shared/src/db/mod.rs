//! Database layer for TaskVault
//!
//! # Modules
//!
//! - `pool`: PostgreSQL connection pool with a startup health check
//! - `migrations`: Embedded schema migrations
//!
//! Queries themselves live in [`crate::store::postgres`].
//!
//! # Example
//!
//! ```no_run
//! use taskvault_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool(DatabaseConfig::new(std::env::var("DATABASE_URL")?)).await?;
//! run_migrations(&pool).await?;
//! # Ok(())
//! # }
//! ```

pub mod migrations;
pub mod pool;
