//! # Carebook DB
//!
//! Database pool initialization and the credential store boundary.
//!
//! - [`CredentialStore`]: the async boundary the authenticator talks to
//! - [`PgCredentialStore`]: PostgreSQL implementation (see `migrations/`)
//! - [`MemoryCredentialStore`]: in-process implementation for tests and tooling
//!
//! # Example
//!
//! ```ignore
//! use carebook_config::DatabaseConfig;
//! use carebook_db::{init_db_pool, run_migrations, PgCredentialStore};
//!
//! let pool = init_db_pool(&DatabaseConfig::from_env()?).await?;
//! run_migrations(&pool).await?;
//! let store = PgCredentialStore::new(pool);
//! ```

pub mod memory;
pub mod postgres;
pub mod store;

use carebook_config::DatabaseConfig;
use carebook_core::AuthError;
use sqlx::postgres::PgPoolOptions;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;
pub use store::CredentialStore;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

/// Opens a PostgreSQL connection pool.
///
/// The returned pool is cheaply cloneable and is shared by every store and
/// request handler. Failure to connect is reported as
/// [`AuthError::StorageUnavailable`].
pub async fn init_db_pool(config: &DatabaseConfig) -> Result<PgPool, AuthError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
        .map_err(|e| AuthError::storage(format!("Failed to connect to database: {e}")))
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AuthError> {
    sqlx::migrate!("../../migrations")
        .run(pool)
        .await
        .map_err(|e| AuthError::storage(format!("Failed to run migrations: {e}")))
}
