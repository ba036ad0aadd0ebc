pub mod refresh_token_repository;
pub mod user_repository;

pub use refresh_token_repository::PostgresRefreshTokenRepository;
pub use user_repository::PostgresUserRepository;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

use crate::domain::auth::errors::RepositoryError;
use crate::infrastructure::config::DatabaseConfig;

/// Opens a connection pool, giving up after the configured connect timeout
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, RepositoryError> {
  tracing::info!("Connecting to database");

  let pool = tokio::time::timeout(
    Duration::from_secs(config.connect_timeout_seconds),
    PgPoolOptions::new()
      .max_connections(config.max_connections)
      .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
      .connect(&config.url),
  )
  .await
  .map_err(|_| {
    tracing::error!(
      "Database connection timed out after {} seconds",
      config.connect_timeout_seconds
    );
    RepositoryError::ConnectionFailed(format!(
      "timed out after {} seconds",
      config.connect_timeout_seconds
    ))
  })?
  .map_err(|e| {
    tracing::error!("Failed to connect to database: {}", e);
    RepositoryError::ConnectionFailed(e.to_string())
  })?;

  tracing::info!("Database connection pool created");
  Ok(pool)
}

/// Applies the identity schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), RepositoryError> {
  tracing::info!("Running database migrations");
  sqlx::migrate!("./migrations").run(pool).await?;
  tracing::info!("Database migrations completed");
  Ok(())
}
