use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::auth::entities::RefreshToken;
use crate::domain::auth::errors::{AuthError, RepositoryError};
use crate::domain::auth::ports::RefreshTokenRepository;

/// Database row structure for refresh_tokens table
#[derive(Debug, FromRow)]
struct RefreshTokenRow {
  id: Uuid,
  user_id: Uuid,
  token: String,
  expires_at: DateTime<Utc>,
  created_at: DateTime<Utc>,
  is_revoked: bool,
  revoked_at: Option<DateTime<Utc>>,
}

impl From<RefreshTokenRow> for RefreshToken {
  fn from(row: RefreshTokenRow) -> Self {
    RefreshToken::from_db(
      row.id,
      row.user_id,
      row.token,
      row.expires_at,
      row.created_at,
      row.is_revoked,
      row.revoked_at,
    )
  }
}

/// PostgreSQL implementation of the RefreshTokenRepository trait
pub struct PostgresRefreshTokenRepository {
  pool: PgPool,
}

impl PostgresRefreshTokenRepository {
  /// Creates a new PostgresRefreshTokenRepository with the given connection pool
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl RefreshTokenRepository for PostgresRefreshTokenRepository {
  async fn create(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
    let row = sqlx::query_as::<_, RefreshTokenRow>(
      r#"
            INSERT INTO refresh_tokens (id, user_id, token, expires_at, created_at, is_revoked, revoked_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, token, expires_at, created_at, is_revoked, revoked_at
            "#,
    )
    .bind(token.id)
    .bind(token.user_id)
    .bind(&token.token)
    .bind(token.expires_at)
    .bind(token.created_at)
    .bind(token.is_revoked)
    .bind(token.revoked_at)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create refresh token: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.into())
  }

  async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, AuthError> {
    let row = sqlx::query_as::<_, RefreshTokenRow>(
      r#"
            SELECT id, user_id, token, expires_at, created_at, is_revoked, revoked_at
            FROM refresh_tokens
            WHERE token = $1
            "#,
    )
    .bind(token)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find refresh token: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.map(RefreshToken::from))
  }

  async fn find_active_by_user(&self, user_id: Uuid) -> Result<Vec<RefreshToken>, AuthError> {
    let rows = sqlx::query_as::<_, RefreshTokenRow>(
      r#"
            SELECT id, user_id, token, expires_at, created_at, is_revoked, revoked_at
            FROM refresh_tokens
            WHERE user_id = $1 AND is_revoked = FALSE AND expires_at > $2
            ORDER BY created_at DESC
            "#,
    )
    .bind(user_id)
    .bind(Utc::now())
    .fetch_all(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to list refresh tokens for user {}: {}", user_id, e);
      AuthError::from(e)
    })?;

    Ok(rows.into_iter().map(RefreshToken::from).collect())
  }

  async fn revoke_all_for_user(&self, user_id: Uuid) -> Result<u64, AuthError> {
    let result = sqlx::query(
      r#"
            UPDATE refresh_tokens
            SET is_revoked = TRUE, revoked_at = $2
            WHERE user_id = $1 AND is_revoked = FALSE
            "#,
    )
    .bind(user_id)
    .bind(Utc::now())
    .execute(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to revoke refresh tokens for user {}: {}", user_id, e);
      AuthError::from(e)
    })?;

    Ok(result.rows_affected())
  }

  async fn update(&self, token: RefreshToken) -> Result<RefreshToken, AuthError> {
    let row = sqlx::query_as::<_, RefreshTokenRow>(
      r#"
            UPDATE refresh_tokens
            SET
                is_revoked = $2,
                revoked_at = $3
            WHERE id = $1 AND is_revoked = FALSE
            RETURNING id, user_id, token, expires_at, created_at, is_revoked, revoked_at
            "#,
    )
    .bind(token.id)
    .bind(token.is_revoked)
    .bind(token.revoked_at)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to update refresh token {}: {}", token.id, e);
      AuthError::from(e)
    })?;

    row
      .map(RefreshToken::from)
      .ok_or(AuthError::Repository(RepositoryError::NotFound))
  }
}
