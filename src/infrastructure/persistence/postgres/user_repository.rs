use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::auth::{
  entities::User,
  errors::{AuthError, RepositoryError},
  ports::UserRepository,
};

/// PostgreSQL implementation of the UserRepository trait
pub struct PostgresUserRepository {
  pool: PgPool,
}

impl PostgresUserRepository {
  /// Creates a new instance of PostgresUserRepository
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

/// Database row structure for users table
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
  id: Uuid,
  email: String,
  password_hash: String,
  created_at: DateTime<Utc>,
  last_login_at: Option<DateTime<Utc>>,
  is_active: bool,
}

impl From<UserRow> for User {
  fn from(row: UserRow) -> Self {
    User::from_db(
      row.id,
      row.email,
      row.password_hash,
      row.created_at,
      row.last_login_at,
      row.is_active,
    )
  }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
  async fn create(&self, user: User) -> Result<User, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            INSERT INTO users (id, email, password_hash, created_at, last_login_at, is_active)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, email, password_hash, created_at, last_login_at, is_active
            "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.created_at)
    .bind(user.last_login_at)
    .bind(user.is_active)
    .fetch_one(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to create user: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.into())
  }

  async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, created_at, last_login_at, is_active
            FROM users
            WHERE id = $1
            "#,
    )
    .bind(id)
    .fetch_optional(&self.pool)
    .await?;

    Ok(row.map(User::from))
  }

  async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
    let row = sqlx::query_as::<_, UserRow>(
      r#"
            SELECT id, email, password_hash, created_at, last_login_at, is_active
            FROM users
            WHERE email = $1
            "#,
    )
    .bind(email)
    .fetch_optional(&self.pool)
    .await
    .map_err(|e| {
      tracing::error!("Failed to find user by email: {}", e);
      AuthError::from(e)
    })?;

    Ok(row.map(User::from))
  }

  async fn email_exists(&self, email: &str) -> Result<bool, AuthError> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
      .bind(email)
      .fetch_one(&self.pool)
      .await?;

    Ok(exists)
  }

  async fn update(&self, user: User) -> Result<User, AuthError> {
    let result = sqlx::query_as::<_, UserRow>(
      r#"
            UPDATE users
            SET
                email = $2,
                password_hash = $3,
                last_login_at = $4,
                is_active = $5
            WHERE id = $1
            RETURNING id, email, password_hash, created_at, last_login_at, is_active
            "#,
    )
    .bind(user.id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.last_login_at)
    .bind(user.is_active)
    .fetch_optional(&self.pool)
    .await;

    match result {
      Ok(Some(row)) => Ok(row.into()),
      Ok(None) => Err(AuthError::Repository(RepositoryError::NotFound)),
      Err(e) => {
        tracing::error!("Failed to update user {}: {}", user.id, e);
        Err(e.into())
      }
    }
  }
}
