use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Response containing current user information
#[derive(Debug, Clone)]
pub struct GetCurrentUserResponse {
  /// Unique identifier of the user
  pub user_id: Uuid,
  /// User's email address
  pub email: String,
  /// Timestamp when the user account was created
  pub created_at: DateTime<Utc>,
  /// Timestamp of user's last successful login
  pub last_login_at: Option<DateTime<Utc>>,
  pub is_active: bool,
  /// Refresh tokens that are neither revoked nor expired
  pub active_sessions: usize,
}

/// Use case for getting the current authenticated user
pub struct GetCurrentUserUseCase {
  auth_service: Arc<AuthService>,
}

impl GetCurrentUserUseCase {
  /// Creates a new instance of GetCurrentUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the get current user use case
  ///
  /// # Arguments
  /// * `user_id` - Subject of an already verified access token
  ///
  /// # Errors
  /// Returns `AuthError::InvalidToken` if the user no longer exists
  pub async fn execute(&self, user_id: Uuid) -> Result<GetCurrentUserResponse, AuthError> {
    let (user, sessions) = self.auth_service.current_user(user_id).await?;

    Ok(GetCurrentUserResponse {
      user_id: user.id,
      email: user.email,
      created_at: user.created_at,
      last_login_at: user.last_login_at,
      is_active: user.is_active,
      active_sessions: sessions.len(),
    })
  }
}
