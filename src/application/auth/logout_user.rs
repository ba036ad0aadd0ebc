use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Command for revoking one refresh token
#[derive(Clone)]
pub struct LogoutUserCommand {
  /// Caller identity, taken from a verified access token
  pub user_id: Uuid,
  /// The refresh token to revoke
  pub refresh_token: String,
}

impl std::fmt::Debug for LogoutUserCommand {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LogoutUserCommand")
      .field("user_id", &self.user_id)
      .field("refresh_token", &"***")
      .finish()
  }
}

/// Outcome of a logout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutResult {
  pub success: bool,
}

/// Use case for logging out a user
pub struct LogoutUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutUserUseCase {
  /// Creates a new instance of LogoutUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user logout use case
  ///
  /// # Errors
  /// Returns `AuthError::InvalidToken` if the token is unknown, belongs to
  /// someone else, or is already revoked or expired
  pub async fn execute(
    &self,
    command: LogoutUserCommand,
    cancel: &CancellationToken,
  ) -> Result<LogoutResult, AuthError> {
    self
      .auth_service
      .logout(command.user_id, &command.refresh_token, cancel)
      .await?;

    Ok(LogoutResult { success: true })
  }
}
