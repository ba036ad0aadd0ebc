use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::auth_result::AuthResult;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Command for logging in a user
#[derive(Clone)]
pub struct LoginUserCommand {
  /// User's email address
  pub email: String,
  /// User's password (plain text)
  pub password: String,
}

impl std::fmt::Debug for LoginUserCommand {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("LoginUserCommand")
      .field("email", &self.email)
      .field("password", &"***")
      .finish()
  }
}

/// Use case for logging in a user
pub struct LoginUserUseCase {
  auth_service: Arc<AuthService>,
}

impl LoginUserUseCase {
  /// Creates a new instance of LoginUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user login use case
  ///
  /// Credentials are not run through the registration rules, so a password
  /// that could never have been registered simply fails to match.
  ///
  /// # Errors
  /// * `AuthError::InvalidCredentials` - unknown email or wrong password
  /// * `AuthError::UserNotActive` - the account has been deactivated
  pub async fn execute(
    &self,
    command: LoginUserCommand,
    cancel: &CancellationToken,
  ) -> Result<AuthResult, AuthError> {
    let session = self
      .auth_service
      .login(&command.email, &command.password, cancel)
      .await?;

    Ok(session.into())
  }
}
