use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::auth_result::AuthResult;
use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;
use crate::domain::auth::value_objects::{Email, Password};

/// Command for registering a new user
#[derive(Clone)]
pub struct RegisterUserCommand {
  /// User's email address, any case
  pub email: String,
  /// User's password (plain text, will be hashed)
  pub password: String,
}

impl std::fmt::Debug for RegisterUserCommand {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RegisterUserCommand")
      .field("email", &self.email)
      .field("password", &"***")
      .finish()
  }
}

/// Use case for registering a new user
pub struct RegisterUserUseCase {
  auth_service: Arc<AuthService>,
}

impl RegisterUserUseCase {
  /// Creates a new instance of RegisterUserUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the user registration use case
  ///
  /// # Arguments
  /// * `command` - The registration command containing user details
  /// * `cancel` - Stops the flow before its next durable write
  ///
  /// # Returns
  /// An `AuthResult` so the client is logged in straight away
  ///
  /// # Errors
  /// * `AuthError::Validation` - malformed email or weak password
  /// * `AuthError::UserAlreadyExists` - the email is already registered
  pub async fn execute(
    &self,
    command: RegisterUserCommand,
    cancel: &CancellationToken,
  ) -> Result<AuthResult, AuthError> {
    let email = Email::new(command.email)?;
    let password = Password::new(command.password)?;

    let session = self.auth_service.register(email, password, cancel).await?;

    Ok(session.into())
  }
}
