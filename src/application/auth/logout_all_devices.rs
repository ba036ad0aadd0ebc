use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::services::AuthService;

/// Response after logging out from all devices
#[derive(Debug, Clone)]
pub struct LogoutAllDevicesResponse {
  /// Number of refresh tokens that were revoked
  pub sessions_terminated: u64,
}

/// Use case for logging out a user from all devices
pub struct LogoutAllDevicesUseCase {
  auth_service: Arc<AuthService>,
}

impl LogoutAllDevicesUseCase {
  /// Creates a new instance of LogoutAllDevicesUseCase
  pub fn new(auth_service: Arc<AuthService>) -> Self {
    Self { auth_service }
  }

  /// Executes the logout all devices use case
  ///
  /// # Arguments
  /// * `user_id` - The ID of the user whose refresh tokens should be revoked
  ///
  /// # Returns
  /// A `LogoutAllDevicesResponse` containing the number of tokens revoked
  pub async fn execute(
    &self,
    user_id: Uuid,
    cancel: &CancellationToken,
  ) -> Result<LogoutAllDevicesResponse, AuthError> {
    let sessions_terminated = self.auth_service.logout_all(user_id, cancel).await?;

    Ok(LogoutAllDevicesResponse {
      sessions_terminated,
    })
  }
}
