use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::auth::services::IssuedSession;

/// Credentials returned to the client after register or login
#[derive(Clone)]
pub struct AuthResult {
  pub user_id: Uuid,
  pub email: String,
  /// Signed JWT presented on every authenticated request
  pub access_token: String,
  /// Opaque token presented on logout
  pub refresh_token: String,
  pub access_token_expires_at: DateTime<Utc>,
  pub refresh_token_expires_at: DateTime<Utc>,
}

impl From<IssuedSession> for AuthResult {
  fn from(session: IssuedSession) -> Self {
    let access_token_expires_at = session.access_token.expires_at();
    Self {
      user_id: session.user.id,
      email: session.user.email,
      access_token: session.access_token.into_inner(),
      refresh_token: session.refresh_token.token,
      access_token_expires_at,
      refresh_token_expires_at: session.refresh_token.expires_at,
    }
  }
}

impl std::fmt::Debug for AuthResult {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("AuthResult")
      .field("user_id", &self.user_id)
      .field("email", &self.email)
      .field("access_token_expires_at", &self.access_token_expires_at)
      .field("refresh_token_expires_at", &self.refresh_token_expires_at)
      .finish_non_exhaustive()
  }
}
